//! Lexical tokens of the table notation

use std::fmt;
use std::fmt::{Display, Formatter};

use super::{GrammarParser, Rule};
use crate::error::TokenizeError;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::Parser;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StringLit(String),
    NumberLit(f64),
    BoolLit(bool),
    ObjectStart,
    ObjectEnd,
    Key(String),
    Assign,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::StringLit(s) => write!(f, "string {:?}", s),
            Token::NumberLit(n) => write!(f, "number {}", n),
            Token::BoolLit(b) => write!(f, "boolean {}", b),
            Token::ObjectStart => write!(f, "object start"),
            Token::ObjectEnd => write!(f, "object end"),
            Token::Key(k) => write!(f, "key [{:?}]", k),
            Token::Assign => write!(f, "assignment"),
        }
    }
}

/// Splits a text in tokens
///
/// Whitespace, commas, stray punctuation and `--` comments are dropped. Any
/// lexeme that starts like a string, a key, a number or a bare word but does
/// not complete is an error.
///
/// # Examples
/// ```rust
/// # use ahcharts::parser::tokens::{tokenize, Token};
/// let tokens = tokenize(r#"{ ["realm"] = "Sulfuron", }"#).unwrap();
/// assert_eq!(
///     tokens,
///     vec![
///         Token::ObjectStart,
///         Token::Key("realm".to_string()),
///         Token::Assign,
///         Token::StringLit("Sulfuron".to_string()),
///         Token::ObjectEnd,
///     ]
/// );
/// ```
pub fn tokenize(text: &str) -> Result<Vec<Token>, TokenizeError> {
    let mut parsed = GrammarParser::parse(Rule::tokens, text).map_err(|e| {
        let (line, column) = match e.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        };
        TokenizeError {
            line,
            column,
            message: e.variant.message().to_string(),
        }
    })?;

    let mut tokens = Vec::new();
    let elements = match parsed.next() {
        Some(root) => root.into_inner(),
        None => return Ok(tokens),
    };
    for element in elements {
        let token = match element.as_rule() {
            Rule::assign => Token::Assign,
            Rule::object_start => Token::ObjectStart,
            Rule::object_end => Token::ObjectEnd,
            Rule::string => Token::StringLit(parse_string(element)),
            Rule::number => Token::NumberLit(parse_number(element)?),
            Rule::boolean => Token::BoolLit(element.as_str() == "true"),
            Rule::key => {
                let inner = element.into_inner().next();
                match inner {
                    Some(x) if x.as_rule() == Rule::string => Token::Key(parse_string(x)),
                    Some(x) => Token::Key(x.as_str().to_string()),
                    None => unreachable!("the grammar requires a key lexeme"),
                }
            }
            _ => continue, // EOI
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// The content of a quoted string, without the quotes
fn parse_string(string: Pair<Rule>) -> String {
    let quoted = string.as_str();
    let len = quoted.len();
    quoted[1..len - 1].to_string()
}

fn parse_number(number: Pair<Rule>) -> Result<f64, TokenizeError> {
    number.as_str().parse::<f64>().map_err(|e| {
        let (line, column) = number.as_span().start_pos().line_col();
        TokenizeError {
            line,
            column,
            message: format!("{:?} is not a number: {}", number.as_str(), e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> Token {
        Token::Key(k.to_string())
    }
    fn string(s: &str) -> Token {
        Token::StringLit(s.to_string())
    }

    #[test]
    fn single_tokens() {
        assert_eq!(tokenize("\"salut\"").unwrap(), vec![string("salut")]);
        assert_eq!(tokenize("true").unwrap(), vec![Token::BoolLit(true)]);
        assert_eq!(tokenize("false").unwrap(), vec![Token::BoolLit(false)]);
        assert_eq!(tokenize("250.0").unwrap(), vec![Token::NumberLit(250.0)]);
        assert_eq!(tokenize("-12").unwrap(), vec![Token::NumberLit(-12.0)]);
        assert_eq!(tokenize("{").unwrap(), vec![Token::ObjectStart]);
        assert_eq!(tokenize("}").unwrap(), vec![Token::ObjectEnd]);
        assert_eq!(tokenize("=").unwrap(), vec![Token::Assign]);
        assert_eq!(tokenize(r#"["my-key"]"#).unwrap(), vec![key("my-key")]);
        assert_eq!(tokenize("[12]").unwrap(), vec![key("12")]);
    }

    #[test]
    fn simple_object() {
        let tokens = tokenize(r#"{ ["faction"] = "Alliance", ["realm"] = "Sulfuron", }"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::ObjectStart,
                key("faction"),
                Token::Assign,
                string("Alliance"),
                key("realm"),
                Token::Assign,
                string("Sulfuron"),
                Token::ObjectEnd
            ]
        );
    }

    #[test]
    fn object_with_list_and_comments() {
        let tokens = tokenize(
            r#"{ ["key"] = {
                { ["sub-key-1"] = "value1" }, -- [1]
                { ["sub-key-2"] = 2 }, -- [2]
            }"#,
        )
        .unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::ObjectStart,
                key("key"),
                Token::Assign,
                Token::ObjectStart,
                Token::ObjectStart,
                key("sub-key-1"),
                Token::Assign,
                string("value1"),
                Token::ObjectEnd,
                Token::ObjectStart,
                key("sub-key-2"),
                Token::Assign,
                Token::NumberLit(2.0),
                Token::ObjectEnd,
                Token::ObjectEnd,
            ]
        );
    }

    #[test]
    fn strings_are_not_escaped() {
        let tokens = tokenize(r#""a\nb" "c-- d""#).unwrap();
        assert_eq!(tokens, vec![string(r"a\nb"), string("c-- d")]);
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize("{ [\"a\"] = \"never closed }").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn unterminated_key() {
        assert!(tokenize("{ [\"a\" = 1 }").is_err());
        assert!(tokenize("{ [12 = 1 }").is_err());
    }

    #[test]
    fn two_decimal_points() {
        let err = tokenize("{\n  [\"a\"] = 1.2.3,\n}").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn unknown_bare_word() {
        assert!(tokenize("{ [\"a\"] = nil }").is_err());
        assert!(tokenize("{ [\"a\"] = True }").is_err());
        assert!(tokenize("{ [\"a\"] = trueish }").is_err());
    }
}
