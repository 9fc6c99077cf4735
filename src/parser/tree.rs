//! Tree of the table notation
//!
//! The builder is a recursive descent parser with one token of lookahead:
//! ```text
//! Object := '{' Member* '}'
//! Member := (Key '=' Value) | Value
//! Value  := String | Number | Boolean | Object
//! ```
//! Values without a key are list elements. Objects nest at most
//! [`MAX_DEPTH`] levels, the root included.

use crate::error::ParseError;
use crate::parser::tokens::Token;

pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Object(Vec<Node>),
    Str(String),
    Num(f64),
    Bool(bool),
    KeyValue(String, Box<Node>),
}

impl Node {
    /// Name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Object(_) => "an object",
            Node::Str(_) => "a string",
            Node::Num(_) => "a number",
            Node::Bool(_) => "a boolean",
            Node::KeyValue(..) => "a key-value pair",
        }
    }
}

/// Position in a token slice
struct Cursor<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Cursor {
            tokens,
            position: 0,
            depth: 0,
        }
    }
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }
    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }
    fn rewind(&mut self) {
        self.position = self.position.saturating_sub(1);
    }
    fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }
}

/// Builds the tree of a whole token stream, which has to be exactly one object
pub fn build(tokens: &[Token]) -> Result<Node, ParseError> {
    let mut cursor = Cursor::new(tokens);
    match cursor.advance() {
        Some(Token::ObjectStart) => (),
        Some(other) => return Err(ParseError::ExpectedObjectStart(other.to_string())),
        None => return Err(ParseError::ExpectedObjectStart("nothing".to_string())),
    }
    cursor.depth = 1;
    let root = build_object(&mut cursor)?;
    match cursor.remaining() {
        0 => Ok(root),
        n => Err(ParseError::TrailingTokens(n)),
    }
}

/// Builds an object whose start token has already been consumed
fn build_object(cursor: &mut Cursor) -> Result<Node, ParseError> {
    let mut content = Vec::new();
    loop {
        let token = match cursor.advance() {
            Some(token) => token,
            None => return Err(ParseError::UnexpectedEnd),
        };
        match token {
            Token::ObjectEnd => return Ok(Node::Object(content)),
            Token::Key(key) => {
                match cursor.advance() {
                    Some(Token::Assign) => (),
                    Some(other) => {
                        return Err(ParseError::ExpectedAssignment(
                            key.clone(),
                            other.to_string(),
                        ))
                    }
                    None => return Err(ParseError::UnexpectedEnd),
                }
                let value = match cursor.peek() {
                    Some(Token::Key(_)) | Some(Token::Assign) | Some(Token::ObjectEnd) => {
                        let found = cursor.peek().map(|t| t.to_string()).unwrap_or_default();
                        return Err(ParseError::ExpectedValue(key.clone(), found));
                    }
                    Some(_) => build_value(cursor)?,
                    None => return Err(ParseError::UnexpectedEnd),
                };
                content.push(Node::KeyValue(key.clone(), Box::new(value)));
            }
            Token::Assign => return Err(ParseError::UnexpectedToken(token.to_string())),
            _ => {
                cursor.rewind();
                content.push(build_value(cursor)?);
            }
        }
    }
}

fn build_value(cursor: &mut Cursor) -> Result<Node, ParseError> {
    match cursor.advance() {
        Some(Token::StringLit(s)) => Ok(Node::Str(s.clone())),
        Some(Token::NumberLit(n)) => Ok(Node::Num(*n)),
        Some(Token::BoolLit(b)) => Ok(Node::Bool(*b)),
        Some(Token::ObjectStart) => {
            if cursor.depth >= MAX_DEPTH {
                return Err(ParseError::TooDeep(MAX_DEPTH));
            }
            cursor.depth += 1;
            let object = build_object(cursor);
            cursor.depth -= 1;
            object
        }
        Some(other) => Err(ParseError::UnexpectedToken(other.to_string())),
        None => Err(ParseError::UnexpectedEnd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokens::tokenize;

    fn kv(key: &str, value: Node) -> Node {
        Node::KeyValue(key.to_string(), Box::new(value))
    }
    fn string(s: &str) -> Node {
        Node::Str(s.to_string())
    }

    #[test]
    fn simple_object() {
        let tokens = vec![
            Token::ObjectStart,
            Token::Key("faction".to_string()),
            Token::Assign,
            Token::StringLit("Alliance".to_string()),
            Token::Key("realm".to_string()),
            Token::Assign,
            Token::StringLit("Sulfuron".to_string()),
            Token::ObjectEnd,
        ];
        assert_eq!(
            build(&tokens).unwrap(),
            Node::Object(vec![
                kv("faction", string("Alliance")),
                kv("realm", string("Sulfuron"))
            ])
        );
    }

    #[test]
    fn nested_object_with_list() {
        let tokens =
            tokenize(r#"{ ["key"] = { { ["sub-key-1"] = "value1" }, { ["sub-key-2"] = 2 }, "x", true } }"#)
                .unwrap();
        assert_eq!(
            build(&tokens).unwrap(),
            Node::Object(vec![kv(
                "key",
                Node::Object(vec![
                    Node::Object(vec![kv("sub-key-1", string("value1"))]),
                    Node::Object(vec![kv("sub-key-2", Node::Num(2.0))]),
                    string("x"),
                    Node::Bool(true),
                ])
            )])
        );
    }

    #[test]
    fn literal_round_trip() {
        let literals = vec![
            ("\"Firebloom\"", string("Firebloom")),
            ("\"\"", string("")),
            ("4625", Node::Num(4625.0)),
            ("-0.5", Node::Num(-0.5)),
            ("true", Node::Bool(true)),
            ("false", Node::Bool(false)),
        ];
        for (text, value) in literals {
            let rendered = format!("{{ [\"v\"] = {}, }}", text);
            let tree = build(&tokenize(&rendered).unwrap()).unwrap();
            assert_eq!(tree, Node::Object(vec![kv("v", value)]), "{}", rendered);
        }
    }

    #[test]
    fn must_start_with_an_object() {
        let err = build(&[Token::StringLit("a".to_string())]).unwrap_err();
        assert!(matches!(err, ParseError::ExpectedObjectStart(_)));
        assert!(build(&[]).is_err());
    }

    #[test]
    fn trailing_tokens() {
        let tokens = tokenize("{ } { }").unwrap();
        assert_eq!(build(&tokens).unwrap_err(), ParseError::TrailingTokens(2));
    }

    #[test]
    fn key_without_assignment() {
        let tokens = tokenize(r#"{ ["a"] "b" }"#).unwrap();
        assert!(matches!(
            build(&tokens).unwrap_err(),
            ParseError::ExpectedAssignment(..)
        ));
    }

    #[test]
    fn nesting_limit() {
        let nested = |depth: usize| format!("{}{}", "{".repeat(depth), "}".repeat(depth));
        assert!(build(&tokenize(&nested(MAX_DEPTH)).unwrap()).is_ok());
        assert_eq!(
            build(&tokenize(&nested(MAX_DEPTH + 1)).unwrap()).unwrap_err(),
            ParseError::TooDeep(MAX_DEPTH)
        );
        // unclosed, far too deep for the call stack
        let tokens = tokenize(&"{".repeat(100_000)).unwrap();
        assert_eq!(build(&tokens).unwrap_err(), ParseError::TooDeep(MAX_DEPTH));
    }

    #[test]
    fn unclosed_object() {
        let tokens = tokenize(r#"{ ["a"] = { ["b"] = 1 }"#).unwrap();
        assert_eq!(build(&tokens).unwrap_err(), ParseError::UnexpectedEnd);
    }
}
