//! Parser module
//!
//! The parser takes an input string (or file) and translates it into tokens with a tokenizer,
//! then into a tree of nodes. The extractors read the tree of each add-on file:
//! - Auctionator snapshots of auction listings
//! - TradeSkillMaster buy and sell logs
//! - TradeSkillMaster stock of every character

use std::convert::TryFrom;
use std::fs::read_to_string;
use std::path::PathBuf;

use crate::error::ExtractError;
use crate::models::{Language, SnapshotResult};

pub mod extractors;
pub mod navigate;
pub mod tokens;
pub mod tree;

pub use navigate::{
    entries, expect_number, expect_object, expect_string, get_child, get_path, list_strings,
};
pub use tokens::{tokenize, Token};
pub use tree::{build, Node};

#[derive(Parser)]
#[grammar = "grammar/grammar.pest"]
pub struct GrammarParser;

const TSM_DB_START: &str = "TradeSkillMasterDB";
const TSM_DB_END: &str = "TSMItemInfoDB";

/// Tokenizes and builds a whole table
///
/// # Examples
/// ```rust
/// # use ahcharts::parser::{parse_str, get_child, Node};
/// let tree = parse_str(r#"{ ["faction"] = "Alliance", }"#).unwrap();
/// assert_eq!(get_child(&tree, "faction"), Some(&Node::Str("Alliance".to_string())));
/// ```
pub fn parse_str(text: &str) -> Result<Node, ExtractError> {
    let tokens = tokenize(text)?;
    Ok(build(&tokens)?)
}

/// A struct for holding data about the file being parsed
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    file: Option<&'a PathBuf>,
    content: String,
}

impl<'a> TryFrom<&'a PathBuf> for Tokenizer<'a> {
    type Error = ExtractError;
    fn try_from(file: &'a PathBuf) -> Result<Self, Self::Error> {
        match read_to_string(file) {
            Ok(content) => Ok(Tokenizer {
                file: Some(file),
                content,
            }),
            Err(err) => Err(ExtractError::CannotReadFile(file.to_path_buf(), err)),
        }
    }
}

impl<'a> From<String> for Tokenizer<'a> {
    fn from(content: String) -> Self {
        Tokenizer {
            file: None,
            content,
        }
    }
}

impl<'a> From<&str> for Tokenizer<'a> {
    fn from(content: &str) -> Self {
        Tokenizer::from(content.to_string())
    }
}

impl<'a> Tokenizer<'a> {
    pub fn file(&self) -> Option<&PathBuf> {
        self.file
    }

    /// Parses the whole content as one table
    pub fn parse(&self) -> Result<Node, ExtractError> {
        parse_str(&self.content)
    }

    /// Parses the database table of a TradeSkillMaster file
    ///
    /// The file assigns several global tables, only the first one is read.
    pub fn parse_tsm_database(&self) -> Result<Node, ExtractError> {
        parse_str(&tsm_database_section(&self.content))
    }

    /// Reads the content as an Auctionator file
    pub fn parse_snapshot(&self, language: Language) -> Result<SnapshotResult, ExtractError> {
        Ok(extractors::extract_snapshot(&self.content, language)?)
    }
}

/// The text of the `TradeSkillMasterDB` table
///
/// Everything from the assignment line (which becomes a bare `{`) up to the
/// `TSMItemInfoDB` assignment is kept. Comments are left to the tokenizer.
pub fn tsm_database_section(content: &str) -> String {
    let mut text = String::new();
    for line in content.lines() {
        if line.starts_with(TSM_DB_START) {
            text.push('{');
        } else if line.starts_with(TSM_DB_END) {
            break;
        } else {
            text.push_str(line);
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_section() {
        let content = "TradeSkillMasterDB = {\n\t[\"a\"] = 1, -- [1]\n}\nTSMItemInfoDB = {\n\t[\"b\"] = 2,\n}\n";
        let section = tsm_database_section(content);
        assert_eq!(section, "{\n\t[\"a\"] = 1, -- [1]\n}\n");
        let tree = Tokenizer::from(content).parse_tsm_database().unwrap();
        assert_eq!(get_child(&tree, "a"), Some(&Node::Num(1.0)));
        assert_eq!(get_child(&tree, "b"), None);
    }

    #[test]
    fn dashes_inside_strings() {
        let content = "TradeSkillMasterDB = {\n\t[\"note\"] = \"a--b\", -- [1]\n\t[\"csv\"] = \"x,y\\n--,1\",\n}\nTSMItemInfoDB = {\n}\n";
        let tree = Tokenizer::from(content).parse_tsm_database().unwrap();
        assert_eq!(get_child(&tree, "note"), Some(&Node::Str("a--b".to_string())));
        assert_eq!(
            get_child(&tree, "csv"),
            Some(&Node::Str("x,y\\n--,1".to_string()))
        );
    }

    #[test]
    fn missing_file() {
        let path = PathBuf::from("tests/example_files/this_file_does_not_exist.lua");
        assert!(matches!(
            Tokenizer::try_from(&path),
            Err(ExtractError::CannotReadFile(..))
        ));
    }
}
