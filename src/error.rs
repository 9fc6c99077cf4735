use colored::{ColoredString, Colorize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use thiserror::Error;

/// A lexeme that could not be recognized, with its 1-based position
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot tokenize at {line}:{column}: {message}")]
pub struct TokenizeError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// The token stream does not follow the table grammar
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected an object start, got {0}")]
    ExpectedObjectStart(String),
    #[error("expected an assignment after key {0:?}, got {1}")]
    ExpectedAssignment(String, String),
    #[error("expected a literal or an object after key {0:?}, got {1}")]
    ExpectedValue(String, String),
    #[error("expected a key or a value, got {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of input, an object is not closed")]
    UnexpectedEnd,
    #[error("{0} tokens left after the end of the root object")]
    TrailingTokens(usize),
    #[error("objects nested deeper than {0} levels")]
    TooDeep(usize),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    #[error("key {0:?} looked up in a value that is not an object")]
    NotAnObject(String),
    #[error("key {0:?} not found")]
    MissingKey(String),
    #[error("key {key:?} holds {found}, expected {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A row of an embedded CSV log that cannot become an operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowParseError {
    #[error("row {row}: missing column {column:?}")]
    MissingColumn { row: usize, column: String },
    #[error("row {row}: column {column:?} is not a number ({value:?})")]
    NotANumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: {value:?} is not an item string")]
    InvalidItemString { row: usize, value: String },
    #[error("row {row}: time {value} is out of range")]
    InvalidTime { row: usize, value: i64 },
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot marker not found")]
    MarkerNotFound,
    #[error("snapshot table cannot be decoded: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot time {0} is out of range")]
    InvalidTime(i64),
}

/// Everything that aborts the extraction of one source file
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot read {0:?}: {1}")]
    CannotReadFile(PathBuf, std::io::Error),
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Row(#[from] RowParseError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Failures of the persisted history, fatal to the whole run
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error on {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("JSON error in {0:?}: {1}")]
    Json(PathBuf, serde_json::Error),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Error shown to the user by the command line application
#[derive(Debug)]
pub struct Error {
    pub message: Vec<ColoredString>,
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ColoredStrings(&self.message))
    }
}

impl From<ExtractError> for Error {
    fn from(error: ExtractError) -> Self {
        let title = match &error {
            ExtractError::CannotReadFile(..) => "Missing file: ",
            _ => "Extraction failed: ",
        };
        Error {
            message: vec![title.bold(), error.to_string().normal()],
        }
    }
}

impl From<HistoryError> for Error {
    fn from(error: HistoryError) -> Self {
        Error {
            message: vec![
                "History store failure: ".bold().red(),
                error.to_string().normal(),
            ],
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error {
            message: vec![message.as_str().bright_red()],
        }
    }
}

// https://medium.com/apolitical-engineering/how-do-you-impl-display-for-vec-b8dbb21d814f
struct ColoredStrings<'a>(pub &'a Vec<ColoredString>);

impl<'a> fmt::Display for ColoredStrings<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.iter().fold(Ok(()), |result, partial| {
            result.and_then(|_| write!(f, "{}", partial))
        })
    }
}
