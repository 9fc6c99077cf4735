extern crate pest;
#[macro_use]
extern crate pest_derive;
#[macro_use]
extern crate prettytable;

mod app;
pub mod catalog;
pub mod commands;
mod error;
pub mod history;
pub mod models;
pub mod parser;

pub use app::{date_parser, run_app, CommonOpts};
pub use error::{
    Error, ExtractError, HistoryError, NavigationError, ParseError, RowParseError, SnapshotError,
    TokenizeError,
};
