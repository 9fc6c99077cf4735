//! CSV text embedded in a string value
//!
//! Rows are separated by the two characters `\n` (an escaped newline, not a
//! line break). The first row names the columns.

use std::collections::HashMap;

use crate::error::RowParseError;

pub const ROW_SEPARATOR: &str = "\\n";

/// Turns one named row into a record, `None` skips the row
pub trait RowBuilder<T> {
    fn build(&self, row: &Row) -> Result<Option<T>, RowParseError>;
}

/// A data row, its columns zipped with the header
#[derive(Debug, Clone)]
pub struct Row<'a> {
    index: usize,
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.values.get(column).copied()
    }

    pub fn text(&self, column: &str) -> Result<&'a str, RowParseError> {
        self.get(column).ok_or_else(|| RowParseError::MissingColumn {
            row: self.index,
            column: column.to_string(),
        })
    }

    pub fn integer(&self, column: &str) -> Result<i64, RowParseError> {
        let value = self.text(column)?;
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| RowParseError::NotANumber {
                row: self.index,
                column: column.to_string(),
                value: value.to_string(),
            })
    }
}

/// Parses every data row of a log with the given builder
///
/// The first failing row fails the whole log.
pub fn parse_log<T, B: RowBuilder<T>>(text: &str, builder: &B) -> Result<Vec<T>, RowParseError> {
    let mut lines = text.split(ROW_SEPARATOR);
    let header: Vec<&str> = match lines.next() {
        Some(header) => header.split(',').collect(),
        None => return Ok(vec![]),
    };
    let mut records = vec![];
    for (index, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = Row {
            index: index + 1,
            values: header.iter().copied().zip(line.split(',')).collect(),
        };
        if let Some(record) = builder.build(&row)? {
            records.push(record);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair;
    impl RowBuilder<(String, i64)> for Pair {
        fn build(&self, row: &Row) -> Result<Option<(String, i64)>, RowParseError> {
            if row.get("skip") == Some("yes") {
                return Ok(None);
            }
            Ok(Some((row.text("name")?.to_string(), row.integer("value")?)))
        }
    }

    #[test]
    fn rows_follow_the_header() {
        let records = parse_log(r"value,name,skip\n1,one,no\n2,two,yes\n3,three,no\n", &Pair).unwrap();
        assert_eq!(
            records,
            vec![("one".to_string(), 1), ("three".to_string(), 3)]
        );
    }

    #[test]
    fn header_only() {
        assert!(parse_log("value,name", &Pair).unwrap().is_empty());
    }

    #[test]
    fn bad_rows_fail_the_log() {
        assert_eq!(
            parse_log(r"value,name\n1,one\nx,two", &Pair).unwrap_err(),
            RowParseError::NotANumber {
                row: 2,
                column: "value".to_string(),
                value: "x".to_string()
            }
        );
        assert_eq!(
            parse_log(r"value,name\n1", &Pair).unwrap_err(),
            RowParseError::MissingColumn {
                row: 1,
                column: "name".to_string()
            }
        );
    }
}
