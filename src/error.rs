//! Error types for the bid table and the CSV loader

use std::{
    num::{ParseFloatError, ParseIntError},
    path::PathBuf,
};

use thiserror::Error;

/// Errors returned by [`BidTable`](crate::BidTable) operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// No live record carries the requested id
    #[error("bid id {id} not found")]
    NotFound {
        /// The id that was looked up
        id: String,
    },
    /// The id does not parse as a non-negative integer, so it has no home slot
    #[error("bid id {id:?} is not a non-negative integer")]
    MalformedKey {
        /// The rejected id
        id: String,
        /// Why the id failed to parse
        #[source]
        source: ParseIntError,
    },
    /// The id parses but is spelled differently from its number, e.g. `"05"` or `"+5"`
    #[error("bid id {id:?} is not in canonical form, expected \"{key}\"")]
    NonCanonicalKey {
        /// The rejected id
        id: String,
        /// The number the id parsed to
        key: u64,
    },
}

/// Failure that prevents a CSV file from being loaded at all
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened
    #[error("failed to open CSV file {}", .path.display())]
    Open {
        /// Path handed to the loader
        path: PathBuf,
        /// Underlying reader error
        #[source]
        source: csv::Error,
    },
    /// The header row could not be read
    #[error("failed to read CSV header")]
    Header {
        /// Underlying reader error
        #[source]
        source: csv::Error,
    },
}

/// A single CSV row that was rejected; loading carries on past it
#[derive(Error, Debug)]
pub enum RowError {
    /// The row is shorter than the expected column layout
    #[error("row {row}: missing column {column}")]
    MissingColumn {
        /// 1-based data row number (header excluded)
        row: usize,
        /// 0-based index of the absent column
        column: usize,
    },
    /// The amount cell is not a currency value
    #[error("row {row}: invalid amount {value:?}")]
    Amount {
        /// 1-based data row number (header excluded)
        row: usize,
        /// Raw cell contents
        value: String,
        /// Parse failure after stripping the currency symbol
        #[source]
        source: ParseFloatError,
    },
    /// The id cell was rejected by the table
    #[error("row {row}: {source}")]
    Key {
        /// 1-based data row number (header excluded)
        row: usize,
        /// Table rejection
        #[source]
        source: TableError,
    },
    /// The record itself could not be decoded
    #[error("row {row}: {source}")]
    Csv {
        /// 1-based data row number (header excluded)
        row: usize,
        /// Reader error for this record
        #[source]
        source: csv::Error,
    },
}

impl RowError {
    /// Returns the 1-based data row the error refers to
    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            Self::MissingColumn { row, .. } |
            Self::Amount { row, .. } |
            Self::Key { row, .. } |
            Self::Csv { row, .. } => *row,
        }
    }
}
