//! Error types for the query crate.

use thiserror::Error;

/// Caller-contract violations detected before a query runs.
///
/// Bad data never produces an error: a record whose date does not parse is
/// simply excluded. These variants describe mistakes in the query itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Page size must be at least one.
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// A clause names a field the record type does not expose.
    #[error("unknown field '{field}' in {clause} clause")]
    UnknownField { field: String, clause: &'static str },

    /// A search term was given without any field to search in.
    #[error("search term '{term}' has no fields to search")]
    NoSearchFields { term: String },

    /// A sort direction string was not recognized.
    #[error("invalid sort direction '{0}', expected ascending or descending")]
    InvalidDirection(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
