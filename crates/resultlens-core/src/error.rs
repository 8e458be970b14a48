//! Input error types.
//!
//! The computation engine itself has no error channel. These errors describe
//! structural problems with data handed to the engine through the loader in
//! [`crate::input`], so callers can classify them without string matching.

use thiserror::Error;

/// Errors that can occur when turning raw input into engine samples.
#[derive(Debug, Error)]
pub enum InputError {
    /// The document is neither a JSON array nor an object with a `records` array.
    #[error("expected a JSON array of records or an object with a `records` array")]
    NotARecordList,

    /// An element of the record list is not a JSON object.
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// The requested field has no numeric values in any record.
    #[error("field `{field}` has no numeric values")]
    NoNumericValues { field: String },

    /// A correlation variable does not appear in any record.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
}

impl InputError {
    /// Returns `true` if the error means "no usable data" rather than a
    /// malformed document.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, InputError::NoNumericValues { .. })
    }
}
