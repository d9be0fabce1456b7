use thiserror::Error;

use crate::domain::ElementId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid field pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown element: {0}")]
    UnknownElement(ElementId),
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
}
