use std::fmt;

use crate::foundation::error::GeoError;

/// Failure while lexing, parsing, binding or evaluating a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaError {
    /// Byte offset into the formula source, when known.
    pub offset: usize,
    /// Human readable diagnostic.
    pub message: String,
}

impl FormulaError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for FormulaError {}

impl From<FormulaError> for GeoError {
    fn from(e: FormulaError) -> Self {
        GeoError::formula(e.to_string())
    }
}
