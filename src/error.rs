//! Error types for xmlxref
//!
//! This module defines the engine fault types. Faults are conditions that
//! abort a validation run: malformed XPath expressions, undeclared
//! namespace prefixes, invalid rule definitions, or XML parse failures.
//! Validation findings are never faults; they travel as
//! [`Diagnostic`](crate::validators::Diagnostic) values in the sequence
//! returned by a run.

use thiserror::Error;

/// Result type alias using xmlxref Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xmlxref operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unsupported XPath expression
    #[error("xpath error: {0}")]
    Xpath(String),

    /// Undeclared namespace prefix
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Invalid schema definition (e.g. a rule expression that extracts no value)
    #[error("schema error: {0}")]
    Schema(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
