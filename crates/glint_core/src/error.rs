//! Core error types

use thiserror::Error;

/// Errors produced while parsing a selector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector text was empty or only whitespace
    #[error("selector is empty")]
    Empty,

    /// The selector text could not be parsed
    #[error("invalid selector `{input}` at offset {offset}")]
    Invalid { input: String, offset: usize },
}
