use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Fatal outcome of an entry point.
#[derive(Debug, Error)]
pub enum Error {
    /// First specs error in fail-fast mode
    #[error("invalid specs at {0}")]
    InvalidSpecs(Diagnostic),

    /// First document error in fail-fast mode
    #[error("invalid document at {0}")]
    InvalidDocument(Diagnostic),

    /// The document text is not JSON; reported in both modes.
    #[error("document is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("diagnostics collector must be empty")]
    DiagnosticsNotEmpty,
}

impl Error {
    /// The diagnostic behind a fail-fast failure.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::InvalidSpecs(d) | Error::InvalidDocument(d) => Some(d),
            _ => None,
        }
    }
}
