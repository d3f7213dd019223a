//! Diagnostic types shared by the specs validator and the document converter
//!
//! A single `DiagnosticKind` enum covers both engines so that the grammar the
//! specs validator accepts and the constraints the converter enforces are
//! reported with one vocabulary.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The specs or document is invalid
    Error,
    /// Valid but suspect
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Every problem either engine can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosticKind {
    // -------------------------------------------------------------------------
    // Specs structure
    // -------------------------------------------------------------------------
    #[error("value must be a mapping")]
    NotAMapping,

    #[error("'{name}' property is missing")]
    MissingProperty { name: &'static str },

    #[error("'{name}' property is unexpected")]
    UnexpectedProperty { name: String },

    #[error("value of 'type' is incorrect")]
    IncorrectType,

    #[error("value must be a bool")]
    NotABool,

    #[error("value must be a number")]
    NotANumber,

    #[error("value must be a string")]
    NotAString,

    #[error("value must be a list")]
    NotAList,

    #[error("value must be either a number or a mapping")]
    NotANumberOrMapping,

    #[error("must be greater or equal to zero")]
    Negative,

    #[error("minimum must be lower than maximum")]
    InvertedRange,

    #[error("must contain at least one value")]
    NoValues,

    #[error("must contain at least one field")]
    NoFields,

    #[error("'{value}' is an incorrect value")]
    IncorrectValue { value: String },

    #[error("'{value}' value is duplicated")]
    DuplicatedValue { value: String },

    #[error("'{key}' is an incorrect key name")]
    IncorrectKeyName { key: String },

    #[error("value must be a valid regular expression ({reason})")]
    InvalidPattern { reason: String },

    /// Integer-context constraint given as a float.
    #[error("should be an integer (got float)")]
    FloatForInteger,

    // -------------------------------------------------------------------------
    // Document values
    // -------------------------------------------------------------------------
    #[error("value cannot be null")]
    NullValue,

    /// `expected` carries its article, e.g. "a boolean".
    #[error("was expecting {expected}")]
    Expecting { expected: &'static str },

    #[error("value must be strictly greater than {bound}")]
    NotGreaterThan { bound: serde_json::Number },

    #[error("value must be equal or greater than {bound}")]
    NotGreaterOrEqual { bound: serde_json::Number },

    #[error("value must be strictly less than {bound}")]
    NotLessThan { bound: serde_json::Number },

    #[error("value must be equal or less than {bound}")]
    NotLessOrEqual { bound: serde_json::Number },

    #[error("length of {subject} must be equal to {length}")]
    LengthNotEqual { subject: &'static str, length: u64 },

    #[error("length of {subject} must be greater or equal to {minimum}")]
    LengthTooShort { subject: &'static str, minimum: u64 },

    #[error("length of {subject} must be lower or equal to {maximum}")]
    LengthTooLong { subject: &'static str, maximum: u64 },

    #[error("value did not match pattern '{pattern}'")]
    PatternMismatch { pattern: String },

    #[error("value was expected to be one of [{}]", .values.join(", "))]
    NotOneOf { values: Vec<String> },

    #[error("was expecting array of {arity} elements")]
    ArityMismatch { arity: usize },

    #[error("was expecting an integer (got {value})")]
    FractionalInteger { value: f64 },

    #[error("value was truncated to an integer (got {value})")]
    TruncatedInteger { value: f64 },

    // -------------------------------------------------------------------------
    // Both
    // -------------------------------------------------------------------------
    #[error("maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::FloatForInteger | DiagnosticKind::TruncatedInteger { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

/// A problem located in a specs or document tree.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{path}: {kind}")]
pub struct Diagnostic {
    pub path: Path,
    #[serde(serialize_with = "serialize_message")]
    pub kind: DiagnosticKind,
}

fn serialize_message<S: serde::Serializer>(
    kind: &DiagnosticKind,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(kind)
}

impl Diagnostic {
    pub fn new(path: Path, kind: DiagnosticKind) -> Self {
        Self { path, kind }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Human-readable message, without the path.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Collector for lazy validation.
///
/// Hand an empty one to a `*_lazy` entry point and inspect it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_error(&mut self, error: Diagnostic) {
        self.errors.push(error);
    }

    pub fn record_warning(&mut self, warning: Diagnostic) {
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Route a diagnostic by its severity.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => self.record_error(diagnostic),
            Severity::Warning => self.record_warning(diagnostic),
        }
    }

    /// Move everything from `other` into `self`.
    pub fn merge(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}
