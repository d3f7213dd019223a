#![doc = include_str!("../README.md")]

mod config;
mod diagnostic;
mod error;
mod grammar;
mod path;
mod validate;
mod validator;
mod value;

pub use config::{Config, FractionalIntegers};
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::Error;
pub use grammar::{
    Block, BlockKind, Bound, EnumSchema, Kind, Length, ListSchema, MapSchema, NumberSchema,
    Pattern, Specs, StringSchema, TupleSchema, is_identifier,
};
pub use path::{Path, PathSegment};
pub use validator::Validator;
pub use value::{List, Map, Tuple, Value};

use serde_json::Value as JsonValue;

/// Certify `specs` with the default configuration, failing on the first error.
pub fn validate_specs(specs: &JsonValue) -> Result<Specs, Error> {
    Validator::default().validate_specs(specs)
}

/// Certify `specs` with the default configuration, collecting every problem
/// into the empty `diagnostics`.
pub fn validate_specs_lazy(
    specs: &JsonValue,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Specs>, Error> {
    Validator::default().validate_specs_lazy(specs, diagnostics)
}

/// Decode `document` and convert it against `specs`, failing on the first error.
pub fn document_to_object(document: &str, specs: &Specs) -> Result<Value, Error> {
    Validator::default().document_to_object(document, specs)
}

/// Decode `document` and convert it against `specs`, collecting every problem
/// into the empty `diagnostics`.
pub fn document_to_object_lazy(
    document: &str,
    specs: &Specs,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Value>, Error> {
    Validator::default().document_to_object_lazy(document, specs, diagnostics)
}

impl TryFrom<&JsonValue> for Specs {
    type Error = Error;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        validate_specs(value)
    }
}
