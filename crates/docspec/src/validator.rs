use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::Error;
use crate::grammar::Specs;
use crate::validate::context::{Mode, Walk, WalkContext};
use crate::validate::document::convert_root;
use crate::validate::specs::validate_root;
use crate::value::Value;

/// Entry points of both engines under one configuration.
///
/// Fail-fast methods return the first error as `Err`. Lazy methods (`*_lazy`)
/// take an empty `Diagnostics` collector, fill it with every error and
/// warning, and only fail for reasons outside the validated content.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: Config,
}

impl Validator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Certify a specs value, failing on its first error.
    pub fn validate_specs(&self, specs: &JsonValue) -> Result<Specs, Error> {
        let (specs, diagnostics) = self.run(Mode::FailFast, |ctx| validate_root(ctx, specs));
        tracing::debug!(valid = specs.is_some(), "validated specs");
        fail_fast(specs, diagnostics, Error::InvalidSpecs)
    }

    /// Certify a specs value, collecting every problem.
    ///
    /// Returns `Ok(None)` when `diagnostics` received at least one error.
    pub fn validate_specs_lazy(
        &self,
        specs: &JsonValue,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Specs>, Error> {
        ensure_empty(diagnostics)?;
        let (specs, collected) = self.run(Mode::Lazy, |ctx| validate_root(ctx, specs));
        tracing::debug!(
            errors = collected.errors.len(),
            warnings = collected.warnings.len(),
            "validated specs lazily"
        );
        diagnostics.merge(collected);
        Ok(specs)
    }

    /// Convert a decoded document, failing on its first error.
    pub fn convert(&self, document: &JsonValue, specs: &Specs) -> Result<Value, Error> {
        let (value, diagnostics) =
            self.run(Mode::FailFast, |ctx| convert_root(ctx, document, specs));
        tracing::debug!(valid = value.is_some(), "converted document");
        fail_fast(value, diagnostics, Error::InvalidDocument)
    }

    /// Convert a decoded document, collecting every problem.
    ///
    /// Returns `Ok(None)` when `diagnostics` received at least one error.
    pub fn convert_lazy(
        &self,
        document: &JsonValue,
        specs: &Specs,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Value>, Error> {
        ensure_empty(diagnostics)?;
        let (value, collected) =
            self.run(Mode::Lazy, |ctx| convert_root(ctx, document, specs));
        tracing::debug!(
            errors = collected.errors.len(),
            warnings = collected.warnings.len(),
            "converted document lazily"
        );
        diagnostics.merge(collected);
        Ok(value)
    }

    /// Decode JSON text and convert it, failing on the first error.
    pub fn document_to_object(&self, document: &str, specs: &Specs) -> Result<Value, Error> {
        let document: JsonValue = serde_json::from_str(document)?;
        self.convert(&document, specs)
    }

    /// Decode JSON text and convert it, collecting every problem.
    ///
    /// A decode failure is returned as `Error::Decode`; it never reaches
    /// `diagnostics`.
    pub fn document_to_object_lazy(
        &self,
        document: &str,
        specs: &Specs,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Value>, Error> {
        ensure_empty(diagnostics)?;
        let document: JsonValue = serde_json::from_str(document)?;
        self.convert_lazy(&document, specs, diagnostics)
    }

    /// Walk from the root in `mode`.
    fn run<T>(
        &self,
        mode: Mode,
        walk: impl FnOnce(&mut WalkContext<'_>) -> Walk<T>,
    ) -> (Option<T>, Diagnostics) {
        let mut ctx = WalkContext::new(&self.config, mode);
        // `Err(Halt)` only means the first error is already recorded.
        let value = walk(&mut ctx).ok().flatten();
        let diagnostics = ctx.finish();
        if mode == Mode::FailFast {
            for warning in &diagnostics.warnings {
                tracing::warn!(path = %warning.path, "{}", warning.kind);
            }
        }
        (value, diagnostics)
    }
}

fn ensure_empty(diagnostics: &Diagnostics) -> Result<(), Error> {
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(Error::DiagnosticsNotEmpty)
    }
}

/// Outcome of a fail-fast walk: its single error, or the value.
fn fail_fast<T>(
    value: Option<T>,
    diagnostics: Diagnostics,
    invalid: fn(Diagnostic) -> Error,
) -> Result<T, Error> {
    match (diagnostics.errors.into_iter().next(), value) {
        (Some(error), _) => Err(invalid(error)),
        (None, Some(value)) => Ok(value),
        (None, None) => unreachable!("a failed node always records an error"),
    }
}
