//! Walk context shared by both engines
//!
//! `WalkContext` owns everything a single top-level call mutates:
//! - The validation mode, decided once at the root
//! - Current path for diagnostics
//! - Current nesting depth
//! - Accumulated errors and warnings
//!
//! It is created per call and accessed through `&mut`, never shared between walks.

use crate::config::Config;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::path::{Path, PathSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// The first error aborts the whole walk
    FailFast,
    /// Every problem is collected
    Lazy,
}

/// Aborts a fail-fast walk; travels up the recursion through `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Halt;

/// Outcome of walking one node.
///
/// - `Ok(Some(value))`: the node is valid
/// - `Ok(None)`: the node is invalid, its errors are recorded, siblings go on
/// - `Err(Halt)`: fail-fast abort
pub(crate) type Walk<T> = Result<Option<T>, Halt>;

pub(crate) struct WalkContext<'c> {
    pub config: &'c Config,
    mode: Mode,
    path: Path,
    depth: usize,
    diagnostics: Diagnostics,
}

impl<'c> WalkContext<'c> {
    pub fn new(config: &'c Config, mode: Mode) -> Self {
        Self {
            config,
            mode,
            path: Path::root(),
            depth: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }

    /// Record an error at the current path.
    ///
    /// Returns `Err(Halt)` in fail-fast mode; callers propagate it with `?`.
    pub fn record_error(&mut self, kind: DiagnosticKind) -> Result<(), Halt> {
        let diagnostic = Diagnostic::new(self.path.clone(), kind);
        self.push_error(diagnostic)
    }

    /// Record an error below the current path without descending, e.g. at
    /// `.minimum.value`.
    pub fn record_error_in(&mut self, properties: &[&str], kind: DiagnosticKind) -> Result<(), Halt> {
        let diagnostic = Diagnostic::new(self.path_in(properties), kind);
        self.push_error(diagnostic)
    }

    pub fn record_warning(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(self.path.clone(), kind);
        self.diagnostics.record_warning(diagnostic);
    }

    pub fn record_warning_in(&mut self, properties: &[&str], kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(self.path_in(properties), kind);
        self.diagnostics.record_warning(diagnostic);
    }

    fn path_in(&self, properties: &[&str]) -> Path {
        let mut path = self.path.clone();
        for property in properties {
            path.descend(PathSegment::field(*property));
        }
        path
    }

    fn push_error(&mut self, diagnostic: Diagnostic) -> Result<(), Halt> {
        self.diagnostics.record_error(diagnostic);
        match self.mode {
            Mode::FailFast => Err(Halt),
            Mode::Lazy => Ok(()),
        }
    }

    /// Walk a child node under `segment`.
    ///
    /// The path segment is popped again whatever the outcome. Exceeding
    /// `Config::max_depth` is an error at the child path.
    pub fn descend<T>(
        &mut self,
        segment: PathSegment,
        walk: impl FnOnce(&mut Self) -> Walk<T>,
    ) -> Walk<T> {
        self.path.descend(segment);
        let result = match self.config.max_depth {
            Some(limit) if self.depth >= limit => self
                .record_error(DiagnosticKind::DepthExceeded { limit })
                .map(|()| None),
            _ => {
                self.depth += 1;
                let result = walk(self);
                self.depth -= 1;
                result
            }
        };
        self.path.ascend();
        result
    }

    pub fn finish(self) -> Diagnostics {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_fast_halts_on_first_error() {
        let config = Config::default();
        let mut ctx = WalkContext::new(&config, Mode::FailFast);
        assert_eq!(ctx.record_error(DiagnosticKind::NullValue), Err(Halt));
        assert_eq!(ctx.finish().error_count(), 1);
    }

    #[test]
    fn test_lazy_keeps_going() {
        let config = Config::default();
        let mut ctx = WalkContext::new(&config, Mode::Lazy);
        assert_eq!(ctx.record_error(DiagnosticKind::NullValue), Ok(()));
        assert_eq!(ctx.record_error(DiagnosticKind::IncorrectType), Ok(()));
        ctx.record_warning(DiagnosticKind::FloatForInteger);
        let diagnostics = ctx.finish();
        assert_eq!(diagnostics.error_count(), 2);
        assert_eq!(diagnostics.warnings.len(), 1);
    }

    #[test]
    fn test_descend_restores_path() {
        let config = Config::default();
        let mut ctx = WalkContext::new(&config, Mode::Lazy);
        let walked: Walk<()> = ctx.descend(PathSegment::field("a"), |ctx| {
            ctx.descend(PathSegment::ListIndex(Some(1)), |ctx| {
                assert_eq!(ctx.path().to_string(), "root.a.[1]");
                ctx.record_error_in(&["minimum", "value"], DiagnosticKind::NotANumber)?;
                Ok(None)
            })
        });
        assert_eq!(walked, Ok(None));
        assert!(ctx.path().is_root());
        let diagnostics = ctx.finish();
        assert_eq!(
            diagnostics.errors[0].path.to_string(),
            "root.a.[1].minimum.value"
        );
    }

    #[test]
    fn test_descend_restores_path_on_halt() {
        let config = Config::default();
        let mut ctx = WalkContext::new(&config, Mode::FailFast);
        let walked: Walk<()> = ctx.descend(PathSegment::TupleIndex(0), |ctx| {
            ctx.record_error(DiagnosticKind::NullValue)?;
            Ok(Some(()))
        });
        assert_eq!(walked, Err(Halt));
        assert!(ctx.path().is_root());
    }

    #[test]
    fn test_depth_limit() {
        let config = Config {
            max_depth: Some(1),
            ..Config::default()
        };
        let mut ctx = WalkContext::new(&config, Mode::Lazy);
        let walked: Walk<()> = ctx.descend(PathSegment::field("a"), |ctx| {
            ctx.descend(PathSegment::field("b"), |_| Ok(Some(())))
        });
        assert_eq!(walked, Ok(None));
        let diagnostics = ctx.finish();
        assert_eq!(diagnostics.errors.len(), 1);
        assert_eq!(diagnostics.errors[0].path.to_string(), "root.a.b");
        assert_eq!(
            diagnostics.errors[0].kind,
            DiagnosticKind::DepthExceeded { limit: 1 }
        );
    }
}
