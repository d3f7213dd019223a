//! The two recursive engines
//!
//! # Architecture
//!
//! - `specs`: checks a raw specs value against the grammar and builds the typed tree
//! - `document`: checks a decoded document against a certified tree and adjusts it
//! - `context`: `WalkContext`, the per-call state both engines thread down
//!
//! # Modes
//!
//! The mode is fixed once at the root. In fail-fast mode the first recorded
//! error returns `Err(Halt)`, which every engine function propagates with `?`.
//! In lazy mode recording an error returns `Ok(())` and the failing node
//! returns `Ok(None)` to its parent, which keeps walking its other children.

pub(crate) mod context;
pub(crate) mod document;
pub(crate) mod specs;
