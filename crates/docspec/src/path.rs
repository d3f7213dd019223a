use core::fmt::Display;

use serde::{Serialize, Serializer};
use thisisplural::Plural;

/// Location of a node inside a specs or document tree.
///
/// The root renders as `root`; every descent appends a segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Plural)]
pub struct Path(pub Vec<PathSegment>);

impl Path {
    /// Create an empty path representing the root block
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Child path, leaving `self` untouched.
    pub fn join(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.0.push(segment);
        path
    }

    pub(crate) fn descend(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn ascend(&mut self) {
        self.0.pop();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Map field or constraint property, rendered `.name`
    Field(String),
    /// List element, rendered `.[index]`; `None` is the element schema, rendered `.[]`
    ListIndex(Option<usize>),
    /// Tuple position, rendered `.(index)`
    TupleIndex(usize),
}

impl PathSegment {
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{}", name),
            PathSegment::ListIndex(Some(index)) => write!(f, ".[{}]", index),
            PathSegment::ListIndex(None) => write!(f, ".[]"),
            PathSegment::TupleIndex(index) => write!(f, ".({})", index),
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "root")?;
        for segment in &self.0 {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
