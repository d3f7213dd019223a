//! Typed representation of the specs grammar
//!
//! A `Block` is one node of a certified specs tree. The specs validator is the
//! only producer of a `Specs`, so every block the converter sees has already
//! been checked against the grammar.

use core::fmt::{self, Display};
use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+(-[a-z]+)*$").expect("identifier regex is valid"));

/// Check an enum value or map field name, e.g. `dark-blue`.
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// The closed set of block kinds, i.e. the accepted values of `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Flag,
    Integer,
    Decimal,
    String,
    Enum,
    List,
    Tuple,
    Map,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::Flag,
        Kind::Integer,
        Kind::Decimal,
        Kind::String,
        Kind::Enum,
        Kind::List,
        Kind::Tuple,
        Kind::Map,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Flag => "flag",
            Kind::Integer => "integer",
            Kind::Decimal => "decimal",
            Kind::String => "string",
            Kind::Enum => "enum",
            Kind::List => "list",
            Kind::Tuple => "tuple",
            Kind::Map => "map",
        }
    }

    pub fn from_name(name: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Constraint properties recognized on a block of this kind, besides
    /// `type` and `option`.
    pub fn properties(self) -> &'static [&'static str] {
        match self {
            Kind::Flag => &[],
            Kind::Integer | Kind::Decimal => &["minimum", "maximum"],
            Kind::String => &["length", "pattern"],
            Kind::Enum => &["values"],
            Kind::List => &["value", "length"],
            Kind::Tuple => &["values"],
            Kind::Map => &["fields"],
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A certified specs tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Specs {
    root: Block,
}

impl Specs {
    pub(crate) fn new(root: Block) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    /// Wire form of the specs; validates back to an equal `Specs`.
    pub fn to_value(&self) -> JsonValue {
        self.root.to_value()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Whether null (or an absent map field) is accepted.
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Flag,
    Integer(NumberSchema),
    Decimal(NumberSchema),
    String(StringSchema),
    Enum(EnumSchema),
    List(ListSchema),
    Tuple(TupleSchema),
    Map(MapSchema),
}

impl BlockKind {
    pub fn kind(&self) -> Kind {
        match self {
            BlockKind::Flag => Kind::Flag,
            BlockKind::Integer(_) => Kind::Integer,
            BlockKind::Decimal(_) => Kind::Decimal,
            BlockKind::String(_) => Kind::String,
            BlockKind::Enum(_) => Kind::Enum,
            BlockKind::List(_) => Kind::List,
            BlockKind::Tuple(_) => Kind::Tuple,
            BlockKind::Map(_) => Kind::Map,
        }
    }
}

/// Shared by `integer` and `decimal`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: Number,
    pub exclusive: bool,
}

impl Bound {
    pub fn inclusive(value: impl Into<Number>) -> Self {
        Self {
            value: value.into(),
            exclusive: false,
        }
    }

    pub fn exclusive(value: impl Into<Number>) -> Self {
        Self {
            value: value.into(),
            exclusive: true,
        }
    }

    fn to_value(&self) -> JsonValue {
        if self.exclusive {
            let mut object = JsonMap::new();
            object.insert("exclusive".to_string(), JsonValue::Bool(true));
            object.insert("value".to_string(), JsonValue::Number(self.value.clone()));
            JsonValue::Object(object)
        } else {
            JsonValue::Number(self.value.clone())
        }
    }
}

/// Shared by `string` and `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Exact(u64),
    Range {
        minimum: Option<u64>,
        maximum: Option<u64>,
    },
}

impl Length {
    fn to_value(self) -> JsonValue {
        match self {
            Length::Exact(length) => JsonValue::from(length),
            Length::Range { minimum, maximum } => {
                let mut object = JsonMap::new();
                if let Some(minimum) = minimum {
                    object.insert("minimum".to_string(), JsonValue::from(minimum));
                }
                if let Some(maximum) = maximum {
                    object.insert("maximum".to_string(), JsonValue::from(maximum));
                }
                JsonValue::Object(object)
            }
        }
    }
}

/// A regular expression matched against the start of a string.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        // Checked alone first; a stray `)` would otherwise close the anchor group.
        Regex::new(source)?;
        let regex = Regex::new(&format!("^(?:{})", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub length: Option<Length>,
    pub pattern: Option<Pattern>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub values: IndexSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListSchema {
    pub value: Box<Block>,
    pub length: Option<Length>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleSchema {
    pub values: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSchema {
    pub fields: IndexMap<String, Block>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Encode back to the wire grammar.
    pub fn to_value(&self) -> JsonValue {
        let mut object = JsonMap::new();
        object.insert(
            "type".to_string(),
            JsonValue::String(self.kind.kind().name().to_string()),
        );

        match &self.kind {
            BlockKind::Flag => {}
            BlockKind::Integer(schema) | BlockKind::Decimal(schema) => {
                if let Some(minimum) = &schema.minimum {
                    object.insert("minimum".to_string(), minimum.to_value());
                }
                if let Some(maximum) = &schema.maximum {
                    object.insert("maximum".to_string(), maximum.to_value());
                }
            }
            BlockKind::String(schema) => {
                if let Some(length) = schema.length {
                    object.insert("length".to_string(), length.to_value());
                }
                if let Some(pattern) = &schema.pattern {
                    object.insert(
                        "pattern".to_string(),
                        JsonValue::String(pattern.as_str().to_string()),
                    );
                }
            }
            BlockKind::Enum(schema) => {
                let values = schema
                    .values
                    .iter()
                    .map(|value| JsonValue::String(value.clone()))
                    .collect();
                object.insert("values".to_string(), JsonValue::Array(values));
            }
            BlockKind::List(schema) => {
                object.insert("value".to_string(), schema.value.to_value());
                if let Some(length) = schema.length {
                    object.insert("length".to_string(), length.to_value());
                }
            }
            BlockKind::Tuple(schema) => {
                let values = schema.values.iter().map(Block::to_value).collect();
                object.insert("values".to_string(), JsonValue::Array(values));
            }
            BlockKind::Map(schema) => {
                let fields = schema
                    .fields
                    .iter()
                    .map(|(name, block)| (name.clone(), block.to_value()))
                    .collect();
                object.insert("fields".to_string(), JsonValue::Object(fields));
            }
        }

        if self.optional {
            object.insert("option".to_string(), JsonValue::Bool(true));
        }
        JsonValue::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("foo-bar-baz"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("Foo"));
        assert!(!is_identifier("foo_bar"));
        assert!(!is_identifier("foo-"));
        assert!(!is_identifier("-foo"));
        assert!(!is_identifier("foo--bar"));
        assert!(!is_identifier("foo1"));
    }

    #[test]
    fn test_kind_names() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(Kind::from_name("boolean"), None);
    }

    #[test]
    fn test_pattern_is_prefix_match() {
        let pattern = Pattern::new("[a-z]+").unwrap();
        assert!(pattern.is_match("abc123"));
        assert!(!pattern.is_match("123abc"));
        assert_eq!(pattern.as_str(), "[a-z]+");
    }

    #[test]
    fn test_pattern_alternation_stays_anchored() {
        let pattern = Pattern::new("a|b").unwrap();
        assert!(pattern.is_match("bcd"));
        assert!(!pattern.is_match("cb"));
    }

    #[test]
    fn test_pattern_cannot_escape_anchor() {
        assert!(Pattern::new("a)|(b").is_err());
        assert!(Pattern::new("a)(b").is_err());
    }

    #[test]
    fn test_to_value() {
        let block = Block::new(BlockKind::Map(MapSchema {
            fields: IndexMap::from([
                (
                    "age".to_string(),
                    Block::new(BlockKind::Integer(NumberSchema {
                        minimum: Some(Bound::exclusive(0)),
                        maximum: Some(Bound::inclusive(150)),
                    })),
                ),
                (
                    "tags".to_string(),
                    Block::new(BlockKind::List(ListSchema {
                        value: Box::new(Block::new(BlockKind::String(StringSchema {
                            length: Some(Length::Range {
                                minimum: Some(1),
                                maximum: None,
                            }),
                            pattern: None,
                        }))),
                        length: Some(Length::Exact(3)),
                    }))
                    .optional(),
                ),
            ]),
        }));

        assert_eq!(
            block.to_value(),
            json!({
                "type": "map",
                "fields": {
                    "age": {
                        "type": "integer",
                        "minimum": {"exclusive": true, "value": 0},
                        "maximum": 150
                    },
                    "tags": {
                        "type": "list",
                        "value": {"type": "string", "length": {"minimum": 1}},
                        "length": 3,
                        "option": true
                    }
                }
            })
        );
    }
}
