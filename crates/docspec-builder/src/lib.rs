#![doc = include_str!("../README.md")]

use docspec::{Error, Specs};
use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Number, Value as JsonValue, json};

/// A specs block of any kind, ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Flag(FlagSpec),
    Integer(IntegerSpec),
    Decimal(DecimalSpec),
    String(StringSpec),
    Enum(EnumSpec),
    List(ListSpec),
    Tuple(TupleSpec),
    Map(MapSpec),
}

impl Spec {
    /// Encode to the wire grammar accepted by `docspec::validate_specs`.
    pub fn to_value(&self) -> JsonValue {
        match self {
            Spec::Flag(spec) => spec.to_value(),
            Spec::Integer(spec) => spec.to_value(),
            Spec::Decimal(spec) => spec.to_value(),
            Spec::String(spec) => spec.to_value(),
            Spec::Enum(spec) => spec.to_value(),
            Spec::List(spec) => spec.to_value(),
            Spec::Tuple(spec) => spec.to_value(),
            Spec::Map(spec) => spec.to_value(),
        }
    }

    /// Encode and certify, failing on the first specs error.
    pub fn certify(&self) -> Result<Specs, Error> {
        docspec::validate_specs(&self.to_value())
    }
}

/// Implements the shared surface of a typed builder.
macro_rules! builder {
    ($builder:ident, $variant:ident) => {
        impl $builder {
            /// Whether null (or an absent map field) is accepted.
            pub fn option(mut self, option: bool) -> Self {
                self.option = option;
                self
            }

            pub fn to_value(&self) -> JsonValue {
                let mut object = JsonMap::new();
                object.insert("type".to_string(), json!(Self::TYPE));
                self.constraints(&mut object);
                if self.option {
                    object.insert("option".to_string(), JsonValue::Bool(true));
                }
                JsonValue::Object(object)
            }

            pub fn certify(&self) -> Result<Specs, Error> {
                docspec::validate_specs(&self.to_value())
            }
        }

        impl From<$builder> for Spec {
            fn from(spec: $builder) -> Self {
                Spec::$variant(spec)
            }
        }
    };
}

builder!(FlagSpec, Flag);
builder!(IntegerSpec, Integer);
builder!(DecimalSpec, Decimal);
builder!(StringSpec, String);
builder!(EnumSpec, Enum);
builder!(ListSpec, List);
builder!(TupleSpec, Tuple);
builder!(MapSpec, Map);

fn bound(value: JsonValue, exclusive: bool) -> JsonValue {
    if exclusive {
        json!({"exclusive": true, "value": value})
    } else {
        value
    }
}

fn insert_bounds(
    object: &mut JsonMap<String, JsonValue>,
    minimum: &Option<(JsonValue, bool)>,
    maximum: &Option<(JsonValue, bool)>,
) {
    if let Some((value, exclusive)) = minimum {
        object.insert("minimum".to_string(), bound(value.clone(), *exclusive));
    }
    if let Some((value, exclusive)) = maximum {
        object.insert("maximum".to_string(), bound(value.clone(), *exclusive));
    }
}

fn finite(value: f64, exclusive: bool) -> Option<(JsonValue, bool)> {
    Number::from_f64(value).map(|number| (JsonValue::Number(number), exclusive))
}

fn range(minimum: Option<u64>, maximum: Option<u64>) -> JsonValue {
    let mut object = JsonMap::new();
    if let Some(minimum) = minimum {
        object.insert("minimum".to_string(), json!(minimum));
    }
    if let Some(maximum) = maximum {
        object.insert("maximum".to_string(), json!(maximum));
    }
    JsonValue::Object(object)
}

// =============================================================================
// Primitives
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagSpec {
    option: bool,
}

impl FlagSpec {
    const TYPE: &'static str = "flag";

    fn constraints(&self, _object: &mut JsonMap<String, JsonValue>) {}
}

pub fn flag() -> FlagSpec {
    FlagSpec::default()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegerSpec {
    minimum: Option<(JsonValue, bool)>,
    maximum: Option<(JsonValue, bool)>,
    option: bool,
}

impl IntegerSpec {
    const TYPE: &'static str = "integer";

    pub fn minimum(mut self, value: i64) -> Self {
        self.minimum = Some((json!(value), false));
        self
    }

    pub fn exclusive_minimum(mut self, value: i64) -> Self {
        self.minimum = Some((json!(value), true));
        self
    }

    pub fn maximum(mut self, value: i64) -> Self {
        self.maximum = Some((json!(value), false));
        self
    }

    pub fn exclusive_maximum(mut self, value: i64) -> Self {
        self.maximum = Some((json!(value), true));
        self
    }

    fn constraints(&self, object: &mut JsonMap<String, JsonValue>) {
        insert_bounds(object, &self.minimum, &self.maximum);
    }
}

pub fn integer() -> IntegerSpec {
    IntegerSpec::default()
}

/// JSON has no non-finite numbers; setting a NaN or infinite bound leaves
/// that side unbounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecimalSpec {
    minimum: Option<(JsonValue, bool)>,
    maximum: Option<(JsonValue, bool)>,
    option: bool,
}

impl DecimalSpec {
    const TYPE: &'static str = "decimal";

    pub fn minimum(mut self, value: f64) -> Self {
        self.minimum = finite(value, false);
        self
    }

    pub fn exclusive_minimum(mut self, value: f64) -> Self {
        self.minimum = finite(value, true);
        self
    }

    pub fn maximum(mut self, value: f64) -> Self {
        self.maximum = finite(value, false);
        self
    }

    pub fn exclusive_maximum(mut self, value: f64) -> Self {
        self.maximum = finite(value, true);
        self
    }

    fn constraints(&self, object: &mut JsonMap<String, JsonValue>) {
        insert_bounds(object, &self.minimum, &self.maximum);
    }
}

pub fn decimal() -> DecimalSpec {
    DecimalSpec::default()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSpec {
    length: Option<JsonValue>,
    pattern: Option<String>,
    option: bool,
}

impl StringSpec {
    const TYPE: &'static str = "string";

    /// Exact length in characters.
    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(json!(length));
        self
    }

    pub fn length_range(mut self, minimum: Option<u64>, maximum: Option<u64>) -> Self {
        self.length = Some(range(minimum, maximum));
        self
    }

    /// Regular expression matched against the start of the string.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    fn constraints(&self, object: &mut JsonMap<String, JsonValue>) {
        if let Some(length) = &self.length {
            object.insert("length".to_string(), length.clone());
        }
        if let Some(pattern) = &self.pattern {
            object.insert("pattern".to_string(), json!(pattern));
        }
    }
}

pub fn string() -> StringSpec {
    StringSpec::default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSpec {
    values: Vec<String>,
    option: bool,
}

impl EnumSpec {
    const TYPE: &'static str = "enum";

    fn constraints(&self, object: &mut JsonMap<String, JsonValue>) {
        object.insert("values".to_string(), json!(self.values));
    }
}

/// Values are kept as given, duplicates included; certification rejects them.
pub fn enumeration<S: Into<String>>(values: impl IntoIterator<Item = S>) -> EnumSpec {
    EnumSpec {
        values: values.into_iter().map(Into::into).collect(),
        option: false,
    }
}

// =============================================================================
// Compounds
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ListSpec {
    value: Box<Spec>,
    length: Option<JsonValue>,
    option: bool,
}

impl ListSpec {
    const TYPE: &'static str = "list";

    /// Exact number of elements.
    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(json!(length));
        self
    }

    pub fn length_range(mut self, minimum: Option<u64>, maximum: Option<u64>) -> Self {
        self.length = Some(range(minimum, maximum));
        self
    }

    fn constraints(&self, object: &mut JsonMap<String, JsonValue>) {
        object.insert("value".to_string(), self.value.to_value());
        if let Some(length) = &self.length {
            object.insert("length".to_string(), length.clone());
        }
    }
}

pub fn list(value: impl Into<Spec>) -> ListSpec {
    ListSpec {
        value: Box::new(value.into()),
        length: None,
        option: false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleSpec {
    values: Vec<Spec>,
    option: bool,
}

impl TupleSpec {
    const TYPE: &'static str = "tuple";

    /// Append one more position.
    pub fn value(mut self, value: impl Into<Spec>) -> Self {
        self.values.push(value.into());
        self
    }

    fn constraints(&self, object: &mut JsonMap<String, JsonValue>) {
        let values = self.values.iter().map(Spec::to_value).collect();
        object.insert("values".to_string(), JsonValue::Array(values));
    }
}

pub fn tuple(values: impl IntoIterator<Item = Spec>) -> TupleSpec {
    TupleSpec {
        values: values.into_iter().collect(),
        option: false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSpec {
    fields: IndexMap<String, Spec>,
    option: bool,
}

impl MapSpec {
    const TYPE: &'static str = "map";

    /// Add or replace a field; a replaced field keeps its position.
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.fields.insert(name.into(), spec.into());
        self
    }

    fn constraints(&self, object: &mut JsonMap<String, JsonValue>) {
        let fields = self
            .fields
            .iter()
            .map(|(name, spec)| (name.clone(), spec.to_value()))
            .collect();
        object.insert("fields".to_string(), JsonValue::Object(fields));
    }
}

pub fn map<K: Into<String>>(fields: impl IntoIterator<Item = (K, Spec)>) -> MapSpec {
    MapSpec {
        fields: fields
            .into_iter()
            .map(|(name, spec)| (name.into(), spec))
            .collect(),
        option: false,
    }
}
