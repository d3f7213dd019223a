//! Specs validation
//!
//! Walks a raw specs value (as decoded from JSON or YAML) and checks it
//! against the grammar. A node that passes is turned into its typed `Block`,
//! so a successful walk yields the certified `Specs`.
//!
//! Per node: mapping check, `type` presence, `type` value, at most one
//! unexpected property, kind-specific checks, then `option`. The first three
//! stop the node; everything after them is accumulated.

use core::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::diagnostic::DiagnosticKind;
use crate::grammar::{
    Block, BlockKind, Bound, EnumSchema, Kind, Length, ListSchema, MapSchema, NumberSchema,
    Pattern, Specs, StringSchema, TupleSchema, is_identifier,
};
use crate::path::PathSegment;

use super::context::{Walk, WalkContext};

pub(crate) fn validate_root(ctx: &mut WalkContext<'_>, specs: &JsonValue) -> Walk<Specs> {
    Ok(validate_block(ctx, specs)?.map(Specs::new))
}

fn validate_block(ctx: &mut WalkContext<'_>, node: &JsonValue) -> Walk<Block> {
    let Some(object) = node.as_object() else {
        ctx.record_error(DiagnosticKind::NotAMapping)?;
        return Ok(None);
    };

    let Some(type_) = property(object, "type") else {
        ctx.record_error(DiagnosticKind::MissingProperty { name: "type" })?;
        return Ok(None);
    };

    let Some(kind) = type_.as_str().and_then(Kind::from_name) else {
        ctx.record_error(DiagnosticKind::IncorrectType)?;
        return Ok(None);
    };

    tracing::trace!(path = %ctx.path(), %kind, "validating specs block");
    let errors_before = ctx.error_count();

    if let Some(name) = object.keys().find(|key| {
        !matches!(key.as_str(), "type" | "option") && !kind.properties().contains(&key.as_str())
    }) {
        ctx.record_error(DiagnosticKind::UnexpectedProperty { name: name.clone() })?;
    }

    let block_kind = match kind {
        Kind::Flag => Some(BlockKind::Flag),
        Kind::Integer => validate_number(ctx, object, true)?.map(BlockKind::Integer),
        Kind::Decimal => validate_number(ctx, object, false)?.map(BlockKind::Decimal),
        Kind::String => validate_string(ctx, object)?.map(BlockKind::String),
        Kind::Enum => validate_enum(ctx, object)?.map(BlockKind::Enum),
        Kind::List => validate_list(ctx, object)?.map(BlockKind::List),
        Kind::Tuple => validate_tuple(ctx, object)?.map(BlockKind::Tuple),
        Kind::Map => validate_map(ctx, object)?.map(BlockKind::Map),
    };

    let optional = match object.get("option") {
        None => false,
        Some(JsonValue::Bool(optional)) => *optional,
        Some(_) => {
            ctx.record_error_in(&["option"], DiagnosticKind::NotABool)?;
            false
        }
    };

    if ctx.error_count() > errors_before {
        return Ok(None);
    }
    Ok(block_kind.map(|kind| Block { kind, optional }))
}

/// A property whose value is not null.
fn property<'v>(object: &'v JsonMap<String, JsonValue>, name: &str) -> Option<&'v JsonValue> {
    object.get(name).filter(|value| !value.is_null())
}

/// Strings as-is, anything else as JSON text.
fn display(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// integer / decimal
// =============================================================================

fn validate_number(
    ctx: &mut WalkContext<'_>,
    object: &JsonMap<String, JsonValue>,
    integer: bool,
) -> Walk<NumberSchema> {
    let minimum = object
        .get("minimum")
        .map(|value| validate_bound(ctx, "minimum", value, integer))
        .transpose()?;
    let maximum = object
        .get("maximum")
        .map(|value| validate_bound(ctx, "maximum", value, integer))
        .transpose()?;

    if let (Some(Some(minimum)), Some(Some(maximum))) = (&minimum, &maximum)
        && compare_numbers(&minimum.value, &maximum.value) == Some(Ordering::Greater)
    {
        ctx.record_error(DiagnosticKind::InvertedRange)?;
        return Ok(None);
    }

    match (minimum, maximum) {
        (Some(None), _) | (_, Some(None)) => Ok(None),
        (minimum, maximum) => Ok(Some(NumberSchema {
            minimum: minimum.flatten(),
            maximum: maximum.flatten(),
        })),
    }
}

/// A bare number (inclusive) or `{exclusive?, value}`.
fn validate_bound(
    ctx: &mut WalkContext<'_>,
    name: &str,
    value: &JsonValue,
    integer: bool,
) -> Walk<Bound> {
    let bound = match value {
        JsonValue::Number(number) => Bound::inclusive(number.clone()),
        JsonValue::Object(object) => {
            if let Some(extra) = object
                .keys()
                .find(|key| !matches!(key.as_str(), "exclusive" | "value"))
            {
                ctx.record_error_in(
                    &[name],
                    DiagnosticKind::UnexpectedProperty {
                        name: extra.clone(),
                    },
                )?;
                return Ok(None);
            }

            let exclusive = match property(object, "exclusive") {
                None => Some(false),
                Some(JsonValue::Bool(exclusive)) => Some(*exclusive),
                Some(_) => {
                    ctx.record_error_in(&[name, "exclusive"], DiagnosticKind::NotABool)?;
                    None
                }
            };

            let number = match property(object, "value") {
                None => {
                    ctx.record_error_in(&[name], DiagnosticKind::MissingProperty { name: "value" })?;
                    None
                }
                Some(JsonValue::Number(number)) => Some(number.clone()),
                Some(_) => {
                    ctx.record_error_in(&[name, "value"], DiagnosticKind::NotANumber)?;
                    None
                }
            };

            let (Some(exclusive), Some(value)) = (exclusive, number) else {
                return Ok(None);
            };
            Bound { value, exclusive }
        }
        _ => {
            ctx.record_error_in(&[name], DiagnosticKind::NotANumberOrMapping)?;
            return Ok(None);
        }
    };

    if integer && bound.value.is_f64() {
        ctx.record_warning_in(&[name], DiagnosticKind::FloatForInteger);
    }
    Ok(Some(bound))
}

/// Order two JSON numbers, exactly when both are integers.
pub(crate) fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return Some(a.cmp(&b));
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return Some(a.cmp(&b));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

// =============================================================================
// length (string / list)
// =============================================================================

/// A bare length (exact) or `{minimum?, maximum?}`.
fn validate_length(ctx: &mut WalkContext<'_>, value: &JsonValue) -> Walk<Length> {
    match value {
        JsonValue::Number(_) => Ok(length_number(ctx, &["length"], value)?.map(Length::Exact)),
        JsonValue::Object(object) => {
            if let Some(extra) = object
                .keys()
                .find(|key| !matches!(key.as_str(), "minimum" | "maximum"))
            {
                ctx.record_error_in(
                    &["length"],
                    DiagnosticKind::UnexpectedProperty {
                        name: extra.clone(),
                    },
                )?;
                return Ok(None);
            }

            let minimum = object
                .get("minimum")
                .map(|value| length_number(ctx, &["length", "minimum"], value))
                .transpose()?;
            let maximum = object
                .get("maximum")
                .map(|value| length_number(ctx, &["length", "maximum"], value))
                .transpose()?;

            if let (Some(Some(minimum)), Some(Some(maximum))) = (minimum, maximum)
                && minimum > maximum
            {
                ctx.record_error_in(&["length"], DiagnosticKind::InvertedRange)?;
                return Ok(None);
            }

            match (minimum, maximum) {
                (Some(None), _) | (_, Some(None)) => Ok(None),
                (minimum, maximum) => Ok(Some(Length::Range {
                    minimum: minimum.flatten(),
                    maximum: maximum.flatten(),
                })),
            }
        }
        _ => {
            ctx.record_error_in(&["length"], DiagnosticKind::NotANumberOrMapping)?;
            Ok(None)
        }
    }
}

/// A non-negative count; floats are accepted with a warning and truncated.
fn length_number(
    ctx: &mut WalkContext<'_>,
    properties: &[&str],
    value: &JsonValue,
) -> Walk<u64> {
    let JsonValue::Number(number) = value else {
        ctx.record_error_in(properties, DiagnosticKind::NotANumber)?;
        return Ok(None);
    };

    if let Some(length) = number.as_u64() {
        return Ok(Some(length));
    }
    if number.is_i64() {
        ctx.record_error_in(properties, DiagnosticKind::Negative)?;
        return Ok(None);
    }

    ctx.record_warning_in(properties, DiagnosticKind::FloatForInteger);
    match number.as_f64() {
        Some(length) if length >= 0.0 => Ok(Some(length.trunc() as u64)),
        _ => {
            ctx.record_error_in(properties, DiagnosticKind::Negative)?;
            Ok(None)
        }
    }
}

// =============================================================================
// string / enum
// =============================================================================

fn validate_string(
    ctx: &mut WalkContext<'_>,
    object: &JsonMap<String, JsonValue>,
) -> Walk<StringSchema> {
    let length = object
        .get("length")
        .map(|value| validate_length(ctx, value))
        .transpose()?;

    let pattern = match property(object, "pattern") {
        None => Some(None),
        Some(JsonValue::String(source)) => match Pattern::new(source) {
            Ok(pattern) => Some(Some(pattern)),
            Err(err) => {
                let message = err.to_string();
                let reason = message.lines().last().unwrap_or_default().trim();
                ctx.record_error_in(
                    &["pattern"],
                    DiagnosticKind::InvalidPattern {
                        reason: reason.to_string(),
                    },
                )?;
                None
            }
        },
        Some(_) => {
            ctx.record_error_in(&["pattern"], DiagnosticKind::NotAString)?;
            None
        }
    };

    match (length, pattern) {
        (Some(None), _) | (_, None) => Ok(None),
        (length, Some(pattern)) => Ok(Some(StringSchema {
            length: length.flatten(),
            pattern,
        })),
    }
}

fn validate_enum(
    ctx: &mut WalkContext<'_>,
    object: &JsonMap<String, JsonValue>,
) -> Walk<EnumSchema> {
    let Some(values) = non_empty_list(ctx, object)? else {
        return Ok(None);
    };

    let mut accepted = IndexSet::with_capacity(values.len());
    let mut valid = true;
    for value in values {
        let Some(name) = value.as_str().filter(|name| is_identifier(name)) else {
            ctx.record_error_in(
                &["values"],
                DiagnosticKind::IncorrectValue {
                    value: display(value),
                },
            )?;
            valid = false;
            continue;
        };

        if !accepted.insert(name.to_string()) {
            ctx.record_error_in(
                &["values"],
                DiagnosticKind::DuplicatedValue {
                    value: name.to_string(),
                },
            )?;
            valid = false;
        }
    }

    Ok(valid.then_some(EnumSchema { values: accepted }))
}

/// `values` of an enum or a tuple: present, a list, not empty.
fn non_empty_list<'v>(
    ctx: &mut WalkContext<'_>,
    object: &'v JsonMap<String, JsonValue>,
) -> Walk<&'v Vec<JsonValue>> {
    let Some(values) = property(object, "values") else {
        ctx.record_error(DiagnosticKind::MissingProperty { name: "values" })?;
        return Ok(None);
    };
    let JsonValue::Array(values) = values else {
        ctx.record_error_in(&["values"], DiagnosticKind::NotAList)?;
        return Ok(None);
    };
    if values.is_empty() {
        ctx.record_error_in(&["values"], DiagnosticKind::NoValues)?;
        return Ok(None);
    }
    Ok(Some(values))
}

// =============================================================================
// list / tuple / map
// =============================================================================

fn validate_list(
    ctx: &mut WalkContext<'_>,
    object: &JsonMap<String, JsonValue>,
) -> Walk<ListSchema> {
    let Some(element) = property(object, "value") else {
        ctx.record_error(DiagnosticKind::MissingProperty { name: "value" })?;
        return Ok(None);
    };

    let value = ctx.descend(PathSegment::ListIndex(None), |ctx| {
        validate_block(ctx, element)
    })?;

    let length = object
        .get("length")
        .map(|value| validate_length(ctx, value))
        .transpose()?;

    match (value, length) {
        (None, _) | (_, Some(None)) => Ok(None),
        (Some(value), length) => Ok(Some(ListSchema {
            value: Box::new(value),
            length: length.flatten(),
        })),
    }
}

fn validate_tuple(
    ctx: &mut WalkContext<'_>,
    object: &JsonMap<String, JsonValue>,
) -> Walk<TupleSchema> {
    let Some(elements) = non_empty_list(ctx, object)? else {
        return Ok(None);
    };

    let mut values = Vec::with_capacity(elements.len());
    let mut valid = true;
    for (index, element) in elements.iter().enumerate() {
        match ctx.descend(PathSegment::TupleIndex(index), |ctx| {
            validate_block(ctx, element)
        })? {
            Some(block) => values.push(block),
            None => valid = false,
        }
    }

    Ok(valid.then_some(TupleSchema { values }))
}

fn validate_map(
    ctx: &mut WalkContext<'_>,
    object: &JsonMap<String, JsonValue>,
) -> Walk<MapSchema> {
    let Some(fields) = property(object, "fields") else {
        ctx.record_error(DiagnosticKind::MissingProperty { name: "fields" })?;
        return Ok(None);
    };
    let JsonValue::Object(fields) = fields else {
        ctx.record_error_in(&["fields"], DiagnosticKind::NotAMapping)?;
        return Ok(None);
    };
    if fields.is_empty() {
        ctx.record_error_in(&["fields"], DiagnosticKind::NoFields)?;
        return Ok(None);
    }

    let mut blocks = IndexMap::with_capacity(fields.len());
    let mut valid = true;
    for (name, field) in fields {
        if !is_identifier(name) {
            ctx.record_error_in(
                &["fields"],
                DiagnosticKind::IncorrectKeyName { key: name.clone() },
            )?;
            valid = false;
            continue;
        }

        match ctx.descend(PathSegment::field(name.as_str()), |ctx| {
            validate_block(ctx, field)
        })? {
            Some(block) => {
                blocks.insert(name.clone(), block);
            }
            None => valid = false,
        }
    }

    Ok(valid.then_some(MapSchema { fields: blocks }))
}
