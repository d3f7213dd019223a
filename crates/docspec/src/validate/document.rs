//! Document validation and conversion
//!
//! Walks a decoded JSON document in lockstep with a certified `Specs` and
//! produces the adjusted `Value`. The grammar is not re-checked here; the
//! `Specs` type guarantees it.
//!
//! A node that fails yields no value. Lists, tuples and maps still visit all
//! of their children before reporting themselves as failed, so lazy mode sees
//! every problem in the tree.

use core::cmp::Ordering;

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::FromPrimitive;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::config::FractionalIntegers;
use crate::diagnostic::DiagnosticKind;
use crate::grammar::{
    Block, BlockKind, EnumSchema, Length, ListSchema, MapSchema, NumberSchema, Specs,
    StringSchema, TupleSchema,
};
use crate::path::PathSegment;
use crate::value::{List, Map, Tuple, Value};

use super::context::{Walk, WalkContext};
use super::specs::compare_numbers;

pub(crate) fn convert_root(
    ctx: &mut WalkContext<'_>,
    document: &JsonValue,
    specs: &Specs,
) -> Walk<Value> {
    convert_node(ctx, Some(document), specs.root())
}

/// `None` is an absent map field.
fn convert_node(ctx: &mut WalkContext<'_>, node: Option<&JsonValue>, block: &Block) -> Walk<Value> {
    let node = match node {
        None | Some(JsonValue::Null) if block.optional => return Ok(Some(Value::Null)),
        None | Some(JsonValue::Null) => {
            ctx.record_error(DiagnosticKind::NullValue)?;
            return Ok(None);
        }
        Some(node) => node,
    };

    tracing::trace!(path = %ctx.path(), kind = %block.kind.kind(), "converting node");

    match &block.kind {
        BlockKind::Flag => convert_flag(ctx, node),
        BlockKind::Integer(schema) => convert_integer(ctx, node, schema),
        BlockKind::Decimal(schema) => convert_decimal(ctx, node, schema),
        BlockKind::String(schema) => convert_string(ctx, node, schema),
        BlockKind::Enum(schema) => convert_enum(ctx, node, schema),
        BlockKind::List(schema) => convert_list(ctx, node, schema),
        BlockKind::Tuple(schema) => convert_tuple(ctx, node, schema),
        BlockKind::Map(schema) => convert_map(ctx, node, schema),
    }
}

/// Record a type mismatch and fail the node.
fn expecting<T>(ctx: &mut WalkContext<'_>, expected: &'static str) -> Walk<T> {
    ctx.record_error(DiagnosticKind::Expecting { expected })?;
    Ok(None)
}

// =============================================================================
// Primitives
// =============================================================================

fn convert_flag(ctx: &mut WalkContext<'_>, node: &JsonValue) -> Walk<Value> {
    match node {
        JsonValue::Bool(b) => Ok(Some(Value::Bool(*b))),
        _ => expecting(ctx, "a boolean"),
    }
}

fn convert_integer(
    ctx: &mut WalkContext<'_>,
    node: &JsonValue,
    schema: &NumberSchema,
) -> Walk<Value> {
    let JsonValue::Number(number) = node else {
        return expecting(ctx, "a number");
    };
    if check_bounds(ctx, number, schema)?.is_none() {
        return Ok(None);
    }

    if let Some(i) = number.as_i64() {
        return Ok(Some(Value::Integer(BigInt::from(i))));
    }
    if let Some(u) = number.as_u64() {
        return Ok(Some(Value::Integer(BigInt::from(u))));
    }

    let Some(float) = number.as_f64() else {
        return expecting(ctx, "a number");
    };
    if float.fract() != 0.0 {
        match ctx.config.fractional_integers {
            FractionalIntegers::Truncate => {}
            FractionalIntegers::Warn => {
                ctx.record_warning(DiagnosticKind::TruncatedInteger { value: float })
            }
            FractionalIntegers::Reject => {
                ctx.record_error(DiagnosticKind::FractionalInteger { value: float })?;
                return Ok(None);
            }
        }
    }

    match BigInt::from_f64(float.trunc()) {
        Some(integer) => Ok(Some(Value::Integer(integer))),
        None => expecting(ctx, "a number"),
    }
}

fn convert_decimal(
    ctx: &mut WalkContext<'_>,
    node: &JsonValue,
    schema: &NumberSchema,
) -> Walk<Value> {
    let JsonValue::Number(number) = node else {
        return expecting(ctx, "a number");
    };
    if check_bounds(ctx, number, schema)?.is_none() {
        return Ok(None);
    }
    match number.as_f64() {
        Some(decimal) => Ok(Some(Value::Decimal(decimal))),
        None => expecting(ctx, "a number"),
    }
}

fn check_bounds(ctx: &mut WalkContext<'_>, number: &Number, schema: &NumberSchema) -> Walk<()> {
    if let Some(minimum) = &schema.minimum {
        let ordering = compare_numbers(number, &minimum.value);
        let satisfied = if minimum.exclusive {
            ordering == Some(Ordering::Greater)
        } else {
            matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
        };
        if !satisfied {
            let bound = minimum.value.clone();
            ctx.record_error(if minimum.exclusive {
                DiagnosticKind::NotGreaterThan { bound }
            } else {
                DiagnosticKind::NotGreaterOrEqual { bound }
            })?;
            return Ok(None);
        }
    }

    if let Some(maximum) = &schema.maximum {
        let ordering = compare_numbers(number, &maximum.value);
        let satisfied = if maximum.exclusive {
            ordering == Some(Ordering::Less)
        } else {
            matches!(ordering, Some(Ordering::Less | Ordering::Equal))
        };
        if !satisfied {
            let bound = maximum.value.clone();
            ctx.record_error(if maximum.exclusive {
                DiagnosticKind::NotLessThan { bound }
            } else {
                DiagnosticKind::NotLessOrEqual { bound }
            })?;
            return Ok(None);
        }
    }

    Ok(Some(()))
}

/// `subject` names what is measured in the message ("string", "list").
fn check_length(
    ctx: &mut WalkContext<'_>,
    subject: &'static str,
    actual: usize,
    length: Option<Length>,
) -> Walk<()> {
    let actual = actual as u64;
    let kind = match length {
        None => None,
        Some(Length::Exact(length)) => {
            (actual != length).then_some(DiagnosticKind::LengthNotEqual { subject, length })
        }
        Some(Length::Range { minimum, maximum }) => match (minimum, maximum) {
            (Some(minimum), _) if actual < minimum => {
                Some(DiagnosticKind::LengthTooShort { subject, minimum })
            }
            (_, Some(maximum)) if actual > maximum => {
                Some(DiagnosticKind::LengthTooLong { subject, maximum })
            }
            _ => None,
        },
    };

    match kind {
        Some(kind) => {
            ctx.record_error(kind)?;
            Ok(None)
        }
        None => Ok(Some(())),
    }
}

fn convert_string(
    ctx: &mut WalkContext<'_>,
    node: &JsonValue,
    schema: &StringSchema,
) -> Walk<Value> {
    let JsonValue::String(s) = node else {
        return expecting(ctx, "a string");
    };
    if check_length(ctx, "string", s.chars().count(), schema.length)?.is_none() {
        return Ok(None);
    }
    if let Some(pattern) = &schema.pattern
        && !pattern.is_match(s)
    {
        ctx.record_error(DiagnosticKind::PatternMismatch {
            pattern: pattern.as_str().to_string(),
        })?;
        return Ok(None);
    }
    Ok(Some(Value::String(s.clone())))
}

fn convert_enum(ctx: &mut WalkContext<'_>, node: &JsonValue, schema: &EnumSchema) -> Walk<Value> {
    let JsonValue::String(s) = node else {
        return expecting(ctx, "a string");
    };
    if !schema.values.contains(s) {
        ctx.record_error(DiagnosticKind::NotOneOf {
            values: schema.values.iter().cloned().collect(),
        })?;
        return Ok(None);
    }
    Ok(Some(Value::String(s.clone())))
}

// =============================================================================
// Compounds
// =============================================================================

fn convert_list(ctx: &mut WalkContext<'_>, node: &JsonValue, schema: &ListSchema) -> Walk<Value> {
    let JsonValue::Array(items) = node else {
        return expecting(ctx, "an array");
    };
    if check_length(ctx, "list", items.len(), schema.length)?.is_none() {
        return Ok(None);
    }

    let mut converted = Vec::with_capacity(items.len());
    let mut valid = true;
    for (index, item) in items.iter().enumerate() {
        match ctx.descend(PathSegment::ListIndex(Some(index)), |ctx| {
            convert_node(ctx, Some(item), &schema.value)
        })? {
            Some(value) => converted.push(value),
            None => valid = false,
        }
    }
    Ok(valid.then_some(Value::List(List(converted))))
}

fn convert_tuple(
    ctx: &mut WalkContext<'_>,
    node: &JsonValue,
    schema: &TupleSchema,
) -> Walk<Value> {
    let JsonValue::Array(items) = node else {
        return expecting(ctx, "an array");
    };
    if items.len() != schema.values.len() {
        ctx.record_error(DiagnosticKind::ArityMismatch {
            arity: schema.values.len(),
        })?;
        return Ok(None);
    }

    let mut converted = Vec::with_capacity(items.len());
    let mut valid = true;
    for (index, (item, block)) in items.iter().zip(&schema.values).enumerate() {
        match ctx.descend(PathSegment::TupleIndex(index), |ctx| {
            convert_node(ctx, Some(item), block)
        })? {
            Some(value) => converted.push(value),
            None => valid = false,
        }
    }
    Ok(valid.then_some(Value::Tuple(Tuple(converted))))
}

/// Undeclared document fields are dropped without a diagnostic.
fn convert_map(ctx: &mut WalkContext<'_>, node: &JsonValue, schema: &MapSchema) -> Walk<Value> {
    let JsonValue::Object(object) = node else {
        return expecting(ctx, "an object");
    };

    let mut converted = IndexMap::with_capacity(schema.fields.len());
    let mut valid = true;
    for (name, block) in &schema.fields {
        let field = object.get(name);
        if field.is_none() && block.optional {
            continue;
        }
        match ctx.descend(PathSegment::field(name.as_str()), |ctx| {
            convert_node(ctx, field, block)
        })? {
            Some(value) => {
                converted.insert(name.clone(), value);
            }
            None => valid = false,
        }
    }

    if tracing::enabled!(tracing::Level::TRACE) {
        let dropped = undeclared_fields(object, schema);
        if dropped > 0 {
            tracing::trace!(path = %ctx.path(), dropped, "dropping undeclared fields");
        }
    }

    Ok(valid.then_some(Value::Map(Map(converted))))
}

fn undeclared_fields(object: &JsonMap<String, JsonValue>, schema: &MapSchema) -> usize {
    object
        .keys()
        .filter(|name| !schema.fields.contains_key(name.as_str()))
        .count()
}
