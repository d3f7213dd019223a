use docspec::{Diagnostics, Error, Value, document_to_object_lazy};
use docspec_builder::{Spec, decimal, enumeration, flag, integer, list, map, string, tuple};
use serde_json::json;

fn inventory() -> Spec {
    map([
        ("sku", string().length(8).pattern("[A-Z]{3}-").into()),
        ("price", decimal().exclusive_minimum(0.0).into()),
        ("stock", integer().minimum(0).maximum(10_000).into()),
        ("size", enumeration(["small", "medium", "large"]).option(true).into()),
        ("dimensions", tuple([decimal().into(), decimal().into()]).into()),
        ("tags", list(string().length_range(Some(1), None)).length_range(None, Some(5)).into()),
        ("discontinued", flag().into()),
    ])
    .into()
}

#[test]
fn test_builder_matches_hand_written_specs() {
    let expected = json!({
        "type": "map",
        "fields": {
            "sku": {"type": "string", "length": 8, "pattern": "[A-Z]{3}-"},
            "price": {"type": "decimal", "minimum": {"exclusive": true, "value": 0.0}},
            "stock": {"type": "integer", "minimum": 0, "maximum": 10000},
            "size": {"type": "enum", "values": ["small", "medium", "large"], "option": true},
            "dimensions": {"type": "tuple", "values": [{"type": "decimal"}, {"type": "decimal"}]},
            "tags": {
                "type": "list",
                "value": {"type": "string", "length": {"minimum": 1}},
                "length": {"maximum": 5}
            },
            "discontinued": {"type": "flag"}
        }
    });
    assert_eq!(inventory().to_value(), expected);
}

#[test]
fn test_certified_specs_encode_back_to_builder_output() {
    let spec = inventory();
    let certified = spec.certify().unwrap();
    assert_eq!(certified.to_value(), spec.to_value());
}

#[test]
fn test_certified_specs_convert_documents() {
    let specs = inventory().certify().unwrap();
    let document = r#"{
        "sku": "ABC-0001",
        "price": 12,
        "stock": 3,
        "dimensions": [1.5, 2],
        "tags": ["new"],
        "discontinued": false
    }"#;

    let mut diagnostics = Diagnostics::new();
    let item = document_to_object_lazy(document, &specs, &mut diagnostics)
        .unwrap()
        .unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(item.get("price"), Some(&Value::Decimal(12.0)));
    assert!(item.get("size").is_none());
}

#[test]
fn test_invalid_builder_output_is_rejected() {
    let err = enumeration(["on", "on"]).certify().unwrap_err();
    assert!(matches!(err, Error::InvalidSpecs(_)));
    assert_eq!(err.to_string(), "invalid specs at root.values: 'on' value is duplicated");

    let err = integer().minimum(5).maximum(1).certify().unwrap_err();
    assert_eq!(err.to_string(), "invalid specs at root: minimum must be lower than maximum");

    let err = map([("Bad", flag().into())]).certify().unwrap_err();
    assert_eq!(err.to_string(), "invalid specs at root.fields: 'Bad' is an incorrect key name");

    let err = string().pattern("(").certify().unwrap_err();
    assert_eq!(err.diagnostic().unwrap().path.to_string(), "root.pattern");
}

#[test]
fn test_non_finite_decimal_bound_still_certifies() {
    let specs = decimal().minimum(f64::NAN).maximum(2.5).certify().unwrap();
    assert_eq!(specs.to_value(), json!({"type": "decimal", "maximum": 2.5}));
}
