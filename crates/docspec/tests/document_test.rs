use docspec::{
    Config, Diagnostics, Error, Specs, Validator, Value, document_to_object,
    document_to_object_lazy, validate_specs,
};
use serde_json::{Value as JsonValue, json};

fn certify(specs: JsonValue) -> Specs {
    validate_specs(&specs).unwrap()
}

fn person_specs() -> Specs {
    certify(json!({
        "type": "map",
        "fields": {
            "name": {"type": "string", "length": {"minimum": 1, "maximum": 32}},
            "age": {"type": "integer", "minimum": 0, "maximum": 150},
            "height": {"type": "decimal", "minimum": {"exclusive": true, "value": 0}, "option": true},
            "role": {"type": "enum", "values": ["admin", "power-user", "guest"]},
            "tags": {"type": "list", "value": {"type": "string", "pattern": "[a-z]"}, "option": true},
            "position": {"type": "tuple", "values": [{"type": "integer"}, {"type": "integer"}]},
            "active": {"type": "flag"}
        }
    }))
}

#[test]
fn test_integer_exclusive_minimum() {
    let specs = certify(json!({"type": "integer", "minimum": {"value": 5, "exclusive": true}}));
    let err = document_to_object("5", &specs).unwrap_err();
    assert_eq!(
        err.diagnostic().unwrap().message(),
        "value must be strictly greater than 5"
    );
    assert_eq!(document_to_object("6", &specs).unwrap(), Value::from(6));
}

#[test]
fn test_string_length_range() {
    let specs = certify(json!({"type": "string", "length": {"minimum": 2, "maximum": 4}}));
    assert!(document_to_object(r#""a""#, &specs).is_err());
    assert!(document_to_object(r#""abcde""#, &specs).is_err());
    assert_eq!(
        document_to_object(r#""abc""#, &specs).unwrap(),
        Value::from("abc")
    );
}

#[test]
fn test_optional_map_field() {
    let specs = certify(json!({"type": "map", "fields": {"x": {"type": "flag", "option": true}}}));

    let empty = document_to_object("{}", &specs).unwrap();
    assert!(empty.as_map().unwrap().is_empty());

    let null = document_to_object(r#"{"x": null}"#, &specs).unwrap();
    assert!(null.get("x").is_none_or(Value::is_null));
}

#[test]
fn test_tuple_arity_mismatch() {
    let specs = certify(json!({"type": "tuple", "values": [{"type": "flag"}, {"type": "flag"}]}));
    let err = document_to_object("[true]", &specs).unwrap_err();
    assert!(matches!(err, Error::InvalidDocument(_)));
    assert_eq!(
        err.to_string(),
        "invalid document at root: was expecting array of 2 elements"
    );
}

#[test]
fn test_conversion_is_idempotent() {
    let specs = person_specs();
    let document = r#"{
        "name": "Grace",
        "age": 85.0,
        "height": 1.52,
        "role": "power-user",
        "tags": ["navy", "cobol"],
        "position": [3, -4],
        "active": false,
        "unknown": {"dropped": true}
    }"#;

    let mut diagnostics = Diagnostics::new();
    let adjusted = document_to_object_lazy(document, &specs, &mut diagnostics)
        .unwrap()
        .unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert!(adjusted.get("unknown").is_none());

    let encoded = adjusted.to_json().unwrap();
    assert_eq!(encoded["age"], json!(85));
    assert_eq!(encoded["position"], json!([3, -4]));

    let again = document_to_object(&encoded.to_string(), &specs).unwrap();
    assert_eq!(again, adjusted);
}

#[test]
fn test_lazy_reports_every_problem() {
    let specs = person_specs();
    let document = json!({
        "name": "",
        "age": 200,
        "role": "root",
        "tags": ["ok", "1bad", null],
        "position": [1, "two"],
        "active": "yes"
    });

    let mut diagnostics = Diagnostics::new();
    let adjusted = document_to_object_lazy(&document.to_string(), &specs, &mut diagnostics).unwrap();
    assert!(adjusted.is_none());

    let errors: Vec<_> = diagnostics.errors.iter().map(ToString::to_string).collect();
    assert_eq!(
        errors,
        vec![
            "root.name: length of string must be greater or equal to 1",
            "root.age: value must be equal or less than 150",
            "root.role: value was expected to be one of [admin, power-user, guest]",
            "root.tags.[1]: value did not match pattern '[a-z]'",
            "root.tags.[2]: value cannot be null",
            "root.position.(1): was expecting a number",
            "root.active: was expecting a boolean",
        ]
    );

    let err = document_to_object(&document.to_string(), &specs).unwrap_err();
    assert_eq!(err.diagnostic(), diagnostics.errors.first());
}

#[test]
fn test_decode_error_is_fatal_in_both_modes() {
    let specs = certify(json!({"type": "flag"}));
    assert!(matches!(
        document_to_object("{not json", &specs),
        Err(Error::Decode(_))
    ));

    let mut diagnostics = Diagnostics::new();
    let result = document_to_object_lazy("[true,", &specs, &mut diagnostics);
    assert!(matches!(result, Err(Error::Decode(_))));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_non_empty_collector_is_rejected() {
    let specs = certify(json!({"type": "flag"}));
    let mut diagnostics = Diagnostics::new();
    document_to_object_lazy("1", &specs, &mut diagnostics).unwrap();
    assert!(matches!(
        document_to_object_lazy("true", &specs, &mut diagnostics),
        Err(Error::DiagnosticsNotEmpty)
    ));
}

#[test]
fn test_depth_limit() {
    let mut specs = json!({"type": "flag"});
    let mut document = json!(true);
    for _ in 0..8 {
        specs = json!({"type": "list", "value": specs});
        document = json!([document]);
    }

    let validator = Validator::new(Config {
        max_depth: Some(16),
        ..Config::default()
    });
    let certified = validator.validate_specs(&specs).unwrap();
    assert!(validator.convert(&document, &certified).is_ok());

    let shallow = Validator::new(Config {
        max_depth: Some(3),
        ..Config::default()
    });
    let err = shallow.convert(&document, &certified).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid document at root.[0].[0].[0].[0]: maximum nesting depth of 3 exceeded"
    );
}
