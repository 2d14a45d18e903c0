//! Integration-level checks for the concrete scenarios and invariants the
//! crate is built against: version detection, the meta-schema/semantic
//! two-phase algorithm, and the handful of cross-module behaviors
//! (`allOf` reachability, tag cycles, idempotence) that only show up once
//! a full document is run through `SpecValidator`.

use openapi_spec_validator::{get_validator_cls, validate, OasError, SpecValidator, SpecVersion};
use serde_json::json;
use test_case::test_case;

#[test]
fn minimal_valid_document_has_zero_errors() {
    let document = json!({
        "openapi": "3.0.0",
        "info": {"title": "x", "version": "0"},
        "paths": {}
    });
    assert!(validate(document, "").is_ok());
}

#[test]
fn empty_document_against_v30_reports_three_required_field_errors() {
    let validator = SpecValidator::for_version(json!({}), "", SpecVersion::V30);
    let errors = validator.iter_errors();
    let schema_errors: Vec<&OasError> = errors.iter().filter(|e| matches!(e, OasError::SchemaError { .. })).collect();
    assert_eq!(schema_errors.len(), 3, "{:?}", errors);
}

#[test]
fn duplicate_operation_id_across_paths_is_reported_for_each_repeat() {
    let document = json!({
        "openapi": "3.0.0",
        "info": {"title": "x", "version": "0"},
        "paths": {
            "/a": {
                "get": {"operationId": "op1", "responses": {}},
                "post": {"operationId": "op1", "responses": {}}
            },
            "/b": {
                "get": {"operationId": "op1", "responses": {}}
            }
        }
    });
    let validator = SpecValidator::new(document, "").unwrap();
    let duplicates = validator
        .iter_errors()
        .iter()
        .filter(|e| matches!(e, OasError::DuplicateOperationID { .. }))
        .count();
    assert_eq!(duplicates, 2);
}

#[test]
fn only_the_unresolved_template_name_is_reported() {
    let document = json!({
        "openapi": "3.0.0",
        "info": {"title": "x", "version": "0"},
        "paths": {
            "/test/{param1}/{param2}": {
                "get": {
                    "parameters": [{"name": "param1", "in": "path", "required": true, "schema": {"type": "string"}}],
                    "responses": {}
                }
            }
        }
    });
    let validator = SpecValidator::new(document, "").unwrap();
    let unresolved: Vec<&OasError> = validator
        .iter_errors()
        .iter()
        .filter(|e| matches!(e, OasError::UnresolvableParameter { .. }))
        .collect();
    assert_eq!(unresolved.len(), 1);
    match unresolved[0] {
        OasError::UnresolvableParameter { name, .. } => assert_eq!(name, "param2"),
        _ => unreachable!(),
    }
}

#[test]
fn default_value_type_mismatch_is_reported_with_the_value_in_the_message() {
    let document = json!({
        "openapi": "3.0.0",
        "info": {"title": "x", "version": "0"},
        "paths": {},
        "components": {
            "schemas": {
                "Count": {"type": "integer", "default": "abc"}
            }
        }
    });
    let validator = SpecValidator::new(document, "").unwrap();
    let errors = validator.iter_errors();
    assert!(errors.iter().any(|e| matches!(e, OasError::SchemaError { message, .. } if message.contains("abc"))));
}

#[test]
fn allof_required_reachable_via_sibling_schema_has_no_errors() {
    let document = json!({
        "openapi": "3.0.0",
        "info": {"title": "x", "version": "0"},
        "paths": {},
        "components": {
            "schemas": {
                "Credit": {"type": "object", "properties": {"clientId": {"type": "string"}}},
                "CreditCreate": {
                    "allOf": [
                        {"$ref": "#/components/schemas/Credit"},
                        {"required": ["clientId"]}
                    ]
                }
            }
        }
    });
    let validator = SpecValidator::new(document, "").unwrap();
    assert!(validator.is_valid(), "{:?}", validator.iter_errors());
}

#[test]
fn v32_tag_cycle_is_reported() {
    let document = json!({
        "openapi": "3.2.0",
        "info": {"title": "x", "version": "0"},
        "paths": {},
        "tags": [
            {"name": "a", "parent": "b"},
            {"name": "b", "parent": "c"},
            {"name": "c", "parent": "a"}
        ]
    });
    let validator = SpecValidator::new(document, "").unwrap();
    assert!(validator
        .iter_errors()
        .iter()
        .any(|e| matches!(e, OasError::CircularTagHierarchy { .. })));
}

#[test_case(json!({"swagger": "2.0"}), Some(SpecVersion::V2))]
#[test_case(json!({"openapi": "3.1.2"}), Some(SpecVersion::V31))]
#[test_case(json!({"openapi": "x.y.z"}), None)]
fn version_detection_matrix(document: serde_json::Value, expected: Option<SpecVersion>) {
    match expected {
        Some(version) => assert_eq!(get_validator_cls(&document).unwrap(), version),
        None => assert!(matches!(get_validator_cls(&document), Err(OasError::ValidatorDetect { .. }))),
    }
}

#[test]
fn iter_errors_is_idempotent_across_repeated_calls() {
    let document = json!({"openapi": "3.0.0"});
    let validator = SpecValidator::new(document, "").unwrap();
    let first: Vec<String> = validator.iter_errors().iter().map(ToString::to_string).collect();
    let second: Vec<String> = validator.iter_errors().iter().map(ToString::to_string).collect();
    assert_eq!(first, second);
}

#[test]
fn meta_schema_errors_precede_semantic_errors() {
    let document = json!({
        "openapi": "3.0.0",
        "paths": {
            "/a": {
                "get": {"operationId": "dup", "responses": {}}
            },
            "/b": {
                "get": {"operationId": "dup", "responses": {}}
            }
        }
    });
    let validator = SpecValidator::new(document, "").unwrap();
    let errors = validator.iter_errors();
    let first_semantic = errors.iter().position(|e| matches!(e, OasError::DuplicateOperationID { .. }));
    let last_schema = errors.iter().rposition(|e| matches!(e, OasError::SchemaError { .. }));
    if let (Some(semantic_index), Some(schema_index)) = (first_semantic, last_schema) {
        assert!(schema_index < semantic_index);
    }
}

#[test]
fn validate_never_mutates_the_input_document() {
    let document = json!({
        "openapi": "3.0.0",
        "info": {"title": "x", "version": "0"},
        "paths": {"/a": {"get": {"responses": {}}}}
    });
    let before = document.clone();
    let _ = validate(document.clone(), "");
    assert_eq!(document, before);
}
