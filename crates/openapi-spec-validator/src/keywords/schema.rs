use std::collections::HashSet;

use crate::error::OasError;
use crate::schema_path::SchemaPath;

use super::value_default;
use super::Run;

const KNOWN_DIALECTS: &[&str] = &[
    "https://spec.openapis.org/oas/3.1/dialect/base",
    "https://spec.openapis.org/oas/3.0/dialect/base",
    "https://json-schema.org/draft/2020-12/schema",
    "https://json-schema.org/draft/2019-09/schema",
];

/// The most intricate validator. `require_properties` is `true` only for
/// the outermost call on a schema node; every recursive call passes `false`
/// so only the schema that actually owns a `required` list gets reported
/// for it.
pub(crate) fn validate_schema(run: &mut Run<'_>, path: &SchemaPath, require_properties: bool) -> Result<(), OasError> {
    let (resolved_path, resolved_value) = path.resolved_path()?;
    // Boolean schemas (`true`/`false`, legal from Draft 2020-12 on) have
    // nothing to check.
    let Some(object) = resolved_value.as_object() else { return Ok(()) };

    // Breaks `$ref` cycles in recursive types: identity is the canonical
    // location reached after following every `$ref`, standing in for an
    // object-address identity (cloned `serde_json::Value`s have no stable
    // address to key on).
    let identity = (resolved_path.base_uri().clone(), resolved_path.pointer().clone());
    if !run.schema_ids_visited.insert(identity) {
        return Ok(());
    }

    if run.config.supports_dialect {
        // A per-schema `$schema` overrides the document-wide `jsonSchemaDialect`;
        // absent that, the root dialect (if any) is the effective one.
        let local_dialect = object.get("$schema").and_then(|v| v.as_str());
        let effective_dialect = local_dialect.or(run.root_dialect.as_deref());
        if let Some(dialect) = effective_dialect {
            if !KNOWN_DIALECTS.contains(&dialect) {
                run.push(OasError::unknown_json_schema_dialect(resolved_path.pointer().clone(), dialect));
                return Ok(());
            }
        }
    }

    let mut reachable_from_all_of: HashSet<String> = HashSet::new();
    if object.contains_key("allOf") {
        let node = resolved_path.child_property("allOf");
        for sub in node.iter_items()? {
            validate_schema(run, &sub, false)?;
            reachable_from_all_of.extend(collect_properties(&sub));
        }
    }
    for keyword in ["anyOf", "oneOf"] {
        if object.contains_key(keyword) {
            let node = resolved_path.child_property(keyword);
            for sub in node.iter_items()? {
                validate_schema(run, &sub, false)?;
            }
        }
    }
    if object.contains_key("not") {
        validate_schema(run, &resolved_path.child_property("not"), false)?;
    }
    if object.contains_key("items") {
        validate_schema(run, &resolved_path.child_property("items"), false)?;
    }

    let own_properties: HashSet<String> = if object.contains_key("properties") {
        let node = resolved_path.child_property("properties");
        let names = node.keys()?;
        for name in &names {
            validate_schema(run, &node.child_property(name.as_str()), false)?;
        }
        names.into_iter().collect()
    } else {
        HashSet::new()
    };

    let required: Vec<String> = object
        .get("required")
        .and_then(|v| v.as_array())
        .map(|array| array.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();

    // Pre-2023 leniency, preserved as-is: `required` naming properties
    // absent from `properties` is only flagged when `allOf` is present.
    let extra: Vec<String> = if object.contains_key("allOf") {
        required
            .into_iter()
            .filter(|name| !own_properties.contains(name) && !reachable_from_all_of.contains(name))
            .collect()
    } else {
        Vec::new()
    };

    if !extra.is_empty() && require_properties {
        run.push(OasError::extra_parameters(resolved_path.pointer().clone(), extra));
    }

    if let Some(default) = object.get("default") {
        let nullable = object.get("nullable").and_then(|v| v.as_bool()).unwrap_or(false);
        if !default.is_null() || !nullable {
            value_default::validate_value(run, &resolved_path, default);
        }
    }

    Ok(())
}

/// The union of property names reachable from `sub`: its own `properties`
/// keys, plus whatever is reachable through its own `allOf`/`anyOf`/`oneOf`,
/// `items`, and `not`.
fn collect_properties(path: &SchemaPath) -> HashSet<String> {
    let Ok((resolved_path, value)) = path.resolved_path() else { return HashSet::new() };
    let Some(object) = value.as_object() else { return HashSet::new() };

    let mut names = HashSet::new();
    if object.contains_key("properties") {
        if let Ok(keys) = resolved_path.child_property("properties").keys() {
            names.extend(keys);
        }
    }
    for keyword in ["allOf", "anyOf", "oneOf"] {
        if object.contains_key(keyword) {
            let node = resolved_path.child_property(keyword);
            if let Ok(items) = node.iter_items() {
                for sub in items {
                    names.extend(collect_properties(&sub));
                }
            }
        }
    }
    if object.contains_key("items") {
        names.extend(collect_properties(&resolved_path.child_property("items")));
    }
    if object.contains_key("not") {
        names.extend(collect_properties(&resolved_path.child_property("not")));
    }
    names
}

#[cfg(test)]
mod tests {
    use super::super::VersionConfig;
    use super::*;
    use crate::reader::DefaultReader;
    use crate::version::SpecVersion;
    use serde_json::json;

    fn root(document: serde_json::Value) -> SchemaPath {
        SchemaPath::new_root(
            document,
            crate::paths::AbsoluteUri::new(url::Url::parse("urn:test:root").unwrap()),
            128,
            Box::new(DefaultReader),
        )
    }

    #[test]
    fn allof_required_reaches_properties_from_sibling() {
        let document = json!({
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
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V30);
        let mut run = Run::new(&config);
        let schema_path = path.child_property("components").child_property("schemas").child_property("CreditCreate");
        validate_schema(&mut run, &schema_path, true).unwrap();
        assert!(run.errors.is_empty(), "{:?}", run.errors);
    }

    #[test]
    fn required_without_allof_is_lenient() {
        let document = json!({"type": "object", "required": ["missing"]});
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V30);
        let mut run = Run::new(&config);
        validate_schema(&mut run, &path, true).unwrap();
        assert!(run.errors.is_empty());
    }

    #[test]
    fn required_under_allof_without_reachable_property_is_flagged() {
        let document = json!({
            "allOf": [
                {"type": "object"},
                {"required": ["clientId"]}
            ]
        });
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V30);
        let mut run = Run::new(&config);
        validate_schema(&mut run, &path, true).unwrap();
        assert_eq!(run.errors.len(), 1);
        assert!(matches!(run.errors[0], OasError::ExtraParameters { .. }));
    }

    #[test]
    fn ref_cycle_terminates() {
        let document = json!({
            "components": {
                "schemas": {
                    "Node": {
                        "type": "object",
                        "properties": {"next": {"$ref": "#/components/schemas/Node"}}
                    }
                }
            }
        });
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V30);
        let mut run = Run::new(&config);
        let schema_path = path.child_property("components").child_property("schemas").child_property("Node");
        validate_schema(&mut run, &schema_path, true).unwrap();
        assert!(run.errors.is_empty());
    }

    #[test]
    fn default_value_type_mismatch_is_reported() {
        let document = json!({"type": "integer", "default": "abc"});
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V30);
        let mut run = Run::new(&config);
        validate_schema(&mut run, &path, true).unwrap();
        assert_eq!(run.errors.len(), 1);
    }

    #[test]
    fn unknown_root_dialect_is_flagged_when_no_local_override() {
        let document = json!({"type": "object"});
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V31);
        let mut run = Run::new(&config);
        run.root_dialect = Some("https://example.com/custom".to_string());
        validate_schema(&mut run, &path, true).unwrap();
        assert_eq!(run.errors.len(), 1);
        assert!(matches!(run.errors[0], OasError::UnknownJsonSchemaDialect { .. }));
    }

    #[test]
    fn local_schema_override_of_a_known_dialect_clears_an_unknown_root_dialect() {
        let document = json!({"$schema": "https://json-schema.org/draft/2020-12/schema", "type": "object"});
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V31);
        let mut run = Run::new(&config);
        run.root_dialect = Some("https://example.com/custom".to_string());
        validate_schema(&mut run, &path, true).unwrap();
        assert!(run.errors.is_empty());
    }
}
