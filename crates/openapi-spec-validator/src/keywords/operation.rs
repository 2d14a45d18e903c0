use std::collections::HashSet;

use crate::error::OasError;
use crate::schema_path::SchemaPath;

use super::parameters;
use super::path::collect_parameter_paths;
use super::responses;
use super::Run;

/// For an operation under `url`, named `name`, inheriting `path_parameters`
/// from its path item:
/// 1. A repeated `operationId` (global uniqueness) yields `DuplicateOperationID`.
/// 2. `responses` and `parameters` are delegated.
/// 3. Every `{name}` path template segment must match a declared `in: path`
///    parameter, own or inherited; otherwise `UnresolvableParameter`.
pub(crate) fn validate_operation(
    run: &mut Run<'_>,
    url: &str,
    name: &str,
    operation: &SchemaPath,
    path_parameters: &[SchemaPath],
) -> Result<(), OasError> {
    let Some(value) = operation.read_value() else { return Ok(()) };
    let Some(object) = value.as_object() else { return Ok(()) };

    if let Some(operation_id) = object.get("operationId").and_then(|v| v.as_str()) {
        if run.operation_ids_seen.iter().any(|seen| seen == operation_id) {
            run.push(OasError::duplicate_operation_id(operation.pointer().clone(), operation_id));
        } else {
            run.operation_ids_seen.push(operation_id.to_string());
        }
    }

    if object.contains_key("responses") {
        responses::validate_responses(run, &operation.child_property("responses"))?;
    }

    let own_parameters = if object.contains_key("parameters") {
        let parameters_node = operation.child_property("parameters");
        parameters::validate_parameters(run, &parameters_node, &format!("operation '{name}' at '{url}'"))?;
        collect_parameter_paths(&parameters_node)?
    } else {
        Vec::new()
    };

    let declared_path_names = declared_path_parameter_names(path_parameters.iter().chain(own_parameters.iter()));

    for template_name in path_template_names(url) {
        if !declared_path_names.contains(&template_name) {
            run.push(OasError::unresolvable_parameter(operation.pointer().clone(), template_name));
        }
    }
    Ok(())
}

fn declared_path_parameter_names<'a>(parameters: impl Iterator<Item = &'a SchemaPath>) -> HashSet<String> {
    let mut names = HashSet::new();
    for parameter in parameters {
        let Ok((_, resolved)) = parameter.resolved_path() else { continue };
        if resolved.get("in").and_then(|v| v.as_str()) == Some("path") {
            if let Some(name) = resolved.get("name").and_then(|v| v.as_str()) {
                names.insert(name.to_string());
            }
        }
    }
    names
}

/// Extracts every `{name}` placeholder from a path template, e.g.
/// `/pets/{petId}/owner/{ownerId}` → `["petId", "ownerId"]`.
fn path_template_names(url: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut chars = url.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '{' {
            continue;
        }
        let mut name = String::new();
        for inner in chars.by_ref() {
            if inner == '}' {
                break;
            }
            name.push(inner);
        }
        if !name.is_empty() {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_template_names() {
        assert_eq!(path_template_names("/test/{param1}/{param2}"), vec!["param1", "param2"]);
    }

    #[test]
    fn url_without_templates_has_no_names() {
        assert!(path_template_names("/pets").is_empty());
    }
}
