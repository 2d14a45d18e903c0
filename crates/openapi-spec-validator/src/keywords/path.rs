use crate::error::OasError;
use crate::schema_path::SchemaPath;

use super::operation;
use super::parameters;
use super::Run;

/// Delegates a path item's own `parameters` to the `Parameters` validator,
/// then each declared operation (the fixed 8, plus V3.2's `query` and
/// `additionalOperations.*`) to the `Operation` validator, passing along the
/// path item's own parameters for path-parameter inheritance.
pub(crate) fn validate_path(run: &mut Run<'_>, url: &str, path_item: &SchemaPath) -> Result<(), OasError> {
    let Some(value) = path_item.read_value() else { return Ok(()) };
    let Some(object) = value.as_object() else { return Ok(()) };

    let inherited_parameters = if object.contains_key("parameters") {
        let parameters_node = path_item.child_property("parameters");
        parameters::validate_parameters(run, &parameters_node, &format!("path item '{url}'"))?;
        collect_parameter_paths(&parameters_node)?
    } else {
        Vec::new()
    };

    for &key in run.config.operations {
        if object.contains_key(key) {
            operation::validate_operation(run, url, key, &path_item.child_property(key), &inherited_parameters)?;
        }
    }

    if run.config.supports_additional_operations {
        if object.contains_key("query") {
            operation::validate_operation(run, url, "query", &path_item.child_property("query"), &inherited_parameters)?;
        }
        if object.contains_key("additionalOperations") {
            let additional_node = path_item.child_property("additionalOperations");
            for key in additional_node.keys()? {
                operation::validate_operation(run, url, &key, &additional_node.child_property(key.as_str()), &inherited_parameters)?;
            }
        }
    }
    Ok(())
}

pub(crate) fn collect_parameter_paths(parameters_node: &SchemaPath) -> Result<Vec<SchemaPath>, OasError> {
    parameters_node.iter_items()
}
