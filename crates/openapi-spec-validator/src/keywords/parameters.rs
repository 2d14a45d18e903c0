use std::collections::HashSet;

use crate::error::OasError;
use crate::schema_path::SchemaPath;

use super::schema;
use super::value_default;
use super::Run;

/// Tracks `(name, in)` pairs across a `parameters` array; duplicates yield
/// `ParameterDuplicate`. Each entry is delegated to `Parameter`.
pub(crate) fn validate_parameters(run: &mut Run<'_>, parameters: &SchemaPath, location: &str) -> Result<(), OasError> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    for entry in parameters.iter_items()? {
        let (_, resolved) = entry.resolved_path()?;
        let name = resolved.get("name").and_then(|v| v.as_str());
        let in_ = resolved.get("in").and_then(|v| v.as_str());
        if let (Some(name), Some(in_)) = (name, in_) {
            if !seen.insert((name.to_string(), in_.to_string())) {
                run.push(OasError::parameter_duplicate(entry.pointer().clone(), name, location));
            }
        }
        validate_parameter(run, &entry)?;
    }
    Ok(())
}

/// If `schema` is present, delegates to `Schema`. For V2 only, a non-null
/// `default` anywhere on the parameter is validated against the whole
/// parameter object: V2's `default` is not confined to `schema` the way it
/// is in V3+.
pub(crate) fn validate_parameter(run: &mut Run<'_>, parameter: &SchemaPath) -> Result<(), OasError> {
    let (resolved_path, resolved_value) = parameter.resolved_path()?;
    if resolved_value.get("schema").is_some() {
        schema::validate_schema(run, &resolved_path.child_property("schema"), true)?;
    }

    if run.config.parameter_default_check {
        if let Some(default) = resolved_value.get("default") {
            if !default.is_null() {
                value_default::validate_value(run, &resolved_path, default);
            }
        }
    }
    Ok(())
}
