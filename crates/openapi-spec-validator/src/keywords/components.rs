use crate::error::OasError;
use crate::schema_path::SchemaPath;

use super::schema;
use super::Run;

/// If `components.schemas` is present, iterates it and delegates each entry
/// to `Schema`.
pub(crate) fn validate_components(run: &mut Run<'_>, components: &SchemaPath) -> Result<(), OasError> {
    let Some(value) = components.read_value() else { return Ok(()) };
    if value.get("schemas").is_none() {
        return Ok(());
    }
    let schemas_node = components.child_property("schemas");
    for name in schemas_node.keys()? {
        schema::validate_schema(run, &schemas_node.child_property(name.as_str()), true)?;
    }
    Ok(())
}
