use crate::error::OasError;
use crate::schema_path::SchemaPath;

use super::schema;
use super::Run;

/// Iterates a `responses` map, delegating each entry to `Response`.
pub(crate) fn validate_responses(run: &mut Run<'_>, responses: &SchemaPath) -> Result<(), OasError> {
    for status in responses.keys()? {
        if status.starts_with("x-") {
            continue;
        }
        validate_response(run, &responses.child_property(status.as_str()))?;
    }
    Ok(())
}

/// V2: the response's `schema` goes straight to `Schema`. V3+: every media
/// type under `content` has its `schema` delegated.
pub(crate) fn validate_response(run: &mut Run<'_>, response: &SchemaPath) -> Result<(), OasError> {
    let (resolved_path, resolved_value) = response.resolved_path()?;

    if run.config.response_uses_content {
        if resolved_value.get("content").is_some() {
            let content_node = resolved_path.child_property("content");
            for media_type in content_node.keys()? {
                validate_media_type(run, &content_node.child_property(media_type.as_str()))?;
            }
        }
    } else if resolved_value.get("schema").is_some() {
        schema::validate_schema(run, &resolved_path.child_property("schema"), true)?;
    }
    Ok(())
}

fn validate_media_type(run: &mut Run<'_>, media_type: &SchemaPath) -> Result<(), OasError> {
    let Some(value) = media_type.read_value() else { return Ok(()) };
    if value.get("schema").is_some() {
        schema::validate_schema(run, &media_type.child_property("schema"), true)?;
    }
    Ok(())
}
