use crate::error::OasError;
use crate::schema_path::SchemaPath;

use super::path;
use super::Run;

/// Iterates the `paths` map; each `(url, pathItem)` is delegated to the
/// `Path` validator.
pub(crate) fn validate_paths(run: &mut Run<'_>, paths: &SchemaPath) -> Result<(), OasError> {
    for url in paths.keys()? {
        if url.starts_with("x-") {
            continue;
        }
        let item = paths.child_property(url.as_str());
        path::validate_path(run, &url, &item)?;
    }
    Ok(())
}
