use serde_json::Value;

use crate::engine::{CompiledSchema, JsonSchemaDraft};
use crate::schema_path::SchemaPath;

use super::Run;

/// Validates a literal value (a `default`) against the schema at
/// `schema_path`. Compilation failures and reference failures are swallowed
/// here rather than propagated: a malformed default-value check must never
/// abort the rest of the run the way an unresolvable `$ref` does.
pub(crate) fn validate_value(run: &mut Run<'_>, schema_path: &SchemaPath, value: &Value) {
    let Ok((_, schema_value)) = schema_path.resolved_path() else { return };

    let draft = if run.config.supports_dialect {
        JsonSchemaDraft::Draft202012
    } else {
        JsonSchemaDraft::Draft4
    };

    let Ok(compiled) = CompiledSchema::compile(&schema_value, draft) else { return };
    for error in compiled.iter_errors(value, schema_path.pointer()) {
        run.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::super::VersionConfig;
    use super::*;
    use crate::reader::DefaultReader;
    use crate::version::SpecVersion;
    use serde_json::json;

    fn root(document: Value) -> SchemaPath {
        SchemaPath::new_root(
            document,
            crate::paths::AbsoluteUri::new(url::Url::parse("urn:test:root").unwrap()),
            128,
            Box::new(DefaultReader),
        )
    }

    #[test]
    fn mismatched_default_reports_an_error() {
        let path = root(json!({"type": "integer"}));
        let config = VersionConfig::for_version(SpecVersion::V30);
        let mut run = Run::new(&config);
        validate_value(&mut run, &path, &json!("not-an-integer"));
        assert_eq!(run.errors.len(), 1);
    }

    #[test]
    fn matching_default_reports_nothing() {
        let path = root(json!({"type": "integer"}));
        let config = VersionConfig::for_version(SpecVersion::V30);
        let mut run = Run::new(&config);
        validate_value(&mut run, &path, &json!(5));
        assert!(run.errors.is_empty());
    }
}
