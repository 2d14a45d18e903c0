//! Thin adapter over a real JSON Schema engine.
//!
//! `JsonSchemaEngine` is the pluggable-backend seam this crate validates
//! through: meta-schema validation and default-value checking both reduce to
//! "validate this JSON value against this JSON Schema, draft X". Rather than
//! reimplement a JSON Schema engine, this crate depends on the real published
//! `jsonschema` crate and adapts its `Validator`/`iter_errors` API, the same
//! API `ScriptSmith-hadrian`'s response-validation feature calls directly
//! (`jsonschema::draft202012::new(&schema)`, `validator.iter_errors(&value)`).

use serde_json::Value;

use crate::error::OasError;
use crate::paths::JsonPointer;

/// Which JSON Schema draft a meta-schema or dialect is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonSchemaDraft {
    Draft4,
    Draft202012,
}

/// A compiled validator for one draft, able to check a value and report
/// every violation (not just the first).
pub struct CompiledSchema {
    draft: JsonSchemaDraft,
    validator: jsonschema::Validator,
}

impl CompiledSchema {
    pub fn compile(schema: &Value, draft: JsonSchemaDraft) -> Result<CompiledSchema, OasError> {
        let validator = match draft {
            JsonSchemaDraft::Draft4 => jsonschema::draft4::new(schema),
            JsonSchemaDraft::Draft202012 => jsonschema::draft202012::new(schema),
        }
        .map_err(|error| OasError::schema_error(format!("invalid meta-schema: {error}"), JsonPointer::root(), None, Vec::new()))?;
        Ok(CompiledSchema { draft, validator })
    }

    pub fn draft(&self) -> JsonSchemaDraft {
        self.draft
    }

    /// Every violation of `value` against this schema, each wrapped as an
    /// [`OasError::SchemaError`] rooted at `at`.
    pub fn iter_errors(&self, value: &Value, at: &JsonPointer) -> Vec<OasError> {
        self.validator
            .iter_errors(value)
            .map(|error| {
                let mut pointer = at.clone();
                for segment in error.instance_path.to_string().split('/').filter(|s| !s.is_empty()) {
                    pointer = pointer.child_property(segment.to_string());
                }
                OasError::schema_error(error.to_string(), pointer, None, Vec::new())
            })
            .collect()
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.is_valid(value)
    }
}
