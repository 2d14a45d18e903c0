use core::fmt;

use crate::paths::JsonPointer;

/// A single validation finding, or a fatal failure that aborted traversal.
///
/// Mirrors the taxonomy a pure JSON Schema check cannot express on its own:
/// most variants are recoverable (traversal continues and more errors may
/// follow); [`OasError::ReferenceUnresolvable`] is fatal and ends the
/// iterator that produced it.
#[derive(Debug)]
pub enum OasError {
    /// A meta-schema (JSON Schema) violation at the document root or any
    /// nested node.
    SchemaError {
        message: String,
        pointer: JsonPointer,
        schema_pointer: Option<JsonPointer>,
        causes: Vec<OasError>,
    },
    /// `required` on a schema under `allOf` names properties that are not
    /// reachable from any sibling subschema.
    ExtraParameters {
        pointer: JsonPointer,
        names: Vec<String>,
    },
    /// Two parameters on the same operation/path-item share `(name, in)`.
    ParameterDuplicate { pointer: JsonPointer, name: String, location: String },
    /// A `{name}` path template segment has no matching declared parameter.
    UnresolvableParameter { pointer: JsonPointer, name: String },
    /// `operationId` repeats a value already seen elsewhere in the document.
    DuplicateOperationID { pointer: JsonPointer, operation_id: String },
    /// Two top-level tags share a `name`.
    DuplicateTagName { pointer: JsonPointer, name: String },
    /// A tag's `parent` does not name a declared top-level tag (V3.2).
    UnknownTagParent {
        pointer: JsonPointer,
        name: String,
        parent: String,
    },
    /// A cycle was found walking tag `parent` edges (V3.2).
    CircularTagHierarchy { pointer: JsonPointer, cycle: Vec<String> },
    /// A schema's effective `$schema` dialect is not one this validator
    /// knows how to check.
    UnknownJsonSchemaDialect { pointer: JsonPointer, dialect: String },
    /// A `$ref` could not be resolved to a value. Fatal: the iterator that
    /// yields this stops producing further errors.
    ReferenceUnresolvable {
        pointer: JsonPointer,
        uri: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// No known `(keyword, major.minor)` matched the document.
    ValidatorDetect { message: String },
}

impl OasError {
    /// True for variants that abort the iterator producing them.
    pub fn is_fatal(&self) -> bool {
        matches!(self, OasError::ReferenceUnresolvable { .. })
    }

    pub(crate) fn schema_error(
        message: impl Into<String>,
        pointer: JsonPointer,
        schema_pointer: Option<JsonPointer>,
        causes: Vec<OasError>,
    ) -> OasError {
        OasError::SchemaError {
            message: message.into(),
            pointer,
            schema_pointer,
            causes,
        }
    }

    pub(crate) fn extra_parameters(pointer: JsonPointer, names: Vec<String>) -> OasError {
        OasError::ExtraParameters { pointer, names }
    }

    pub(crate) fn parameter_duplicate(
        pointer: JsonPointer,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> OasError {
        OasError::ParameterDuplicate {
            pointer,
            name: name.into(),
            location: location.into(),
        }
    }

    pub(crate) fn unresolvable_parameter(pointer: JsonPointer, name: impl Into<String>) -> OasError {
        OasError::UnresolvableParameter {
            pointer,
            name: name.into(),
        }
    }

    pub(crate) fn duplicate_operation_id(pointer: JsonPointer, operation_id: impl Into<String>) -> OasError {
        OasError::DuplicateOperationID {
            pointer,
            operation_id: operation_id.into(),
        }
    }

    pub(crate) fn duplicate_tag_name(pointer: JsonPointer, name: impl Into<String>) -> OasError {
        OasError::DuplicateTagName {
            pointer,
            name: name.into(),
        }
    }

    pub(crate) fn unknown_tag_parent(
        pointer: JsonPointer,
        name: impl Into<String>,
        parent: impl Into<String>,
    ) -> OasError {
        OasError::UnknownTagParent {
            pointer,
            name: name.into(),
            parent: parent.into(),
        }
    }

    pub(crate) fn circular_tag_hierarchy(pointer: JsonPointer, cycle: Vec<String>) -> OasError {
        OasError::CircularTagHierarchy { pointer, cycle }
    }

    pub(crate) fn unknown_json_schema_dialect(pointer: JsonPointer, dialect: impl Into<String>) -> OasError {
        OasError::UnknownJsonSchemaDialect {
            pointer,
            dialect: dialect.into(),
        }
    }

    pub(crate) fn reference_unresolvable(
        pointer: JsonPointer,
        uri: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> OasError {
        OasError::ReferenceUnresolvable {
            pointer,
            uri: uri.into(),
            source,
        }
    }

    pub(crate) fn validator_detect(message: impl Into<String>) -> OasError {
        OasError::ValidatorDetect {
            message: message.into(),
        }
    }
}

impl fmt::Display for OasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OasError::SchemaError { message, pointer, .. } => {
                write!(f, "{message} at '{pointer}'")
            }
            OasError::ExtraParameters { pointer, names } => {
                write!(
                    f,
                    "'{pointer}' requires properties not reachable from any 'allOf' branch: {}",
                    names.join(", ")
                )
            }
            OasError::ParameterDuplicate { pointer, name, location } => {
                write!(f, "Duplicate parameter '{name}' in '{location}' at '{pointer}'")
            }
            OasError::UnresolvableParameter { pointer, name } => {
                write!(f, "Path parameter '{name}' has no matching definition at '{pointer}'")
            }
            OasError::DuplicateOperationID { pointer, operation_id } => {
                write!(f, "operationId '{operation_id}' is not unique, first seen before '{pointer}'")
            }
            OasError::DuplicateTagName { pointer, name } => {
                write!(f, "Tag name '{name}' is declared more than once at '{pointer}'")
            }
            OasError::UnknownTagParent { pointer, name, parent } => {
                write!(f, "Tag '{name}' at '{pointer}' has unknown parent '{parent}'")
            }
            OasError::CircularTagHierarchy { cycle, .. } => {
                write!(f, "Circular tag hierarchy: {}", cycle.join(" -> "))
            }
            OasError::UnknownJsonSchemaDialect { pointer, dialect } => {
                write!(f, "Unknown JSON Schema dialect '{dialect}' at '{pointer}'")
            }
            OasError::ReferenceUnresolvable { pointer, uri, source } => {
                write!(f, "Reference '{uri}' at '{pointer}' could not be resolved")?;
                if let Some(source) = source {
                    write!(f, ": {source}")?;
                }
                Ok(())
            }
            OasError::ValidatorDetect { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for OasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OasError::ReferenceUnresolvable { source, .. } => source.as_ref().map(|s| &**s as _),
            _ => None,
        }
    }
}
