//! Semantic keyword validators: one function per OpenAPI construct, walking
//! a [`SchemaPath`] and pushing findings into a shared [`Run`].
//!
//! A dynamic language can model this as a lazily-instantiated registry of
//! validator objects holding a back-reference to the registry so they can
//! call each other by name, resolving cyclic dependencies between validator
//! classes at first use. Rust has no need for that indirection: `Path`,
//! `Operation`, `Parameters`, and `Schema` simply call each other's
//! functions directly, parameterized by the same `VersionConfig` every call
//! already carries in `Run`.

mod components;
mod operation;
mod parameters;
mod path;
mod paths;
mod responses;
mod schema;
mod tags;
mod value_default;

pub(crate) use tags::validate_tags;

use std::collections::HashSet;

use crate::error::OasError;
use crate::paths::{AbsoluteUri, JsonPointer};
use crate::schema_path::SchemaPath;
use crate::version::SpecVersion;

/// Version-dependent behavior a keyword validator consults, bundling what a
/// per-version validator subclass hierarchy would otherwise spread across
/// many types into one plain record that `SpecValidator` builds once per
/// version and every validator function borrows.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VersionConfig {
    pub version: SpecVersion,
    /// Operation keys every path item may declare, beyond `additionalOperations`.
    pub operations: &'static [&'static str],
    /// V3.2 also accepts arbitrary keys under `pathItem.additionalOperations`.
    pub supports_additional_operations: bool,
    /// V2 parameters validate a `default` directly on the parameter object.
    pub parameter_default_check: bool,
    /// V3+ responses nest their schema under `content[*].schema`; V2 uses `schema` directly.
    pub response_uses_content: bool,
    /// V3.1+ schemas may declare/inherit a JSON Schema dialect.
    pub supports_dialect: bool,
    /// V3.2 additionally validates tag `parent`/cycle rules.
    pub supports_tag_hierarchy: bool,
}

impl VersionConfig {
    pub(crate) fn for_version(version: SpecVersion) -> VersionConfig {
        const FIXED_OPERATIONS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];
        match version {
            SpecVersion::V2 => VersionConfig {
                version,
                operations: &FIXED_OPERATIONS,
                supports_additional_operations: false,
                parameter_default_check: true,
                response_uses_content: false,
                supports_dialect: false,
                supports_tag_hierarchy: false,
            },
            SpecVersion::V30 => VersionConfig {
                version,
                operations: &FIXED_OPERATIONS,
                supports_additional_operations: false,
                parameter_default_check: false,
                response_uses_content: true,
                supports_dialect: false,
                supports_tag_hierarchy: false,
            },
            SpecVersion::V31 => VersionConfig {
                version,
                operations: &FIXED_OPERATIONS,
                supports_additional_operations: false,
                parameter_default_check: false,
                response_uses_content: true,
                supports_dialect: true,
                supports_tag_hierarchy: false,
            },
            SpecVersion::V32 => VersionConfig {
                version,
                operations: &FIXED_OPERATIONS,
                supports_additional_operations: true,
                parameter_default_check: false,
                response_uses_content: true,
                supports_dialect: true,
                supports_tag_hierarchy: true,
            },
            _ => unreachable!("SpecVersion is a closed set of four constants"),
        }
    }
}

/// Cross-cutting scratch state for a single `iter_errors` call. Created at
/// the start of a run, discarded at its end, never shared across runs or
/// threads.
pub(crate) struct Run<'a> {
    pub config: &'a VersionConfig,
    pub operation_ids_seen: Vec<String>,
    pub schema_ids_visited: HashSet<(AbsoluteUri, JsonPointer)>,
    pub tag_names_declared: HashSet<String>,
    pub root_dialect: Option<String>,
    pub errors: Vec<OasError>,
}

impl<'a> Run<'a> {
    pub(crate) fn new(config: &'a VersionConfig) -> Self {
        Run {
            config,
            operation_ids_seen: Vec::new(),
            schema_ids_visited: HashSet::new(),
            tag_names_declared: HashSet::new(),
            root_dialect: None,
            errors: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, error: OasError) {
        self.errors.push(error);
    }
}

/// The `Root` keyword validator: `paths` → Paths, `components` (V3+) →
/// Components, `tags` → Tags, plus (V3.1+) establishing the effective root
/// JSON Schema dialect from `jsonSchemaDialect`.
///
/// Returns `Err` only for the fatal [`OasError::ReferenceUnresolvable`]
/// case, at which point the caller stops collecting further errors — every
/// other finding is pushed into `run.errors` and traversal continues.
pub(crate) fn validate_root(run: &mut Run<'_>, path: &SchemaPath) -> Result<(), OasError> {
    if run.config.supports_dialect {
        run.root_dialect = path
            .read_value()
            .and_then(|value| value.get("jsonSchemaDialect"))
            .and_then(|value| value.as_str())
            .map(str::to_string);
    }

    if let Some(value) = path.read_value() {
        if value.get("paths").is_some() {
            paths::validate_paths(run, &path.child_property("paths"))?;
        }
        if run.config.version.major == "3" && value.get("components").is_some() {
            components::validate_components(run, &path.child_property("components"))?;
        }
        if value.get("tags").is_some() {
            tags::validate_tags(run, &path.child_property("tags"));
        }
    }
    Ok(())
}
