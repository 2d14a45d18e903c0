//! # openapi-spec-validator
//!
//! Validates OpenAPI/Swagger documents: detects the declared version
//! (2.0, 3.0.x, 3.1.x, 3.2.x), checks the document against the matching
//! meta-schema, and runs the semantic checks a JSON Schema engine cannot
//! express on its own (operationId uniqueness, path-parameter resolution,
//! `$ref` reachability, `allOf`-scoped `required` reachability, tag
//! hierarchies, JSON Schema dialect handling).
//!
//! ```no_run
//! let document: serde_json::Value = serde_json::from_str(r#"{"openapi":"3.0.0","info":{"title":"t","version":"1"},"paths":{}}"#).unwrap();
//! openapi_spec_validator::validate(document, "").unwrap();
//! ```

pub mod dispatcher;
pub mod engine;
pub mod error;
mod keywords;
mod meta_schemas;
pub mod paths;
pub mod reader;
pub mod schema_path;
pub mod settings;
pub mod version;

use std::sync::Arc;

use serde_json::Value;
use url::Url;

pub use dispatcher::SpecValidator;
pub use error::OasError;
pub use paths::{AbsoluteUri, JsonPointer};
pub use reader::{DefaultReader, Reader, ReaderError};
pub use schema_path::SchemaPath;
pub use settings::Settings;
pub use version::{SpecVersion, VersionFinder};

/// Detects which [`SpecVersion`] a document declares, without validating it.
pub fn get_validator_cls(document: &Value) -> Result<SpecVersion, OasError> {
    VersionFinder::find(document)
}

/// Validates `document` (rooted at `base_uri`, used to resolve relative
/// external `$ref`s), raising the first error found. `base_uri` may be
/// empty when the document contains no external references.
pub fn validate(document: Value, base_uri: &str) -> Result<(), OasError> {
    let validator = SpecValidator::new(document, base_uri)?;
    match validator.into_errors().into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Fetches `url` via [`DefaultReader`] and validates the result.
pub fn validate_url(url: &str) -> Result<(), OasError> {
    let parsed = Url::parse(url)
        .map_err(|source| OasError::reference_unresolvable(JsonPointer::root(), url.to_string(), Some(Box::new(source))))?;
    let document = DefaultReader
        .retrieve(&parsed)
        .map_err(|source| OasError::reference_unresolvable(JsonPointer::root(), url.to_string(), Some(Box::new(source))))?;
    validate(document, url)
}

/// Like [`validate`], but resolving external `$ref`s through a
/// caller-supplied [`Reader`] (e.g. one backed by an in-memory fixture set).
pub fn validate_with_reader(document: Value, base_uri: &str, reader: Arc<dyn Reader>) -> Result<(), OasError> {
    let validator = SpecValidator::with_reader(document, base_uri, reader)?;
    match validator.into_errors().into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
