//! Binds a detected (or explicit) [`SpecVersion`] to its meta-schema, draft,
//! and keyword-validator configuration, and drives the two-phase
//! error-producing algorithm: meta-schema errors first, then semantic
//! errors from the `Root` keyword validator. Neither phase gates the other.

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use url::Url;

use crate::engine::CompiledSchema;
use crate::error::OasError;
use crate::keywords::{validate_root, Run, VersionConfig};
use crate::meta_schemas;
use crate::paths::{AbsoluteUri, JsonPointer};
use crate::reader::{DefaultReader, Reader, ReaderError};
use crate::schema_path::SchemaPath;
use crate::settings::Settings;
use crate::version::{SpecVersion, VersionFinder};

/// Adapts a shared `Arc<dyn Reader>` to the owned `Box<dyn Reader>`
/// `SchemaPath::new_root` expects, so a `SpecValidator` can hand out the same
/// reader to every root it builds without giving up ownership of it.
struct ArcReader(Arc<dyn Reader>);

impl Reader for ArcReader {
    fn retrieve(&self, uri: &Url) -> Result<Value, ReaderError> {
        self.0.retrieve(uri)
    }
}

/// A validator bound to one OpenAPI document and one resolved version.
/// `iter_errors` is memoized: the first call runs the full traversal, every
/// later call replays the cached sequence.
pub struct SpecValidator {
    version: SpecVersion,
    document: Value,
    base_uri: AbsoluteUri,
    cache_capacity: usize,
    reader: Arc<dyn Reader>,
    errors: OnceLock<Vec<OasError>>,
}

impl SpecValidator {
    /// Detects the version from the document itself.
    pub fn new(document: Value, base_uri: &str) -> Result<SpecValidator, OasError> {
        let version = VersionFinder::find(&document)?;
        Ok(SpecValidator::build(document, base_uri, version, Arc::new(DefaultReader)))
    }

    /// Bypasses detection, validating `document` as if it declared `version`.
    pub fn for_version(document: Value, base_uri: &str, version: SpecVersion) -> SpecValidator {
        SpecValidator::build(document, base_uri, version, Arc::new(DefaultReader))
    }

    /// Like [`Self::new`], but resolving external `$ref` targets through a
    /// caller-supplied [`Reader`] instead of [`DefaultReader`].
    pub fn with_reader(document: Value, base_uri: &str, reader: Arc<dyn Reader>) -> Result<SpecValidator, OasError> {
        let version = VersionFinder::find(&document)?;
        Ok(SpecValidator::build(document, base_uri, version, reader))
    }

    fn build(document: Value, base_uri: &str, version: SpecVersion, reader: Arc<dyn Reader>) -> SpecValidator {
        let settings = Settings::from_env();
        let base_uri = Url::parse(base_uri).unwrap_or_else(|_| Url::parse("urn:openapi-spec-validator:root").expect("static URI parses"));
        SpecValidator {
            version,
            document,
            base_uri: AbsoluteUri::new(base_uri),
            cache_capacity: settings.resolved_cache_maxsize,
            reader,
            errors: OnceLock::new(),
        }
    }

    pub fn version(&self) -> SpecVersion {
        self.version
    }

    /// Every error produced by this document: meta-schema violations first,
    /// then semantic findings, in traversal order. Computed once.
    pub fn iter_errors(&self) -> &[OasError] {
        self.errors.get_or_init(|| {
            let span = tracing::debug_span!("iter_errors", version = ?self.version);
            let _guard = span.enter();
            compute_errors(&self.document, &self.base_uri, self.version, self.cache_capacity, self.reader.clone())
        })
    }

    pub fn is_valid(&self) -> bool {
        self.iter_errors().is_empty()
    }

    /// The first error, if any.
    pub fn validate(&self) -> Result<(), &OasError> {
        match self.iter_errors().first() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Consumes the validator, returning every error by value. Useful for
    /// callers that only need the errors once and want to avoid borrowing.
    pub fn into_errors(self) -> Vec<OasError> {
        match self.errors.into_inner() {
            Some(errors) => errors,
            None => {
                let span = tracing::debug_span!("iter_errors", version = ?self.version);
                let _guard = span.enter();
                compute_errors(&self.document, &self.base_uri, self.version, self.cache_capacity, self.reader)
            }
        }
    }
}

fn compute_errors(
    document: &Value,
    base_uri: &AbsoluteUri,
    version: SpecVersion,
    cache_capacity: usize,
    reader: Arc<dyn Reader>,
) -> Vec<OasError> {
    let mut errors = Vec::new();

    let (meta_schema, draft) = meta_schemas::for_version(version);
    let compiled = CompiledSchema::compile(meta_schema, draft).expect("embedded meta-schema compiles");
    errors.extend(compiled.iter_errors(document, &JsonPointer::root()));

    let root = SchemaPath::new_root(document.clone(), base_uri.clone(), cache_capacity, Box::new(ArcReader(reader)));
    let config = VersionConfig::for_version(version);
    let mut run = Run::new(&config);
    if let Err(fatal) = validate_root(&mut run, &root) {
        run.push(fatal);
    }
    errors.extend(run.errors);
    errors
}
