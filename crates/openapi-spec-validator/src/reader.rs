//! Turns an external location into an in-memory [`serde_json::Value`].
//!
//! Two concerns share this module: acquiring the top-level document (a file
//! path, stdin, or a URL) and resolving a `$ref` target reached during
//! traversal. Both accept JSON or YAML and go through the same scheme-gated
//! retrieval logic, mirroring how `jsonschema::DefaultRetriever` resolves
//! `http(s)`/`file` URLs behind the `resolve-http`/`resolve-file` feature
//! flags.

use std::io::Read as _;

use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Failures acquiring a document or a `$ref` target. Sits outside the core
/// [`crate::error::OasError`] taxonomy: it is an I/O boundary concern, not a
/// validation finding, so it uses `thiserror` the way the wider corpus
/// reserves `thiserror` for module-boundary errors.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{path}' does not contain valid JSON or YAML")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unsupported URI scheme '{scheme}' for '{uri}'")]
    UnsupportedScheme { uri: String, scheme: String },
    #[error("`resolve-http` feature is required to resolve '{uri}' over HTTP")]
    HttpFeatureDisabled { uri: String },
    #[error("`resolve-file` feature is required to resolve '{uri}' as a local file")]
    FileFeatureDisabled { uri: String },
    #[cfg(feature = "resolve-http")]
    #[error("HTTP request for '{uri}' failed")]
    Http {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Parses `raw` as JSON first (the common case, and a faster parser), falling
/// back to YAML so `.yaml`/`.yml` documents and JSON-incompatible YAML
/// extensions (anchors, unquoted scalars) both work. The reported error is
/// the YAML one, since it is the more permissive parser and its message is
/// the more useful one when both fail.
fn parse_json_or_yaml(raw: &str, path: &str) -> Result<Value, ReaderError> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }
    serde_yaml::from_str(raw).map_err(|source| ReaderError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Abstracts document/reference acquisition so the core validator never
/// touches I/O directly. Analogous to `jsonschema::Retrieve`, generalized to
/// also read the initial document (file path or stdin), not only `$ref`
/// targets.
pub trait Reader: Send + Sync {
    /// Resolve an absolute URI to its JSON content.
    fn retrieve(&self, uri: &Url) -> Result<Value, ReaderError>;

    /// Read the top-level document from a CLI-style location: a file path,
    /// or `-`/`/-` for stdin. Accepts either JSON or YAML.
    fn read_document(&self, location: &str) -> Result<Value, ReaderError> {
        let raw = if location == "-" || location == "/-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| ReaderError::Io {
                    path: location.to_string(),
                    source,
                })?;
            buffer
        } else {
            std::fs::read_to_string(location).map_err(|source| ReaderError::Io {
                path: location.to_string(),
                source,
            })?
        };
        parse_json_or_yaml(&raw, location)
    }
}

/// The reader used unless a caller supplies their own: resolves `file://`
/// locally and `http(s)://` over a blocking client, each gated behind its
/// Cargo feature, matching `DefaultRetriever`'s scheme dispatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultReader;

impl Reader for DefaultReader {
    fn retrieve(&self, uri: &Url) -> Result<Value, ReaderError> {
        match uri.scheme() {
            "http" | "https" => {
                #[cfg(feature = "resolve-http")]
                {
                    let response = reqwest::blocking::get(uri.as_str()).map_err(|source| ReaderError::Http {
                        uri: uri.to_string(),
                        source,
                    })?;
                    let body = response.text().map_err(|source| ReaderError::Http {
                        uri: uri.to_string(),
                        source,
                    })?;
                    parse_json_or_yaml(&body, uri.as_str())
                }
                #[cfg(not(feature = "resolve-http"))]
                Err(ReaderError::HttpFeatureDisabled { uri: uri.to_string() })
            }
            "file" => {
                #[cfg(feature = "resolve-file")]
                {
                    let path = uri.to_file_path().map_err(|()| ReaderError::Io {
                        path: uri.to_string(),
                        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid file URI"),
                    })?;
                    let body = std::fs::read_to_string(&path).map_err(|source| ReaderError::Io {
                        path: uri.to_string(),
                        source,
                    })?;
                    parse_json_or_yaml(&body, uri.as_str())
                }
                #[cfg(not(feature = "resolve-file"))]
                Err(ReaderError::FileFeatureDisabled { uri: uri.to_string() })
            }
            scheme => Err(ReaderError::UnsupportedScheme {
                uri: uri.to_string(),
                scheme: scheme.to_string(),
            }),
        }
    }
}
