use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::OasError;

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)(\..*)?$").expect("valid regex"));

/// A version marker `(keyword, major, minor)`: equality is by all three
/// fields, and the document's patch component (if any) is ignored once
/// major/minor match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecVersion {
    pub keyword: &'static str,
    pub major: &'static str,
    pub minor: &'static str,
}

impl SpecVersion {
    pub const V2: SpecVersion = SpecVersion {
        keyword: "swagger",
        major: "2",
        minor: "0",
    };
    pub const V30: SpecVersion = SpecVersion {
        keyword: "openapi",
        major: "3",
        minor: "0",
    };
    pub const V31: SpecVersion = SpecVersion {
        keyword: "openapi",
        major: "3",
        minor: "1",
    };
    pub const V32: SpecVersion = SpecVersion {
        keyword: "openapi",
        major: "3",
        minor: "2",
    };
}

impl core::fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "OpenAPIV{}.{}", self.major, self.minor)
    }
}

/// Declaration order determines tie-breaking: newer versions are tried
/// first so that, e.g., a `3.2.x` document is never mistaken for `3.1`.
const VERSIONS: [SpecVersion; 4] = [SpecVersion::V32, SpecVersion::V31, SpecVersion::V30, SpecVersion::V2];

/// Inspects a document root and yields the [`SpecVersion`] it declares.
pub struct VersionFinder;

impl VersionFinder {
    pub fn find(document: &Value) -> Result<SpecVersion, OasError> {
        let Some(root) = document.as_object() else {
            return Err(OasError::validator_detect(
                "Document root is not a JSON object; cannot determine its OpenAPI version",
            ));
        };
        for version in VERSIONS {
            let Some(declared) = root.get(version.keyword).and_then(Value::as_str) else {
                continue;
            };
            let Some(captures) = VERSION_PATTERN.captures(declared) else {
                continue;
            };
            if &captures[1] == version.major && &captures[2] == version.minor {
                return Ok(version);
            }
        }
        Err(OasError::validator_detect(format!(
            "Unable to determine the OpenAPI version from the document's '{}'/'{}' field",
            SpecVersion::V2.keyword,
            SpecVersion::V30.keyword,
        )))
    }
}
