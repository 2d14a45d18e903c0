//! Embedded OpenAPI meta-schemas, one per supported [`SpecVersion`].
//!
//! Loaded once, process-wide, via `include_bytes!` + `once_cell::Lazy`, the
//! same pattern `jsonschema-referencing::meta` uses to embed the JSON Schema
//! draft meta-schemas it ships.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::engine::JsonSchemaDraft;
use crate::version::SpecVersion;

macro_rules! schema {
    ($name:ident, $path:expr) => {
        static $name: Lazy<Value> = Lazy::new(|| serde_json::from_slice(include_bytes!($path)).expect("embedded meta-schema is valid JSON"));
    };
}

schema!(V2_0, "v2_0.json");
schema!(V3_0, "v3_0.json");
schema!(V3_1, "v3_1.json");
schema!(V3_2, "v3_2.json");

/// The meta-schema and checking draft bound to a [`SpecVersion`].
pub fn for_version(version: SpecVersion) -> (&'static Value, JsonSchemaDraft) {
    match version {
        SpecVersion::V2 => (&V2_0, JsonSchemaDraft::Draft4),
        SpecVersion::V30 => (&V3_0, JsonSchemaDraft::Draft4),
        SpecVersion::V31 => (&V3_1, JsonSchemaDraft::Draft202012),
        SpecVersion::V32 => (&V3_2, JsonSchemaDraft::Draft202012),
        _ => unreachable!("SpecVersion is a closed set of four constants"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_meta_schema_parses() {
        assert!(V2_0.is_object());
        assert!(V3_0.is_object());
        assert!(V3_1.is_object());
        assert!(V3_2.is_object());
    }
}
