use std::collections::{HashMap, HashSet};

use crate::error::OasError;
use crate::schema_path::SchemaPath;

use super::Run;

/// Duplicate tag names are rejected on every version. Tag parent/child
/// hierarchies (`parent`, since 3.2) additionally get checked for dangling
/// references and cycles.
pub(crate) fn validate_tags(run: &mut Run<'_>, tags: &SchemaPath) {
    let Some(value) = tags.read_value() else { return };
    let Some(array) = value.as_array() else { return };

    let mut entries: Vec<(String, Option<String>)> = Vec::with_capacity(array.len());
    for (index, entry) in array.iter().enumerate() {
        let Some(name) = entry.get("name").and_then(|v| v.as_str()) else { continue };
        if !run.tag_names_declared.insert(name.to_string()) {
            run.push(OasError::duplicate_tag_name(tags.child_index(index).pointer().clone(), name));
        }
        let parent = entry.get("parent").and_then(|v| v.as_str()).map(str::to_string);
        entries.push((name.to_string(), parent));
    }

    if !run.config.supports_tag_hierarchy {
        return;
    }

    let declared: HashSet<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    for (index, (name, parent)) in entries.iter().enumerate() {
        if let Some(parent) = parent {
            if !declared.contains(parent.as_str()) {
                run.push(OasError::unknown_tag_parent(tags.child_index(index).pointer().clone(), name, parent));
            }
        }
    }

    let parent_of: HashMap<&str, &str> = entries
        .iter()
        .filter_map(|(name, parent)| parent.as_deref().map(|p| (name.as_str(), p)))
        .collect();

    let mut already_reported: HashSet<String> = HashSet::new();
    for (name, _) in &entries {
        if already_reported.contains(name) {
            continue;
        }
        if let Some(cycle) = find_cycle_from(name, &parent_of, &declared) {
            for member in &cycle {
                already_reported.insert(member.clone());
            }
            run.push(OasError::circular_tag_hierarchy(tags.pointer().clone(), cycle));
        }
    }
}

/// Walks `parent` edges starting from `start`; returns the cycle (in
/// declaration order, starting at the node where the walk first repeats) if
/// one is reachable.
fn find_cycle_from(start: &str, parent_of: &HashMap<&str, &str>, declared: &HashSet<&str>) -> Option<Vec<String>> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = start;
    loop {
        if !seen.insert(current) {
            let cycle_start = chain.iter().position(|n| n == current).unwrap();
            let mut cycle: Vec<String> = chain[cycle_start..].to_vec();
            cycle.push(current.to_string());
            return Some(cycle);
        }
        chain.push(current.to_string());
        match parent_of.get(current) {
            Some(&next) if declared.contains(next) => current = next,
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::VersionConfig;
    use super::*;
    use crate::reader::DefaultReader;
    use crate::version::SpecVersion;
    use serde_json::json;

    fn root(document: serde_json::Value) -> SchemaPath {
        SchemaPath::new_root(
            document,
            crate::paths::AbsoluteUri::new(url::Url::parse("urn:test:root").unwrap()),
            128,
            Box::new(DefaultReader),
        )
    }

    #[test]
    fn duplicate_tag_name_is_flagged_on_v30() {
        let document = json!([{"name": "pets"}, {"name": "pets"}]);
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V30);
        let mut run = Run::new(&config);
        validate_tags(&mut run, &path);
        assert_eq!(run.errors.len(), 1);
        assert!(matches!(run.errors[0], OasError::DuplicateTagName { .. }));
    }

    #[test]
    fn unknown_parent_ignored_before_v32() {
        let document = json!([{"name": "pets", "parent": "ghost"}]);
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V30);
        let mut run = Run::new(&config);
        validate_tags(&mut run, &path);
        assert!(run.errors.is_empty());
    }

    #[test]
    fn unknown_parent_flagged_on_v32() {
        let document = json!([{"name": "pets", "parent": "ghost"}]);
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V32);
        let mut run = Run::new(&config);
        validate_tags(&mut run, &path);
        assert_eq!(run.errors.len(), 1);
        assert!(matches!(run.errors[0], OasError::UnknownTagParent { .. }));
    }

    #[test]
    fn cycle_is_detected_on_v32() {
        let document = json!([
            {"name": "a", "parent": "b"},
            {"name": "b", "parent": "c"},
            {"name": "c", "parent": "a"}
        ]);
        let path = root(document);
        let config = VersionConfig::for_version(SpecVersion::V32);
        let mut run = Run::new(&config);
        validate_tags(&mut run, &path);
        assert_eq!(run.errors.iter().filter(|e| matches!(e, OasError::CircularTagHierarchy { .. })).count(), 1);
    }
}
