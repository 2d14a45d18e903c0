//! The reference-resolving document view.
//!
//! `SchemaPath` gives every keyword validator a uniform way to walk the
//! document: move to a child key/index, read the literal value at a node
//! (to detect a `$ref` without following it), or fully resolve a node
//! (following every `$ref` in the chain). Adapted from
//! `jsonschema-referencing`'s `Resolver`/`Resolved` pair, but built around
//! owned `Arc<Value>` documents and `url::Url` rather than borrowed
//! `fluent_uri` references — a self-referential resolver tied to borrowed
//! document lifetimes is considerably more awkward in Rust than the payoff
//! is worth here, so this trades a little cloning for an ordinary,
//! `Clone`-able type.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::OasError;
use crate::paths::{AbsoluteUri, JsonPointer, PathChunk};
use crate::reader::Reader;

type CacheKey = (AbsoluteUri, JsonPointer);

/// Bounded LRU of resolved `(absolute_uri, json_pointer)` lookups. Capacity
/// 0 disables the cache outright rather than panicking, matching
/// `Settings`' "minimum 0, disabled" contract for the cache size.
pub(crate) struct ReferenceCache {
    inner: Option<Mutex<LruCache<CacheKey, Arc<Value>>>>,
}

impl ReferenceCache {
    pub(crate) fn new(capacity: usize) -> Self {
        let inner = NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));
        ReferenceCache { inner }
    }

    fn get(&self, key: &CacheKey) -> Option<Arc<Value>> {
        self.inner.as_ref().and_then(|cache| cache.lock().get(key).cloned())
    }

    fn insert(&self, key: CacheKey, value: Arc<Value>) {
        if let Some(cache) = &self.inner {
            cache.lock().put(key, value);
        }
    }
}

/// Shared state behind every `SchemaPath` produced from the same root:
/// the reference cache and the document fetcher. Read-mostly after
/// warm-up; synchronized so a `SpecValidator` built on top of it can be
/// shared across threads without the caller serializing access itself.
pub(crate) struct ReferenceResolver {
    cache: ReferenceCache,
    reader: Box<dyn Reader>,
    documents: Mutex<std::collections::HashMap<AbsoluteUri, Arc<Value>>>,
}

impl ReferenceResolver {
    pub(crate) fn new(cache_capacity: usize, reader: Box<dyn Reader>) -> Self {
        ReferenceResolver {
            cache: ReferenceCache::new(cache_capacity),
            reader,
            documents: Mutex::new(std::collections::HashMap::new()),
        }
    }

    fn document_for(&self, uri: &AbsoluteUri) -> Result<Arc<Value>, OasError> {
        if let Some(document) = self.documents.lock().get(uri) {
            return Ok(document.clone());
        }
        tracing::trace!(uri = %uri, "fetching external reference target");
        let value = self
            .reader
            .retrieve(uri.as_url())
            .map_err(|source| OasError::reference_unresolvable(JsonPointer::root(), uri.to_string(), Some(Box::new(source))))?;
        let document = Arc::new(value);
        self.documents.lock().insert(uri.clone(), document.clone());
        Ok(document)
    }
}

/// A location within a document, aware of its base URI, capable of
/// following `$ref`. Every operation returns a new handle; nothing is ever
/// mutated in place.
#[derive(Clone)]
pub struct SchemaPath {
    document: Arc<Value>,
    base_uri: AbsoluteUri,
    pointer: JsonPointer,
    resolver: Arc<ReferenceResolver>,
}

impl SchemaPath {
    pub(crate) fn new_root(document: Value, base_uri: AbsoluteUri, cache_capacity: usize, reader: Box<dyn Reader>) -> Self {
        SchemaPath {
            document: Arc::new(document),
            base_uri,
            pointer: JsonPointer::root(),
            resolver: Arc::new(ReferenceResolver::new(cache_capacity, reader)),
        }
    }

    pub fn base_uri(&self) -> &AbsoluteUri {
        &self.base_uri
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }

    #[must_use]
    pub fn child_property(&self, name: impl Into<Box<str>>) -> SchemaPath {
        SchemaPath {
            document: self.document.clone(),
            base_uri: self.base_uri.clone(),
            pointer: self.pointer.child_property(name),
            resolver: self.resolver.clone(),
        }
    }

    #[must_use]
    pub fn child_index(&self, index: usize) -> SchemaPath {
        SchemaPath {
            document: self.document.clone(),
            base_uri: self.base_uri.clone(),
            pointer: self.pointer.child_index(index),
            resolver: self.resolver.clone(),
        }
    }

    /// The literal value at this node, without following a `$ref` present
    /// at it. `None` if the pointer does not resolve within the current
    /// document (a malformed structure the meta-schema pass should already
    /// have reported).
    pub fn read_value(&self) -> Option<&Value> {
        walk(&self.document, &self.pointer)
    }

    /// Whether the literal value at this node is a reference object.
    pub fn is_reference(&self) -> bool {
        matches!(self.read_value(), Some(Value::Object(map)) if map.contains_key("$ref"))
    }

    /// Fully resolved value at this node: follows every `$ref` in the
    /// chain. Cycle-safe within a single resolution chain via a local
    /// visited set; a chain that never bottoms out in a concrete value is
    /// reported as [`OasError::ReferenceUnresolvable`].
    pub fn contents(&self) -> Result<Arc<Value>, OasError> {
        Ok(self.resolved_path()?.1)
    }

    /// Like [`Self::contents`], but also returns the handle the chain
    /// bottomed out at, so callers can keep descending from the resolved
    /// location (e.g. into a resolved parameter's `schema` child) rather
    /// than from the original `$ref` node.
    pub fn resolved_path(&self) -> Result<(SchemaPath, Arc<Value>), OasError> {
        let mut current = self.clone();
        let mut seen_in_chain: HashSet<CacheKey> = HashSet::new();
        loop {
            let key = (current.base_uri.clone(), current.pointer.clone());
            if let Some(cached) = current.resolver.cache.get(&key) {
                tracing::trace!(uri = %current.base_uri, pointer = %current.pointer, "reference cache hit");
                return Ok((current, cached));
            }
            if !seen_in_chain.insert(key.clone()) {
                return Err(OasError::reference_unresolvable(
                    current.pointer.clone(),
                    current.base_uri.to_string(),
                    None,
                ));
            }
            let value = current.read_value().ok_or_else(|| {
                OasError::reference_unresolvable(current.pointer.clone(), current.base_uri.to_string(), None)
            })?;
            let reference = value.as_object().and_then(|object| object.get("$ref")).and_then(Value::as_str);
            let Some(reference) = reference else {
                tracing::trace!(uri = %current.base_uri, pointer = %current.pointer, "reference cache miss");
                let resolved = Arc::new(value.clone());
                current.resolver.cache.insert(key, resolved.clone());
                return Ok((current, resolved));
            };
            current = current.follow_reference(reference)?;
        }
    }

    fn follow_reference(&self, reference: &str) -> Result<SchemaPath, OasError> {
        let (resource, fragment) = split_reference(reference);
        let pointer = fragment_to_pointer(fragment);
        if resource.is_empty() {
            return Ok(SchemaPath {
                document: self.document.clone(),
                base_uri: self.base_uri.clone(),
                pointer,
                resolver: self.resolver.clone(),
            });
        }
        let target_uri = self.base_uri.as_url().join(resource).map_err(|source| {
            OasError::reference_unresolvable(self.pointer.clone(), reference.to_string(), Some(Box::new(source)))
        })?;
        let target_uri = AbsoluteUri::new(target_uri);
        let document = self.resolver.document_for(&target_uri)?;
        Ok(SchemaPath {
            document,
            base_uri: target_uri,
            pointer,
            resolver: self.resolver.clone(),
        })
    }

    /// Resolved object keys, if the resolved value is an object. Empty for
    /// any other JSON type. Every keyword validator that enumerates a map
    /// goes through this rather than destructuring the resolved
    /// `serde_json::Value` itself, so `$ref`s on the map node are followed
    /// uniformly.
    pub fn keys(&self) -> Result<Vec<String>, OasError> {
        Ok(match self.contents()?.as_object() {
            Some(map) => map.keys().cloned().collect(),
            None => Vec::new(),
        })
    }

    /// Child handles for each element of the resolved value, if it is an
    /// array. Empty for any other JSON type. The array-iteration
    /// counterpart to [`Self::keys`].
    pub fn iter_items(&self) -> Result<Vec<SchemaPath>, OasError> {
        let len = self.contents()?.as_array().map_or(0, Vec::len);
        Ok((0..len).map(|index| self.child_index(index)).collect())
    }
}

fn walk<'a>(document: &'a Value, pointer: &JsonPointer) -> Option<&'a Value> {
    let mut current = document;
    for chunk in pointer.chunks() {
        current = match chunk {
            PathChunk::Property(name) => current.get(name.as_ref())?,
            PathChunk::Keyword(name) => current.get(*name)?,
            PathChunk::Index(index) => current.get(*index)?,
        };
    }
    Some(current)
}

fn split_reference(reference: &str) -> (&str, &str) {
    match reference.split_once('#') {
        Some((resource, fragment)) => (resource, fragment),
        None => (reference, ""),
    }
}

fn fragment_to_pointer(fragment: &str) -> JsonPointer {
    let trimmed = fragment.trim_start_matches('/');
    if trimmed.is_empty() {
        return JsonPointer::root();
    }
    let mut pointer = JsonPointer::root();
    for segment in trimmed.split('/') {
        let unescaped = segment.replace("~1", "/").replace("~0", "~");
        pointer = pointer.child_property(unescaped);
    }
    pointer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::DefaultReader;
    use serde_json::json;

    fn root(document: Value) -> SchemaPath {
        SchemaPath::new_root(
            document,
            AbsoluteUri::new(url::Url::parse("urn:test:root").unwrap()),
            128,
            Box::new(DefaultReader),
        )
    }

    #[test]
    fn read_value_does_not_follow_ref() {
        let path = root(json!({"a": {"$ref": "#/b"}, "b": {"type": "string"}}));
        let a = path.child_property("a");
        assert!(a.is_reference());
        assert_eq!(a.read_value().unwrap()["$ref"], "#/b");
    }

    #[test]
    fn contents_follows_same_document_ref() {
        let path = root(json!({"a": {"$ref": "#/b"}, "b": {"type": "string"}}));
        let resolved = path.child_property("a").contents().unwrap();
        assert_eq!(resolved["type"], "string");
    }

    #[test]
    fn contents_detects_self_cycle() {
        let path = root(json!({"a": {"$ref": "#/a"}}));
        let result = path.child_property("a").contents();
        assert!(result.is_err());
    }

    #[test]
    fn contents_passes_through_non_reference_values() {
        let path = root(json!({"type": "object"}));
        let resolved = path.contents().unwrap();
        assert_eq!(resolved["type"], "object");
    }

    #[test]
    fn keys_follows_a_ref_before_enumerating() {
        let path = root(json!({"a": {"$ref": "#/b"}, "b": {"x": 1, "y": 2}}));
        let mut keys = path.child_property("a").keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn keys_is_empty_for_a_non_object() {
        let path = root(json!({"type": "string"}));
        assert!(path.keys().unwrap().is_empty());
    }

    #[test]
    fn iter_items_yields_child_handles_for_each_element() {
        let path = root(json!({"list": ["a", "b", "c"]}));
        let items = path.child_property("list").iter_items().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].pointer().to_string(), "/list/1");
    }

    #[test]
    fn iter_items_is_empty_for_a_non_array() {
        let path = root(json!({"type": "object"}));
        assert!(path.iter_items().unwrap().is_empty());
    }
}
