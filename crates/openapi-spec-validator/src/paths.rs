use core::fmt;

/// One segment of a [`JsonPointer`]: either an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathChunk {
    Property(Box<str>),
    Index(usize),
    Keyword(&'static str),
}

impl fmt::Display for PathChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathChunk::Property(name) => write_escaped(f, name),
            PathChunk::Index(index) => write!(f, "{index}"),
            PathChunk::Keyword(keyword) => write_escaped(f, keyword),
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, raw: &str) -> fmt::Result {
    for ch in raw.chars() {
        match ch {
            '~' => f.write_str("~0")?,
            '/' => f.write_str("~1")?,
            _ => f.write_char(ch)?,
        }
    }
    Ok(())
}

/// An absolute JSON Pointer (RFC 6901) from the document root, built up as a
/// [`SchemaPath`](crate::schema_path::SchemaPath) descends into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPointer(Vec<PathChunk>);

impl JsonPointer {
    pub fn root() -> Self {
        JsonPointer(Vec::new())
    }

    #[must_use]
    pub fn child_property(&self, name: impl Into<Box<str>>) -> Self {
        let mut chunks = self.0.clone();
        chunks.push(PathChunk::Property(name.into()));
        JsonPointer(chunks)
    }

    #[must_use]
    pub fn child_index(&self, index: usize) -> Self {
        let mut chunks = self.0.clone();
        chunks.push(PathChunk::Index(index));
        JsonPointer(chunks)
    }

    #[must_use]
    pub fn child_keyword(&self, keyword: &'static str) -> Self {
        let mut chunks = self.0.clone();
        chunks.push(PathChunk::Keyword(keyword));
        JsonPointer(chunks)
    }

    pub fn chunks(&self) -> &[PathChunk] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for chunk in &self.0 {
            f.write_str("/")?;
            chunk.fmt(f)?;
        }
        Ok(())
    }
}

impl From<Vec<PathChunk>> for JsonPointer {
    fn from(chunks: Vec<PathChunk>) -> Self {
        JsonPointer(chunks)
    }
}

/// An absolute URI identifying the resource a [`JsonPointer`] is relative to.
/// Wraps [`url::Url`] the way `jsonschema`'s `AbsolutePath` wraps it, kept as
/// a distinct newtype so the reference cache key (`(AbsoluteUri, JsonPointer)`)
/// reads as a single logical identity rather than a raw tuple of primitives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbsoluteUri(url::Url);

impl AbsoluteUri {
    pub fn new(url: url::Url) -> Self {
        AbsoluteUri(url)
    }

    pub fn as_url(&self) -> &url::Url {
        &self.0
    }
}

impl fmt::Display for AbsoluteUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<url::Url> for AbsoluteUri {
    fn from(url: url::Url) -> Self {
        AbsoluteUri(url)
    }
}
