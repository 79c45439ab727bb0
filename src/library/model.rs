use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use uuid::Uuid;

/// Opaque, immutable identifier of a [`Sound`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(Uuid);

impl SoundId {
    /// Allocate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SoundId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SoundId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A sound effect in the library. This is the only persisted entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    pub id: SoundId,
    /// Original filename at import time.
    pub file_name: String,
    /// Raw audio payload. Shared, never copied, once loaded.
    pub file: Arc<[u8]>,
    pub name: String,
    pub category: Option<String>,
    /// Insertion-ordered, no duplicates, no empty entries.
    pub tags: Vec<String>,
    /// Seconds.
    pub duration: f64,
    pub notes: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Sound {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_untagged(&self) -> bool {
        self.tags.is_empty()
    }
}

/// An audio file offered for import, before it becomes a [`Sound`].
#[derive(Debug, Clone)]
pub struct ImportBlob {
    pub file_name: String,
    /// MIME type, e.g. `audio/wav`.
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImportBlob {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_audio(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("audio/")
    }
}

/// Normalize a tag list: trim entries, drop empties and duplicates, keep first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Trim a category label; blank labels mean "no category".
pub fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
