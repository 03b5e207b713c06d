use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// A stable document identifier derived from (source_folder, relative_path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentId {
    /// The numeric ID used as the key in redb tables.
    pub numeric: u64,
    /// The short hex string for human display (e.g. "a1b2c3").
    pub short: String,
}

impl DocumentId {
    /// Generate a stable document ID from source folder and relative path.
    pub fn new(source: &str, relative_path: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        relative_path.hash(&mut hasher);
        let numeric = hasher.finish();

        Self {
            numeric,
            short: format!("{numeric:016x}")[..6].to_string(),
        }
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.short)
    }
}

/// A stable fingerprint of document content, used to decide whether a
/// stored document needs re-embedding.
pub fn content_fingerprint(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = DocumentId::new("news", "article.txt");
        let b = DocumentId::new("news", "article.txt");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = DocumentId::new("news", "article.txt");
        let b = DocumentId::new("news", "other.txt");
        assert_ne!(a.numeric, b.numeric);
    }

    #[test]
    fn display_has_hash_prefix() {
        let id = DocumentId::new("news", "article.txt");
        let s = id.to_string();
        assert!(s.starts_with('#'));
        assert_eq!(s.len(), 7); // # + 6 hex chars
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = content_fingerprint("body text");
        let b = content_fingerprint("body text");
        let c = content_fingerprint("body text edited");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
