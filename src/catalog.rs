// Predefined question/answer pairs, loaded once at startup and read-only afterwards.

use anyhow::{Context, Result};
use std::{collections::HashMap, path::Path};
use tracing::{info, warn};

/// Lower-cases and trims a query so it can be compared against catalog keys.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

#[derive(Debug, Default, Clone)]
pub struct ResponseCatalog {
    entries: HashMap<String, String>,
}

impl ResponseCatalog {
    /// Builds a catalog from raw pairs. Keys are normalized; on a collision the first entry wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut entries = HashMap::new();
        for (key, reply) in pairs {
            let key = normalize_query(key.as_ref());
            if entries.contains_key(&key) {
                warn!(%key, "Duplicate catalog key after normalization, keeping the first entry");
                continue;
            }
            entries.insert(key, reply.into());
        }
        Self { entries }
    }

    /// Parses a flat JSON object of `query -> reply`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        // Keep document order so "first entry wins" is well defined.
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).context("Catalog must be a JSON object")?;
        let mut pairs = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            match value {
                serde_json::Value::String(reply) => pairs.push((key, reply)),
                other => anyhow::bail!("Catalog entry '{}' is not a string: {}", key, other),
            }
        }
        Ok(Self::from_pairs(pairs))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let catalog = Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
        info!(entries = catalog.len(), path = %path.display(), "Loaded response catalog");
        Ok(catalog)
    }

    /// Looks up an already-normalized key. A miss is not an error.
    pub fn lookup(&self, normalized_key: &str) -> Option<&str> {
        self.entries.get(normalized_key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  What Is A Resume?  "), "what is a resume?");
        assert_eq!(normalize_query("\t\n"), "");
    }

    #[test]
    fn test_from_json_normalizes_keys() {
        let catalog = ResponseCatalog::from_json_str(
            r#"{"How do I apply? ": "Use the portal.", "resume tips": "Keep it to one page."}"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("how do i apply?"), Some("Use the portal."));
        assert_eq!(catalog.lookup("resume tips"), Some("Keep it to one page."));
        assert_eq!(catalog.lookup("Resume tips"), None);
    }

    #[test]
    fn test_first_entry_wins_on_collision() {
        let catalog = ResponseCatalog::from_pairs([("Mock Test", "first"), ("mock test", "second")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("mock test"), Some("first"));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(ResponseCatalog::from_json_str("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_rejects_non_string_reply() {
        let err = ResponseCatalog::from_json_str(r#"{"q": 42}"#).unwrap_err();
        assert!(err.to_string().contains("not a string"));
    }

    #[test]
    fn test_miss_is_none() {
        let catalog = ResponseCatalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.lookup("anything"), None);
    }
}
