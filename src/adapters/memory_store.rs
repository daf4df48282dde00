use crate::domain::model::ContentEntry;
use crate::domain::ports::ContentStore;
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use std::collections::HashSet;

/// Content store over entries that are already parsed.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    entries: Vec<ContentEntry>,
}

impl MemoryContentStore {
    pub fn new(entries: Vec<ContentEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.slug.as_str()) {
                return Err(SiteError::SlugCollision {
                    slug: entry.slug.clone(),
                    first: "memory".to_string(),
                    second: "memory".to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn list_all(&self) -> Result<Vec<ContentEntry>> {
        Ok(self.entries.clone())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ContentEntry>> {
        Ok(self.entries.iter().find(|e| e.slug == slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Metadata;

    fn entry(slug: &str) -> ContentEntry {
        ContentEntry {
            slug: slug.to_string(),
            metadata: Metadata::new(),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn test_memory_store_lookup() {
        let store = MemoryContentStore::new(vec![entry("a"), entry("b")]).unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 2);
        assert_eq!(store.find_by_slug("b").await.unwrap().unwrap().slug, "b");
        assert!(store.find_by_slug("c").await.unwrap().is_none());
    }

    #[test]
    fn test_memory_store_rejects_duplicates() {
        assert!(MemoryContentStore::new(vec![entry("a"), entry("a")]).is_err());
    }
}
