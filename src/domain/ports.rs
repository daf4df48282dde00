use crate::domain::model::ContentEntry;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read-only access to one content collection, keyed by slug.
///
/// `list_all` returns every entry or fails as a whole; implementations never
/// hand back a partial listing.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<ContentEntry>>;

    /// A miss is `Ok(None)`, not an error.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ContentEntry>> {
        let entries = self.list_all().await?;
        Ok(entries.into_iter().find(|entry| entry.slug == slug))
    }
}
