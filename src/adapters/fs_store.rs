use crate::config::toml_config::ContentSource;
use crate::core::frontmatter::FrontMatterParser;
use crate::domain::model::{ContentEntry, ContentKind};
use crate::domain::ports::ContentStore;
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Content store backed by one directory of content files.
///
/// Nothing is cached: every call re-reads and re-parses the directory.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    directory: PathBuf,
    extensions: Vec<String>,
    parser: FrontMatterParser,
}

impl FsContentStore {
    pub fn new(directory: impl Into<PathBuf>, extensions: Vec<String>, parser: FrontMatterParser) -> Self {
        Self {
            directory: directory.into(),
            extensions,
            parser,
        }
    }

    pub fn from_source(kind: ContentKind, directory: impl Into<PathBuf>, source: &ContentSource) -> Self {
        Self::new(
            directory,
            source.extensions.clone(),
            FrontMatterParser::new(source.boolean_fields_for(kind)),
        )
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|allowed| allowed == ext))
            .unwrap_or(false)
    }

    /// 依檔名排序，讓列舉順序與檔案系統無關
    async fn content_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.directory).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && self.matches_extension(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn list_all(&self) -> Result<Vec<ContentEntry>> {
        let files = self.content_files().await?;
        tracing::debug!(
            "Scanning {} content files in {}",
            files.len(),
            self.directory.display()
        );

        let mut entries = Vec::with_capacity(files.len());
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for path in files {
            let raw = tokio::fs::read_to_string(&path).await?;
            let entry = self.parser.parse_entry(&path, &raw).map_err(|e| {
                tracing::error!("❌ Failed to parse {}: {}", path.display(), e);
                e
            })?;

            if let Some(first) = seen.get(&entry.slug) {
                return Err(SiteError::SlugCollision {
                    slug: entry.slug.clone(),
                    first: first.display().to_string(),
                    second: path.display().to_string(),
                });
            }
            seen.insert(entry.slug.clone(), path);
            entries.push(entry);
        }

        Ok(entries)
    }
}
