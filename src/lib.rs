pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::{ListingParams, SiteState};
pub use adapters::{FsContentStore, MemoryContentStore};
pub use config::SiteConfig;
pub use core::frontmatter::FrontMatterParser;
pub use core::router::DomainRouter;
pub use domain::model::{ContentEntry, ContentKind, FieldValue, Metadata, RouteDecision};
pub use domain::ports::ContentStore;
pub use utils::error::{Result, SiteError};
