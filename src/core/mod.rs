pub mod frontmatter;
pub mod pages;
pub mod query;
pub mod router;

pub use crate::domain::model::{ContentEntry, ContentKind, Metadata, RouteDecision};
pub use crate::domain::ports::ContentStore;
pub use crate::utils::error::Result;
