// Adapters layer: concrete content stores and the HTTP front end.

pub mod fs_store;
pub mod http;
pub mod memory_store;

pub use fs_store::FsContentStore;
pub use memory_store::MemoryContentStore;
