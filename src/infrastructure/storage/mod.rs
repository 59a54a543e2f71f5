mod filesystem;
mod in_memory;
mod layout;

pub use filesystem::FsDocumentRepository;
pub use in_memory::InMemoryDocumentRepository;
pub use layout::{StorageLayout, SIDECAR_SUFFIX, STAGING_GRACE};
