pub mod metadata;
pub mod registry;

pub use registry::{MetadataRegistry, METADATA_REGISTRY};
