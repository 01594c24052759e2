//! Challenge repository implementations

mod manifest;
mod memory;

pub use manifest::{
    identity_from_path, is_status_path, parse_manifest, ManifestDocument, ManifestMetadata,
    ManifestRepository, API_VERSION, KIND,
};
pub use memory::MemoryChallengeRepository;
