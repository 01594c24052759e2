//! Manifest Repository
//!
//! Challenges are YAML manifests in a directory, one per file:
//!
//! ```yaml
//! apiVersion: tower-operator.dev/v1
//! kind: TowerChallenge
//! metadata:
//!   name: demo
//! spec:
//!   discs: 3
//! ```
//!
//! `demo.yaml` (or `demo.yml`) holds the spec; the reconciler writes status to
//! `demo.status.json` beside it, always as a whole document.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ChallengeSpec, ChallengeStatus, TowerChallenge};
use crate::domain::ports::{ChallengeRepository, RepositoryError, RepositoryResult};
use crate::domain::value_objects::ParentIdentity;
use crate::infrastructure::fs::atomic_write;

pub const API_VERSION: &str = "tower-operator.dev/v1";
pub const KIND: &str = "TowerChallenge";

const STATUS_SUFFIX: &str = ".status.json";
const MANIFEST_EXTS: [&str; 2] = ["yaml", "yml"];

/// On-disk manifest document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    pub api_version: String,
    pub kind: String,
    pub metadata: ManifestMetadata,
    pub spec: ChallengeSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,
}

impl ManifestDocument {
    pub fn new(name: &str, discs: i64) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: name.to_string(),
            },
            spec: ChallengeSpec { discs },
        }
    }
}

/// Parse a manifest document and check its kind
pub fn parse_manifest(content: &str) -> Result<ManifestDocument, String> {
    let doc: ManifestDocument = serde_yaml_ng::from_str(content).map_err(|e| e.to_string())?;
    if doc.kind != KIND {
        return Err(format!("expected kind '{}', found '{}'", KIND, doc.kind));
    }
    Ok(doc)
}

/// Whether `path` is a status document written by this repository
pub fn is_status_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(STATUS_SUFFIX))
        .unwrap_or(false)
}

/// Identity named by a manifest file path, if it is one
pub fn identity_from_path(path: &Path) -> Option<ParentIdentity> {
    let ext = path.extension()?.to_str()?;
    if !MANIFEST_EXTS.contains(&ext) {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

pub struct ManifestRepository {
    dir: PathBuf,
}

impl ManifestRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest_path(&self, identity: &ParentIdentity) -> Option<PathBuf> {
        MANIFEST_EXTS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", identity, ext)))
            .find(|p| p.exists())
    }

    fn status_path(&self, identity: &ParentIdentity) -> PathBuf {
        self.dir.join(format!("{}{}", identity, STATUS_SUFFIX))
    }

    /// Last written status, if any
    pub fn read_status(&self, identity: &ParentIdentity) -> RepositoryResult<Option<ChallengeStatus>> {
        let path = self.status_path(identity);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepositoryError::Io(e.to_string())),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| RepositoryError::InvalidManifest {
                name: identity.to_string(),
                message: format!("status document: {}", e),
            })
    }

    /// Write a new manifest
    pub fn write_manifest(&self, identity: &ParentIdentity, discs: i64) -> RepositoryResult<PathBuf> {
        let doc = ManifestDocument::new(identity.as_str(), discs);
        let content = serde_yaml_ng::to_string(&doc).map_err(|e| RepositoryError::Io(e.to_string()))?;
        let path = self.dir.join(format!("{}.yaml", identity));
        atomic_write(&path, content.as_bytes()).map_err(|e| RepositoryError::Io(e.to_string()))?;
        Ok(path)
    }
}

impl ChallengeRepository for ManifestRepository {
    fn list(&self) -> RepositoryResult<Vec<ParentIdentity>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::Io(e.to_string())),
        };

        let mut identities = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RepositoryError::Io(e.to_string()))?;
            if let Some(identity) = identity_from_path(&entry.path()) {
                identities.push(identity);
            }
        }
        identities.sort();
        identities.dedup();
        Ok(identities)
    }

    fn get(&self, identity: &ParentIdentity) -> RepositoryResult<TowerChallenge> {
        let path = self
            .manifest_path(identity)
            .ok_or_else(|| RepositoryError::NotFound(identity.to_string()))?;

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(identity.to_string()))
            }
            Err(e) => return Err(RepositoryError::Io(e.to_string())),
        };

        let doc = parse_manifest(&content).map_err(|message| RepositoryError::InvalidManifest {
            name: identity.to_string(),
            message,
        })?;
        if doc.metadata.name != identity.as_str() {
            return Err(RepositoryError::InvalidManifest {
                name: identity.to_string(),
                message: format!(
                    "metadata.name '{}' does not match file name",
                    doc.metadata.name
                ),
            });
        }

        let status = self.read_status(identity)?.unwrap_or_default();
        Ok(TowerChallenge::new(identity.clone(), doc.spec.discs).with_status(status))
    }

    fn update_status(
        &self,
        identity: &ParentIdentity,
        status: &ChallengeStatus,
    ) -> RepositoryResult<()> {
        if self.manifest_path(identity).is_none() {
            return Err(RepositoryError::NotFound(identity.to_string()));
        }
        let content =
            serde_json::to_string_pretty(status).map_err(|e| RepositoryError::Io(e.to_string()))?;
        atomic_write(&self.status_path(identity), content.as_bytes())
            .map_err(|e| RepositoryError::Io(e.to_string()))
    }
}
