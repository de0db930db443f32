use crate::git::{self, Identity, IdentityStore};
use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not load profiles from {}: {reason}", .path.display())]
    NotFound { path: PathBuf, reason: String },
    #[error("Could not save profiles to {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: Vec<Profile>,
}

/// The saved profile list, kept as a TOML file of `[[profiles]]` tables.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Profile>, StoreError> {
        let not_found = |reason: String| StoreError::NotFound {
            path: self.path.clone(),
            reason,
        };

        let content = fs::read_to_string(&self.path).map_err(|e| not_found(e.to_string()))?;
        let file: ProfileFile = toml::from_str(&content).map_err(|e| not_found(e.to_string()))?;
        Ok(file.profiles)
    }

    /// Write the whole list, replacing the file.
    pub fn save(&self, profiles: &[Profile]) -> Result<(), StoreError> {
        let write_err = |reason: String| StoreError::Write {
            path: self.path.clone(),
            reason,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
            }
        }

        let file = ProfileFile {
            profiles: profiles.to_vec(),
        };
        let content = toml::to_string_pretty(&file).map_err(|e| write_err(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| write_err(e.to_string()))
    }
}

/// Load the saved list, or seed it with the protected default profile built
/// from the current Git identity.
pub fn bootstrap(
    store: &ProfileStore,
    identity_store: &dyn IdentityStore,
    protected_label: &str,
) -> Vec<Profile> {
    match store.load() {
        Ok(profiles) => {
            tracing::info!(count = profiles.len(), path = %store.path().display(), "loaded profiles");
            profiles
        }
        Err(e) => {
            tracing::info!(error = %e, "seeding profile store");
            let identity = git::detect_identity(identity_store);
            let profiles = vec![Profile::new(
                protected_label.to_string(),
                identity.name,
                identity.email,
            )];
            if let Err(e) = store.save(&profiles) {
                tracing::warn!(error = %e, "failed to save seeded profiles");
            }
            profiles
        }
    }
}

/// The saved profile matching `identity` exactly, or an unsaved placeholder
/// labeled `unknown_label`.
pub fn detect_active(profiles: &[Profile], identity: &Identity, unknown_label: &str) -> Profile {
    profiles
        .iter()
        .find(|p| p.name == identity.name && p.email == identity.email)
        .cloned()
        .unwrap_or_else(|| {
            Profile::new(
                unknown_label.to_string(),
                identity.name.clone(),
                identity.email.clone(),
            )
        })
}
