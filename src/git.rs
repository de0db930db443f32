use std::process::Command;
use thiserror::Error;

pub const NAME_KEY: &str = "user.name";
pub const EMAIL_KEY: &str = "user.email";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("git config {0} is not set")]
    NotConfigured(String),
    #[error("could not set {}", .0.join(" and "))]
    ApplyFailed(Vec<String>),
}

/// Read and write access to the live Git identity.
pub trait IdentityStore {
    fn get(&self, key: &str) -> Result<String, IdentityError>;
    fn set(&self, key: &str, value: &str) -> Result<(), IdentityError>;
}

/// Git identity as read from the global config. Missing values are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// `git config --global`, one process per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitConfig;

impl IdentityStore for GitConfig {
    fn get(&self, key: &str) -> Result<String, IdentityError> {
        let output = Command::new("git")
            .args(["config", "--global", "--get", key])
            .output()
            .map_err(|e| {
                tracing::debug!(key, error = %e, "failed to execute git config");
                IdentityError::NotConfigured(key.to_string())
            })?;

        if !output.status.success() {
            return Err(IdentityError::NotConfigured(key.to_string()));
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() {
            return Err(IdentityError::NotConfigured(key.to_string()));
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), IdentityError> {
        let status = Command::new("git")
            .args(["config", "--global", key, value])
            .status()
            .map_err(|e| {
                tracing::warn!(key, error = %e, "failed to execute git config");
                IdentityError::ApplyFailed(vec![key.to_string()])
            })?;

        if !status.success() {
            return Err(IdentityError::ApplyFailed(vec![key.to_string()]));
        }
        Ok(())
    }
}

/// Read the current identity, treating anything unset as empty.
pub fn detect_identity(store: &dyn IdentityStore) -> Identity {
    let read = |key: &str| {
        store.get(key).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "identity value unavailable");
            String::new()
        })
    };
    Identity {
        name: read(NAME_KEY),
        email: read(EMAIL_KEY),
    }
}

/// Set name and email. Both are attempted even if the first fails; nothing
/// is rolled back.
pub fn apply_identity(
    store: &dyn IdentityStore,
    name: &str,
    email: &str,
) -> Result<(), IdentityError> {
    let mut failed = Vec::new();
    for (key, value) in [(NAME_KEY, name), (EMAIL_KEY, email)] {
        if let Err(e) = store.set(key, value) {
            tracing::warn!(key, error = %e, "failed to apply identity field");
            failed.push(key.to_string());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(IdentityError::ApplyFailed(failed))
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory identity store that records every `set` call.
    #[derive(Debug, Default)]
    pub struct FakeIdentity {
        pub values: RefCell<HashMap<String, String>>,
        pub sets: RefCell<Vec<(String, String)>>,
        pub failing_keys: Vec<String>,
    }

    impl FakeIdentity {
        pub fn with(name: &str, email: &str) -> Self {
            let fake = Self::default();
            fake.values
                .borrow_mut()
                .insert(NAME_KEY.to_string(), name.to_string());
            fake.values
                .borrow_mut()
                .insert(EMAIL_KEY.to_string(), email.to_string());
            fake
        }
    }

    impl IdentityStore for FakeIdentity {
        fn get(&self, key: &str) -> Result<String, IdentityError> {
            self.values
                .borrow()
                .get(key)
                .cloned()
                .ok_or_else(|| IdentityError::NotConfigured(key.to_string()))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), IdentityError> {
            self.sets
                .borrow_mut()
                .push((key.to_string(), value.to_string()));
            if self.failing_keys.iter().any(|k| k == key) {
                return Err(IdentityError::ApplyFailed(vec![key.to_string()]));
            }
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}
