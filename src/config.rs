use crate::cli::Cli;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_PROTECTED_LABEL: &str = "Default";
pub const UNKNOWN_LABEL: &str = "Unknown";
const STORE_FILE: &str = "profiles.toml";
const LOG_FILE: &str = "gitswitch.log";

/// What the session does after a successful switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchPolicy {
    #[default]
    ReturnHome,
    Exit,
}

/// Session configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_path: PathBuf,
    pub protected_label: String,
    pub unknown_label: String,
    pub switch_policy: SwitchPolicy,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let store_path = match &cli.store {
            Some(path) => path.clone(),
            None => Self::default_store_path()?,
        };

        Ok(Self {
            store_path,
            protected_label: cli.protected_label.clone(),
            unknown_label: UNKNOWN_LABEL.to_string(),
            switch_policy: if cli.exit_on_switch {
                SwitchPolicy::Exit
            } else {
                SwitchPolicy::ReturnHome
            },
        })
    }

    /// `~/.config/gitswitch/profiles.toml` on Linux
    pub fn default_store_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("gitswitch").join(STORE_FILE))
    }

    /// The log file sits next to the profile store.
    pub fn log_path(&self) -> PathBuf {
        self.store_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(|parent| parent.join(LOG_FILE))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE))
    }
}

#[cfg(test)]
impl Settings {
    pub fn for_store(store_path: PathBuf) -> Self {
        Self {
            store_path,
            protected_label: DEFAULT_PROTECTED_LABEL.to_string(),
            unknown_label: UNKNOWN_LABEL.to_string(),
            switch_policy: SwitchPolicy::ReturnHome,
        }
    }
}
