//! User configuration and machine fact resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sync_directives::{Environment, MachineFacts, OsType};
use sync_fs::ConfigStore;

use crate::cli::MachineArgs;
use crate::error::Result;

const APP_DIR: &str = "settings-sync";
const CONFIG_FILE: &str = "config.toml";
const LOCK_FILE: &str = ".settings-sync.lock";

/// Contents of `config.toml` (or `.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Host name matched by `host=` conditions
    pub host_name: Option<String>,
    /// Overrides the compiled-in OS
    pub os: Option<OsType>,
    /// Lock file guarding `apply`; defaults to a hidden file next to the
    /// settings file
    pub lock_file: Option<PathBuf>,
}

impl SyncConfig {
    /// Loads the config file, treating a missing file as defaults.
    ///
    /// Without an explicit path the platform config directory is used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => {
                    tracing::debug!("No platform config directory; using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config = ConfigStore::new().load_or_default(&path)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Builds the facts directives are evaluated against.
    ///
    /// Command-line values win over the config file; the OS falls back to the
    /// one this binary was built for.
    pub fn machine_facts(&self, args: &MachineArgs) -> MachineFacts {
        let os = args.os.or(self.os).unwrap_or_else(OsType::current);
        let host_name = args.host.clone().or_else(|| self.host_name.clone());

        if host_name.is_none() {
            tracing::debug!("No host name configured; host= conditions will not match");
        }

        MachineFacts {
            os,
            host_name,
            environment: Environment::from_process(),
        }
    }

    /// Lock file to hold while rewriting `settings`.
    pub fn lock_path(&self, settings: &Path) -> PathBuf {
        match &self.lock_file {
            Some(path) => path.clone(),
            None => settings.with_file_name(LOCK_FILE),
        }
    }
}

/// `<config dir>/settings-sync/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
