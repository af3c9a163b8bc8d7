//! Configuration loading and path resolution.
//!
//! Supports HOSTPILOT_HOME and HOSTPILOT_HOSTS_FILE env var overrides for testing.

use anyhow::{Context, Result};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::platform::default_hosts_path;

/// Name of the shared staging file in the system temp directory.
pub const STAGING_FILE_NAME: &str = "hostpilot-hosts";

/// Paths used by one hostpilot process.
#[derive(Debug, Clone)]
pub struct HostPilotPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub backup_dir: PathBuf,
    /// The file being edited.
    pub hosts_file: PathBuf,
    /// Temp file the serialized content is staged in before the privileged copy.
    pub staging_file: PathBuf,
}

impl HostPilotPaths {
    /// Build paths from base directory (e.g. ProjectDirs data dir or HOSTPILOT_HOME).
    pub fn from_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.toml"),
            backup_dir: base.join("backups"),
            hosts_file: default_hosts_path(),
            staging_file: std::env::temp_dir().join(STAGING_FILE_NAME),
            config_dir: base,
        }
    }

    /// Paths for testing: everything, including hosts and staging files, lives under `base`.
    pub fn for_test(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref().to_path_buf();
        let mut paths = Self::from_base(base.clone());
        paths.hosts_file = base.join("hosts");
        paths.staging_file = base.join(STAGING_FILE_NAME);
        paths
    }

    /// Get default paths (respects HOSTPILOT_HOME). Config overrides are not applied.
    pub fn default_paths() -> Self {
        let base = if let Ok(home) = std::env::var("HOSTPILOT_HOME") {
            PathBuf::from(home)
        } else if let Some(dirs) = directories::ProjectDirs::from("com", "hostpilot", "hostpilot") {
            dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from(".hostpilot")
        };
        Self::from_base(base)
    }

    /// Apply overrides from config.toml.
    pub fn with_config(mut self, config: &Config) -> Self {
        if let Some(ref p) = config.hosts_file {
            self.hosts_file = p.clone();
        }
        if let Some(ref p) = config.backup_dir {
            self.backup_dir = p.clone();
        }
        self
    }
}

/// Main config.toml structure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Overrides the platform hosts file location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    /// Use the platform privileged copy. Disable when the target is user-writable.
    #[serde(default = "default_elevate")]
    pub elevate: bool,
}

fn default_elevate() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts_file: None,
            backup_dir: None,
            elevate: true,
        }
    }
}

impl Config {
    /// Load config from paths (with shared lock when file exists).
    pub fn load(paths: &HostPilotPaths) -> Result<Config> {
        if paths.config_file.is_file() {
            let mut file = fs::OpenOptions::new()
                .read(true)
                .open(&paths.config_file)
                .with_context(|| format!("open {}", paths.config_file.display()))?;
            fs2::FileExt::lock_shared(&file)?;
            let mut s = String::new();
            file.read_to_string(&mut s)?;
            let cfg: Config = toml::from_str(&s)
                .with_context(|| format!("parse {}", paths.config_file.display()))?;
            Ok(cfg)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to paths (with exclusive lock). Creates parent dirs if needed.
    pub fn save(&self, paths: &HostPilotPaths) -> Result<()> {
        if let Some(p) = paths.config_file.parent() {
            fs::create_dir_all(p)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&paths.config_file)?;
        fs2::FileExt::lock_exclusive(&file)?;
        let s = toml::to_string_pretty(self)?;
        file.write_all(s.as_bytes())?;
        Ok(())
    }
}

/// Resolved runtime settings: paths with config and env overrides applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: HostPilotPaths,
    pub elevate: bool,
}

impl Settings {
    /// Resolve from the environment. HOSTPILOT_HOSTS_FILE redirects the target and disables elevation.
    pub fn resolve() -> Result<Self> {
        let base = HostPilotPaths::default_paths();
        let config = Config::load(&base)?;
        let mut paths = base.with_config(&config);
        let mut elevate = config.elevate;
        if let Ok(path) = std::env::var("HOSTPILOT_HOSTS_FILE") {
            paths.hosts_file = PathBuf::from(path);
            elevate = false;
        }
        tracing::debug!(
            hosts = %paths.hosts_file.display(),
            backups = %paths.backup_dir.display(),
            elevate,
            "settings resolved"
        );
        Ok(Self { paths, elevate })
    }
}
