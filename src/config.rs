use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::reclaim::Distro;
use crate::scanner::ScanType;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub packages: PackagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Deepest directory whose entries are reported
    pub max_depth: u32,
    /// Directory names to skip at any depth
    pub ignore: Vec<String>,
    /// all, media, document, archive, temporary, package or malicious
    pub scan_type: ScanType,
    /// Number of parallel threads (0 = auto)
    pub threads: usize,
    /// Report entries larger than this many MiB
    pub threshold_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// Package manager family: arch or ubuntu
    pub distro: Distro,
    /// Report packages larger than this many MiB
    pub threshold_mb: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            ignore: vec![],
            scan_type: ScanType::All,
            threads: 0,
            threshold_mb: 100,
        }
    }
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            distro: Distro::Arch,
            threshold_mb: 100,
        }
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/disk-reclaim/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("disk-reclaim").join("config.toml"))
    }

    /// Load from `path`, or from the default location if none is given.
    ///
    /// A missing default file is not an error; a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&content, &path)
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ignore_names(&self.scanner.ignore)
    }
}

/// Ignore entries are directory basenames; empty names and paths are rejected.
pub fn validate_ignore_names<S: AsRef<str>>(names: &[S]) -> Result<(), ConfigError> {
    if let Some(bad) = names
        .iter()
        .map(AsRef::as_ref)
        .find(|name| name.is_empty() || name.contains('/'))
    {
        return Err(ConfigError::Invalid(format!(
            "ignore entries are directory names, not paths: '{}'",
            bad
        )));
    }
    Ok(())
}
