use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::error::ConfigError;

use super::category::ScanType;

/// Configuration for a single scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory the walk starts from (depth 0)
    pub root: PathBuf,

    /// Directory basenames never entered, at any depth
    pub ignore: BTreeSet<OsString>,

    /// Categories reported in the file list
    pub scan_type: ScanType,

    /// Deepest directory whose entries are reported
    pub max_depth: u32,

    /// Number of worker threads (0 = auto)
    pub threads: usize,
}

impl ScanConfig {
    /// Create a config for `root`. A negative `max_depth` is rejected here so
    /// that a scan never starts with an unusable depth.
    pub fn new(root: impl Into<PathBuf>, max_depth: i64) -> Result<Self, ConfigError> {
        let max_depth = u32::try_from(max_depth).map_err(|_| {
            ConfigError::Invalid(format!(
                "max depth must be between 0 and {}, got {}",
                u32::MAX,
                max_depth
            ))
        })?;

        Ok(Self {
            root: root.into(),
            ignore: BTreeSet::new(),
            scan_type: ScanType::All,
            max_depth,
            threads: 0,
        })
    }

    /// Set the directory names to skip
    pub fn with_ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.ignore = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set which categories to report
    pub fn with_scan_type(mut self, scan_type: ScanType) -> Self {
        self.scan_type = scan_type;
        self
    }

    /// Set number of parallel threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Whether a directory with this basename is skipped.
    pub fn is_ignored(&self, name: &OsStr) -> bool {
        self.ignore.contains(name)
    }
}
