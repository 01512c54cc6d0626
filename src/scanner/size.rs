use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use super::cache::{SizeCache, FILE_BUDGET};

/// Computes file and folder sizes through a shared [`SizeCache`].
///
/// Directories whose basename is in the ignore set contribute nothing, at any
/// depth. Symbolic links are never followed.
#[derive(Debug, Clone, Copy)]
pub struct FolderSizer<'a> {
    cache: &'a SizeCache,
    ignore: Option<&'a BTreeSet<OsString>>,
    ignore_tag: u64,
    cancel: &'a AtomicBool,
}

impl<'a> FolderSizer<'a> {
    pub fn new(cache: &'a SizeCache, cancel: &'a AtomicBool) -> Self {
        Self {
            cache,
            ignore: None,
            ignore_tag: 0,
            cancel,
        }
    }

    pub fn with_ignore(mut self, ignore: &'a BTreeSet<OsString>) -> Self {
        self.ignore_tag = if ignore.is_empty() {
            0
        } else {
            let mut hasher = DefaultHasher::new();
            ignore.hash(&mut hasher);
            hasher.finish()
        };
        self.ignore = Some(ignore);
        self
    }

    /// Apparent size of a single file.
    pub fn file_size(&self, path: &Path) -> u64 {
        self.cache
            .get_or_compute(path, FILE_BUDGET, || Ok(fs::symlink_metadata(path)?.len()))
    }

    /// Cumulative size of `path`, descending at most `depth_budget` levels.
    ///
    /// A budget of 0 or less makes the folder opaque: the result is 0 and the
    /// directory is not read. Otherwise immediate files are summed and each
    /// subdirectory contributes `folder_size(child, depth_budget - 1)`. Any
    /// child that cannot be read counts as 0.
    pub fn folder_size(&self, path: &Path, depth_budget: i64) -> u64 {
        if depth_budget <= 0 {
            return 0;
        }
        let budget = u32::try_from(depth_budget).unwrap_or(u32::MAX);
        self.cache
            .get_or_compute_filtered(path, budget, self.ignore_tag, || {
                self.sum_children(path, budget)
            })
    }

    fn is_ignored(&self, name: &std::ffi::OsStr) -> bool {
        self.ignore.is_some_and(|set| set.contains(name))
    }

    fn cancelled(&self) -> io::Result<()> {
        if self.cancel.load(Ordering::Relaxed) {
            Err(io::Error::new(io::ErrorKind::Interrupted, "scan cancelled"))
        } else {
            Ok(())
        }
    }

    fn sum_children(&self, path: &Path, budget: u32) -> io::Result<u64> {
        let read_dir = fs::read_dir(path).inspect_err(|err| {
            tracing::debug!(path = %path.display(), error = %err, "Cannot read directory");
        })?;

        let mut total = 0u64;
        for entry in read_dir {
            self.cancelled()?;

            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            // DirEntry::file_type does not follow symlinks
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => {
                    tracing::debug!(path = %entry.path().display(), error = %err, "Skipping entry");
                    continue;
                }
            };

            if file_type.is_file() {
                total = total.saturating_add(self.file_size(&entry.path()));
            } else if file_type.is_dir() && !self.is_ignored(&entry.file_name()) {
                let child = self.folder_size(&entry.path(), i64::from(budget) - 1);
                total = total.saturating_add(child);
            }
        }

        // A child cut short by cancellation reported 0
        self.cancelled()?;
        Ok(total)
    }
}
