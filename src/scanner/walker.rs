use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use walkdir::WalkDir;

use crate::error::Result;

use super::cache::SizeCache;
use super::category::{classify, Category};
use super::entry::{FileEntry, FolderEntry, ScanResult};
use super::options::ScanConfig;
use super::rank::rank_by_size;
use super::size::FolderSizer;

/// Progress counters shared with whoever is displaying the scan.
#[derive(Debug, Default)]
pub struct ScanProgress {
    discovered: AtomicU64,
    completed: AtomicU64,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Work units found by the walk so far.
    pub fn discovered(&self) -> u64 {
        self.discovered.load(Ordering::Relaxed)
    }

    /// Work units finished so far.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

/// One independent piece of leaf work.
#[derive(Debug)]
enum WorkUnit {
    File { path: PathBuf, depth: u32 },
    Folder { path: PathBuf, depth: u32 },
}

#[derive(Debug)]
enum Outcome {
    File(FileEntry),
    Folder(FolderEntry),
    Skipped,
}

/// Walks a tree and sizes what it finds on a bounded worker pool.
///
/// The cache is shared and outlives individual scans, so rescanning an
/// unchanged tree only re-stats it.
#[derive(Debug, Clone)]
pub struct Scanner {
    cache: Arc<SizeCache>,
    cancel: Arc<AtomicBool>,
    progress: Option<Arc<ScanProgress>>,
}

impl Scanner {
    pub fn new(cache: Arc<SizeCache>) -> Self {
        Self {
            cache,
            cancel: Arc::new(AtomicBool::new(false)),
            progress: None,
        }
    }

    /// Use an externally owned cancellation flag, e.g. one set by a signal handler.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: Arc<ScanProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Flag that aborts the current scan when set. Units already running finish
    /// or fail cleanly; units not yet started are skipped. The flag is never
    /// cleared by the scanner.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn cache(&self) -> &SizeCache {
        &self.cache
    }

    /// Scan `config.root`.
    ///
    /// Filesystem problems never fail the scan: an unreadable root yields an
    /// empty result, anything below it is skipped. The only error is failing
    /// to start the worker pool.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanResult> {
        let start = Instant::now();
        tracing::info!(
            root = %config.root.display(),
            max_depth = config.max_depth,
            scan_type = %config.scan_type,
            "Starting scan"
        );

        let Some((root, units)) = self.collect_units(config) else {
            return Ok(ScanResult {
                elapsed: start.elapsed(),
                ..Default::default()
            });
        };
        tracing::debug!(units = units.len(), "Walk finished, dispatching work");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("scan-worker-{}", i))
            .build()?;

        let sizer = FolderSizer::new(&self.cache, &self.cancel).with_ignore(&config.ignore);
        // Indexed collect keeps discovery order, which makes ranking deterministic
        let outcomes: Vec<Outcome> = pool.install(|| {
            units
                .par_iter()
                .map(|unit| {
                    let outcome = self.run_unit(unit, config, &sizer);
                    if let Some(progress) = &self.progress {
                        progress.completed.fetch_add(1, Ordering::Relaxed);
                    }
                    outcome
                })
                .collect()
        });

        let mut result = ScanResult {
            interrupted: self.cancel.load(Ordering::SeqCst),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                Outcome::File(entry) => {
                    result.files_processed += 1;
                    if entry.depth == 0 {
                        result.root_size = result.root_size.saturating_add(entry.size);
                    }
                    if entry.category != Category::Other {
                        result.files.push(entry);
                    }
                }
                Outcome::Folder(entry) => {
                    result.folders_processed += 1;
                    if entry.depth == 0 {
                        result.root_size = result.root_size.saturating_add(entry.size);
                    }
                    result.folders.push(entry);
                }
                Outcome::Skipped => {}
            }
        }

        // The root is reported like any other folder, unless its total is partial
        if !result.interrupted {
            result.folders.push(FolderEntry {
                path: root,
                size: result.root_size,
                depth: 0,
            });
        }

        rank_by_size(&mut result.files, |f| f.size);
        rank_by_size(&mut result.folders, |f| f.size);
        result.elapsed = start.elapsed();

        if result.interrupted {
            tracing::warn!("Scan interrupted, results are partial");
        }
        let stats = self.cache.stats();
        tracing::info!(
            files = result.files_processed,
            folders = result.folders_processed,
            kept_files = result.files.len(),
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            cache_entries = self.cache.len(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Scan completed"
        );

        Ok(result)
    }

    /// Sequential walk deciding which directories to enter. Returns the
    /// canonical root with its units, or `None` when the root is unusable.
    fn collect_units(&self, config: &ScanConfig) -> Option<(PathBuf, Vec<WorkUnit>)> {
        let root = match usable_root(&config.root) {
            Ok(root) => root,
            Err(err) => {
                tracing::warn!(root = %config.root.display(), error = %err, "Cannot scan root");
                return None;
            }
        };

        // Entries of directories at depth `max_depth` are still reported, so the
        // walk lists one level below them without entering it.
        let walk_depth = (config.max_depth as usize).saturating_add(1);
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .max_depth(walk_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !e.file_type().is_dir() || !config.is_ignored(e.file_name())
            });

        let mut units = Vec::new();
        for result in walker {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::debug!("Walk cancelled");
                break;
            }

            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }

            // Depth of the containing directory
            let depth = u32::try_from(entry.depth() - 1).unwrap_or(u32::MAX);
            let file_type = entry.file_type();
            let unit = if file_type.is_file() {
                WorkUnit::File {
                    path: entry.into_path(),
                    depth,
                }
            } else if file_type.is_dir() {
                WorkUnit::Folder {
                    path: entry.into_path(),
                    depth,
                }
            } else {
                continue;
            };

            units.push(unit);
            if let Some(progress) = &self.progress {
                progress.discovered.fetch_add(1, Ordering::Relaxed);
            }
        }

        Some((root, units))
    }

    fn run_unit(&self, unit: &WorkUnit, config: &ScanConfig, sizer: &FolderSizer<'_>) -> Outcome {
        if self.cancel.load(Ordering::Relaxed) {
            return Outcome::Skipped;
        }

        let outcome = match unit {
            WorkUnit::File { path, depth } => {
                let category = classify(path, config.scan_type);
                // Unreported deep files do not need a stat
                let size = if category != Category::Other || *depth == 0 {
                    sizer.file_size(path)
                } else {
                    0
                };
                Outcome::File(FileEntry {
                    path: path.clone(),
                    size,
                    category,
                    depth: *depth,
                })
            }
            WorkUnit::Folder { path, depth } => {
                let budget = i64::from(config.max_depth) - i64::from(*depth);
                Outcome::Folder(FolderEntry {
                    path: path.clone(),
                    size: sizer.folder_size(path, budget),
                    depth: *depth,
                })
            }
        };

        // A unit that overlapped cancellation may carry a truncated size
        if self.cancel.load(Ordering::Relaxed) {
            return Outcome::Skipped;
        }
        outcome
    }
}

/// Canonical root, provided it is a readable directory.
fn usable_root(root: &Path) -> std::io::Result<PathBuf> {
    let root = root.canonicalize()?;
    fs::read_dir(&root)?;
    Ok(root)
}
