use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::category::Category;

/// A classified file found during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Full path to the file
    pub path: PathBuf,

    /// Apparent size in bytes
    pub size: u64,

    /// Category assigned by the classifier (never `Other` in a result)
    pub category: Category,

    /// Depth of the containing directory (files in the root are 0)
    pub depth: u32,
}

/// A folder with its cumulative size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    /// Full path to the folder
    pub path: PathBuf,

    /// Size aggregated with a budget of `max_depth - depth`
    pub size: u64,

    /// Depth of the directory it was found in (children of the root are 0)
    pub depth: u32,
}

/// Either kind of entry, for callers acting on paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScanEntry {
    File(FileEntry),
    Folder(FolderEntry),
}

impl ScanEntry {
    pub fn path(&self) -> &Path {
        match self {
            ScanEntry::File(f) => &f.path,
            ScanEntry::Folder(d) => &d.path,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            ScanEntry::File(f) => f.size,
            ScanEntry::Folder(d) => d.size,
        }
    }

    pub fn depth(&self) -> u32 {
        match self {
            ScanEntry::File(f) => f.depth,
            ScanEntry::Folder(d) => d.depth,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, ScanEntry::Folder(_))
    }
}

impl From<FileEntry> for ScanEntry {
    fn from(entry: FileEntry) -> Self {
        ScanEntry::File(entry)
    }
}

impl From<FolderEntry> for ScanEntry {
    fn from(entry: FolderEntry) -> Self {
        ScanEntry::Folder(entry)
    }
}

/// Snapshot produced by one scan. Both lists are sorted by size, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub files: Vec<FileEntry>,
    pub folders: Vec<FolderEntry>,

    /// Files classified, whether or not they were kept
    pub files_processed: u64,

    /// Folders aggregated below the root
    pub folders_processed: u64,

    /// Immediate files of the root plus the aggregated size of its subfolders.
    /// Also reported as the root's entry in `folders`.
    pub root_size: u64,

    #[serde(skip)]
    pub elapsed: Duration,

    /// True if the scan was cancelled before every unit ran
    pub interrupted: bool,
}

impl ScanResult {
    /// Files strictly larger than `threshold` bytes.
    pub fn files_above(&self, threshold: u64) -> impl Iterator<Item = &FileEntry> {
        self.files.iter().filter(move |f| f.size > threshold)
    }

    /// Folders strictly larger than `threshold` bytes.
    pub fn folders_above(&self, threshold: u64) -> impl Iterator<Item = &FolderEntry> {
        self.folders.iter().filter(move |f| f.size > threshold)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }

    /// All entries, files first.
    pub fn entries(&self) -> impl Iterator<Item = ScanEntry> + '_ {
        self.files
            .iter()
            .cloned()
            .map(ScanEntry::from)
            .chain(self.folders.iter().cloned().map(ScanEntry::from))
    }
}
