//! File classification by extension and name pattern.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const MEDIA_EXTENSIONS: &[&str] = &[
    "mp3", "mp4", "avi", "mov", "jpg", "jpeg", "png", "gif", "wav", "flac", "mkv",
];
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "rtf", "odt", "xls", "xlsx", "ppt", "pptx",
];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz", "bz2"];
const TEMPORARY_PATTERNS: &[&str] = &[".tmp", ".temp", "~", ".bak", ".swp"];
// Only the final suffix is compared, so "tar.gz" can never match here.
const PACKAGE_EXTENSIONS: &[&str] = &["deb", "rpm", "tar.gz", "apk"];
const MALICIOUS_EXTENSIONS: &[&str] = &["exe", "bat", "sh", "vbs", "js"];

/// Semantic category of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Media,
    Document,
    Archive,
    Temporary,
    Package,
    Malicious,
    Other,
}

impl Category {
    /// Categories in the order their rules are checked.
    pub const PRIORITY: [Category; 6] = [
        Category::Media,
        Category::Document,
        Category::Archive,
        Category::Temporary,
        Category::Package,
        Category::Malicious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Media => "media",
            Category::Document => "document",
            Category::Archive => "archive",
            Category::Temporary => "temporary",
            Category::Package => "package",
            Category::Malicious => "malicious",
            Category::Other => "other",
        }
    }

    /// Whether a file with this lowercase extension and basename satisfies this
    /// category's rule. `Other` matches nothing.
    fn matches(&self, extension: Option<&str>, name: &str) -> bool {
        let in_set = |set: &[&str]| extension.is_some_and(|ext| set.contains(&ext));
        match self {
            Category::Media => in_set(MEDIA_EXTENSIONS),
            Category::Document => in_set(DOCUMENT_EXTENSIONS),
            Category::Archive => in_set(ARCHIVE_EXTENSIONS),
            Category::Temporary => TEMPORARY_PATTERNS.iter().any(|p| name.contains(p)),
            Category::Package => in_set(PACKAGE_EXTENSIONS),
            Category::Malicious => in_set(MALICIOUS_EXTENSIONS),
            Category::Other => false,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which categories a scan reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScanType {
    #[default]
    All,
    Only(Category),
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanType::All => f.write_str("all"),
            ScanType::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for ScanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if lowered == "all" {
            return Ok(ScanType::All);
        }
        Category::PRIORITY
            .iter()
            .find(|c| c.as_str() == lowered)
            .map(|c| ScanType::Only(*c))
            .ok_or_else(|| {
                format!(
                    "unknown scan type '{}' (expected all, media, document, archive, temporary, package or malicious)",
                    s
                )
            })
    }
}

impl TryFrom<String> for ScanType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScanType> for String {
    fn from(value: ScanType) -> Self {
        value.to_string()
    }
}

/// Classify a file by its basename.
///
/// With [`ScanType::All`] the rules are tried in [`Category::PRIORITY`] order
/// and the first match wins. With [`ScanType::Only`] just that rule is
/// evaluated and anything else is [`Category::Other`].
pub fn classify(path: &Path, scan_type: ScanType) -> Category {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    let extension = extension.as_deref();

    match scan_type {
        ScanType::All => Category::PRIORITY
            .into_iter()
            .find(|c| c.matches(extension, &name))
            .unwrap_or(Category::Other),
        ScanType::Only(category) if category.matches(extension, &name) => category,
        ScanType::Only(_) => Category::Other,
    }
}
