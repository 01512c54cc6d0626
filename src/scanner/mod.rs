mod cache;
mod category;
mod entry;
mod formatter;
mod options;
mod rank;
mod size;
mod walker;

pub use cache::{CacheStats, SizeCache, FILE_BUDGET};
pub use category::{classify, Category, ScanType};
pub use entry::{FileEntry, FolderEntry, ScanEntry, ScanResult};
pub use formatter::{format_json, format_report, format_summary, ReportOptions};
pub use options::ScanConfig;
pub use rank::rank_by_size;
pub use size::FolderSizer;
pub use walker::{ScanProgress, Scanner};
