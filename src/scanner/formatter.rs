use humansize::{format_size, BINARY};

use super::entry::ScanResult;

/// Options for the human-readable report
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Only entries strictly larger than this many bytes are listed
    pub threshold: u64,
    /// Show at most N entries per list
    pub top_n: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            threshold: 100 * 1024 * 1024,
            top_n: None,
        }
    }
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, bytes: u64) -> Self {
        self.threshold = bytes;
        self
    }

    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }
}

/// Format the large files and folders of a scan.
pub fn format_report(result: &ScanResult, options: &ReportOptions) -> String {
    let limit = options.top_n.unwrap_or(usize::MAX);
    let mut output = String::new();

    output.push_str("Large files:\n");
    let mut shown = 0;
    for file in result.files_above(options.threshold).take(limit) {
        shown += 1;
        output.push_str(&format!(
            "{:>12}  {} ({})\n",
            format_size(file.size, BINARY),
            file.path.display(),
            file.category
        ));
    }
    if shown == 0 {
        output.push_str("  (none)\n");
    }

    output.push_str("\nLarge folders:\n");
    let mut shown = 0;
    for folder in result.folders_above(options.threshold).take(limit) {
        shown += 1;
        output.push_str(&format!(
            "{:>12}  {}/\n",
            format_size(folder.size, BINARY),
            folder.path.display()
        ));
    }
    if shown == 0 {
        output.push_str("  (none)\n");
    }

    output
}

/// One-line summary of a scan.
pub fn format_summary(result: &ScanResult) -> String {
    format!(
        "Total: {} at top level, {} files and {} folders processed in {:.2}s",
        format_size(result.root_size, BINARY),
        result.files_processed,
        result.folders_processed,
        result.elapsed.as_secs_f64()
    )
}

/// Format a scan as JSON
pub fn format_json(result: &ScanResult, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}
