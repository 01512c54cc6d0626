//! Remove command implementation.

use anyhow::{bail, Result};
use humansize::{format_size, BINARY};

use crate::cli::RemoveArgs;
use crate::reclaim::{remove_path, RemoveOutcome};

/// Run the remove command. Every path is attempted even if an earlier one fails.
pub fn run(args: RemoveArgs) -> Result<()> {
    let mut failed = 0usize;
    let mut total_freed = 0u64;

    for path in &args.paths {
        match remove_path(path) {
            RemoveOutcome::Removed { path, freed_bytes } => {
                total_freed += freed_bytes;
                println!(
                    "Deleted {} ({})",
                    path.display(),
                    format_size(freed_bytes, BINARY)
                );
            }
            RemoveOutcome::Failed { path, error } => {
                failed += 1;
                eprintln!("Error deleting {}: {}", path.display(), error);
            }
        }
    }

    if args.paths.len() > 1 {
        println!("Freed {}", format_size(total_freed, BINARY));
    }

    if failed > 0 {
        bail!("{} of {} removals failed", failed, args.paths.len());
    }
    Ok(())
}
