use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::reclaim::Distro;
use crate::scanner::ScanType;

/// Disk Reclaim - find what is filling a Linux disk and free it
#[derive(Parser, Debug)]
#[command(name = "disk-reclaim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress everything except results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find large files and folders under a directory
    ///
    /// Sizes are cached and reused while a path's modification time is
    /// unchanged. A folder's modification time only changes when its direct
    /// entries do, so a folder size cached by an earlier scan in the same
    /// process can be stale after a file deeper inside it grows.
    Scan(ScanArgs),

    /// List installed system packages by size
    Packages(PackagesArgs),

    /// Delete files or folders
    Remove(RemoveArgs),

    /// Uninstall a system package
    Uninstall(UninstallArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Directory names to skip (can be given multiple times)
    #[arg(short, long, value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Only report files of this type: all, media, document, archive,
    /// temporary, package, malicious
    #[arg(short, long, value_name = "TYPE")]
    pub scan_type: Option<ScanType>,

    /// Maximum depth for subfolder size checking
    #[arg(short = 'd', long, value_name = "N", allow_negative_numbers = true)]
    pub max_depth: Option<i64>,

    /// Size threshold in MiB
    #[arg(short, long, value_name = "MB")]
    pub threshold: Option<u64>,

    /// Show at most N files and N folders
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    /// Parallel scan threads
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also list large installed packages
    #[arg(long)]
    pub packages: bool,

    /// Package manager family used with --packages
    #[arg(long, value_enum, value_name = "DISTRO")]
    pub distro: Option<Distro>,
}

#[derive(Args, Debug)]
pub struct PackagesArgs {
    /// Package manager family
    #[arg(long, value_enum, value_name = "DISTRO")]
    pub distro: Option<Distro>,

    /// Size threshold in MiB
    #[arg(short, long, value_name = "MB")]
    pub threshold: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Files or folders to delete
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Package name
    pub name: String,

    /// Package manager family
    #[arg(long, value_enum, value_name = "DISTRO")]
    pub distro: Option<Distro>,
}
