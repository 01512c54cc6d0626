//! Disk Reclaim - inventory disk usage and free space on Linux
//!
//! This crate provides functionality for:
//! - Scanning a directory tree for large files and folders, with cached sizes
//! - Classifying files into media, documents, archives and other categories
//! - Removing files and folders, and listing or uninstalling system packages

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod reclaim;
pub mod scanner;
pub mod signals;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, ReclaimError, Result};
pub use scanner::{ScanConfig, ScanResult, Scanner, SizeCache};
