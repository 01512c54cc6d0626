//! Actions that free space once a scan has pointed at something.

pub mod packages;
pub mod remove;

pub use packages::{list_installed, uninstall, Distro, InstalledPackage};
pub use remove::{remove_path, RemoveOutcome};
