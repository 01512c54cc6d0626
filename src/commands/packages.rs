//! Package listing and uninstall commands.

use anyhow::Result;
use humansize::{format_size, BINARY};

use crate::cli::{PackagesArgs, UninstallArgs};
use crate::config::Config;
use crate::reclaim::{list_installed, uninstall, InstalledPackage};

/// Packages strictly larger than `threshold_mb` MiB.
pub fn format_packages(packages: &[InstalledPackage], threshold_mb: u64) -> String {
    let threshold_kib = threshold_mb.saturating_mul(1024);
    let mut output = String::from("Large packages:\n");
    let mut shown = 0;

    for package in packages.iter().filter(|p| p.size_kib > threshold_kib) {
        shown += 1;
        output.push_str(&format!(
            "{:>12}  {}\n",
            format_size(package.size_bytes(), BINARY),
            package.name
        ));
    }
    if shown == 0 {
        output.push_str("  (none)\n");
    }
    output
}

/// Run the packages command
pub fn run(args: PackagesArgs, config: &Config) -> Result<()> {
    let distro = args.distro.unwrap_or(config.packages.distro);
    let threshold_mb = args.threshold.unwrap_or(config.packages.threshold_mb);

    let packages = list_installed(distro)?;

    if args.json {
        let large: Vec<_> = packages
            .iter()
            .filter(|p| p.size_kib > threshold_mb.saturating_mul(1024))
            .collect();
        println!("{}", serde_json::to_string_pretty(&large)?);
    } else {
        print!("{}", format_packages(&packages, threshold_mb));
    }
    Ok(())
}

/// Run the uninstall command
pub fn run_uninstall(args: UninstallArgs, config: &Config) -> Result<()> {
    let distro = args.distro.unwrap_or(config.packages.distro);
    uninstall(&args.name, distro)?;
    println!("Uninstalled package: {}", args.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packages() -> Vec<InstalledPackage> {
        vec![
            InstalledPackage {
                name: "texlive".into(),
                size_kib: 2 * 1024 * 1024,
            },
            InstalledPackage {
                name: "zlib".into(),
                size_kib: 300,
            },
        ]
    }

    #[test]
    fn test_format_packages_threshold() {
        let output = format_packages(&packages(), 100);
        assert!(output.contains("texlive"));
        assert!(output.contains("2 GiB"));
        assert!(!output.contains("zlib"));
    }

    #[test]
    fn test_format_packages_none() {
        let output = format_packages(&packages(), 10_000);
        assert!(output.contains("(none)"));
    }
}
