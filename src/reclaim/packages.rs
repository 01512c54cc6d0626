//! Installed system packages and their sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{ReclaimError, Result};
use crate::scanner::rank_by_size;

/// Supported package managers, named after the distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Distro {
    /// pacman
    #[default]
    Arch,
    /// dpkg / apt
    Ubuntu,
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distro::Arch => f.write_str("arch"),
            Distro::Ubuntu => f.write_str("ubuntu"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledPackage {
    pub name: String,
    /// Installed size in KiB
    pub size_kib: u64,
}

impl InstalledPackage {
    pub fn size_bytes(&self) -> u64 {
        self.size_kib.saturating_mul(1024)
    }
}

/// Parse a package manager size into KiB.
///
/// Accepts `KiB`/`KB`, `MiB`/`MB`, `GiB`/`GB` and `B` suffixes in any case,
/// with or without a space. A bare number is already KiB.
pub fn parse_size_kib(s: &str) -> Option<u64> {
    let s = s.trim().to_lowercase();

    const UNITS: &[(&str, f64)] = &[
        ("kib", 1.0),
        ("mib", 1024.0),
        ("gib", 1024.0 * 1024.0),
        ("kb", 1.0),
        ("mb", 1024.0),
        ("gb", 1024.0 * 1024.0),
        ("b", 1.0 / 1024.0),
    ];

    let (number, factor) = UNITS
        .iter()
        .find_map(|(suffix, factor)| s.strip_suffix(suffix).map(|n| (n, *factor)))
        .unwrap_or((s.as_str(), 1.0));

    let value: f64 = number.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * factor) as u64)
}

/// Parse `pacman -Qi` output.
pub fn parse_pacman_output(output: &str) -> Vec<InstalledPackage> {
    let mut packages = Vec::new();
    let mut name: Option<String> = None;

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Name" => name = Some(value.to_string()),
            "Installed Size" => {
                let Some(pkg) = name.take() else {
                    continue;
                };
                match parse_size_kib(value) {
                    Some(size_kib) => packages.push(InstalledPackage { name: pkg, size_kib }),
                    None => tracing::warn!(package = %pkg, size = value, "Could not parse package size"),
                }
            }
            _ => {}
        }
    }

    packages
}

/// Parse `dpkg-query -W --showformat='${Package} ${Installed-Size}\n'` output.
pub fn parse_dpkg_output(output: &str) -> Vec<InstalledPackage> {
    output
        .lines()
        .filter_map(|line| {
            let (name, size) = line.trim().split_once(char::is_whitespace)?;
            if size.trim().is_empty() {
                // Virtual packages have no installed size
                return None;
            }
            match parse_size_kib(size) {
                Some(size_kib) => Some(InstalledPackage {
                    name: name.to_string(),
                    size_kib,
                }),
                None => {
                    tracing::warn!(package = name, size = size.trim(), "Could not parse package size");
                    None
                }
            }
        })
        .collect()
}

/// Query the package manager and return packages, largest first.
pub fn list_installed(distro: Distro) -> Result<Vec<InstalledPackage>> {
    let (program, args): (&str, &[&str]) = match distro {
        Distro::Arch => ("pacman", &["-Qi"]),
        Distro::Ubuntu => ("dpkg-query", &["-W", "--showformat=${Package} ${Installed-Size}\\n"]),
    };

    tracing::info!(%distro, program, "Retrieving installed packages");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ReclaimError::Io {
            path: PathBuf::from(program),
            source: e,
        })?;

    if !output.status.success() {
        return Err(ReclaimError::PackageManager {
            program: program.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut packages = match distro {
        Distro::Arch => parse_pacman_output(&stdout),
        Distro::Ubuntu => parse_dpkg_output(&stdout),
    };
    rank_by_size(&mut packages, |p| p.size_kib);
    Ok(packages)
}

/// Uninstall a package through sudo. The package manager talks to the
/// terminal directly so it can ask for confirmation.
pub fn uninstall(name: &str, distro: Distro) -> Result<()> {
    let args: [&str; 3] = match distro {
        Distro::Arch => ["pacman", "-R", name],
        Distro::Ubuntu => ["apt", "remove", name],
    };

    tracing::info!(package = name, %distro, "Uninstalling package");
    let status = Command::new("sudo")
        .args(args)
        .status()
        .map_err(|e| ReclaimError::Io {
            path: PathBuf::from("sudo"),
            source: e,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ReclaimError::PackageManager {
            program: args[0].to_string(),
            message: status.to_string(),
        })
    }
}
