//! Scan command implementation

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::ScanArgs;
use crate::config::{validate_ignore_names, Config};
use crate::reclaim::{list_installed, InstalledPackage};
use crate::scanner::{
    format_json, format_report, format_summary, ReportOptions, ScanConfig, ScanProgress,
    ScanResult, Scanner, SizeCache,
};
use crate::signals;

use super::packages::format_packages;

/// Build the scan configuration from CLI arguments over config file values
pub fn build_scan_config(args: &ScanArgs, config: &Config) -> Result<ScanConfig> {
    let max_depth = args
        .max_depth
        .unwrap_or_else(|| i64::from(config.scanner.max_depth));
    validate_ignore_names(&args.ignore)?;

    let ignore = config
        .scanner
        .ignore
        .iter()
        .chain(args.ignore.iter())
        .cloned();

    let scan_config = ScanConfig::new(&args.path, max_depth)?
        .with_ignore(ignore)
        .with_scan_type(args.scan_type.unwrap_or(config.scanner.scan_type))
        .with_threads(args.jobs.unwrap_or(config.scanner.threads));
    Ok(scan_config)
}

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config, quiet: bool) -> Result<()> {
    let scan_config = build_scan_config(&args, config)?;
    let threshold_mb = args.threshold.unwrap_or(config.scanner.threshold_mb);

    let cancel = signals::install_interrupt_handler().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not install interrupt handler");
        Arc::new(AtomicBool::new(false))
    });
    let progress = Arc::new(ScanProgress::new());
    let scanner = Scanner::new(Arc::new(SizeCache::new()))
        .with_cancel(cancel)
        .with_progress(Arc::clone(&progress));

    let result = if args.json || quiet {
        scanner.scan(&scan_config)?
    } else {
        scan_with_spinner(&scanner, &scan_config, &progress)?
    };

    let packages = if args.packages {
        let distro = args.distro.unwrap_or(config.packages.distro);
        match list_installed(distro) {
            Ok(packages) => Some(packages),
            Err(e) => {
                tracing::warn!(error = %e, "Could not list installed packages");
                None
            }
        }
    } else {
        None
    };

    if args.json {
        print_json(&result, packages.as_deref())?;
    } else {
        let mut options =
            ReportOptions::new().with_threshold(threshold_mb.saturating_mul(1024 * 1024));
        if let Some(top) = args.top {
            options = options.with_top_n(top);
        }
        print!("{}", format_report(&result, &options));
        if let Some(packages) = &packages {
            println!();
            print!("{}", format_packages(packages, threshold_mb));
        }
        if !quiet {
            println!();
            println!("{}", format_summary(&result));
        }
    }

    if result.interrupted {
        eprintln!("Scan interrupted; results are incomplete.");
    }

    Ok(())
}

fn scan_with_spinner(
    scanner: &Scanner,
    config: &ScanConfig,
    progress: &ScanProgress,
) -> Result<ScanResult> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} Scanning {msg} [{elapsed}]")
            .map_err(|e| anyhow!("invalid progress template: {}", e))?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let joined = std::thread::scope(|s| {
        let handle = s.spawn(|| scanner.scan(config));
        while !handle.is_finished() {
            pb.set_message(format!(
                "{}/{} entries",
                progress.completed(),
                progress.discovered()
            ));
            std::thread::sleep(Duration::from_millis(100));
        }
        handle.join()
    });
    pb.finish_and_clear();

    let result = joined.map_err(|_| anyhow!("scan thread panicked"))??;
    Ok(result)
}

fn print_json(result: &ScanResult, packages: Option<&[InstalledPackage]>) -> Result<()> {
    let output = match packages {
        Some(packages) => serde_json::to_string_pretty(&serde_json::json!({
            "scan": result,
            "packages": packages,
        }))?,
        None => format_json(result, true)?,
    };
    println!("{}", output);
    Ok(())
}
