//! One sync run from resolved settings.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use tracing::info;

use closers_sync::http::ReqwestClient;
use closers_sync::logging::init_logging;
use closers_sync::manifest::LuadecDecoder;
use closers_sync::process::NativeLauncher;
use closers_sync::{ConfigFile, SyncConfig, SyncOrchestrator, SyncOutcome, SyncReport};

use crate::error::CliError;
use crate::prompt::ask_install_dir;
use crate::Args;

/// Run the sync and return the process exit code.
pub fn run(args: &Args) -> Result<u8, CliError> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let mut config = file.apply(SyncConfig::default());

    // Flag > config file > prompt > default
    let chosen = match (&args.install_dir, &file.install_dir) {
        (Some(dir), _) => Some(dir.clone()),
        (None, Some(dir)) => Some(dir.clone()),
        (None, None) => ask_install_dir(&config.install_dir)?,
    };
    config.install_dir = resolve_install_dir(chosen, config.install_dir);
    config.validate()?;

    let _guard = init_logging(Some(&config.install_dir), args.verbose)?;
    info!(
        version = closers_sync::version(),
        install = %config.install_dir.display(),
        server = %config.base_url,
        "Starting sync"
    );

    let client = ReqwestClient::new(config.http_timeout)?;
    let decoder = LuadecDecoder::new(config.decoder_path.clone());
    let orchestrator = SyncOrchestrator::new(
        config,
        Arc::new(client),
        Arc::new(decoder),
        Arc::new(NativeLauncher::new()),
    );

    let outcome = orchestrator.run();
    print_outcome(&outcome);
    Ok(outcome.exit_code() as u8)
}

/// Use `chosen` when given, otherwise `default`.
fn resolve_install_dir(chosen: Option<PathBuf>, default: PathBuf) -> PathBuf {
    chosen.unwrap_or(default)
}

fn print_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Done(report) => {
            println!("{}", style("CLOSERS is up to date.").green().bold());
            print_report(report);
        }
        SyncOutcome::Failed(failure) => {
            println!("{}", style(failure.to_string()).red().bold());
        }
    }
}

fn print_report(report: &SyncReport) {
    println!("  Version:     {}", report.version);
    println!("  Checked:     {} files", report.files_checked());
    println!(
        "  Downloaded:  {} files ({} bytes)",
        report.files_downloaded(),
        report.bytes_downloaded()
    );
    if report.archives_extracted > 0 {
        println!("  Extracted:   {} archives", report.archives_extracted);
    }
    if report.downloads_skipped() > 0 {
        println!(
            "  {}",
            style(format!(
                "{} files could not be downloaded and will be retried next run",
                report.downloads_skipped()
            ))
            .yellow()
        );
    }
    if report.unavailable_manifests() > 0 {
        println!(
            "  {}",
            style(format!(
                "{} manifests could not be decoded",
                report.unavailable_manifests()
            ))
            .yellow()
        );
    }
}
