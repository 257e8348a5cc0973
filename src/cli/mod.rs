//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse arguments and CI environment variables
//! - Merge them over the optional config file and validate the result
//! - Build the Gitea client and drive the synchronizer
//!
//! Validation happens entirely before the client is constructed, so a bad
//! invocation never reaches the network.

pub mod args;

pub use args::Cli;

use anyhow::{Context, Result};

use crate::core::config::{self, RawConfig};
use crate::core::types::PublishPlan;
use crate::engine::{ReleaseAction, SyncReport, Synchronizer};
use crate::forge::GiteaForge;
use crate::ui::output::{self, Verbosity};

/// `file_exists` value used when neither flags nor the config file set one.
const DEFAULT_FILE_EXISTS: &str = "overwrite";

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let plan = build_plan(&cli)?;
    output::debug(format!("{:?}", plan), verbosity);

    let forge = GiteaForge::new(
        plan.base_url.clone(),
        plan.api_key.clone(),
        plan.target.owner.clone(),
        plan.target.repo.clone(),
        &plan.transport,
    )
    .context("failed to set up the Gitea client")?;

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(Synchronizer::new(&forge, verbosity).publish(&plan))?;

    print_summary(&report, verbosity);
    Ok(())
}

/// Merge config file and flags, then validate.
pub fn build_plan(cli: &Cli) -> Result<PublishPlan> {
    let file = match &cli.config {
        Some(path) => config::load_file(path)?,
        None => RawConfig::default(),
    };

    let mut raw = file.merge(cli.to_raw_config());
    raw.file_exists
        .get_or_insert_with(|| DEFAULT_FILE_EXISTS.to_string());

    Ok(config::validate(raw)?)
}

fn print_summary(report: &SyncReport, verbosity: Verbosity) {
    let verb = match report.action {
        ReleaseAction::Retrieved => "found",
        ReleaseAction::Edited => "edited",
        ReleaseAction::Created => "created",
    };
    let uploaded: Vec<String> = report
        .assets
        .uploaded
        .iter()
        .map(|a| a.name.clone())
        .collect();

    output::print(
        format!(
            "Release {} {}: uploaded {}, skipped {}",
            report.release.tag_name,
            verb,
            output::format_names(&uploaded),
            output::format_names(&report.assets.skipped)
        ),
        verbosity,
    );
    if let Some(url) = &report.release.url {
        output::print(url, verbosity);
    }
}
