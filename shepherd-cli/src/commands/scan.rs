//! `scan-repos` — list migration candidates without touching them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use shepherd_core::{CandidateSet, FleetConfig};
use shepherd_remote::scan_candidates;

/// List the organization's repositories that match the name filter and
/// contain the probe file.
#[derive(Parser, Debug)]
#[command(name = "scan-repos", version, long_about = None)]
pub struct ScanArgs {
    /// Fleet config file (defaults to ~/.shepherd/fleet.yaml, then built-ins).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ScanReportJson<'a> {
    org: &'a str,
    suffix: &'a str,
    probe: &'a str,
    repositories: Vec<&'a str>,
}

impl ScanArgs {
    pub fn run(self) -> Result<()> {
        let (config, host) = super::connect(self.config.as_deref())?;

        let filter = config.repo_filter();
        let predicate = config.probe.predicate();
        tracing::info!(
            "Starting scan of {} for repositories ending in '{}' with {}...",
            filter.org,
            filter.suffix,
            config.probe.path
        );
        let candidates = scan_candidates(&host, &filter, &config.probe.path, &predicate)
            .context("repository scan failed")?;

        if self.json {
            print_json(&config, &candidates)
        } else {
            print_list(&config, &candidates);
            Ok(())
        }
    }
}

fn print_json(config: &FleetConfig, candidates: &CandidateSet) -> Result<()> {
    let payload = ScanReportJson {
        org: &config.org,
        suffix: &config.repo_suffix,
        probe: &config.probe.path,
        repositories: candidates.iter().map(|r| r.name.as_str()).collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize scan JSON")?
    );
    Ok(())
}

fn print_list(config: &FleetConfig, candidates: &CandidateSet) {
    if candidates.is_empty() {
        println!("No repositories with {} found.", config.probe.path);
        return;
    }
    println!(
        "Found {} repositories with {}:",
        candidates.len(),
        config.probe.path
    );
    for repo in candidates {
        println!("- {}", repo.name);
    }
}
