//! `migrate-fleet` — scan, then migrate every candidate on a branch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use shepherd_core::{FleetReport, OutcomeStatus, RunOptions};
use shepherd_migrate::{FleetOrchestrator, GitCli};

/// Migrate every candidate repository in the organization.
///
/// Without --apply nothing is branched, committed or pushed.
#[derive(Parser, Debug)]
#[command(name = "migrate-fleet", version, long_about = None)]
pub struct FleetArgs {
    /// Create branches, commit and push. Without it the run is a dry run.
    #[arg(long)]
    pub apply: bool,

    /// Fleet config file (defaults to ~/.shepherd/fleet.yaml, then built-ins).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "repository")]
    repo: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
}

impl FleetArgs {
    pub fn run(self) -> Result<()> {
        let (config, host) = super::connect(self.config.as_deref())?;
        let git = GitCli::new();

        let options = if self.apply {
            RunOptions::default()
        } else {
            RunOptions::dry_run()
        };
        let report = FleetOrchestrator::new(&host, &git, &config)
            .run(&options)
            .context("fleet run aborted")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize fleet report")?
            );
        } else {
            print_table(&report);
        }
        Ok(())
    }
}

fn status_label(status: OutcomeStatus) -> String {
    match status {
        OutcomeStatus::Success => "success".green().to_string(),
        OutcomeStatus::Failed => "failed".red().to_string(),
    }
}

fn print_table(report: &FleetReport) {
    let mode = if report.dry_run { "dry-run" } else { "apply" };
    let elapsed = report.finished_at - report.started_at;
    println!(
        "Fleet migration ({mode}) | {} repositories | {} succeeded | {} failed | {}s",
        report.outcomes.len(),
        report.succeeded(),
        report.failed(),
        elapsed.num_seconds(),
    );

    if report.outcomes.is_empty() {
        println!("No candidate repositories found.");
        return;
    }

    let rows: Vec<OutcomeRow> = report
        .outcomes
        .iter()
        .map(|o| OutcomeRow {
            repo: o.repo.clone(),
            status: status_label(o.status),
            detail: o.detail.clone(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if report.dry_run {
        println!("Run 'migrate-fleet --apply' to perform these migrations.");
    }
}
