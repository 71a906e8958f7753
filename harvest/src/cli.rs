//! Command-line surface of the harness.

use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Dependencies;
use crate::HarvestError;
use harvest_pipeline::{CollectorRegistry, Orchestrator, OrchestratorConfig};
use harvest_repository::IndexStore;

#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(about = "Push records from registered collectors into OpenSearch", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// OpenSearch URL, overrides HARVEST_OPENSEARCH_URL
    #[arg(long, global = true)]
    pub opensearch_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List registered collectors
    List,
    /// Push collectors selected by namespace or qualified name
    Push {
        /// Namespaces or qualified names; none lists the collectors
        selectors: Vec<String>,

        /// Walk the records without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Do not log progress
        #[arg(long)]
        no_progress: bool,
    },
    /// Check that OpenSearch is reachable and healthy
    Health,
}

/// Run the parsed command line against `registry`, writing to stdout.
///
/// Listing never builds a store client.
pub async fn run(cli: Cli, registry: CollectorRegistry) -> Result<(), HarvestError> {
    let mut stdout = io::stdout();

    match cli.command {
        Command::List => list(&registry, &mut stdout),
        Command::Push { ref selectors, .. } if selectors.is_empty() => {
            list(&registry, &mut stdout)
        }
        Command::Health => {
            let deps = Dependencies::new(cli.opensearch_url.as_deref())?;
            deps.verify().await?;
            writeln!(stdout, "OpenSearch is healthy")?;
            Ok(())
        }
        ref command => {
            let deps = Dependencies::new(cli.opensearch_url.as_deref())?;
            execute(command, registry, deps.store, &mut stdout).await
        }
    }
}

/// Run a command that needs no cluster health check against `store`.
pub async fn execute(
    command: &Command,
    registry: CollectorRegistry,
    store: Arc<dyn IndexStore>,
    out: &mut dyn Write,
) -> Result<(), HarvestError> {
    match command {
        Command::List => list(&registry, out),
        Command::Push {
            selectors,
            dry_run,
            no_progress,
        } => {
            if selectors.is_empty() {
                return list(&registry, out);
            }
            let config = OrchestratorConfig {
                dry_run: *dry_run,
                progress: !*no_progress,
            };
            push(Orchestrator::with_config(registry, store, config), selectors, out).await
        }
        Command::Health => Err(HarvestError::config(
            "health check needs an OpenSearch client",
        )),
    }
}

fn list(registry: &CollectorRegistry, out: &mut dyn Write) -> Result<(), HarvestError> {
    for entry in registry.list() {
        writeln!(out, "{}", entry.qualified_name())?;
    }
    Ok(())
}

async fn push(
    orchestrator: Orchestrator,
    selectors: &[String],
    out: &mut dyn Write,
) -> Result<(), HarvestError> {
    let matched = orchestrator.matched(selectors)?;
    writeln!(out, "Matched {} collectors", matched.len())?;

    let mut write_error = None;
    let report = orchestrator
        .run_with(selectors, |collector| {
            if write_error.is_none() {
                write_error =
                    writeln!(out, "{} pushed {} records", collector.name, collector.pushed()).err();
            }
        })
        .await?;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    report.into_result()?;
    info!("All collectors pushed");
    Ok(())
}
