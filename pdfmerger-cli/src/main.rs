//! pdfmerger - client for a PDF merging web service.
//!
//! Selects local PDF files, uploads them to the merge server, requests the
//! merge and fetches the result.

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, ListArgs, StatusArgs};
use pdfmerger::api::{ApiClient, ApiEnvelope, StatusPoller, StatusResponse};
use pdfmerger::config::Config;
use pdfmerger::error::MergerError;
use pdfmerger::output::{
    OutputFormatter, ProgressBar, display_file_list, display_merge_summary,
};
use pdfmerger::selection::load_selection;
use pdfmerger::summary::{MergeSummary, merge_list};
use pdfmerger::utils::format_file_size;
use pdfmerger::workflow::{plan_merge, run_merge};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "pdfmerger=debug"
    } else if quiet {
        "pdfmerger=error"
    } else {
        "pdfmerger=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), MergerError> {
    cli.validate()?;
    let config = cli.to_config()?;
    tracing::debug!(?config, "Resolved configuration");
    let formatter = OutputFormatter::from_config(&config);

    if formatter.is_verbose() {
        formatter.section(&format!("{} v{}", pdfmerger::NAME, pdfmerger::VERSION));
        formatter.detail("Server", config.server.as_str());
        formatter.blank_line();
    }

    match &cli.command {
        Command::List(args) => list(&config, args, &formatter).await,
        Command::Upload(_) => upload(&config, &formatter).await,
        Command::Merge(_) => merge(&config, &formatter).await,
        Command::Status(args) => status(&config, args, &formatter).await,
    }
}

async fn list(
    config: &Config,
    args: &ListArgs,
    formatter: &OutputFormatter,
) -> Result<(), MergerError> {
    let mut selection = load_selection(config.inputs()).await?;
    config.order.apply(&mut selection);

    for &index in &args.remove {
        let removed = selection.remove(index)?;
        formatter.debug(&format!("Removed {}", removed.name));
    }

    display_file_list(formatter, &selection.render());
    Ok(())
}

async fn upload(config: &Config, formatter: &OutputFormatter) -> Result<(), MergerError> {
    let mut selection = load_selection(config.inputs()).await?;
    let plan = plan_merge(&mut selection, config)?;
    let client = ApiClient::from_config(config)?;

    formatter.info(&format!("Uploading {} file(s)...", plan.files.len()));
    let response = client.upload_files(&plan.files).await?.into_result()?;

    let session_id = response
        .session_id
        .as_deref()
        .ok_or_else(|| MergerError::invalid_response("upload response has no session_id"))?;

    let items = merge_list(&response.files);
    display_merge_summary(formatter, &items, &MergeSummary::from_items(&items));
    formatter.blank_line();
    formatter.result(session_id);
    Ok(())
}

async fn merge(config: &Config, formatter: &OutputFormatter) -> Result<(), MergerError> {
    let mut selection = load_selection(config.inputs()).await?;

    // Dry run mode - stop after checking the selection
    if config.dry_run {
        let plan = plan_merge(&mut selection, config)?;
        display_file_list(formatter, &selection.render());
        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!(
            "  Would upload {} file(s) ({}) to {}",
            plan.files.len(),
            format_file_size(plan.total_size),
            config.server
        ));
        formatter.info(&format!("  Output would be: {}", config.output_filename));
        return Ok(());
    }

    let client = ApiClient::from_config(config)?;
    let mut bar = ProgressBar::new();

    formatter.info("Uploading files...");
    let outcome = run_merge(
        &client,
        &mut selection,
        config,
        Some(&mut bar),
        |status: &StatusResponse| report_status(formatter, status),
    )
    .await?;

    display_merge_summary(formatter, &outcome.items, &outcome.summary);
    formatter.blank_line();

    let filename = outcome
        .merge
        .filename
        .as_deref()
        .unwrap_or(&config.output_filename);
    formatter.success(&format!("Merged into {filename}"));

    match (&outcome.downloaded, outcome.merge.download_url.as_deref()) {
        (Some(path), _) => formatter.result(&path.display().to_string()),
        (None, Some(url)) => formatter.result(url),
        (None, None) => {}
    }

    Ok(())
}

async fn status(
    config: &Config,
    args: &StatusArgs,
    formatter: &OutputFormatter,
) -> Result<(), MergerError> {
    let client = ApiClient::from_config(config)?;

    let status = if args.wait {
        let poller = StatusPoller::new(config.poll_interval, config.max_polls);
        poller
            .wait_for_completion(&client, &args.task_id, |status| {
                report_status(formatter, status)
            })
            .await?
    } else {
        client.check_status(&args.task_id).await?
    };

    formatter.result(&format_status(&status));
    if let Some(message) = &status.message {
        formatter.detail("Message", message);
    }
    Ok(())
}

fn report_status(formatter: &OutputFormatter, status: &StatusResponse) {
    formatter.debug(&format_status(status));
}

fn format_status(status: &StatusResponse) -> String {
    match status.progress {
        Some(progress) => format!("{} ({progress}%)", status.status),
        None => status.status.clone(),
    }
}
