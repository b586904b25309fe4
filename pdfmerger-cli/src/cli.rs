//! CLI argument parsing for pdfmerger.
//!
//! This module defines the command-line interface structure using `clap`.
//! The same definition is compiled into the build script to render the man
//! page, so it only depends on `clap` and the library.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pdfmerger::config::{
    Config, DEFAULT_MAX_POLLS, DEFAULT_OUTPUT_FILENAME, DEFAULT_POLL_INTERVAL, DEFAULT_SERVER_URL,
    MergeOrder, normalize_output_filename,
};
use pdfmerger::error::{MergerError, Result};

/// Upload PDF files to a merge server and fetch the merged document.
#[derive(Parser, Debug)]
#[command(name = "pdfmerger")]
#[command(version)]
#[command(about = "Client for a PDF merging web service", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Base URL of the merge server
    #[arg(
        long,
        global = true,
        value_name = "URL",
        env = "PDFMERGER_SERVER",
        default_value = DEFAULT_SERVER_URL
    )]
    pub server: String,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbose output - show requests, status updates and details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors, warnings and command results are printed.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the PDF files of a selection and their total size
    ///
    /// Non-PDF files are accepted but not listed.
    ///
    /// Examples:
    ///   pdfmerger list scans/
    ///   pdfmerger list a.pdf b.pdf notes.txt --remove 0
    List(ListArgs),

    /// Upload files and show what the server accepted
    Upload(UploadArgs),

    /// Upload files, merge them and optionally download the result
    ///
    /// Examples:
    ///   pdfmerger merge chapter*.pdf -o book.pdf --download .
    ///   pdfmerger merge a.pdf b.pdf --order upload_order
    Merge(MergeArgs),

    /// Show the status of a merge task
    Status(StatusArgs),
}

/// Arguments of `list`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Files, directories or glob patterns
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Remove the file at this position before listing (repeatable)
    ///
    /// Removals are applied one after another, so later indices refer to
    /// the list after earlier removals.
    #[arg(long = "remove", value_name = "INDEX")]
    pub remove: Vec<usize>,

    /// Sort the list before rendering
    #[arg(long, value_name = "ORDER")]
    #[arg(value_parser = ["filename", "upload_order"])]
    pub order: Option<String>,
}

/// Arguments of `upload`.
#[derive(Args, Debug, Default)]
pub struct UploadArgs {
    /// Files, directories or glob patterns
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,
}

/// Status polling settings.
#[derive(Args, Debug)]
pub struct PollArgs {
    /// Milliseconds between two status checks
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub poll_interval_ms: u64,

    /// Status checks before giving up
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_POLLS)]
    pub max_polls: u32,
}

impl Default for PollArgs {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

/// Arguments of `merge`.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Files, directories or glob patterns
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Name of the merged document (".pdf" is added when missing)
    #[arg(short, long, value_name = "NAME", default_value = DEFAULT_OUTPUT_FILENAME)]
    pub output: String,

    /// Order of the merged files
    ///
    /// - filename: sort by file name, as the server does (default)
    /// - upload_order: keep the order given on the command line
    #[arg(long, value_name = "ORDER", default_value = "filename")]
    #[arg(value_parser = ["filename", "upload_order"])]
    pub order: String,

    /// Download the merged document into this directory
    #[arg(short, long, value_name = "DIR")]
    pub download: Option<PathBuf>,

    /// Dry run - check the selection without contacting the server
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Do not show the upload progress bar
    #[arg(long)]
    pub no_progress: bool,

    #[command(flatten)]
    pub poll: PollArgs,
}

impl Default for MergeArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: DEFAULT_OUTPUT_FILENAME.to_string(),
            order: "filename".to_string(),
            download: None,
            dry_run: false,
            no_progress: false,
            poll: PollArgs::default(),
        }
    }
}

/// Arguments of `status`.
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Task identifier returned by the merge call
    #[arg(value_name = "TASK_ID")]
    pub task_id: String,

    /// Keep polling until the task completes or fails
    #[arg(short, long)]
    pub wait: bool,

    #[command(flatten)]
    pub poll: PollArgs,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The server URL does not parse
    /// - The merge order or output name is invalid
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::new(Config::parse_server(&self.server)?);
        config.timeout = self.timeout.map(Duration::from_secs);
        config.verbose = self.verbose;
        config.quiet = self.quiet;

        match &self.command {
            Command::List(args) => {
                config.inputs = args.inputs.clone();
                config.order = match &args.order {
                    Some(order) => MergeOrder::from_str(order)?,
                    None => MergeOrder::UploadOrder,
                };
            }
            Command::Upload(args) => {
                config.inputs = args.inputs.clone();
                config.order = MergeOrder::UploadOrder;
            }
            Command::Merge(args) => {
                config.inputs = args.inputs.clone();
                config.output_filename = normalize_output_filename(&args.output)?;
                config.order = MergeOrder::from_str(&args.order)?;
                config.download_dir = args.download.clone();
                config.dry_run = args.dry_run;
                config.show_progress = !args.no_progress && !self.quiet;
                args.poll.apply(&mut config);
            }
            Command::Status(args) => {
                args.poll.apply(&mut config);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if self.timeout == Some(0) {
            return Err(MergerError::invalid_config(
                "Timeout must be at least 1 second",
            ));
        }

        match &self.command {
            Command::List(args) if args.inputs.is_empty() => Err(MergerError::NoFilesSelected),
            Command::Upload(args) if args.inputs.is_empty() => Err(MergerError::NoFilesSelected),
            Command::Merge(args) if args.inputs.is_empty() => Err(MergerError::NoFilesSelected),
            Command::Status(args) if args.task_id.trim().is_empty() => {
                Err(MergerError::invalid_config("Task ID must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

impl PollArgs {
    fn apply(&self, config: &mut Config) {
        config.poll_interval = Duration::from_millis(self.poll_interval_ms);
        config.max_polls = self.max_polls;
    }
}
