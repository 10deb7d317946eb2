//! Command-line interface.
//!
//! ```text
//! qore run [--stage <id>] [--config-dir <dir>] [--input key=value]... -- <program> [args]...
//! qore stages [--config-dir <dir>]
//! qore extract [file] [--detailed]
//! ```

use crate::config::QoreConfig;
use crate::events::LoggingEventSink;
use crate::executor::CommandExecutor;
use crate::extraction::ExtractionEngine;
use crate::pipeline::PipelineRunner;
use crate::registry::StageRegistry;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// Runs the Qore financial crew and extracts clean answers from its output.
#[derive(Debug, Parser)]
#[command(name = "qore")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one stage, or every stage in pipeline order.
    Run(RunArgs),

    /// List the registered stages in pipeline order.
    Stages(ConfigArgs),

    /// Extract the answer from a captured output file (or stdin).
    Extract(ExtractArgs),
}

/// Where to find configuration.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Directory containing `config/` and `knowledge/`.
    #[arg(long, env = "QORE_CONFIG_DIR", default_value = ".")]
    pub config_dir: PathBuf,
}

/// Arguments for `qore run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Configuration location.
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Run only this stage (e.g. `budget`, `cashflow`, `savings_agent`).
    #[arg(short, long)]
    pub stage: Option<String>,

    /// Extra or overriding input fields.
    #[arg(short, long = "input", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub inputs: Vec<(String, String)>,

    /// Pretty-print the JSON result.
    #[arg(long)]
    pub pretty: bool,

    /// Program (and its arguments) that executes a single stage. The stage
    /// identifier is appended as the last argument.
    #[arg(required = true, last = true, num_args = 1..)]
    pub command: Vec<String>,
}

/// Arguments for `qore extract`.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// File to read; stdin when omitted.
    pub file: Option<PathBuf>,

    /// Print the answer and the matching tier as JSON.
    #[arg(long)]
    pub detailed: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parses command-line arguments.
#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Runs the parsed command.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or input cannot be
/// read. A failed run is not an error; it is reported in the printed
/// result and through the exit code.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Stages(args) => stages(&args),
        Commands::Extract(args) => extract(&args),
    }
}

fn load_registry(args: &ConfigArgs) -> anyhow::Result<StageRegistry> {
    let config = QoreConfig::load_from_dir(&args.config_dir)
        .context("cannot start without configuration")?;
    Ok(StageRegistry::from_config(&config)?)
}

async fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let registry = load_registry(&args.config)?;

    let mut inputs = registry.inputs_template().clone();
    for (key, value) in args.inputs {
        inputs = inputs.with(key, value);
    }

    let (program, program_args) = args
        .command
        .split_first()
        .context("missing stage program")?;
    let executor = CommandExecutor::new(program.clone())
        .with_args(program_args.iter().cloned())
        .with_working_dir(&args.config.config_dir);

    let runner = PipelineRunner::new(Arc::new(registry), Arc::new(executor))
        .with_event_sink(Arc::new(LoggingEventSink::debug()));

    info!(stage = args.stage.as_deref().unwrap_or("all"), "Starting run");
    let result = match &args.stage {
        Some(stage) => runner.run_stage(stage, &inputs).await,
        None => runner.run_all(&inputs).await,
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn stages(args: &ConfigArgs) -> anyhow::Result<ExitCode> {
    let registry = load_registry(args)?;
    for stage in registry.stages() {
        println!("{}\t{}\t{}", stage.id(), stage.agent.key, stage.agent.role);
    }
    Ok(ExitCode::SUCCESS)
}

fn extract(args: &ExtractArgs) -> anyhow::Result<ExitCode> {
    let raw = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let extraction = ExtractionEngine::new().extract_detailed(&raw);
    if args.detailed {
        println!("{}", serde_json::to_string(&extraction)?);
    } else {
        println!("{}", extraction.answer);
    }
    Ok(ExitCode::SUCCESS)
}
