//! CLI entrypoint for tooltrial
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod suite;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use suite::{SuiteSettings, run_suite};
use tokio_util::sync::CancellationToken;
use tooltrial_application::{DeploymentManager, NoRateGate, ProviderCaller, RateGate};
use tooltrial_infrastructure::{
    ConfigLoader, FileConfig, IntervalRateGate, OpenAiCompatibleClient,
    RotatingDeploymentManager, load_registry, load_tasks,
};
use tooltrial_presentation::{Cli, Command, ConsoleFormatter, OutputFormat, RunArgs, SuiteProgress};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting tooltrial");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    match cli.command {
        Command::ShowConfig => {
            if cli.no_config {
                println!("Configuration files disabled (--no-config)");
            } else {
                ConfigLoader::print_config_sources(cli.config.as_ref());
            }
            println!();
            println!("Merged configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Run(args) => run(config, args).await,
    }
}

/// Stderr logging by verbosity, plus an optional plain-text log file.
///
/// `RUST_LOG` takes precedence over `-v` when set.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn run(mut config: FileConfig, args: RunArgs) -> Result<()> {
    // CLI flags win over every config layer
    if let Some(model) = &args.model {
        config.provider.model = model.clone();
    }
    if let Some(rate) = args.base_success_rate {
        config.simulator.base_success_rate = rate;
    }
    if let Some(turns) = args.max_turns {
        config.episode.max_turns = Some(turns);
    }
    if let Some(rpm) = args.requests_per_minute {
        config.rate_limit.requests_per_minute = Some(rpm);
    }
    if args.seed.is_some() {
        config.simulator.seed = args.seed;
    }
    if let Some(dir) = &args.transcripts {
        config.output.transcript_dir = Some(dir.clone());
    }
    if !config.output.color {
        colored::control::set_override(false);
    }
    config.validate().context("Invalid configuration")?;

    // === Catalog ===
    let registry = Arc::new(
        load_registry(&args.tools)
            .with_context(|| format!("Failed to load tools from {}", args.tools.display()))?,
    );
    let tasks = load_tasks(&args.tasks)
        .with_context(|| format!("Failed to load tasks from {}", args.tasks.display()))?;
    info!(
        tools = registry.len(),
        tasks = tasks.len(),
        "Catalog loaded"
    );

    // === Dependency Injection ===
    let client = Arc::new(OpenAiCompatibleClient::from_config(&config.provider));
    let rate_gate: Arc<dyn RateGate> = match config.rate_limit.requests_per_minute {
        Some(rpm) => Arc::new(IntervalRateGate::per_minute(rpm)),
        None => Arc::new(NoRateGate),
    };
    let deployments: Arc<dyn DeploymentManager> =
        Arc::new(RotatingDeploymentManager::new(config.deployments.clone()));
    let caller = ProviderCaller::new(client)
        .with_rate_gate(rate_gate)
        .with_deployments(deployments)
        .with_policy(config.retry_policy());

    let settings = SuiteSettings {
        model: config.provider.model.clone(),
        concurrency: usize::from(args.concurrency),
        params: config.episode_params(),
        base_success_rate: config.simulator.base_success_rate,
        seed: config.simulator.seed,
        transcript_dir: config.output.transcript_dir.clone(),
    };

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling remaining episodes");
            ctrl_c_token.cancel();
        }
    });

    let progress = (!args.quiet).then(|| SuiteProgress::new(tasks.len()));
    let outcomes = run_suite(caller, registry, tasks, &settings, token, progress.as_ref()).await;
    if let Some(progress) = &progress {
        progress.finish();
    }

    let output = match args.output {
        OutputFormat::Table => ConsoleFormatter::format(&outcomes, &settings.model),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcomes, &settings.model),
    };
    println!("{}", output);

    Ok(())
}
