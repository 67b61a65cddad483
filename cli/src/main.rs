//! CLI entrypoint for megaverse
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use megaverse_application::{
    GoalSource, NoProgress, ReconcileError, ReconcileInput, ReconcileProgressNotifier,
    ReconcileUseCase, StaticGoalSource,
};
use megaverse_domain::GoalMap;
use megaverse_infrastructure::{ConfigLoader, FileConfig, MegaverseHttpClient};
use megaverse_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress, set_color_enabled,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Startup or configuration failure
const EXIT_CONFIG: u8 = 1;
/// Goal map could not be fetched
const EXIT_FETCH: u8 = 2;
/// Goal map contained an unparseable cell
const EXIT_PARSE: u8 = 3;
/// `--strict` and at least one object was not created
const EXIT_INCOMPLETE: u8 = 4;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!(e))?
    };
    apply_cli_overrides(&mut config, &cli);

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
    }
    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
    if !errors.is_empty() {
        for issue in errors {
            eprintln!("{}", issue);
        }
        return Ok(ExitCode::from(EXIT_CONFIG));
    }

    if !config.output.color_enabled(cli.no_color) {
        set_color_enabled(false);
    }

    // === Dependency Injection ===
    let candidate_id = config.megaverse.candidate_id.clone().unwrap_or_default();
    let client = Arc::new(
        MegaverseHttpClient::new(
            &config.megaverse.base_url,
            candidate_id,
            config.megaverse.request_timeout(),
        )
        .context("Failed to create API client")?,
    );

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; finishing in-flight requests");
                cancel.cancel();
            }
        });
    }

    match cli.cross {
        Some(size) => {
            info!("Using local {}x{} POLYanet cross", size, size);
            let source = Arc::new(StaticGoalSource::new(&GoalMap::polyanet_cross(size)));
            run(source, client, &config, &cli, cancel).await
        }
        None => {
            let source = Arc::clone(&client);
            run(source, client, &config, &cli, cancel).await
        }
    }
}

/// CLI flags take precedence over every configuration source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(id) = &cli.candidate_id {
        config.megaverse.candidate_id = Some(id.clone());
    }
    if let Some(url) = &cli.base_url {
        config.megaverse.base_url = url.clone();
    }
    if let Some(limit) = cli.concurrency {
        config.dispatch.concurrency_limit = limit;
    }
    if let Some(spacing) = cli.min_request_spacing_ms {
        config.dispatch.min_request_spacing_ms = Some(spacing);
    }
    if let Some(attempts) = cli.max_attempts {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay) = cli.base_delay_ms {
        config.retry.base_delay_ms = delay;
    }
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
}

async fn run<S: GoalSource + 'static>(
    source: Arc<S>,
    client: Arc<MegaverseHttpClient>,
    config: &FileConfig,
    cli: &Cli,
    cancel: CancellationToken,
) -> Result<ExitCode> {
    let use_case =
        ReconcileUseCase::new(source, client, config.dispatch_params()).with_cancellation(cancel);
    let formatter: &dyn OutputFormatter = &ConsoleFormatter;

    if cli.dry_run {
        return match use_case.plan().await {
            Ok(plan) => {
                println!("{}", formatter.format_plan(&plan.goal, &plan.commands));
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(report_fatal(&e)),
        };
    }

    let progress: Box<dyn ReconcileProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if cli.plain {
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let input = ReconcileInput::new().with_repair_passes(cli.repair_passes);
    let output = match use_case.execute_with_progress(input, progress.as_ref()).await {
        Ok(output) => output,
        Err(e) => return Ok(report_fatal(&e)),
    };

    println!(
        "{}",
        formatter.render(config.output.report_format(), &output.report)
    );

    if cli.strict && !output.report.is_complete_success() {
        return Ok(ExitCode::from(EXIT_INCOMPLETE));
    }
    Ok(ExitCode::SUCCESS)
}

fn report_fatal(error: &ReconcileError) -> ExitCode {
    eprintln!("Error: {}", error);
    match error {
        ReconcileError::Fetch(_) => ExitCode::from(EXIT_FETCH),
        ReconcileError::Parse(_) => ExitCode::from(EXIT_PARSE),
        ReconcileError::InvalidParams(_) => ExitCode::from(EXIT_CONFIG),
    }
}
