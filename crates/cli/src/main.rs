use std::{path::PathBuf, process::ExitCode, time::Duration};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    sitediff_browser::BrowserSession,
    sitediff_config::{has_errors, validate},
    sitediff_runner::{RunContext, RunOptions, Runner},
};

#[derive(Parser)]
#[command(
    name = "sitediff",
    about = "sitediff — visual-regression diffing between dev and prod deployments"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: discover sitediff.{toml,yaml,yml,json}).
    #[arg(long, global = true, env = "SITEDIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of stored baseline captures (overrides the config value).
    #[arg(long)]
    baseline_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture and diff every configured page (default).
    Run,
    /// Check the config file and print diagnostics.
    Validate,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = match &cli.config {
        Some(path) => sitediff_config::load_config(path)?,
        None => sitediff_config::discover_and_load()?,
    };

    let diagnostics = validate(&config);
    if matches!(cli.command, Some(Commands::Validate)) {
        if diagnostics.is_empty() {
            println!("config ok: {} pages", config.pages.len());
            return Ok(ExitCode::SUCCESS);
        }
        for d in &diagnostics {
            println!("{d}");
        }
        return Ok(if has_errors(&diagnostics) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    for d in &diagnostics {
        eprintln!("{d}");
    }
    if has_errors(&diagnostics) {
        anyhow::bail!("configuration is invalid, see diagnostics above");
    }

    let baseline = cli
        .baseline_dir
        .clone()
        .or_else(|| config.baseline().map(PathBuf::from));

    let ctx = RunContext::new(
        &config.project_name,
        &config.dev_domain,
        &config.prod_domain,
        chrono::Local::now().date_naive(),
        baseline,
    );

    info!(
        project = config.project_name,
        date = ctx.date,
        targets = config.pages.len(),
        baseline = ctx.has_baseline(),
        "starting run"
    );

    let session = BrowserSession::launch(&config.capture).await?;

    let opts = RunOptions {
        scroll_step: config.capture.step_height(),
        settle_timeout: Duration::from_millis(config.capture.settle_timeout_ms),
        threshold: config.compare.threshold,
    };

    // All diffs have resolved when run() returns, so the session can close
    // before the report is examined.
    let result = Runner::new(session.renderer(), &ctx, opts)
        .run(&config.pages)
        .await;
    session.close().await?;
    let report = result?;

    for target in &report.targets {
        println!("{}: {}", target.name, target.status);
    }

    let failed = report.failed_count();
    if failed > 0 {
        println!("{failed} of {} targets failed", report.targets.len());
        return Ok(ExitCode::FAILURE);
    }
    println!("{} targets diffed", report.targets.len());
    Ok(ExitCode::SUCCESS)
}
