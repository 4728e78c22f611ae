mod output;

use anyhow::{bail, Context, Result};
use clap::Parser;
use scout_browser::ChromiumLauncher;
use scout_core::AppConfig;
use scout_llm::{FilterInterpreter, GeminiProvider};
use scout_search::{output_path, plan_from_raw, write_csv, SearchOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Search the breeders directory with a plain-language request.
#[derive(Debug, Parser)]
#[command(name = "herdscout", version, about)]
struct Args {
    /// What to search for, e.g. "find members in Kansas and Texas"
    command: Vec<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the interpreted filters and planned searches, then exit
    #[arg(long)]
    plan_only: bool,

    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,herdscout=debug,scout=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_env();
            config
        }
        None => AppConfig::load_with_env().context("Failed to load config")?,
    };

    if args.headed {
        config.browser.headless = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_command(args: &Args) -> Result<String> {
    let command = if args.command.is_empty() {
        dialoguer::Input::<String>::new()
            .with_prompt("What would you like to search for?")
            .interact_text()
            .context("Failed to read search request")?
    } else {
        args.command.join(" ")
    };

    let command = command.trim().to_string();
    if command.is_empty() {
        bail!("No search request given");
    }
    Ok(command)
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_tracing();

    info!("Starting herdscout v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = load_config(&args)?;

    let Some(api_key) = config.llm.api_key.clone() else {
        bail!("GEMINI_API_KEY is not set. Add it to your environment or a .env file.");
    };

    let command = read_command(&args)?;

    let provider = GeminiProvider::with_model(api_key, &config.llm.model)
        .and_then(|provider| provider.with_timeout(config.llm.timeout_secs))
        .context("Failed to create Gemini client")?;
    let interpreter =
        FilterInterpreter::new(Arc::new(provider)).with_temperature(config.llm.temperature);

    let filters = interpreter.interpret(&command).await;
    let plan = plan_from_raw(&filters);
    println!("{}", output::format_filters(&filters));
    println!("{}", output::format_plan(&plan));

    if args.plan_only {
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping after the current search");
            on_interrupt.cancel();
        }
    });

    let launcher = Arc::new(ChromiumLauncher::new(config.browser.clone()));
    let orchestrator = SearchOrchestrator::new(launcher, config.search.clone())
        .context("Failed to set up search")?;

    let report = orchestrator.run(&plan, &cancel).await;
    println!("\n{}", report.summary());

    if report.dataset.is_empty() {
        println!("No results found across all searches.");
        return Ok(());
    }

    let path = output_path(&config.output, &chrono::Local::now());
    write_csv(&path, &report.dataset)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "Found {} unique records. Saved to {}",
        report.dataset.len(),
        path.display()
    );
    println!(
        "{}",
        output::format_preview(&report.dataset, config.output.preview_rows)
    );

    Ok(())
}
