mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trendscope_brief::{
    AlertThresholds, AutoRefresh, BriefOutcome, RefreshPolicy, TrendBriefService,
};
use trendscope_core::{default_brands, load_brands};
use trendscope_genai::{build_client, ClientConfig};

use crate::store::FileStore;

#[derive(Debug, Parser)]
#[command(name = "trendscope")]
#[command(about = "Influencer trend-brief generation from the command line")]
struct Cli {
    /// Directory holding persisted refresh state.
    #[arg(long, default_value = ".trendscope")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a trend brief from an influencer content batch.
    Brief {
        /// JSON file: array of influencer records.
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, default_value = "48 hours")]
        timeframe: String,
        /// Regenerate even when the existing brief is still fresh.
        #[arg(long)]
        force: bool,
    },
    /// Ask a free-form question over the content batch.
    Query {
        #[arg(short, long)]
        input: PathBuf,
        question: String,
    },
    /// Scan the content batch for engagement threshold breaches.
    Alerts {
        #[arg(short, long)]
        input: PathBuf,
        /// Engagement-rate breach threshold, percent.
        #[arg(long, default_value_t = 5.0)]
        engagement_rate: f64,
        /// View-count breach threshold.
        #[arg(long, default_value_t = 100_000)]
        views: u64,
    },
    /// Run the periodic auto-refresh loop until interrupted.
    Watch {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, default_value = "48 hours")]
        timeframe: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = trendscope_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let brands = match &config.brands_path {
        Some(path) => load_brands(path)?.brands,
        None => default_brands(),
    };

    let client = build_client(&ClientConfig {
        api_url: config.genai_api_url.clone(),
        api_key: config.genai_api_key.clone(),
        model: config.genai_model.clone(),
        request_timeout_secs: config.genai_request_timeout_secs,
    })?;

    let store = Arc::new(FileStore::new(&cli.state_dir));
    let service = Arc::new(TrendBriefService::new(
        client,
        store,
        RefreshPolicy::hours(config.refresh_interval_hours),
        std::time::Duration::from_millis(config.genai_min_interval_ms),
        brands,
    ));

    match cli.command {
        Commands::Brief {
            input,
            timeframe,
            force,
        } => {
            load_batch(&service, &input)?;
            match service.generate_brief(&timeframe, force).await? {
                BriefOutcome::Generated(brief) => {
                    println!("{}", serde_json::to_string_pretty(&brief)?);
                }
                BriefOutcome::Skipped {
                    last_generated_at,
                    next_due_at,
                } => {
                    println!(
                        "brief is still fresh (generated {last_generated_at}); \
                         next refresh due {next_due_at} — pass --force to regenerate"
                    );
                }
            }
        }
        Commands::Query { input, question } => {
            load_batch(&service, &input)?;
            let answer = service.query(&question).await?;
            println!("{answer}");
        }
        Commands::Alerts {
            input,
            engagement_rate,
            views,
        } => {
            load_batch(&service, &input)?;
            let thresholds = AlertThresholds {
                engagement_rate_pct: engagement_rate,
                min_views: views,
            };
            let alerts = service.alerts(&thresholds).await?;
            if alerts.is_empty() {
                println!("no alerts — all tracked content is within thresholds");
            } else {
                for alert in &alerts {
                    println!("{alert}");
                }
            }
        }
        Commands::Watch { input, timeframe } => {
            anyhow::ensure!(
                config.auto_refresh,
                "auto-refresh is disabled — set TRENDSCOPE_AUTO_REFRESH=true to run watch mode"
            );
            load_batch(&service, &input)?;
            let period = service
                .policy()
                .interval()
                .to_std()
                .context("refresh interval out of range")?;
            let auto = AutoRefresh::start(Arc::clone(&service), timeframe, period).await?;
            tracing::info!(period_secs = period.as_secs(), "auto-refresh running — press ctrl-c to stop");
            shutdown_signal().await;
            auto.shutdown().await?;
        }
    }

    Ok(())
}

fn load_batch(service: &TrendBriefService, input: &Path) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let batch: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("input must be a JSON array of influencer records")?;
    Ok(service.load_content(&batch))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping auto-refresh");
}
