use clap::Parser;
use geocluster_worker::{ClusterService, WorkerConfig, run_stdio};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with worker settings and default cluster options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Requests buffered before input is paused
    #[arg(short, long)]
    queue_capacity: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geocluster_worker=info,geocluster=info,info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            WorkerConfig::load(path)?
        }
        None => WorkerConfig::default(),
    };
    if let Some(capacity) = args.queue_capacity {
        config = config.with_queue_capacity(capacity);
    }
    config.validate().map_err(anyhow::Error::msg)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl_c signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    run_stdio(
        ClusterService::new(config.options),
        config.queue_capacity,
        tokio::io::stdin(),
        tokio::io::stdout(),
        shutdown,
    )
    .await
}
