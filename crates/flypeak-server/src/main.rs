use clap::Parser;
use tracing_subscriber::EnvFilter;

use flypeak_detect::{BlobScorer, Detector};
use flypeak_server::{DetectionServer, ServerConfig};

mod cli;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!("flypeak v{}", env!("CARGO_PKG_VERSION"));

    let mut config = if let Some(config_path) = &cli.config {
        let data = std::fs::read_to_string(config_path)?;
        serde_json::from_str(&data)?
    } else {
        ServerConfig::default()
    };

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let scorer = BlobScorer::new(&config.scorer)?;
            let detector = Detector::new(Box::new(scorer), config.detector.clone());
            detector.warmup()?;

            let server = DetectionServer::bind((config.host.as_str(), config.port), detector)?;
            tracing::info!(host = %config.host, port = config.port, "serving detection requests");
            server.run()?;
        }
        Command::Process {
            input,
            heatmap,
            upsample,
        } => {
            let scorer = BlobScorer::new(&config.scorer)?;
            let detector = Detector::new(Box::new(scorer), config.detector.clone());
            cli::process_file(&detector, &input, heatmap, upsample)?;
        }
    }

    Ok(())
}
