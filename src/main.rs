use activity_exporter::{ExporterConfig, HttpServer};
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "activity-exporter", version, about)]
struct Args {
    /// Interface to bind
    #[arg(long, env = "APP_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "APP_PORT", default_value_t = 8000)]
    port: u16,

    /// Seconds of silence before a script's activity gauge drops to zero
    #[arg(long, env = "IDLE_TIMEOUT", default_value_t = 60)]
    idle_timeout: u64,
}

impl From<Args> for ExporterConfig {
    fn from(args: Args) -> Self {
        ExporterConfig::new(args.port)
            .host(&args.host)
            .idle_timeout(Duration::from_secs(args.idle_timeout))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "activity_exporter=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ExporterConfig::from(Args::parse());
    HttpServer::new(config)?.run().await?;
    Ok(())
}
