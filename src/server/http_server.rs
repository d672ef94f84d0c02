use crate::config::ExporterConfig;
use crate::core::Result;
use crate::web::{AppState, router};
use tokio::net::TcpListener;
use tracing::{info, warn};

pub struct HttpServer {
    config: ExporterConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: ExporterConfig) -> Result<Self> {
        config.validate()?;
        let state = AppState::new(&config)?;
        Ok(Self { config, state })
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        info!(
            addr = %listener.local_addr()?,
            idle_timeout_secs = self.config.idle_timeout.as_secs(),
            "activity exporter listening"
        );

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("activity exporter stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
