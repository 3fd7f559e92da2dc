use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;
use wms_flow::{router, AppConfig, AppState};

/// Servidor de workflows guiados del almacén.
#[derive(Debug, Parser)]
#[command(name = "wms-server")]
struct Args {
    /// Dirección de escucha; por defecto `WMS_LISTEN_ADDR` o 127.0.0.1:8080.
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                                     .try_init();

    let config = AppConfig::from_env().context("configuración inválida")?;
    let listen = args.listen.unwrap_or(config.listen_addr);
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(listen).await
                                                        .with_context(|| format!("no se pudo escuchar en {}", listen))?;
    log::info!("wms-server escuchando en http://{} (GraphQL: {})", listen, config.graphql_url);
    axum::serve(listener, app).await.context("el servidor terminó con error")
}
