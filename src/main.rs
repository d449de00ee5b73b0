// --- Catálogo de cursos - servidor HTTP ---

use catalogo::config::Settings;
use catalogo::run_server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalogo=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().map_err(std::io::Error::other)?;
    tracing::info!("=== Catálogo de cursos (API) ===");
    tracing::info!("datos en {:?}", settings.data_dir);
    run_server(settings).await
}
