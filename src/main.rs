use std::sync::Arc;

use campuscrush::config::ServiceConfig;
use campuscrush::deletion::{DeletionRouteState, DeletionService, deletion_routes};
use campuscrush::store::{IdentityProvider, ProfileStore, SupabaseBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServiceConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  required: SUPABASE_URL, SUPABASE_ANON_KEY, SUPABASE_SERVICE_ROLE_KEY");
        std::process::exit(1);
    });

    eprintln!("CampusCrush delete-user v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Supabase: {}", config.supabase_url);
    eprintln!("   Endpoint: http://0.0.0.0:{}/delete-user\n", config.port);

    let backend = Arc::new(SupabaseBackend::new(&config));
    let service = Arc::new(DeletionService::new(
        Arc::clone(&backend) as Arc<dyn IdentityProvider>,
        Arc::clone(&backend) as Arc<dyn ProfileStore>,
    ));

    let app = deletion_routes(DeletionRouteState { service });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Deletion endpoint started");
    axum::serve(listener, app).await?;

    Ok(())
}
