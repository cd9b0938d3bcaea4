use emberkv::{server, store::Storage};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging (DEBUG level for detailed request tracing)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .init();

    info!("EmberKV starting...");

    let addr = "127.0.0.1:6379";
    let storage = Arc::new(Storage::new());

    if let Err(e) = server::run(addr, storage).await {
        error!("server error: {}", e);
        std::process::exit(1);
    }
}
