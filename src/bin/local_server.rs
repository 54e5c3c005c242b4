//! Local HTTP server for the items API.
//!
//! Uses DynamoDB when `TABLE_NAME` is set, otherwise an in-memory store.

use modular_stack::handler::{DynamoItemStore, ItemStore, MemoryItemStore};
use modular_stack::{common_routes, items_routes, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("modular_stack=info,local_server=info")),
        )
        .init();

    let store: Arc<dyn ItemStore> = match std::env::var("TABLE_NAME") {
        Ok(table_name) if !table_name.is_empty() => Arc::new(DynamoItemStore::new(table_name).await),
        _ => {
            tracing::info!("TABLE_NAME not set; using in-memory store");
            Arc::new(MemoryItemStore::new())
        }
    };

    let app = common_routes().merge(items_routes(AppState::new(store)));
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into());
    let listener = TcpListener::bind(&addr).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("Items API listening on http://127.0.0.1:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}
