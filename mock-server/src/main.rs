use std::sync::Arc;

use mock_server::{MockState, DEFAULT_CLIENT_ID, DEFAULT_CLIENT_SECRET};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let client_id = std::env::var("MOCK_CLIENT_ID").unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string());
    let client_secret =
        std::env::var("MOCK_CLIENT_SECRET").unwrap_or_else(|_| DEFAULT_CLIENT_SECRET.to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, base_url = %format!("http://{addr}/v2"), "mock Petfinder API listening");
    mock_server::run_with_state(listener, Arc::new(MockState::new(&client_id, &client_secret))).await
}
