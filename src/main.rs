use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use aldoria_server::payments::StaticPixIssuer;
use aldoria_server::{AppState, api, database};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let database_url = env::var("DATABASE_URL").expect("Expected DATABASE_URL in the environment.");
    let pool = database::init::connect(&database_url)
        .await
        .expect("Failed to connect to the database.");

    let pix_key = env::var("PIX_KEY").unwrap_or_else(|_| "pagamentos@aldoria.example".to_string());
    let state = AppState::new(pool, Arc::new(StaticPixIssuer::new(pix_key)));

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .expect("BIND_ADDR must be a valid socket address.");

    let app = api::router(state);
    tracing::info!(target: "server", %bind_addr, "starting");

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind the listen address.");
    axum::serve(listener, app)
        .await
        .expect("Server exited with an error.");
}
