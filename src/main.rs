//! ticketd server binary.
//!
//! Run with:
//!   MONGO_URI=mongodb://localhost:27017/tickets cargo run
//!   MONGO_URI=memory:// RUST_LOG=debug cargo run
//!
//! Without `MONGO_URI` the server still listens, and ticket requests answer
//! 500 with the missing setting as their error.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ticketd::store;
use ticketd::{Config, Error, Server, api};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ticketd=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    info!(addr = %config.listen_addr(), "configuration loaded");

    let store = store::open(config.database_url.as_deref(), config.database_name.as_deref()).await;
    let app = api::router(store);

    info!("server running on http://localhost:{}", config.port);
    Server::bind(config.listen_addr()).serve(app).await
}
