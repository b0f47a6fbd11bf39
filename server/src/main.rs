use std::process::ExitCode;

use atlas_server::{db::clients::postgres::PgClient, web};
use tokio::net::TcpListener;
use tracing::{error, warn};

mod vars {
    pub const LISTEN_ADDR: &str = "LISTEN_ADDR";
}

mod defaults {
    pub const LISTEN_ADDR: &str = "0.0.0.0:3000";
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().init();

    let db = match PgClient::open().await {
        Ok(db) => db,
        Err(err) => {
            error!("failed to open database: {err}");
            return ExitCode::FAILURE;
        }
    };

    let router = web::router(db);

    let listen_addr = match std::env::var(vars::LISTEN_ADDR) {
        Ok(addr) => addr,
        Err(_) => {
            warn!(
                "{} not set; using default of {}",
                vars::LISTEN_ADDR,
                defaults::LISTEN_ADDR
            );
            defaults::LISTEN_ADDR.to_string()
        }
    };

    let listener = match TcpListener::bind(&listen_addr).await {
        Ok(l) => l,
        Err(err) => {
            error!("failed to listen on {listen_addr}: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = axum::serve(listener, router).await {
        error!("failed to start server: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
