use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;

use videos_api::api::{create_router, App};
use videos_api::config::Config;
use videos_api::database::Backend;
use videos_api::error::{
    ApplicationError, BindAddressSnafu, ConnectDatabaseSnafu, WebServerSnafu,
};
use videos_api::logger;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    let database = Backend::connect(&config.database)
        .await
        .context(ConnectDatabaseSnafu)?;
    let router = create_router(App::new(database));

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;
    tracing::info!(address = %config.host, "listening for requests");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(WebServerSnafu)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?err, "failed to listen for the shutdown signal");
    }
    tracing::info!("shutting down");
}
