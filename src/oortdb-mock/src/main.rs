use std::net::TcpListener;

use anyhow::Result;

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let address = std::env::var("OORTDB_MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:8529".to_string());
    let listener = TcpListener::bind(&address)?;

    tracing::info!("oortdb-mock listening on {address}");
    oortdb_mock::server(listener)?.await?;

    Ok(())
}
