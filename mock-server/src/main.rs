use mock_server::{parse_flag, MockApi, DEFAULT_SERVER_KEY};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let server_key =
        std::env::var("MAINPAY_SERVER_KEY").unwrap_or_else(|_| DEFAULT_SERVER_KEY.to_string());
    let production = match std::env::var("MAINPAY_PRODUCTION") {
        Ok(raw) => parse_flag(&raw).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("MAINPAY_PRODUCTION must be a boolean, got {raw:?}"),
            )
        })?,
        Err(_) => false,
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, production, "mock MainPay API listening");
    MockApi::new(server_key, production).serve(listener).await
}
