use tokio::net::TcpListener;

use volley_relay::{run, RelayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RelayConfig {
        allow_local_targets: std::env::var("RELAY_ALLOW_LOCAL").is_ok_and(|v| v == "1"),
    };

    // Hosting platforms hand out the port via env var
    let port = std::env::var("PORT").unwrap_or_else(|_| "10000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("relay listening on {addr}");
    run(listener, config).await
}
