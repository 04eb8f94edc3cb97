mod client;
mod server;
mod tools;

use anyhow::Context;
use tokio::io::BufReader;

use client::HttpBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let base_url =
        std::env::var("KNOT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let backend = HttpBackend::new(&base_url).context("Failed to create HTTP client")?;

    tracing::info!("Knot tool server running on stdio");
    tracing::info!("Forwarding tool calls to {}", backend.endpoint());

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    server::serve(stdin, stdout, &backend)
        .await
        .context("stdio transport failed")?;

    Ok(())
}
