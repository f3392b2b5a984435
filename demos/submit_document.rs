//! Submits a document to the configured endpoint.
//!
//! Run with: `cargo run --example submit_document -- [endpoint]`
//!
//! Without an argument the default upstream endpoint is used.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use window_gate::{ClientConfig, Document, DocumentClient, Product, RateLimiterConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = ClientConfig::new(RateLimiterConfig::per_second(3));
    if let Some(endpoint) = std::env::args().nth(1) {
        config = config.with_endpoint(endpoint);
    }

    let client = DocumentClient::new(config)?;
    let document = Document::builder("demo-1", "LP_INTRODUCE_GOODS")
        .doc_status("DRAFT")
        .participant_inn("7700000000")
        .owner_inn("7700000000")
        .producer_inn("7700000000")
        .production_date("2024-01-15")
        .production_type("OWN_PRODUCTION")
        .product(Product {
            tnved_code: "6401100000".into(),
            uit_code: "010463003407001221SxMGorvNuq6Wk91fgr92sHWN".into(),
            ..Product::default()
        })
        .registration("2024-01-15", "R-1")
        .build();

    info!(endpoint = client.endpoint(), "Submitting document");
    match client.create_document(&document, "demo-signature") {
        Ok(response) => {
            println!("Response status code: {}", response.status);
            println!("Response body: {}", response.body);
        }
        Err(e) => error!(error = %e, "Submission failed"),
    }

    Ok(())
}
