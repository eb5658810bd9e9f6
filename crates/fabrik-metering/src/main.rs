//! Fabrik metering dry run
//!
//! Reads an AdmissionReview from a file (or stdin), derives the metering
//! documents it would create, and prints them as JSON.

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fabrik_common::AdmissionReview;
use fabrik_metering::{InMemoryStore, MeteringConfig, MeteringProcessor, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    let config = MeteringConfig::load()?;

    // Initialize tracing; stdout is reserved for the documents
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting fabrik-metering v{}", VERSION);

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read(&path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading admission review from stdin")?;
            buf
        }
    };
    let review = AdmissionReview::from_slice(&raw).context("decoding admission review")?;

    let store = Arc::new(InMemoryStore::new());
    let processor = MeteringProcessor::new(store.clone(), &config);
    let outcome = processor.process(&review).await?;
    info!(?outcome, "Admission review processed");

    println!("{}", serde_json::to_string_pretty(&store.documents())?);
    Ok(())
}
