//! Example demonstrating startup resolution and a background refresh.
//!
//! This example shows how to:
//! - Build a configuration handle that is usable before any network I/O
//! - Trigger an opportunistic refresh from the remote endpoint
//! - React to updates the way a settings screen would
//!
//! Run with: cargo run --example provider_refresh -- [config-url]
//!
//! Set `RUST_LOG=tiered_config=debug` to watch the tier decisions.

use std::time::Duration;
use tiered_config::prelude::*;
use tokio::sync::mpsc;

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt().with_env_filter(env_filter).with_target(false).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    println!("=== Provider Refresh Example ===\n");

    let mut builder = ProviderConfig::builder().with_timeout(Duration::from_secs(10));
    if let Some(url) = std::env::args().nth(1) {
        builder = builder.with_remote_url(url);
    }
    let config = builder.build()?;

    println!("Cache file: {}", config.cache_path().display());
    print_summary(&config);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _subscription = config.subscribe(move |snapshot| {
        let _ = tx.send(snapshot.providers.len());
    });

    match config.fetch_async(false) {
        FetchDispatch::Started => {
            println!("\nRefreshing in the background...");
            match tokio::time::timeout(Duration::from_secs(15), rx.recv()).await {
                Ok(Some(count)) => {
                    println!("Update received: {count} providers");
                    print_summary(&config);
                }
                _ => println!("No update; still using {} configuration", config.provenance()),
            }
        }
        FetchDispatch::Fresh => println!("\nConfiguration is fresh; no refresh needed"),
        other => println!("\nRefresh not started: {other:?}"),
    }

    println!("\nCapability checks:");
    for (model, provider) in [
        ("gpt-4o-mini", "OpenAI"),
        ("gpt-3.5-turbo", "OpenAI"),
        ("pixtral-large-latest", "Mistral"),
    ] {
        println!(
            "  {provider}/{model}: vision = {}",
            config.is_vision_capable(model, provider)
        );
    }

    Ok(())
}

fn print_summary(config: &ProviderConfig) {
    println!(
        "Active tier: {} (updated_at: {:?})",
        config.provenance(),
        config.updated_at()
    );
    for provider in config.providers() {
        let endpoint = config.endpoint(&provider).unwrap_or_else(|| "-".to_string());
        println!("  {provider:<12} {endpoint}");
    }
}
