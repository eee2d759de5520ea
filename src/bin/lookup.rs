//! Command-line price lookup driver.
//!
//! Usage: `harga-lookup <item name...>`
//!
//! Collaborators are wired from the environment; with nothing set the
//! lookup resolves through the static estimate table:
//!
//! - `HARGA_SEARCH_ENDPOINT`: search capability URL (JSON POST)
//! - `HARGA_LLM_URL`: OpenAI-compatible base URL for semantic extraction
//! - `HARGA_LLM_MODEL`: model id (default `gpt-4o-mini`)
//! - `HARGA_LLM_API_KEY`: bearer token, optional

use std::sync::Arc;

use harga_search::{HttpChatClient, HttpSearchProvider, LookupConfig, PriceLookup};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let item: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if item.trim().is_empty() {
        eprintln!("usage: harga-lookup <item name>");
        std::process::exit(2);
    }

    let config = LookupConfig::default();
    let mut lookup = match PriceLookup::new(config.clone()) {
        Ok(lookup) => lookup,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    if let Ok(endpoint) = std::env::var("HARGA_SEARCH_ENDPOINT") {
        lookup = lookup.with_search(Arc::new(HttpSearchProvider::new(
            endpoint,
            config.search_timeout_seconds,
        )));
    } else {
        tracing::info!("HARGA_SEARCH_ENDPOINT not set, using static estimates only");
    }

    if let Ok(base_url) = std::env::var("HARGA_LLM_URL") {
        let model =
            std::env::var("HARGA_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let mut chat = HttpChatClient::new(base_url, model, config.extract_timeout_seconds);
        if let Ok(key) = std::env::var("HARGA_LLM_API_KEY") {
            chat = chat.with_api_key(key);
        }
        lookup = lookup.with_chat(Arc::new(chat));
    }

    let report = lookup.lookup(&item).await;
    println!("{}", report.message);

    if !report.success {
        std::process::exit(1);
    }
}
