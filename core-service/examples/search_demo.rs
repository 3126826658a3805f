//! Search the live collection API and save the first result
//!
//! Run with:
//! ```bash
//! # Search for "Monet" with pretty logs
//! cargo run -p core-service --example search_demo -- Monet
//!
//! # JSON logs, custom settings location
//! cargo run -p core-service --example search_demo -- "sunflowers" json /tmp/gallery/settings.db
//! ```

use anyhow::Context;
use bridge_traits::logging::LogLevel;
use core_runtime::config::GalleryConfig;
use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use core_service::{GalleryService, SearchOutcome};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let query = args.get(1).cloned().unwrap_or_else(|| "Monet".to_string());

    let format = match args.get(2).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some(_) => LogFormat::Pretty,
        None => LogFormat::default(),
    };

    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug),
    )
    .context("failed to initialize logging")?;

    let mut builder = GalleryConfig::builder().max_concurrent_fetches(8);
    if let Some(path) = args.get(3) {
        info!(file = %strip_path(path), "Using custom settings database");
        builder = builder.settings_path(path);
    }

    let gallery = GalleryService::bootstrap(builder)
        .await
        .context("failed to start gallery service")?;

    let mut events = gallery.search_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(severity = ?event.severity(), ?event, "{}", event.description());
        }
    });

    match gallery.search(&query).await {
        SearchOutcome::Found(count) => {
            let state = gallery.state().await;
            println!("{} artworks for {:?}:", count, query);
            for artwork in &state.results {
                println!(
                    "  [{}] {} - {}",
                    artwork.id,
                    artwork.title.as_deref().unwrap_or("Untitled"),
                    artwork.artist_display_name.as_deref().unwrap_or("Unknown artist"),
                );
            }

            if let Some(first) = state.results.first() {
                let change = gallery.toggle_favorite(first).await;
                println!("{:?} {} in favorites", change, first.id);
            }
        }
        SearchOutcome::NothingFound | SearchOutcome::Failed(_) => {
            let state = gallery.state().await;
            println!("{}", state.error_message.unwrap_or_default());
        }
        SearchOutcome::Skipped | SearchOutcome::Superseded => {}
    }

    println!("{} saved favorites", gallery.favorites().await.len());
    Ok(())
}
