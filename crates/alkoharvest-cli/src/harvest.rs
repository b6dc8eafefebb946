//! `harvest` command handler.
//!
//! The crawl runs on the async runtime and hands items to a blocking writer
//! task over a bounded channel.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use alkoharvest_core::{category_slug, HarvestConfig, NormalizedItem};
use alkoharvest_scraper::{run_harvest, AlkotekaClient, HarvestPlan};
use tokio::sync::mpsc;

use crate::export::{ItemWriter, OutputFormat};

const ITEM_CHANNEL_CAPACITY: usize = 256;

/// Applies command-line overrides on top of the env-derived config.
///
/// Each `--category` value may be a bare slug or a category URL.
pub(crate) fn apply_overrides(
    mut config: HarvestConfig,
    categories: &[String],
    page_size: Option<u32>,
) -> anyhow::Result<HarvestConfig> {
    if !categories.is_empty() {
        config.start_categories = categories
            .iter()
            .map(|c| {
                category_slug(c).ok_or_else(|| anyhow::anyhow!("invalid category '{c}'"))
            })
            .collect::<anyhow::Result<_>>()?;
    }
    if let Some(page_size) = page_size {
        config.page_size = page_size;
    }
    Ok(config)
}

/// Runs a full harvest and writes the item feed to `output` (stdout when
/// `None`).
///
/// # Errors
///
/// Returns an error if the client cannot be built, the output cannot be
/// opened or written, or the writer task panics. Per-product failures are
/// logged by the scraper and never surface here.
pub(crate) async fn run_harvest_command(
    config: &HarvestConfig,
    output: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let client = AlkotekaClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build alkoteka client: {e}"))?;
    let plan = HarvestPlan::from_config(config);

    let out: Box<dyn Write + Send> = match output {
        Some(path) => Box::new(
            File::create(path)
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = ItemWriter::new(BufWriter::new(out), format);

    let (tx, mut rx) = mpsc::channel::<NormalizedItem>(ITEM_CHANNEL_CAPACITY);
    let writer_task = tokio::task::spawn_blocking(move || {
        while let Some(item) = rx.blocking_recv() {
            writer.write_item(&item)?;
        }
        writer.finish().map(|(_, stats)| stats)
    });

    tracing::info!(
        categories = ?plan.start_categories,
        page_size = plan.page_size,
        concurrency = plan.max_concurrent_requests,
        "starting harvest"
    );

    let crawl = run_harvest(&client, &plan, tx).await;
    // The sender is dropped by now, so the writer drains and exits.
    let stats = writer_task.await??;
    let summary = crawl?;

    tracing::info!(
        pages = summary.pages_fetched,
        written = stats.written,
        discounted = stats.discounted,
        skipped = summary.products_skipped,
        failed = summary.failed_fetches,
        "harvest complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HarvestConfig {
        HarvestConfig {
            api_base_url: alkoharvest_core::DEFAULT_API_BASE_URL.to_owned(),
            city_uuid: alkoharvest_core::DEFAULT_CITY_UUID.to_owned(),
            start_categories: vec!["slaboalkogolnye-napitki-2".to_owned()],
            page_size: 100,
            max_pages: 500,
            max_concurrent_requests: 16,
            log_level: "info".to_owned(),
            request_timeout_secs: 30,
            user_agent: "alkoharvest-test/0.1".to_owned(),
            max_retries: 3,
            retry_backoff_base_ms: 1000,
        }
    }

    #[test]
    fn no_overrides_keeps_config() {
        let result = apply_overrides(config(), &[], None).unwrap();
        assert_eq!(result, config());
    }

    #[test]
    fn category_urls_are_reduced_to_slugs() {
        let categories = vec![
            "https://alkoteka.com/catalog/vino-1".to_owned(),
            "pivo-2/".to_owned(),
        ];
        let result = apply_overrides(config(), &categories, Some(24)).unwrap();
        assert_eq!(result.start_categories, vec!["vino-1", "pivo-2"]);
        assert_eq!(result.page_size, 24);
    }

    #[test]
    fn empty_category_is_rejected() {
        let err = apply_overrides(config(), &["/".to_owned()], None).unwrap_err();
        assert!(err.to_string().contains("invalid category"), "{err}");
    }
}
