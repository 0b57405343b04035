//! Sequential pipeline: discovery, per-URL processing, result accumulation.

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::config::CategoryTarget;
use crate::discovery::UrlDiscoverer;
use crate::extractor::StructuredExtractor;
use crate::fetcher::AssetFetcher;
use crate::models::{ResultRecord, ResultStore};
use crate::processor::ProductProcessor;
use crate::renderer::Renderer;

/// Drives every configured category target in order, one URL at a time.
/// Owns the result store for the lifetime of the run.
pub struct Pipeline<'a> {
    discoverer: UrlDiscoverer<'a>,
    processor: ProductProcessor<'a>,
    store: ResultStore,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        renderer: &'a dyn Renderer,
        fetcher: &'a dyn AssetFetcher,
        extractor: &'a StructuredExtractor,
        images_root: &str,
    ) -> Self {
        Pipeline {
            discoverer: UrlDiscoverer::new(renderer),
            processor: ProductProcessor::new(renderer, fetcher, extractor, images_root),
            store: ResultStore::new(),
        }
    }

    /// Run all targets. Returns the total number of discovered URLs.
    /// Per-URL failures are recorded and skipped over; a failure during
    /// URL discovery itself aborts the run.
    pub async fn run(&mut self, targets: &[CategoryTarget]) -> Result<usize> {
        let mut total_urls = 0;

        for target in targets {
            info!("[{}] collecting product URLs for {}", target.site_name, target.category_name);

            let urls = self
                .discoverer
                .discover(&target.category_url, &target.site_name)
                .await
                .with_context(|| format!("URL discovery failed for {}", target.site_name))?;

            info!("[{}] {} product URLs collected", target.site_name, urls.len());

            let mut success_count = 0;
            let mut fail_count = 0;

            for url in &urls {
                let folder_name = Local::now().format("%Y%m%d%H%M%S").to_string();
                self.store
                    .insert(url, ResultRecord::new(url, &target.site_name, &folder_name));
                let record = self
                    .store
                    .record_for(url)
                    .expect("record inserted for every discovered URL");

                if self
                    .processor
                    .process(url, &target.site_name, &folder_name, record)
                    .await
                {
                    success_count += 1;
                } else {
                    fail_count += 1;
                }
            }

            total_urls += urls.len();
            info!(
                "[{}] done: {} succeeded, {} failed",
                target.site_name, success_count, fail_count
            );
        }

        Ok(total_urls)
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn into_store(self) -> ResultStore {
        self.store
    }
}
