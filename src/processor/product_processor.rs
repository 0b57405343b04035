//! Per-product processing: render, harvest images, extract, record.

use std::path::{Path, PathBuf};
use std::time::Duration;

use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::ai::ExtractionError;
use crate::extractor::StructuredExtractor;
use crate::fetcher::AssetFetcher;
use crate::models::{Outcome, ResultRecord};
use crate::renderer::{PageSession, RenderError, Renderer};

use super::image_validator::is_valid_image;

/// Bound on waiting for the product page body to appear.
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(10);

/// URL fragments that mark storefront chrome rather than product photos.
const EXCLUDED_NAME_FRAGMENTS: &[&str] = &["facebook", "icon", "logo", "common", "banner", "brand"];

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("no usable product image found")]
    NoThumbnail,
    #[error("image folder error: {0}")]
    Io(#[from] std::io::Error),
}

/// Processes one product URL at a time: renders the page, harvests and
/// validates its images, runs structured extraction when a thumbnail was
/// found, and fills the shared result record. Failures never escape:
/// every error becomes a Failure outcome on the record.
pub struct ProductProcessor<'a> {
    renderer: &'a dyn Renderer,
    fetcher: &'a dyn AssetFetcher,
    extractor: &'a StructuredExtractor,
    images_root: PathBuf,
}

impl<'a> ProductProcessor<'a> {
    pub fn new(
        renderer: &'a dyn Renderer,
        fetcher: &'a dyn AssetFetcher,
        extractor: &'a StructuredExtractor,
        images_root: impl Into<PathBuf>,
    ) -> Self {
        ProductProcessor {
            renderer,
            fetcher,
            extractor,
            images_root: images_root.into(),
        }
    }

    /// Process `url` into `record`. Returns whether the product succeeded.
    pub async fn process(
        &self,
        url: &str,
        site_name: &str,
        folder_name: &str,
        record: &mut ResultRecord,
    ) -> bool {
        match self.process_inner(url, site_name, folder_name, record).await {
            Ok(()) => {
                record.outcome = Outcome::Success;
                true
            }
            Err(e) => {
                warn!("[{site_name}] {url}: {e}");
                record.outcome = Outcome::Failure;
                false
            }
        }
    }

    async fn process_inner(
        &self,
        url: &str,
        site_name: &str,
        folder_name: &str,
        record: &mut ResultRecord,
    ) -> Result<(), ProcessError> {
        let session = self.renderer.open(url).await?;
        let rendered = rendered_content(session.as_ref()).await;
        session.close().await;
        let html = rendered?;

        let folder = self.images_root.join(site_name).join(folder_name);
        std::fs::create_dir_all(&folder)?;

        // A product without a usable photo is not worth extracting.
        let thumbnail = self.harvest_images(&html, url, &folder).await?;

        let fields = self.extractor.extract(&html).await?;
        record.thumbnail = thumbnail;
        record.unit_price = fields.price.to_string();
        record.market_price = fields.market_price.clone();
        record.gender = fields.gender.clone();
        record.brand = fields.brand.clone();
        record.first_category = fields.first_category.clone();
        record.second_category = fields.second_category.clone();
        record.kor_name = fields.kor_name.clone();
        record.eng_name = fields.eng_name.clone();
        record.model_number = fields.genuine_number.clone();
        record.colors = fields.joined_colors();
        record.sizes = fields.joined_sizes();

        Ok(())
    }

    /// Download, validate and persist the page's candidate images as
    /// `{idx}.jpg`, indices contiguous over accepted images. Returns the
    /// first accepted image's path.
    async fn harvest_images(
        &self,
        html: &str,
        page_url: &str,
        folder: &Path,
    ) -> Result<String, ProcessError> {
        let mut thumbnail = String::new();
        let mut idx = 0usize;

        for image_url in collect_image_urls(html, page_url) {
            let bytes = match self.fetcher.fetch_bytes(&image_url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!("skipping image {image_url}: {e}");
                    continue;
                }
            };

            if !is_valid_image(&bytes) {
                continue;
            }

            let path = folder.join(format!("{idx}.jpg"));
            std::fs::write(&path, &bytes)?;

            if idx == 0 {
                thumbnail = path.to_string_lossy().into_owned();
            }
            idx += 1;
        }

        if thumbnail.is_empty() {
            return Err(ProcessError::NoThumbnail);
        }
        Ok(thumbnail)
    }
}

async fn rendered_content(session: &dyn PageSession) -> Result<String, RenderError> {
    session.wait_for_body(RENDER_TIMEOUT).await?;
    session.content().await
}

/// Candidate product-image URLs from rendered markup: every `img` with a
/// `src`, resolved against the page URL, minus storefront chrome.
pub fn collect_image_urls(html: &str, page_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let img_selector = Selector::parse("img").unwrap();

    let mut urls = Vec::new();
    for img in document.select(&img_selector) {
        let Some(src) = img.value().attr("src") else { continue };
        let Ok(resolved) = base.join(src) else { continue };

        let resolved = resolved.to_string();
        if is_excluded_image_url(&resolved) {
            continue;
        }
        urls.push(resolved);
    }
    urls
}

fn is_excluded_image_url(url: &str) -> bool {
    let lower = url.to_lowercase();

    url.contains(";base64,")
        || lower.ends_with(".svg")
        || url.contains("//img.echosting.cafe24.com/")
        || url.contains("/theme/")
        || EXCLUDED_NAME_FRAGMENTS.iter().any(|fragment| lower.contains(fragment))
}
