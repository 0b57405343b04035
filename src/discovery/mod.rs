//! Per-site product URL discovery from category listing pages.

use std::collections::HashSet;
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::renderer::{PageSession, RenderError, Renderer};

/// Hard cap on product URLs taken from one category page.
pub const MAX_PRODUCT_URLS: usize = 100;

/// Wait after the first navigation before measuring the page.
const INITIAL_SETTLE: Duration = Duration::from_secs(5);
/// Wait after each scroll for lazy-loaded rows to land.
const SCROLL_SETTLE: Duration = Duration::from_secs(2);

/// The closed set of storefronts this pipeline knows how to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Qualend,
    NameValue,
    ByHeaven,
}

impl SiteKind {
    /// Match a configured site name to a known storefront. `None` means
    /// the site is not wired up yet; its categories yield no URLs.
    pub fn detect(site_name: &str) -> Option<SiteKind> {
        if site_name.contains("퀄엔드") {
            Some(SiteKind::Qualend)
        } else if site_name.contains("네임밸류") {
            Some(SiteKind::NameValue)
        } else if site_name.contains("바이헤븐") {
            Some(SiteKind::ByHeaven)
        } else {
            None
        }
    }
}

pub struct UrlDiscoverer<'a> {
    renderer: &'a dyn Renderer,
}

impl<'a> UrlDiscoverer<'a> {
    pub fn new(renderer: &'a dyn Renderer) -> Self {
        UrlDiscoverer { renderer }
    }

    /// Collect up to [`MAX_PRODUCT_URLS`] unique product-detail URLs from
    /// one category page.
    pub async fn discover(
        &self,
        category_url: &str,
        site_name: &str,
    ) -> Result<Vec<String>, RenderError> {
        let Some(kind) = SiteKind::detect(site_name) else {
            info!("[{site_name}] unrecognized site, no URL discovery rules");
            return Ok(Vec::new());
        };

        match kind {
            SiteKind::Qualend => self.discover_qualend(category_url).await,
            // Listing rules for these storefronts are not implemented yet.
            SiteKind::NameValue | SiteKind::ByHeaven => Ok(Vec::new()),
        }
    }

    async fn discover_qualend(&self, category_url: &str) -> Result<Vec<String>, RenderError> {
        let session = self.renderer.open(category_url).await?;
        let content = settled_content(session.as_ref()).await;
        session.close().await;

        let html = content?;
        let urls = extract_product_links(&html, category_url);
        debug!("{} unique product links after dedup", urls.len());
        Ok(urls)
    }
}

/// Scroll to the bottom until two consecutive height measurements agree,
/// then return the rendered markup. Terminates only when the page stops
/// growing.
async fn settled_content(session: &dyn PageSession) -> Result<String, RenderError> {
    tokio::time::sleep(INITIAL_SETTLE).await;

    let mut last_height = session.scroll_height().await?;
    loop {
        session.scroll_to_bottom().await?;
        tokio::time::sleep(SCROLL_SETTLE).await;

        let new_height = session.scroll_height().await?;
        if new_height == last_height {
            break;
        }
        last_height = new_height;
    }

    session.content().await
}

/// Pull product links out of rendered category markup: one link per
/// product container, identified by the item-id query token, resolved
/// against the category URL. Deduplicated in first-seen order, capped.
pub fn extract_product_links(html: &str, category_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(category_url) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let container_selector = Selector::parse("div.col-sm-3").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();

    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for container in document.select(&container_selector) {
        let product_link = container.select(&link_selector).find(|link| {
            link.value()
                .attr("href")
                .is_some_and(|href| href.contains("it_id"))
        });
        let Some(link) = product_link else { continue };

        let href = link.value().attr("href").unwrap_or_default();
        let Ok(resolved) = base.join(href) else { continue };

        let resolved = resolved.to_string();
        if seen.insert(resolved.clone()) {
            urls.push(resolved);
        }
    }

    urls.truncate(MAX_PRODUCT_URLS);
    urls
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    #[test]
    fn test_detect_site_kind() {
        assert_eq!(SiteKind::detect("퀄엔드 본점"), Some(SiteKind::Qualend));
        assert_eq!(SiteKind::detect("네임밸류"), Some(SiteKind::NameValue));
        assert_eq!(SiteKind::detect("바이헤븐 스토어"), Some(SiteKind::ByHeaven));
        assert_eq!(SiteKind::detect("unknown shop"), None);
    }

    fn category_fixture() -> String {
        r#"<html><body>
            <div class="col-sm-3"><a href="/item.php?it_id=100">A</a></div>
            <div class="col-sm-3"><a href="/about">about</a></div>
            <div class="col-sm-3"><a href="/item.php?it_id=200">B</a></div>
            <div class="col-sm-3"><a href="/item.php?it_id=100">A again</a></div>
            <div class="col-sm-4"><a href="/item.php?it_id=300">wrong container</a></div>
        </body></html>"#
            .to_string()
    }

    #[test]
    fn test_extract_product_links_dedups_and_resolves() {
        let urls = extract_product_links(&category_fixture(), "https://shop.example/list?ca_id=10");

        assert_eq!(
            urls,
            vec![
                "https://shop.example/item.php?it_id=100".to_string(),
                "https://shop.example/item.php?it_id=200".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_product_links_is_idempotent() {
        let html = category_fixture();
        let first = extract_product_links(&html, "https://shop.example/list");
        let second = extract_product_links(&html, "https://shop.example/list");
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_product_links_caps_at_limit() {
        let mut html = String::from("<html><body>");
        for i in 0..150 {
            html.push_str(&format!(
                r#"<div class="col-sm-3"><a href="/item.php?it_id={i}">p</a></div>"#
            ));
        }
        html.push_str("</body></html>");

        let urls = extract_product_links(&html, "https://shop.example/list");
        assert_eq!(urls.len(), MAX_PRODUCT_URLS);
        assert_eq!(urls[0], "https://shop.example/item.php?it_id=0");
    }

    struct ScrollingSession {
        heights: Mutex<Vec<i64>>,
        content: String,
        closed: std::sync::Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PageSession for ScrollingSession {
        async fn wait_for_body(&self, _bound: Duration) -> Result<(), RenderError> {
            Ok(())
        }

        async fn scroll_height(&self) -> Result<i64, RenderError> {
            let mut heights = self.heights.lock().unwrap();
            Ok(if heights.len() > 1 { heights.remove(0) } else { heights[0] })
        }

        async fn scroll_to_bottom(&self) -> Result<(), RenderError> {
            Ok(())
        }

        async fn content(&self) -> Result<String, RenderError> {
            Ok(self.content.clone())
        }

        async fn close(self: Box<Self>) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ScrollingRenderer {
        closed: std::sync::Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Renderer for ScrollingRenderer {
        async fn open(&self, _url: &str) -> Result<Box<dyn PageSession>, RenderError> {
            Ok(Box::new(ScrollingSession {
                // Grows once, then stabilizes.
                heights: Mutex::new(vec![1000, 2000, 2000]),
                content: category_fixture(),
                closed: self.closed.clone(),
            }))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_discover_scrolls_until_height_stable_and_releases() {
        let closed = std::sync::Arc::new(AtomicUsize::new(0));
        let renderer = ScrollingRenderer { closed: closed.clone() };
        let discoverer = UrlDiscoverer::new(&renderer);

        let urls = discoverer
            .discover("https://shop.example/list?ca_id=10", "퀄엔드 본점")
            .await
            .unwrap();

        assert_eq!(urls.len(), 2);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_site_skips_rendering() {
        struct PanickingRenderer;

        #[async_trait]
        impl Renderer for PanickingRenderer {
            async fn open(&self, _url: &str) -> Result<Box<dyn PageSession>, RenderError> {
                panic!("unsupported sites must not open a session");
            }
        }

        let renderer = PanickingRenderer;
        let discoverer = UrlDiscoverer::new(&renderer);
        let urls = discoverer.discover("https://x.example", "모르는 사이트").await.unwrap();
        assert!(urls.is_empty());
    }
}
