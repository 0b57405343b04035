//! Chromium-backed renderer sessions.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{PageSession, RenderError, Renderer};

/// Fixed browser identity presented to the storefronts.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";

/// Upper bound on initial navigation; JS-heavy category pages are slow.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

const BODY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launches one Chromium instance per session. Storefronts that fingerprint
/// automation get a TLS-error-tolerant, automation-signature-suppressed
/// browser with a fixed user agent.
pub struct ChromeRenderer;

impl ChromeRenderer {
    pub fn new() -> Self {
        ChromeRenderer
    }

    fn browser_config() -> Result<BrowserConfig, RenderError> {
        BrowserConfig::builder()
            .no_sandbox()
            .args(vec![
                "--disable-gpu".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-extensions".to_string(),
                "--start-maximized".to_string(),
                "--disable-blink-features=AutomationControlled".to_string(),
                "--disable-infobars".to_string(),
                "--ignore-certificate-errors".to_string(),
                format!("--user-agent={USER_AGENT}"),
            ])
            .build()
            .map_err(RenderError::Browser)
    }
}

impl Default for ChromeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, RenderError> {
        debug!("Launching browser session for {url} as {USER_AGENT}");

        let (browser, mut handler) = Browser::launch(Self::browser_config()?)
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match tokio::time::timeout(NAVIGATION_TIMEOUT, browser.new_page(url)).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                let mut session = ChromeSession { browser, page: None, handler_task };
                session.release().await;
                return Err(RenderError::Browser(e.to_string()));
            }
            Err(_) => {
                let mut session = ChromeSession { browser, page: None, handler_task };
                session.release().await;
                return Err(RenderError::Timeout(NAVIGATION_TIMEOUT));
            }
        };

        Ok(Box::new(ChromeSession {
            browser,
            page: Some(page),
            handler_task,
        }))
    }
}

struct ChromeSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
}

impl ChromeSession {
    fn page(&self) -> Result<&Page, RenderError> {
        self.page
            .as_ref()
            .ok_or_else(|| RenderError::Browser("session already released".to_string()))
    }

    async fn evaluate_i64(&self, expression: &str) -> Result<i64, RenderError> {
        self.page()?
            .evaluate(expression)
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?
            .into_value::<i64>()
            .map_err(|e| RenderError::Browser(e.to_string()))
    }

    async fn release(&mut self) {
        if let Some(page) = self.page.take() {
            let _ = page.close().await;
        }
        let _ = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn wait_for_body(&self, bound: Duration) -> Result<(), RenderError> {
        let page = self.page()?;
        tokio::time::timeout(bound, async {
            loop {
                if page.find_element("body").await.is_ok() {
                    return;
                }
                tokio::time::sleep(BODY_POLL_INTERVAL).await;
            }
        })
        .await
        .map_err(|_| RenderError::Timeout(bound))
    }

    async fn scroll_height(&self) -> Result<i64, RenderError> {
        self.evaluate_i64("document.body.scrollHeight").await
    }

    async fn scroll_to_bottom(&self) -> Result<(), RenderError> {
        self.page()?
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;
        Ok(())
    }

    async fn content(&self) -> Result<String, RenderError> {
        self.page()?
            .content()
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))
    }

    async fn close(mut self: Box<Self>) {
        self.release().await;
    }
}
