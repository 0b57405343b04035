pub mod chrome;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use chrome::ChromeRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("page did not become ready within {0:?}")]
    Timeout(Duration),
    #[error("browser error: {0}")]
    Browser(String),
}

/// Page-rendering capability: fetches a URL and exposes the fully rendered
/// markup after JavaScript execution. One session per operation.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a fresh session navigated to `url`. The caller must `close`
    /// the returned session on every path.
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, RenderError>;
}

/// A single live page load.
#[async_trait]
pub trait PageSession: Send {
    /// Wait until the document body exists, up to `bound`.
    async fn wait_for_body(&self, bound: Duration) -> Result<(), RenderError>;

    /// Current document height, re-measured after each scroll to detect
    /// when infinite-scroll pagination has settled.
    async fn scroll_height(&self) -> Result<i64, RenderError>;

    async fn scroll_to_bottom(&self) -> Result<(), RenderError>;

    /// Rendered page markup.
    async fn content(&self) -> Result<String, RenderError>;

    /// Release the session and its browser resources.
    async fn close(self: Box<Self>);
}
