//! Error types for scrape sessions.

use thiserror::Error;

/// Failure of a scrape session or of the browser backing it.
///
/// Element-level extraction problems are not errors; they are logged and the
/// element is skipped. Anything that stops the whole session surfaces here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// No Chrome/Chromium binary could be located.
    #[error(
        "Chrome/Chromium not found. Install it (e.g. apt install chromium-browser) \
         or set CHROME_EXECUTABLE"
    )]
    ChromeNotFound,

    /// The launch configuration was rejected.
    #[error("failed to configure browser: {0}")]
    BrowserConfig(String),

    /// CDP-level failure (launch, navigation, page command).
    #[error("browser session error: {0}")]
    Session(#[from] chromiumoxide::error::CdpError),

    /// In-page script ran but its result could not be read back.
    #[error("script evaluation failed: {0}")]
    Evaluate(String),

    /// An operation was issued after `close()`.
    #[error("browser session already closed")]
    SessionClosed,

    /// A target URL failed to parse.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
