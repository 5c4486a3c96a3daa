//! Headless Chromium session driven over CDP.
//!
//! [`BrowserSession`] owns one browser process and one page for the duration
//! of a scrape. The [`PageSource`] trait is the seam the pagination loop is
//! written against, so tests can substitute a scripted page.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::config::BrowserOptions;
use crate::error::ScrapeError;

/// A rendered page that can be scrolled, probed, and snapshotted.
#[async_trait]
pub trait PageSource {
    /// Navigate to `url`. Best-effort load; callers settle afterwards.
    async fn open(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Wait a fixed interval for asynchronous rendering to finish.
    async fn settle(&mut self, duration: Duration);

    /// Scroll the document to its current maximum height. Side effect only.
    async fn scroll_to_bottom(&mut self) -> Result<(), ScrapeError>;

    /// Current content height of the document, in pixels.
    async fn current_height(&mut self) -> Result<i64, ScrapeError>;

    /// Full rendered markup of the page as of now.
    async fn snapshot(&mut self) -> Result<String, ScrapeError>;

    /// Release the underlying resources. Safe to call more than once.
    async fn close(&mut self);
}

/// Chromium-backed [`PageSource`].
pub struct BrowserSession {
    browser: Option<Browser>,
    page: Option<Page>,
}

impl BrowserSession {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    /// Launch a fresh browser process and open a blank page.
    pub async fn launch(options: &BrowserOptions) -> Result<Self, ScrapeError> {
        let chrome_path = match options.executable.clone() {
            Some(path) => path,
            None => Self::find_chrome()?,
        };

        info!(
            "Launching browser (headless={}) at {}",
            options.headless,
            chrome_path.display()
        );

        let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);

        // with_head means NOT headless, confusingly
        if !options.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        for arg in &options.chrome_args {
            builder = builder.arg(arg);
        }

        let config = builder.build().map_err(ScrapeError::BrowserConfig)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // Drain CDP events for the life of the browser.
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser: Some(browser),
            page: Some(page),
        })
    }

    /// Find a Chrome executable on this machine.
    fn find_chrome() -> Result<PathBuf, ScrapeError> {
        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                info!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
                if output.status.success() {
                    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !path.is_empty() {
                        info!("Found Chrome in PATH: {}", path);
                        return Ok(PathBuf::from(path));
                    }
                }
            }
        }

        Err(ScrapeError::ChromeNotFound)
    }

    fn page(&self) -> Result<&Page, ScrapeError> {
        self.page.as_ref().ok_or(ScrapeError::SessionClosed)
    }
}

#[async_trait]
impl PageSource for BrowserSession {
    async fn open(&mut self, url: &str) -> Result<(), ScrapeError> {
        info!("Navigating to {}", url);
        self.page()?.goto(url).await?;
        Ok(())
    }

    async fn settle(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), ScrapeError> {
        self.page()?
            .evaluate("window.scrollTo(0, document.body.scrollHeight);")
            .await?;
        Ok(())
    }

    async fn current_height(&mut self) -> Result<i64, ScrapeError> {
        let result = self
            .page()?
            .evaluate("document.body.scrollHeight")
            .await?;
        result
            .into_value::<i64>()
            .map_err(|e| ScrapeError::Evaluate(e.to_string()))
    }

    async fn snapshot(&mut self) -> Result<String, ScrapeError> {
        let content = self.page()?.content().await?;
        debug!("Snapshot of {} bytes", content.len());
        Ok(content)
    }

    async fn close(&mut self) {
        if let Some(page) = self.page.take() {
            let _ = page.close().await;
        }

        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Error closing browser: {}", e);
            }
            let _ = browser.wait().await;
            debug!("Browser session released");
        }
    }
}
