//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default HTTP port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

/// Default directory for downloaded media.
pub const DEFAULT_MEDIA_DIR: &str = "threads_media";

/// Browser launch options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserOptions {
    /// Run in headless mode (default: true).
    /// Set to false for debugging rendering issues.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit Chrome/Chromium executable. When unset, well-known install
    /// paths and `PATH` are searched.
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            executable: None,
            chrome_args: Vec::new(),
        }
    }
}

fn default_headless() -> bool {
    true
}

/// Pagination loop timing and bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeOptions {
    /// Warm-up wait after navigation, in seconds.
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: u64,

    /// Wait after each scroll for lazy content to load, in seconds.
    #[serde(default = "default_scroll_pause_secs")]
    pub scroll_pause_secs: u64,

    /// Upper bound on scroll rounds. The loop normally ends on a stable
    /// height probe; this cap keeps a page with oscillating height from
    /// scrolling forever.
    #[serde(default = "default_max_scroll_rounds")]
    pub max_scroll_rounds: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            warmup_secs: default_warmup_secs(),
            scroll_pause_secs: default_scroll_pause_secs(),
            max_scroll_rounds: default_max_scroll_rounds(),
        }
    }
}

fn default_warmup_secs() -> u64 {
    3
}

fn default_scroll_pause_secs() -> u64 {
    2
}

fn default_max_scroll_rounds() -> usize {
    50
}

impl ScrapeOptions {
    pub fn warmup(&self) -> Duration {
        Duration::from_secs(self.warmup_secs)
    }

    pub fn scroll_pause(&self) -> Duration {
        Duration::from_secs(self.scroll_pause_secs)
    }
}

/// Top-level settings for the server and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Bind host for the HTTP server.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port for the HTTP server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory media downloads are written to.
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    #[serde(default)]
    pub browser: BrowserOptions,

    #[serde(default)]
    pub scrape: ScrapeOptions,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_media_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MEDIA_DIR)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            media_dir: default_media_dir(),
            browser: BrowserOptions::default(),
            scrape: ScrapeOptions::default(),
        }
    }
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// `PORT` overrides the bind port, `CHROME_EXECUTABLE` pins the browser
    /// binary. Everything else keeps its default.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            match port.parse::<u16>() {
                Ok(p) => settings.port = p,
                Err(_) => tracing::warn!("Ignoring unparseable PORT value: {}", port),
            }
        }

        if let Ok(path) = std::env::var("CHROME_EXECUTABLE") {
            if !path.is_empty() {
                settings.browser.executable = Some(PathBuf::from(path));
            }
        }

        settings
    }
}
