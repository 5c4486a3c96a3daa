//! threadscrape - scrape posts and replies from Threads profiles.
//!
//! Drives a headless Chromium session, paginates a profile or thread page
//! via infinite scroll, and parses the rendered snapshots into structured
//! [`Post`] and [`Reply`] records. Exposed as a library, a CLI, and a small
//! HTTP API.

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod media;
pub mod models;
pub mod scrape;
pub mod server;

pub use config::Settings;
pub use error::ScrapeError;
pub use models::{Post, Reply};
pub use scrape::ProfileScraper;
