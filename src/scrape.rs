//! The scroll-and-extract loop.
//!
//! One [`collect`] call owns one page session for its whole lifetime: open,
//! warm up, then scroll / settle / snapshot / extract until the target count
//! is reached or the page stops growing. The session is released on every
//! exit path, including errors, before the result surfaces.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use url::Url;

use crate::browser::{BrowserSession, PageSource};
use crate::config::{BrowserOptions, ScrapeOptions, Settings};
use crate::error::ScrapeError;
use crate::extract;
use crate::models::{profile_url, Post, Record, Reply};

/// Default post limit for a profile scrape.
pub const DEFAULT_MAX_POSTS: usize = 10;

/// Default reply limit for a thread scrape.
pub const DEFAULT_MAX_REPLIES: usize = 20;

/// Drive `source` through the scroll loop and accumulate extracted records.
///
/// `extract` receives each snapshot together with the ids accumulated so far
/// and returns only new records, in document order. The loop appends them
/// until `max_records` is reached (stopping mid-batch), and otherwise ends
/// when two consecutive height probes agree — the page has no more content,
/// which is not an error. `source` is closed before this returns, whatever
/// the outcome.
pub async fn collect<S, T, F>(
    source: &mut S,
    url: &str,
    max_records: usize,
    options: &ScrapeOptions,
    extract: F,
) -> Result<Vec<T>, ScrapeError>
where
    S: PageSource,
    T: Record,
    F: Fn(&str, &HashSet<String>) -> Vec<T>,
{
    let result = collect_inner(source, url, max_records, options, extract).await;
    source.close().await;
    result
}

async fn collect_inner<S, T, F>(
    source: &mut S,
    url: &str,
    max_records: usize,
    options: &ScrapeOptions,
    extract: F,
) -> Result<Vec<T>, ScrapeError>
where
    S: PageSource,
    T: Record,
    F: Fn(&str, &HashSet<String>) -> Vec<T>,
{
    let mut accumulated: Vec<T> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    source.open(url).await?;
    source.settle(options.warmup()).await;

    let mut last_height = source.current_height().await?;
    let mut rounds = 0usize;

    while accumulated.len() < max_records {
        if rounds >= options.max_scroll_rounds {
            warn!(
                "Stopping after {} scroll rounds with {} of {} records",
                rounds,
                accumulated.len(),
                max_records
            );
            break;
        }
        rounds += 1;

        source.scroll_to_bottom().await?;
        source.settle(options.scroll_pause()).await;

        let html = source.snapshot().await?;
        let batch = extract(&html, &seen);
        debug!("Round {}: {} new records", rounds, batch.len());

        for record in batch {
            if accumulated.len() >= max_records {
                break;
            }
            seen.insert(record.id().to_string());
            accumulated.push(record);
        }

        let new_height = source.current_height().await?;
        if new_height == last_height {
            debug!("Height stable at {}; end of content", new_height);
            break;
        }
        last_height = new_height;
    }

    info!("Collected {} records from {}", accumulated.len(), url);
    accumulated.truncate(max_records);
    Ok(accumulated)
}

/// Scrapes a profile's posts or a thread's replies, one browser session per
/// call. No session state survives between calls.
pub struct ProfileScraper {
    browser: BrowserOptions,
    scrape: ScrapeOptions,
}

impl ProfileScraper {
    pub fn new(browser: BrowserOptions, scrape: ScrapeOptions) -> Self {
        Self { browser, scrape }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.browser.clone(), settings.scrape.clone())
    }

    /// Scrape up to `max_posts` posts from a profile page.
    pub async fn profile_posts(
        &self,
        username: &str,
        max_posts: usize,
    ) -> Result<Vec<Post>, ScrapeError> {
        let url = profile_url(username);
        let mut session = BrowserSession::launch(&self.browser).await?;
        collect(&mut session, &url, max_posts, &self.scrape, |html, seen| {
            extract::posts(html, username, seen)
        })
        .await
    }

    /// Scrape up to `max_replies` replies from a thread page.
    pub async fn thread_replies(
        &self,
        thread_url: &str,
        max_replies: usize,
    ) -> Result<Vec<Reply>, ScrapeError> {
        Url::parse(thread_url)?;

        let mut session = BrowserSession::launch(&self.browser).await?;
        collect(
            &mut session,
            thread_url,
            max_replies,
            &self.scrape,
            |html, seen| extract::replies(html, thread_url, seen),
        )
        .await
    }
}
