//! Record types produced by the scraper.

use serde::{Deserialize, Serialize};

/// A single post scraped from a profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Site-assigned post identifier (unique within one scrape).
    pub post_id: String,
    /// Profile the post was scraped from.
    pub username: String,
    /// Post body text (may be empty).
    pub text: String,
    /// Media URLs in document order (may be empty).
    pub media_urls: Vec<String>,
    /// ISO-8601 timestamp from the `datetime` attribute, or empty.
    pub timestamp: String,
    /// Canonical URL of the post.
    pub url: String,
}

/// A single reply scraped from a thread page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    /// Site-assigned reply identifier (unique within one scrape).
    pub reply_id: String,
    /// Author of the reply.
    pub username: String,
    /// Reply body text.
    pub text: String,
    /// The thread page the reply was scraped from.
    pub thread_url: String,
}

/// Common identifier accessor used for deduplication.
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for Post {
    fn id(&self) -> &str {
        &self.post_id
    }
}

impl Record for Reply {
    fn id(&self) -> &str {
        &self.reply_id
    }
}

/// Canonical profile URL for a username.
pub fn profile_url(username: &str) -> String {
    format!("https://www.threads.net/@{}", username)
}

/// Canonical post URL for a username and post id.
pub fn post_url(username: &str, post_id: &str) -> String {
    format!("https://www.threads.net/@{}/post/{}", username, post_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_shapes() {
        assert_eq!(profile_url("zuck"), "https://www.threads.net/@zuck");
        assert_eq!(
            post_url("zuck", "abc123"),
            "https://www.threads.net/@zuck/post/abc123"
        );
    }
}
