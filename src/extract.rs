//! Structural extraction of post and reply records from page snapshots.
//!
//! Selectors target the class fragments the site uses for its feed items.
//! Field extraction is best-effort: a missing sub-element yields an empty
//! value, and only a missing identifier disqualifies an element (nothing
//! downstream can address a record without one).

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::models::{post_url, Post, Reply};

/// Selectors for post elements on a profile page.
struct PostSelectors {
    container: Selector,
    content: Selector,
    media: Selector,
    time: Selector,
}

impl PostSelectors {
    fn new() -> Self {
        Self {
            container: Selector::parse("div[class*='thread-item']").unwrap(),
            content: Selector::parse("div[class*='thread-content']").unwrap(),
            media: Selector::parse("img[class*='media-content']").unwrap(),
            time: Selector::parse("time").unwrap(),
        }
    }
}

/// Selectors for reply elements on a thread page.
struct ReplySelectors {
    container: Selector,
    user: Selector,
    content: Selector,
}

impl ReplySelectors {
    fn new() -> Self {
        Self {
            container: Selector::parse("div[class*='reply-item']").unwrap(),
            user: Selector::parse("a[class*='user-link']").unwrap(),
            content: Selector::parse("div[class*='reply-content']").unwrap(),
        }
    }
}

/// Concatenated, trimmed text of the first match of `selector` under `el`.
fn first_text(el: &ElementRef, selector: &Selector) -> String {
    el.select(selector)
        .next()
        .map(|n| n.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extract post records from one snapshot of a profile page.
///
/// Returns only records whose id is non-empty and not in `seen`; duplicates
/// within the snapshot itself are also dropped. Order follows the document.
pub fn posts(html: &str, username: &str, seen: &HashSet<String>) -> Vec<Post> {
    let selectors = PostSelectors::new();
    let document = Html::parse_document(html);

    let mut batch_ids: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for element in document.select(&selectors.container) {
        let post_id = element
            .value()
            .attr("data-thread-id")
            .unwrap_or_default()
            .to_string();
        if post_id.is_empty() {
            debug!("Skipping post element without data-thread-id");
            continue;
        }
        if seen.contains(&post_id) || !batch_ids.insert(post_id.clone()) {
            continue;
        }

        let text = first_text(&element, &selectors.content);

        let media_urls: Vec<String> = element
            .select(&selectors.media)
            .filter_map(|img| img.value().attr("src"))
            .filter(|src| !src.is_empty())
            .map(str::to_string)
            .collect();

        let timestamp = element
            .select(&selectors.time)
            .next()
            .and_then(|t| t.value().attr("datetime"))
            .unwrap_or_default()
            .to_string();

        out.push(Post {
            url: post_url(username, &post_id),
            post_id,
            username: username.to_string(),
            text,
            media_urls,
            timestamp,
        });
    }

    out
}

/// Extract reply records from one snapshot of a thread page.
pub fn replies(html: &str, thread_url: &str, seen: &HashSet<String>) -> Vec<Reply> {
    let selectors = ReplySelectors::new();
    let document = Html::parse_document(html);

    let mut batch_ids: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for element in document.select(&selectors.container) {
        let reply_id = element
            .value()
            .attr("data-reply-id")
            .unwrap_or_default()
            .to_string();
        if reply_id.is_empty() {
            debug!("Skipping reply element without data-reply-id");
            continue;
        }
        if seen.contains(&reply_id) || !batch_ids.insert(reply_id.clone()) {
            continue;
        }

        let username = first_text(&element, &selectors.user);
        let text = first_text(&element, &selectors.content);

        out.push(Reply {
            reply_id,
            username,
            text,
            thread_url: thread_url.to_string(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_html(id: &str, text: &str) -> String {
        format!(
            r#"<div class="thread-item x1" data-thread-id="{id}">
                 <div class="thread-content">{text}</div>
                 <img class="media-content" src="https://cdn.example/{id}/a.jpg">
                 <time datetime="2024-03-01T12:00:00Z">Mar 1</time>
               </div>"#
        )
    }

    #[test]
    fn test_extracts_fields() {
        let html = post_html("p1", "hello world");
        let seen = HashSet::new();
        let posts = posts(&html, "zuck", &seen);

        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.post_id, "p1");
        assert_eq!(post.username, "zuck");
        assert_eq!(post.text, "hello world");
        assert_eq!(post.media_urls, vec!["https://cdn.example/p1/a.jpg"]);
        assert_eq!(post.timestamp, "2024-03-01T12:00:00Z");
        assert_eq!(post.url, "https://www.threads.net/@zuck/post/p1");
    }

    #[test]
    fn test_zero_matches_is_empty_not_error() {
        let seen = HashSet::new();
        assert!(posts("<html><body><p>nothing here</p></body></html>", "x", &seen).is_empty());
        assert!(replies("<html></html>", "https://t", &seen).is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let html = r#"<div class="thread-item" data-thread-id="bare"></div>"#;
        let seen = HashSet::new();
        let posts = posts(html, "zuck", &seen);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].text, "");
        assert!(posts[0].media_urls.is_empty());
        assert_eq!(posts[0].timestamp, "");
    }

    #[test]
    fn test_element_without_id_is_skipped() {
        let mut html = String::from(r#"<div class="thread-item"><div class="thread-content">no id</div></div>"#);
        for i in 0..4 {
            html.push_str(&post_html(&format!("p{i}"), "ok"));
        }

        let seen = HashSet::new();
        let posts = posts(&html, "zuck", &seen);
        assert_eq!(posts.len(), 4);
        assert!(posts.iter().all(|p| !p.post_id.is_empty()));
    }

    #[test]
    fn test_dedup_against_seen_and_within_snapshot() {
        let html = format!(
            "{}{}{}",
            post_html("a", "first"),
            post_html("a", "dup in snapshot"),
            post_html("b", "second")
        );

        let mut seen = HashSet::new();
        seen.insert("b".to_string());

        let posts = posts(&html, "zuck", &seen);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].post_id, "a");
        assert_eq!(posts[0].text, "first");
    }

    #[test]
    fn test_media_urls_preserve_document_order() {
        let html = r#"<div class="thread-item" data-thread-id="m">
            <img class="media-content" src="one.jpg">
            <img class="media-content" src="">
            <img class="media-content" src="two.jpg">
        </div>"#;
        let posts = posts(html, "zuck", &HashSet::new());
        assert_eq!(posts[0].media_urls, vec!["one.jpg", "two.jpg"]);
    }

    #[test]
    fn test_reply_extraction() {
        let html = r#"
            <div class="reply-item" data-reply-id="r1">
                <a class="user-link">alice</a>
                <div class="reply-content">nice post</div>
            </div>
            <div class="reply-item">
                <a class="user-link">mallory</a>
                <div class="reply-content">no id, dropped</div>
            </div>
            <div class="reply-item" data-reply-id="r2">
                <div class="reply-content">anonymous</div>
            </div>
        "#;

        let replies = replies(html, "https://www.threads.net/@zuck/post/p1", &HashSet::new());
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].reply_id, "r1");
        assert_eq!(replies[0].username, "alice");
        assert_eq!(replies[0].text, "nice post");
        assert_eq!(replies[0].thread_url, "https://www.threads.net/@zuck/post/p1");
        assert_eq!(replies[1].username, "");
    }

    #[test]
    fn test_unicode_text_preserved() {
        let html = post_html("u", "こんにちは 🧵");
        let posts = posts(&html, "zuck", &HashSet::new());
        assert_eq!(posts[0].text, "こんにちは 🧵");
    }
}
