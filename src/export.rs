//! CSV and JSON serialization of scraped records.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::models::{Post, Reply};

/// Separator used to flatten `media_urls` into one CSV cell.
pub const MEDIA_SEPARATOR: char = '|';

/// Flatten a media URL list into a single CSV-friendly string.
pub fn join_media(urls: &[String]) -> String {
    urls.join(&MEDIA_SEPARATOR.to_string())
}

/// Split a flattened media cell back into its URL list.
pub fn split_media(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(MEDIA_SEPARATOR).map(str::to_string).collect()
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render posts as CSV, one row per post, header row first.
pub fn posts_to_csv(posts: &[Post]) -> String {
    let mut out = String::new();
    out.push_str("post_id,username,text,media_urls,timestamp,url\n");

    for post in posts {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            escape_csv(&post.post_id),
            escape_csv(&post.username),
            escape_csv(&post.text),
            escape_csv(&join_media(&post.media_urls)),
            escape_csv(&post.timestamp),
            escape_csv(&post.url),
        );
    }

    out
}

/// Render replies as CSV, one row per reply, header row first.
pub fn replies_to_csv(replies: &[Reply]) -> String {
    let mut out = String::new();
    out.push_str("reply_id,username,text,thread_url\n");

    for reply in replies {
        let _ = writeln!(
            out,
            "{},{},{},{}",
            escape_csv(&reply.reply_id),
            escape_csv(&reply.username),
            escape_csv(&reply.text),
            escape_csv(&reply.thread_url),
        );
    }

    out
}

/// Write posts to a CSV file.
pub fn save_posts_csv(posts: &[Post], path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, posts_to_csv(posts))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Saved {} posts to {}", posts.len(), path.display());
    Ok(())
}

/// Render records as indented JSON. Unicode passes through unescaped, and
/// field order follows the struct declarations, so output is stable.
pub fn to_json_pretty<T: Serialize>(records: &[T]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(records).context("failed to serialize records")
}

/// Write records to a JSON file as an indented array.
pub fn save_json<T: Serialize>(records: &[T], path: &Path) -> anyhow::Result<()> {
    let json = to_json_pretty(records)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            post_id: "p1".to_string(),
            username: "zuck".to_string(),
            text: "hello, \"world\"".to_string(),
            media_urls: vec!["a".to_string(), "b".to_string()],
            timestamp: "2024-03-01T12:00:00Z".to_string(),
            url: "https://www.threads.net/@zuck/post/p1".to_string(),
        }
    }

    #[test]
    fn test_media_join_split_round_trip() {
        let urls = vec!["a".to_string(), "b".to_string()];
        let joined = join_media(&urls);
        assert_eq!(joined, "a|b");
        assert_eq!(split_media(&joined), urls);
        assert!(split_media("").is_empty());
    }

    #[test]
    fn test_csv_rows_and_escaping() {
        let csv = posts_to_csv(&[sample_post()]);
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "post_id,username,text,media_urls,timestamp,url"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("p1,zuck,"));
        assert!(row.contains("\"hello, \"\"world\"\"\""));
        assert!(row.contains("a|b"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_reply_csv() {
        let reply = Reply {
            reply_id: "r1".to_string(),
            username: "alice".to_string(),
            text: "line one\nline two".to_string(),
            thread_url: "https://www.threads.net/@zuck/post/p1".to_string(),
        };
        let csv = replies_to_csv(&[reply]);
        assert!(csv.starts_with("reply_id,username,text,thread_url\n"));
        assert!(csv.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_json_is_idempotent_and_keeps_unicode() {
        let posts = vec![Post {
            text: "こんにちは 🧵".to_string(),
            ..sample_post()
        }];

        let first = to_json_pretty(&posts).unwrap();
        let second = to_json_pretty(&posts).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("こんにちは 🧵"));

        // Field order matches declaration order.
        let id_pos = first.find("post_id").unwrap();
        let url_pos = first.find("\"url\"").unwrap();
        assert!(id_pos < url_pos);
    }

    #[test]
    fn test_save_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("posts.csv");
        let json_path = dir.path().join("posts.json");
        let posts = vec![sample_post()];

        save_posts_csv(&posts, &csv_path).unwrap();
        save_json(&posts, &json_path).unwrap();

        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert!(csv.contains("p1"));
        let parsed: Vec<Post> =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].media_urls, vec!["a", "b"]);
    }
}
