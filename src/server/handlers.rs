//! API endpoint handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::AppState;
use crate::scrape::{ProfileScraper, DEFAULT_MAX_POSTS};

/// Query parameters for a profile scrape.
#[derive(Debug, Deserialize)]
pub struct ProfilePostsQuery {
    pub username: Option<String>,
    pub max_posts: Option<usize>,
}

/// Scrape a profile's posts and return them as JSON.
///
/// A missing or empty username is a client error and never starts a browser.
/// Any failure past that point is reported as a server error with the
/// failure's description; the process keeps serving.
pub async fn profile_posts(
    State(state): State<AppState>,
    Query(params): Query<ProfilePostsQuery>,
) -> impl IntoResponse {
    let username = match params.username.filter(|u| !u.is_empty()) {
        Some(u) => u,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "username is required"})),
            );
        }
    };
    let max_posts = params.max_posts.unwrap_or(DEFAULT_MAX_POSTS);

    info!("Scraping posts for @{}", username);
    let scraper = ProfileScraper::from_settings(&state.settings);

    match scraper.profile_posts(&username, max_posts).await {
        Ok(posts) => (
            StatusCode::OK,
            Json(json!({
                "username": username,
                "post_count": posts.len(),
                "posts": posts,
            })),
        ),
        Err(e) => {
            error!("Error scraping @{}: {}", username, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}

/// Liveness probe, independent of scraping capability.
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "OK"}))
}
