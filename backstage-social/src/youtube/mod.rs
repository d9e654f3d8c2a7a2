//! YouTube channel community tab: locate the embedded `ytInitialData` blob, walk it to
//! the community tab, and normalize its posts.
//!
//! The blob is undocumented and its shape drifts, so only three failures are terminal
//! (see [`ExtractError`]); everything below the tab collection degrades to defaults.
//! Page order is taken as recency order: the first post on the page is "latest".
pub mod client;
pub mod error;
pub mod extract;
pub mod locate;
pub mod navigate;
pub mod types;

pub use client::{CommunityClient, CommunityError, PageFetcher};
pub use error::ExtractError;
pub use types::{ExtractOptions, NormalizedPost};

/// Latest community post on the page, accepting only the default tab title.
pub fn extract_latest_post(html: &str) -> Result<Option<NormalizedPost>, ExtractError> {
    extract_latest_post_with(html, &ExtractOptions::default())
}

/// Latest community post on the page, with custom accepted tab titles.
pub fn extract_latest_post_with(
    html: &str,
    opts: &ExtractOptions,
) -> Result<Option<NormalizedPost>, ExtractError> {
    let blob = locate::locate_blob(html)?;
    let items = navigate::collect_items(&blob, opts)?;
    let latest = items.into_iter().find_map(extract::normalize_post);
    tracing::debug!(found = latest.is_some(), "community.latest_post");
    Ok(latest)
}

/// Every community post on the page, in page order.
pub fn extract_posts(html: &str, opts: &ExtractOptions) -> Result<Vec<NormalizedPost>, ExtractError> {
    let blob = locate::locate_blob(html)?;
    let items = navigate::collect_items(&blob, opts)?;
    let total = items.len();
    let posts: Vec<NormalizedPost> = items.into_iter().filter_map(extract::normalize_post).collect();
    tracing::debug!(items = total, posts = posts.len(), "community.posts");
    Ok(posts)
}
