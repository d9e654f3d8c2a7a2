//! Post normalizer: turn one raw section item into a [`NormalizedPost`].
use serde_json::Value;

use super::types::{DEFAULT_AUTHOR, DEFAULT_PUBLISHED_TIME, NormalizedPost};

/// `Some` only for items wrapping a `backstagePostRenderer`; anything else on the tab
/// (continuations, shelves, ads) is filtered out.
pub fn normalize_post(item: &Value) -> Option<NormalizedPost> {
    let renderer = item
        .get("backstagePostThreadRenderer")?
        .get("post")?
        .get("backstagePostRenderer")
        .filter(|r| r.is_object())?;

    let post_id = renderer
        .get("postId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(NormalizedPost {
        post_id,
        author: simple_text(renderer, "authorText").unwrap_or(DEFAULT_AUTHOR).to_string(),
        content: content_text(renderer),
        images: image_urls(renderer),
        published_time: simple_text(renderer, "publishedTimeText")
            .unwrap_or(DEFAULT_PUBLISHED_TIME)
            .to_string(),
    })
}

// Empty strings count as missing.
fn simple_text<'a>(renderer: &'a Value, field: &str) -> Option<&'a str> {
    renderer
        .get(field)?
        .get("simpleText")?
        .as_str()
        .filter(|s| !s.is_empty())
}

fn content_text(renderer: &Value) -> String {
    renderer
        .get("contentText")
        .and_then(|c| c.get("runs"))
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn image_urls(renderer: &Value) -> Vec<String> {
    let Some(images) = renderer
        .get("backstageAttachment")
        .and_then(|a| a.get("postMultiImageRenderer"))
        .and_then(|m| m.get("images"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    images
        .iter()
        .enumerate()
        .filter_map(|(index, image)| {
            let url = largest_thumbnail(image);
            if url.is_none() {
                tracing::debug!(index, "community.image.skipped_malformed");
            }
            url
        })
        .collect()
}

// Thumbnails are listed smallest first.
fn largest_thumbnail(image: &Value) -> Option<String> {
    image
        .get("backstageImageRenderer")?
        .get("image")?
        .get("thumbnails")?
        .as_array()?
        .last()?
        .get("url")?
        .as_str()
        .map(str::to_string)
}
