//! Structure navigator: `contents → twoColumnBrowseResultsRenderer → tabs → [tab] →
//! tabRenderer → content → sectionListRenderer → contents[] → itemSectionRenderer →
//! contents[]`.
//!
//! Only an unusable tab collection is fatal. Anything missing below the selected tab
//! yields an empty item list.
use serde_json::Value;

use super::error::ExtractError;
use super::types::ExtractOptions;

fn tab_list(blob: &Value) -> Option<&Vec<Value>> {
    blob.get("contents")?
        .get("twoColumnBrowseResultsRenderer")?
        .get("tabs")?
        .as_array()
}

fn tab_title(tab: &Value) -> Option<&str> {
    tab.get("tabRenderer")?.get("title")?.as_str()
}

fn tab_content(tab: &Value) -> Option<&Value> {
    tab.get("tabRenderer")?.get("content")
}

/// Content of the community tab.
///
/// The first tab whose title is accepted wins; if there is none, or it has no content,
/// the first tab is used instead. `Ok(None)` means the fallback tab exists but carries no
/// content.
pub fn select_tab_content<'a>(
    blob: &'a Value,
    opts: &ExtractOptions,
) -> Result<Option<&'a Value>, ExtractError> {
    let tabs = tab_list(blob);

    let by_title = tabs
        .and_then(|tabs| {
            tabs.iter()
                .find(|tab| tab_title(tab).is_some_and(|t| opts.accepts(t)))
        })
        .and_then(tab_content);
    if let Some(content) = by_title {
        return Ok(Some(content));
    }

    let first = tabs
        .and_then(|tabs| tabs.first())
        .and_then(|tab| tab.get("tabRenderer"))
        .ok_or_else(|| {
            ExtractError::Structure(match tabs {
                None => "tab collection missing".to_string(),
                Some(t) if t.is_empty() => "tab collection empty".to_string(),
                Some(_) => "first tab has no renderer".to_string(),
            })
        })?;

    tracing::info!(
        accepted = ?opts.tab_titles,
        first_title = first.get("title").and_then(|t| t.as_str()).unwrap_or("-"),
        "community.tab.fallback_first"
    );
    Ok(first.get("content"))
}

/// Items of every section under the tab content, flattened in order.
pub fn flatten_sections(content: Option<&Value>) -> Vec<&Value> {
    let sections = content
        .and_then(|c| c.get("sectionListRenderer"))
        .and_then(|r| r.get("contents"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    sections
        .iter()
        .flat_map(|section| {
            section
                .get("itemSectionRenderer")
                .and_then(|r| r.get("contents"))
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
        })
        .collect()
}

/// Raw post candidates of the community tab, in page order.
pub fn collect_items<'a>(
    blob: &'a Value,
    opts: &ExtractOptions,
) -> Result<Vec<&'a Value>, ExtractError> {
    let content = select_tab_content(blob, opts)?;
    let items = flatten_sections(content);
    tracing::debug!(items = items.len(), "community.items.collected");
    Ok(items)
}
