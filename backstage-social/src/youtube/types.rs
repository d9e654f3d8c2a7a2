use serde::{Deserialize, Serialize};

/// Author shown when the post carries no author text.
pub const DEFAULT_AUTHOR: &str = "Desconocido";
/// Published time shown when the post carries no time text.
pub const DEFAULT_PUBLISHED_TIME: &str = "No disponible";
/// Title of the community tab as rendered for Spanish-speaking visitors.
pub const COMMUNITY_TAB_TITLE: &str = "Comunidad";

/// Caller-facing community post. Every field is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPost {
    pub post_id: String,
    pub author: String,
    pub content: String,
    /// Highest-resolution URL of each attached image, in attachment order.
    pub images: Vec<String>,
    pub published_time: String,
}

/// Knobs for the structure navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Tab titles accepted as the community tab, compared exactly.
    pub tab_titles: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            tab_titles: vec![COMMUNITY_TAB_TITLE.to_string()],
        }
    }
}

impl ExtractOptions {
    pub fn with_tab_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tab_titles: titles.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn accepts(&self, title: &str) -> bool {
        self.tab_titles.iter().any(|t| t == title)
    }
}
