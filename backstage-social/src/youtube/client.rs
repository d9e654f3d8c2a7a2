//! Fetch-then-extract wrapper around the community pipeline.
//!
//! The page fetcher is a trait so callers can swap transport (or serve fixtures) without
//! touching extraction; [`HttpClient`] is the production implementation.
use async_trait::async_trait;
use backstage_http::{HttpClient, HttpError, RequestOpts};
use thiserror::Error;

use super::error::ExtractError;
use super::types::{ExtractOptions, NormalizedPost};

/// Retrieves raw page HTML for an absolute URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, HttpError>;
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, HttpError> {
        self.get_text(
            url,
            RequestOpts {
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await
    }
}

#[derive(Debug, Error)]
pub enum CommunityError {
    #[error(transparent)]
    Fetch(#[from] HttpError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[derive(Clone)]
pub struct CommunityClient<F> {
    fetcher: F,
    opts: ExtractOptions,
}

impl<F: PageFetcher> CommunityClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            opts: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, opts: ExtractOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.opts
    }

    /// Most recent community post of the channel page at `url`.
    pub async fn latest_post(&self, url: &str) -> Result<Option<NormalizedPost>, CommunityError> {
        let html = self.fetcher.fetch(url).await?;
        tracing::debug!(url, html_len = html.len(), "community.page.fetched");
        Ok(super::extract_latest_post_with(&html, &self.opts)?)
    }

    /// Every community post of the channel page at `url`, in page order.
    pub async fn posts(&self, url: &str) -> Result<Vec<NormalizedPost>, CommunityError> {
        let html = self.fetcher.fetch(url).await?;
        tracing::debug!(url, html_len = html.len(), "community.page.fetched");
        Ok(super::extract_posts(&html, &self.opts)?)
    }
}
