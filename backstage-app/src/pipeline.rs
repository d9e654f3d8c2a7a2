use std::time::Duration;

use backstage_common::BackstageError;
use backstage_config::BackstageConfig;
use backstage_http::{
    DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT, HttpClient, HttpError, parse_page_url,
};
use backstage_social::youtube::{CommunityClient, CommunityError, ExtractOptions, PageFetcher};
use futures::stream::{self, StreamExt};

use crate::envelope::{Data, Envelope};

/// What to report for each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Latest,
    All,
}

pub struct Runner<F> {
    client: CommunityClient<F>,
}

impl Runner<HttpClient> {
    pub fn from_config(cfg: &BackstageConfig) -> Result<Self, HttpError> {
        let http = HttpClient::with_identity(
            &cfg.http.base_url,
            cfg.http.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
            cfg.http
                .accept_language
                .as_deref()
                .unwrap_or(DEFAULT_ACCEPT_LANGUAGE),
        )?
        .with_timeout(Duration::from_secs(cfg.http.timeout_secs))
        .with_retries(cfg.http.retries);

        let opts = ExtractOptions::with_tab_titles(cfg.extract.tab_titles.iter().cloned());
        Ok(Self::new(CommunityClient::new(http).with_options(opts)))
    }
}

impl<F: PageFetcher> Runner<F> {
    pub fn new(client: CommunityClient<F>) -> Self {
        Self { client }
    }

    /// One envelope per input, in input order, with at most `concurrency` pages in flight.
    pub async fn run(&self, urls: &[String], mode: Mode, concurrency: usize) -> Vec<Envelope> {
        stream::iter(urls)
            .map(|url| self.process(url, mode))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    async fn process(&self, raw: &str, mode: Mode) -> Envelope {
        let url = match parse_page_url(raw) {
            Ok(url) => url,
            Err(e) => {
                let err = BackstageError::InvalidUrl(e.to_string());
                tracing::warn!(url = raw, error = %err, "community.request.rejected");
                return Envelope::failure(raw.trim(), &err);
            }
        };

        match self.fetch(url.as_str(), mode).await {
            Ok(data) => {
                tracing::info!(url = %url, "community.request.ok");
                Envelope::success(url.as_str(), data)
            }
            Err(err) => {
                match &err {
                    BackstageError::NoPost => {
                        tracing::info!(url = %url, "community.request.no_post")
                    }
                    other => tracing::error!(url = %url, error = %other, "community.request.failed"),
                }
                Envelope::failure(url.as_str(), &err)
            }
        }
    }

    async fn fetch(&self, url: &str, mode: Mode) -> backstage_common::Result<Data> {
        match mode {
            Mode::Latest => self
                .client
                .latest_post(url)
                .await
                .map_err(into_backstage)?
                .map(Data::Post)
                .ok_or(BackstageError::NoPost),
            Mode::All => {
                let posts = self.client.posts(url).await.map_err(into_backstage)?;
                if posts.is_empty() {
                    Err(BackstageError::NoPost)
                } else {
                    Ok(Data::Posts(posts))
                }
            }
        }
    }
}

fn into_backstage(err: CommunityError) -> BackstageError {
    match err {
        CommunityError::Fetch(e) => BackstageError::Fetch(e.to_string()),
        CommunityError::Extract(e) => BackstageError::Extract(e.to_string()),
    }
}
