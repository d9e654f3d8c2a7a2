//! Minimal HTML page fetcher with safe logging, retries, and a browser identity.
//!
//! - Request options: timeout, retries, absolute URLs
//! - Sends a desktop browser `User-Agent` and an `Accept-Language` header so
//!   channel pages render the same markup (and tab labels) a visitor would get
//! - Retries 429/5xx and network failures with exponential backoff and
//!   `Retry-After` support
//! - Optional *raw* response logging via `BACKSTAGE_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), backstage_http::HttpError> {
//! let client = backstage_http::HttpClient::new("https://www.youtube.com")?;
//! let html = client
//!     .get_text("@SomeChannel/community", backstage_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), retries and final errors.
//! Cookies never appear in logs.

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode, Url};
use std::env;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Desktop Chrome identity; the site serves a degraded page to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Spanish first: the community tab is looked up by its localized title.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "es-ES,es;q=0.9";

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "BACKSTAGE_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

/// Longest server-requested pause honoured before a retry.
const RETRY_AFTER_MAX_SECS: u64 = 30;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Redact session-bearing headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let mut val = v.to_str().unwrap_or("").to_string();
            if key.eq_ignore_ascii_case("set-cookie") || key.eq_ignore_ascii_case("cookie") {
                val = "<redacted>".into();
            }
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

/// Validate caller input as an absolute http(s) page URL.
///
/// ```
/// use backstage_http::parse_page_url;
///
/// let url = parse_page_url("  https://www.youtube.com/@chan/community ").unwrap();
/// assert_eq!(url.host_str(), Some("www.youtube.com"));
/// assert!(parse_page_url("   ").is_err());
/// assert!(parse_page_url("ftp://example.com").is_err());
/// ```
pub fn parse_page_url(input: &str) -> Result<Url, HttpError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(HttpError::Url("empty URL".into()));
    }
    let url = Url::parse(trimmed).map_err(|e| HttpError::Url(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HttpError::Url(format!("unsupported scheme: {other}"))),
    }
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use backstage_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(1),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.allow_absolute == false);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL with the default browser identity.
    ///
    /// ```no_run
    /// use backstage_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://www.youtube.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 2);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        Self::with_identity(base, DEFAULT_USER_AGENT, DEFAULT_ACCEPT_LANGUAGE)
    }

    /// Construct a client that presents the given `User-Agent` and `Accept-Language`.
    pub fn with_identity(
        base: &str,
        user_agent: &str,
        accept_language: &str,
    ) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;

        let mut headers = HeaderMap::new();
        let lang = HeaderValue::from_str(accept_language)
            .map_err(|e| HttpError::Build(format!("invalid Accept-Language header: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, lang);

        let inner = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use backstage_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://www.youtube.com")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget returned by [`HttpClient::new`].
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET a page and return its body as text.
    pub async fn get_text(&self, path: &str, opts: RequestOpts) -> Result<String, HttpError> {
        let bytes = self.request_internal(Method::GET, path, opts).await?;
        String::from_utf8(bytes).map_err(|e| {
            let snippet = snip_body(e.as_bytes());
            HttpError::Decode(e.utf8_error().to_string(), snippet)
        })
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_internal(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts,
    ) -> Result<Vec<u8>, HttpError> {
        let url = self.resolve(path, opts.allow_absolute)?;

        let mut attempt = 0usize;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let req_id = uuid::Uuid::new_v4().simple().to_string();

        loop {
            // ----- Build request -----
            let timeout = opts.timeout.unwrap_or(self.default_timeout);
            let rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout);

            tracing::debug!(
                req_id=%req_id,
                attempt=attempt + 1,
                max_retries,
                method=%method,
                host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                timeout_ms=timeout.as_millis() as u64,
                "http.request.start"
            );

            // ----- Send -----
            let t0 = std::time::Instant::now();
            let resp = match rb.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network_send"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(
                        req_id=%req_id,
                        attempt,
                        max_retries,
                        message=%message,
                        "http.network_error.send"
                    );
                    return Err(HttpError::Network(message));
                }
            };
            let status = resp.status();
            let headers = resp.headers().clone();
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network_body"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(
                        req_id=%req_id,
                        attempt,
                        max_retries,
                        message=%message,
                        "http.network_error.body"
                    );
                    return Err(HttpError::Network(message));
                }
            };
            let dur_ms = t0.elapsed().as_millis() as u64;

            let content_type = headers
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");

            tracing::debug!(
                req_id=%req_id,
                %status,
                duration_ms=dur_ms,
                body_len=bytes.len(),
                content_type=%content_type,
                "http.response.headers"
            );

            if raw_enabled() {
                let hdrs = redact_headers(&headers);
                let truncated = bytes.len() > RAW_MAX_BODY;
                let body_snip = &bytes[..bytes.len().min(RAW_MAX_BODY)];
                let text = String::from_utf8_lossy(body_snip);
                tracing::info!(
                    target:"http.raw",
                    %req_id,
                    status=%status,
                    duration_ms=dur_ms,
                    headers=?hdrs,
                    body=%text,
                    truncated
                );
            }

            let snippet = snip_body(&bytes);
            tracing::trace!(
                req_id=%req_id,
                body_snippet=%snippet,
                "http.response.body_snippet"
            );

            // ----- Success path -----
            if status.is_success() {
                return Ok(bytes.to_vec());
            }

            // ----- Non-success: maybe retry -----
            let message = status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string();

            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;
            let is_5xx = status.is_server_error();

            if (is_429 || is_5xx) && attempt < max_retries {
                attempt += 1;
                let delay = retry_delay(&headers, is_429, attempt);
                tracing::warn!(
                    req_id=%req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms=delay.as_millis() as u64,
                    retry_after_secs=?retry_after_delay_secs(&headers),
                    message=%message,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                req_id=%req_id,
                %status,
                message=%message,
                body_snippet=%snippet,
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                message,
                request_id: req_id,
            });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn backoff(attempt: usize) -> Duration {
    Duration::from_millis(200u64.saturating_mul(1 << (attempt - 1).min(16)))
}

/// Delay before the next attempt after a retryable status. `Retry-After` is honoured up to
/// [`RETRY_AFTER_MAX_SECS`].
fn retry_delay(h: &HeaderMap, is_429: bool, attempt: usize) -> Duration {
    if let Some(secs) = retry_after_delay_secs(h) {
        Duration::from_secs(secs.min(RETRY_AFTER_MAX_SECS))
    } else if is_429 {
        // floor for 429 when no Retry-After is present
        backoff(attempt).max(Duration::from_millis(1100))
    } else {
        backoff(attempt)
    }
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
