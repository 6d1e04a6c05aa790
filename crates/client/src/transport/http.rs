//! reqwest-backed replay transport.
//!
//! - Cookies travel in a single `Cookie` header, re-sent on every redirect hop
//!   whatever the host
//! - Browser-like `User-Agent` (default: desktop Chrome)
//! - Redirects followed by hand (default limit: 10)
//! - One timeout bounds the whole exchange (default: 10s)
//! - Bodies are read up to `max_body_bytes` (default: 5MB) and truncated past it
//!
//! The underlying `reqwest::Client` keeps a connection pool, so one
//! `HttpTransport` should be built at startup and shared.

use super::{ReplayResponse, Transport, TransportError};
use async_trait::async_trait;
use cookie::Cookie;
use crumb_core::config::DEFAULT_USER_AGENT;
use crumb_core::{AppConfig, Error};
use reqwest::{Client, Response, StatusCode, Url, header};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use time::OffsetDateTime;

/// Configuration for the replay transport.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Timeout for the whole replay, redirects included (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_body_bytes: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            max_redirects: 10,
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

impl From<&AppConfig> for ReplayConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// HTTP transport used for live cookie replay.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    config: ReplayConfig,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: ReplayConfig) -> Result<Self, Error> {
        // reqwest strips `Cookie` on cross-host redirects, so hops are followed in `send`.
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpClient(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// GET `url`, following redirects with the same `Cookie` header on each hop.
    async fn send(&self, url: &str, cookie_value: Option<&str>) -> Result<(Url, Response), TransportError> {
        let mut current = Url::parse(url).map_err(|e| TransportError::Request(format!("invalid URL {url}: {e}")))?;
        let mut hops = 0;

        loop {
            let mut request = self.http.get(current.clone()).header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            );
            if let Some(value) = cookie_value {
                request = request.header(header::COOKIE, value);
            }

            let response = request.send().await?;
            let Some(next) = redirect_target(&current, &response) else {
                return Ok((current, response));
            };

            if hops == self.config.max_redirects {
                return Err(TransportError::Request(format!(
                    "too many redirects (limit {}) at {}",
                    self.config.max_redirects, current
                )));
            }
            hops += 1;

            tracing::debug!("redirect {} ({}) -> {}", current, response.status().as_u16(), next);
            current = next;
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn replay(&self, url: &str, cookies: &[(String, String)]) -> Result<ReplayResponse, TransportError> {
        let start = Instant::now();
        let cookie_value = (!cookies.is_empty()).then(|| cookie_header(cookies));

        let exchange = async {
            let (final_url, response) = self.send(url, cookie_value.as_deref()).await?;
            let status = response.status().as_u16();
            let set_cookies = reissued_cookies(response.headers());
            let body = read_body(response, self.config.max_body_bytes).await?;
            Ok::<_, TransportError>((final_url, ReplayResponse { status, set_cookies, body }))
        };

        let (final_url, replayed) = tokio::time::timeout(self.config.timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout)??;

        tracing::debug!(
            "replayed {} cookies to {} -> {} ({}) in {}ms, {} re-issued",
            cookies.len(),
            url,
            final_url,
            replayed.status,
            start.elapsed().as_millis(),
            replayed.set_cookies.len()
        );

        Ok(replayed)
    }
}

/// Where a redirect response points, resolved against the URL that produced it.
///
/// Only 301, 302, 303, 307 and 308 with a usable http(s) `Location` are followed;
/// anything else is the final response.
fn redirect_target(current: &Url, response: &Response) -> Option<Url> {
    let status = response.status();
    if !matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    ) {
        return None;
    }

    let location = response.headers().get(header::LOCATION)?.to_str().ok()?;
    let next = current.join(location).ok()?;
    matches!(next.scheme(), "http" | "https").then_some(next)
}

/// Read at most `max_bytes` of the body, dropping the rest.
async fn read_body(mut response: Response, max_bytes: usize) -> Result<String, TransportError> {
    let mut buf: Vec<u8> = Vec::new();

    while let Some(chunk) = response.chunk().await? {
        let room = max_bytes - buf.len();
        if chunk.len() > room {
            buf.extend_from_slice(&chunk[..room]);
            tracing::debug!("response body truncated at {} bytes", max_bytes);
            break;
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render `name=value` pairs as a `Cookie` header value.
pub(crate) fn cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| Cookie::new(name.as_str(), value.as_str()).to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collect the cookies a response sets, skipping deletions.
pub(crate) fn reissued_cookies(headers: &header::HeaderMap) -> HashMap<String, String> {
    let now = OffsetDateTime::now_utc();
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|line| Cookie::parse(line.to_string()).ok())
        .filter(|c| !is_deletion(c, now))
        .map(|c| (c.name().to_string(), c.value().to_string()))
        .collect()
}

/// Max-Age wins over Expires when both are present.
fn is_deletion(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    if let Some(max_age) = cookie.max_age() {
        return max_age <= time::Duration::ZERO;
    }
    cookie.expires_datetime().is_some_and(|at| at <= now)
}
