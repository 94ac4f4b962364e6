//! Slack Web API client for `search.messages` and `search.files`.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::CoreError;
use crate::config::AppConfig;
use crate::search::{FileMatch, MatchSet, MessageMatch, SearchRequest, SearchTransport};

/// Environment variable consulted before the config file for the API token.
pub const SLACK_TOKEN_ENV: &str = "SLACK_API_TOKEN";

const USER_TOKEN_PREFIX: &str = "xoxp-";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Response envelope shared by both search methods.
///
/// `results` is absent when the API returns no match collection.
#[derive(Debug, Deserialize)]
struct SearchEnvelope<T> {
    #[serde(default)]
    ok: bool,
    error: Option<String>,
    #[serde(rename = "messages", alias = "files")]
    results: Option<MatchSet<T>>,
}

/// Slack Web API client.
pub struct SlackClient {
    http_client: Client,
    api_url: String,
    token: String,
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Create a client for `api_url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(token: impl Into<String>, api_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("slk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::Other(format!("creating HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Create a client from loaded configuration.
    ///
    /// The token comes from `SLACK_API_TOKEN` when set, otherwise from
    /// `[slack] token`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Auth`] when no usable user token is available.
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        let token = resolve_token(
            std::env::var(SLACK_TOKEN_ENV).ok().as_deref(),
            config.slack.token.as_deref(),
        )?;
        let timeout = Duration::from_secs(config.runtime.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS));
        log::debug!(
            "using Slack API at {} (timeout {}s)",
            config.slack.api_url,
            timeout.as_secs()
        );
        Self::new(token, &config.slack.api_url, timeout)
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn search<T: DeserializeOwned>(
        &self,
        api_method: &str,
        request: &SearchRequest<'_>,
    ) -> Result<MatchSet<T>, CoreError> {
        let url = format!("{}/{api_method}", self.api_url);
        let params = [
            ("query", request.query.to_string()),
            ("count", request.count.to_string()),
            ("page", request.page.to_string()),
            ("sort", request.sort.to_string()),
            ("sort_dir", request.sort_dir.to_string()),
            ("highlight", request.highlight.to_string()),
        ];

        log::trace!("GET {url}");
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&params)
            .send()
            .await
            .map_err(|e| CoreError::Api(format!("{api_method} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CoreError::Api(format!(
                "{api_method} failed: {status} - {text}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Api(format!("reading {api_method} response: {e}")))?;
        let envelope: SearchEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| CoreError::Serialization(format!("parsing {api_method} response: {e}")))?;

        if !envelope.ok {
            let reason = envelope.error.unwrap_or_else(|| "unknown_error".to_string());
            return Err(CoreError::Api(format!("{api_method}: {reason}")));
        }

        Ok(envelope.results.unwrap_or_else(|| {
            log::debug!("{api_method}: response carried no match set");
            MatchSet::default()
        }))
    }
}

impl SearchTransport for SlackClient {
    async fn search_messages(
        &self,
        request: &SearchRequest<'_>,
    ) -> Result<MatchSet<MessageMatch>, CoreError> {
        self.search("search.messages", request).await
    }

    async fn search_files(
        &self,
        request: &SearchRequest<'_>,
    ) -> Result<MatchSet<FileMatch>, CoreError> {
        self.search("search.files", request).await
    }
}

/// Pick the API token: `from_env` wins over `from_config`, blanks are ignored.
///
/// # Errors
///
/// Returns [`CoreError::Auth`] if neither source has a token, or if the token
/// is not a user token.
pub fn resolve_token(from_env: Option<&str>, from_config: Option<&str>) -> Result<String, CoreError> {
    let token = [from_env, from_config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .ok_or_else(|| {
            CoreError::Auth(format!(
                "no Slack token configured; set {SLACK_TOKEN_ENV} or [slack] token in the config file"
            ))
        })?;

    if !token.starts_with(USER_TOKEN_PREFIX) {
        let kind = token.split('-').next().unwrap_or_default();
        return Err(CoreError::Auth(format!(
            "search requires a user token ({USER_TOKEN_PREFIX}*) with the search:read scope, got a {kind}- token"
        )));
    }
    Ok(token.to_string())
}
