//! API client for the Wolai open API.
//!
//! Each public method performs exactly one HTTP request. Protected calls take
//! an optional explicit token and otherwise fall back to the shared
//! `TokenCache`; token issuance and refresh write their result back into it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::TokenCache;
use crate::config::Config;
use crate::models::{ApiResponse, BlockCreate, DatabaseRow, TokenInfo};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for all Wolai open API endpoints
pub const DEFAULT_BASE_URL: &str = "https://openapi.wolai.com/v1";

/// HTTP request timeout in seconds.
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    #[serde(rename = "appId")]
    app_id: &'a str,
    #[serde(rename = "appSecret")]
    app_secret: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateBlocksRequest<'a> {
    parent_id: &'a str,
    blocks: &'a [BlockCreate],
}

#[derive(Debug, Serialize)]
struct CreateRowsRequest<'a> {
    rows: &'a [DatabaseRow],
}

/// API client for Wolai.
/// Clone is cheap - the connection pool and token cache are shared.
#[derive(Clone)]
pub struct WolaiClient {
    client: Client,
    base_url: Url,
    tokens: Arc<TokenCache>,
}

impl WolaiClient {
    /// Create a client against the public API
    pub fn new(tokens: Arc<TokenCache>) -> Result<Self> {
        Self::with_base_url(
            DEFAULT_BASE_URL,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
            tokens,
        )
    }

    /// Create a client using the base URL and timeout from `config`
    pub fn from_config(config: &Config, tokens: Arc<TokenCache>) -> Result<Self> {
        Self::with_base_url(config.base_url(), config.request_timeout(), tokens)
    }

    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<TokenCache>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid API base URL: {}", base_url);
        }

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// The cache this client reads tokens from and stores them into
    pub fn token_cache(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` to the base URL, each percent-encoded as one segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Invalid API base URL: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Pick the explicit token if given, else the cached one.
    fn resolve_token(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(token) = explicit.filter(|t| !t.trim().is_empty()) {
            return Ok(token.to_string());
        }
        self.tokens
            .read()
            .ok_or_else(|| ApiError::MissingToken.into())
    }

    fn require<'a>(value: &'a str, name: &str) -> Result<&'a str> {
        if value.trim().is_empty() {
            return Err(ApiError::missing(name).into());
        }
        Ok(value)
    }

    /// Like `require`, but also rejects values that would not stay one path segment
    fn require_id<'a>(value: &'a str, name: &str) -> Result<&'a str> {
        let value = Self::require(value, name)?;
        if value == "." || value == ".." {
            return Err(ApiError::InvalidParameter(format!(
                "{} is not a valid id: {}",
                name, value
            ))
            .into());
        }
        Ok(value)
    }

    fn authorized(request: RequestBuilder, token: &str) -> RequestBuilder {
        // Wolai expects the raw token, not "Bearer <token>"
        request
            .header(header::AUTHORIZATION, token)
            .header(header::CONTENT_TYPE, "application/json")
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Send `request` and unwrap the `data` field of the response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send {} request", what))?;

        let response = Self::check_response(response).await?;

        let text = response
            .text()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to read {} response body", what))?;

        let parsed: ApiResponse<T> = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse {} response: {}", what, e))
        })?;

        Ok(parsed.data)
    }

    // ===== Tokens =====

    /// Obtain a new app token and cache it
    pub async fn get_token(&self, app_id: &str, app_secret: &str) -> Result<TokenInfo> {
        let app_id = Self::require(app_id, "App ID")?;
        let app_secret = Self::require(app_secret, "App Secret")?;

        let url = self.url(&["token"])?;
        debug!(url = %url, "Requesting app token");

        let request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&TokenRequest { app_id, app_secret });

        let info: TokenInfo = self.send(request, "token").await?;
        self.tokens.store(info.app_token.clone(), info.expiration());
        info!(expire_time = info.expire_time, "Obtained app token");

        Ok(info)
    }

    /// Reset the app token and cache the replacement.
    ///
    /// The old token stays cached if the refresh fails.
    pub async fn refresh_token(&self, token: Option<&str>) -> Result<TokenInfo> {
        let token = self.resolve_token(token)?;

        let url = self.url(&["token"])?;
        debug!(url = %url, "Refreshing app token");

        let request = Self::authorized(self.client.put(url), &token);

        let info: TokenInfo = self.send(request, "token refresh").await?;
        self.tokens.store(info.app_token.clone(), info.expiration());
        info!(expire_time = info.expire_time, "Refreshed app token");

        Ok(info)
    }

    // ===== Blocks =====

    /// Fetch a single block (a page id works too)
    pub async fn get_block(&self, id: &str, token: Option<&str>) -> Result<Value> {
        let id = Self::require_id(id, "Block ID")?;
        let token = self.resolve_token(token)?;

        let url = self.url(&["blocks", id])?;
        debug!(url = %url, "Fetching block");

        self.send(Self::authorized(self.client.get(url), &token), "block")
            .await
    }

    /// Fetch the direct children of a block
    pub async fn get_block_children(&self, id: &str, token: Option<&str>) -> Result<Value> {
        let id = Self::require_id(id, "Block ID")?;
        let token = self.resolve_token(token)?;

        let url = self.url(&["blocks", id, "children"])?;
        debug!(url = %url, "Fetching block children");

        self.send(Self::authorized(self.client.get(url), &token), "block children")
            .await
    }

    /// Insert blocks under `parent_id`, returning the URLs of the new blocks
    pub async fn create_blocks(
        &self,
        parent_id: &str,
        blocks: &[BlockCreate],
        token: Option<&str>,
    ) -> Result<Vec<String>> {
        let parent_id = Self::require_id(parent_id, "Parent ID")?;
        if blocks.is_empty() {
            return Err(ApiError::MissingParameter(
                "Blocks array is required and must not be empty".to_string(),
            )
            .into());
        }
        let token = self.resolve_token(token)?;

        let url = self.url(&["blocks"])?;
        debug!(url = %url, parent_id = parent_id, count = blocks.len(), "Creating blocks");

        let request = Self::authorized(self.client.post(url), &token)
            .json(&CreateBlocksRequest { parent_id, blocks });

        self.send(request, "create blocks").await
    }

    // ===== Databases =====

    /// Fetch a database's columns and rows
    pub async fn get_database(&self, id: &str, token: Option<&str>) -> Result<Value> {
        let id = Self::require_id(id, "Database ID")?;
        let token = self.resolve_token(token)?;

        let url = self.url(&["databases", id])?;
        debug!(url = %url, "Fetching database");

        self.send(Self::authorized(self.client.get(url), &token), "database")
            .await
    }

    /// Insert rows into an existing database
    pub async fn create_database_rows(
        &self,
        database_id: &str,
        rows: &[DatabaseRow],
        token: Option<&str>,
    ) -> Result<Value> {
        let database_id = Self::require_id(database_id, "Database ID")?;
        if rows.is_empty() {
            return Err(ApiError::MissingParameter(
                "Rows array is required and must not be empty".to_string(),
            )
            .into());
        }
        let token = self.resolve_token(token)?;

        let url = self.url(&["databases", database_id, "rows"])?;
        debug!(url = %url, count = rows.len(), "Creating database rows");

        let request =
            Self::authorized(self.client.post(url), &token).json(&CreateRowsRequest { rows });

        self.send(request, "create rows").await
    }
}
