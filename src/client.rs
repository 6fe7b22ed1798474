use std::fmt;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::LookupError;
use crate::models::{map_user, Profile, RawUser};

/// Resolves a handle to a profile.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Issues at most one request. Fails with [`LookupError::EmptyHandle`]
    /// without touching the network when the trimmed handle is empty.
    async fn lookup(&self, handle: &str) -> Result<Profile, LookupError>;
}

/// Creates a preconfigured HTTP client with required headers.
///
/// The client is shared with avatar downloads, whose URLs come from API
/// responses, so it never carries credentials. The token is attached per
/// request by [`GitHubClient`].
pub fn build_client(config: &AppConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).context("Invalid user agent value")?,
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github.v3+json"),
    );

    let mut builder = Client::builder().default_headers(headers);
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

/// Lookup client for the GitHub REST API.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GitHubClient {
    pub fn new(http: Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: None,
        }
    }

    /// Sends `Authorization: Bearer {token}` on API requests only.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Builds the HTTP client and base URL from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let base_url = config.api_base_url().context("Invalid API base URL")?;
        Ok(Self::new(build_client(config)?, base_url).with_token(config.token.clone()))
    }

    /// The shared HTTP client, also used for avatar downloads. Carries no
    /// credentials.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// `{base}/users/{handle}` with the handle percent-encoded as a single
    /// path segment.
    pub fn user_url(&self, handle: &str) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("users")
            .push(handle);
        Ok(url)
    }
}

#[async_trait]
impl ProfileLookup for GitHubClient {
    async fn lookup(&self, handle: &str) -> Result<Profile, LookupError> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(LookupError::EmptyHandle);
        }

        // `.` and `..` would be normalized away and hit `/users` itself.
        if handle == "." || handle == ".." {
            info!(%handle, "handle cannot name a GitHub user");
            return Err(LookupError::NotFound(handle.to_string()));
        }

        let url = self.user_url(handle)?;
        info!(%handle, %url, "looking up GitHub user");

        let mut request = self.http.get(url);
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%handle, error = %e, "GitHub request failed");
            LookupError::from(e)
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!(%handle, "GitHub user not found");
            return Err(LookupError::NotFound(handle.to_string()));
        }
        if !status.is_success() {
            warn!(%handle, %status, "GitHub API returned an error status");
            return Err(LookupError::Status(status));
        }

        let raw = response.json::<RawUser>().await.map_err(|e| {
            warn!(%handle, error = %e, "Failed to deserialize GitHub user response");
            LookupError::from(e)
        })?;

        let mut profile = map_user(raw);
        if profile.handle.is_empty() {
            debug!(%handle, "response has no login, keeping requested handle");
            profile.handle = handle.to_string();
        }
        Ok(profile)
    }
}

/// RGBA pixels of a decoded avatar.
#[derive(Debug, Clone)]
pub struct AvatarPixels {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Downloads an avatar and decodes it into raw RGBA pixels.
///
/// Returns `None` for an empty URL or on any download/decode failure; the
/// card simply shows no picture.
pub async fn fetch_avatar(client: &Client, url: &str, size: u32) -> Option<AvatarPixels> {
    if url.is_empty() {
        return None;
    }

    let mut sized_url = Url::parse(url).ok()?;
    sized_url
        .query_pairs_mut()
        .append_pair("s", &size.to_string());

    let bytes = match fetch_bytes(client, sized_url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "avatar download failed");
            return None;
        }
    };
    let image = image::load_from_memory(&bytes).ok()?;

    // GitHub sometimes serves cached avatars larger than requested.
    let rgba = image.thumbnail_exact(size, size).to_rgba8();
    let (width, height) = rgba.dimensions();

    Some(AvatarPixels {
        rgba: rgba.into_raw(),
        width,
        height,
    })
}

async fn fetch_bytes(client: &Client, url: Url) -> reqwest::Result<Vec<u8>> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}
