//! forge::gitea
//!
//! Gitea forge implementation using the REST API (v1).
//!
//! # Design
//!
//! This module implements the `Forge` trait for Gitea. Every operation is a
//! single HTTP request except `list_releases`, which walks pages until the
//! server returns an empty one.
//!
//! # Authentication
//!
//! Requests carry `Authorization: token <api key>`. An empty key is rejected
//! with `ForgeError::AuthRequired` before anything is sent.
//!
//! # Transport
//!
//! TLS verification and the cookie store are configured through an explicit
//! [`TransportConfig`] handed to the constructor. There is no shared client.
//!
//! # Example
//!
//! ```ignore
//! use gitea_release::forge::gitea::{GiteaForge, TransportConfig};
//! use gitea_release::forge::Forge;
//!
//! let forge = GiteaForge::new(
//!     "https://gitea.example.com/",
//!     "token",
//!     "owner",
//!     "repo",
//!     &TransportConfig::default(),
//! )?;
//! let releases = forge.list_releases().await?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use super::traits::{
    Attachment, AttachmentUpload, CreateReleaseRequest, EditReleaseRequest, Forge, ForgeError,
    Release,
};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("gitea-release/", env!("CARGO_PKG_VERSION"));

/// Page size used when listing releases.
const PAGE_LIMIT: usize = 50;

/// Upper bound on release pages, for servers that ignore `page`.
const MAX_PAGES: usize = 100;

/// Header Gitea uses to report the total number of list items.
const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Outbound HTTP client settings.
///
/// `insecure` disables TLS certificate verification and attaches a cookie
/// store to the client. It exists for self-signed forge installations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Skip TLS certificate verification and keep cookies between requests
    pub insecure: bool,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            insecure: false,
            user_agent: USER_AGENT_VALUE.to_string(),
        }
    }
}

impl TransportConfig {
    /// Transport settings with the given `insecure` toggle.
    pub fn with_insecure(insecure: bool) -> Self {
        Self {
            insecure,
            ..Self::default()
        }
    }

    /// Build a reqwest client from these settings.
    fn build_client(&self) -> Result<Client, ForgeError> {
        let mut builder = Client::builder().user_agent(self.user_agent.clone());
        if self.insecure {
            builder = builder
                .danger_accept_invalid_certs(true)
                .cookie_store(true);
        }
        builder
            .build()
            .map_err(|e| ForgeError::NetworkError(format!("failed to build HTTP client: {}", e)))
    }
}

/// Gitea forge implementation.
///
/// Bound to one repository (`owner/repo`) on one server.
pub struct GiteaForge {
    /// HTTP client for making requests
    client: Client,
    /// API token
    token: String,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// Server root, always ending with `/`
    base_url: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GiteaForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiteaForge")
            .field("has_token", &!self.token.is_empty())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GiteaForge {
    /// Create a Gitea forge for one repository.
    ///
    /// `base_url` is the server root (e.g. `https://gitea.example.com/`); a
    /// missing trailing `/` is added.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::NetworkError` if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, ForgeError> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client: transport.build_client()?,
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            base_url,
        })
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        if self.token.is_empty() {
            return Err(ForgeError::AuthRequired);
        }
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("token {}", self.token))
            .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}api/v1/repos/{}/{}/{}",
            self.base_url, self.owner, self.repo, path
        )
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    /// Handle an API response that carries no body on success.
    async fn handle_empty_response(&self, response: Response) -> Result<(), ForgeError> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    /// Map an error response to a `ForgeError`.
    async fn error_from_response(response: Response, status: StatusCode) -> ForgeError {
        // Gitea reports {"message": "...", "url": "..."}; fall back to the raw body.
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<GiteaErrorResponse>(&text) {
            Ok(err) if !err.message.is_empty() => err.message,
            _ if !text.trim().is_empty() => text.trim().to_string(),
            _ => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Gitea server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl Forge for GiteaForge {
    fn name(&self) -> &'static str {
        "gitea"
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError> {
        let url = self.repo_url("releases");
        let mut releases = Vec::new();

        for page in 1..=MAX_PAGES {
            let response = self
                .client
                .get(&url)
                .headers(self.headers()?)
                .query(&[("page", page), ("limit", PAGE_LIMIT)])
                .send()
                .await
                .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

            let total = total_count(&response);
            let batch: Vec<GiteaRelease> = self.handle_response(response).await?;
            if batch.is_empty() {
                return Ok(releases);
            }
            releases.extend(batch.into_iter().map(Release::from));

            if total.is_some_and(|total| releases.len() >= total) {
                return Ok(releases);
            }
        }

        Err(ForgeError::InvalidResponse(format!(
            "release listing did not end after {} pages",
            MAX_PAGES
        )))
    }

    async fn create_release(&self, request: CreateReleaseRequest) -> Result<Release, ForgeError> {
        let url = self.repo_url("releases");

        let body = ReleaseBody {
            tag_name: &request.tag_name,
            name: &request.title,
            body: &request.note,
            draft: request.draft,
            prerelease: request.prerelease,
        };

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let release: GiteaRelease = self.handle_response(response).await?;
        Ok(release.into())
    }

    async fn edit_release(&self, request: EditReleaseRequest) -> Result<Release, ForgeError> {
        let url = self.repo_url(&format!("releases/{}", request.id));

        let body = ReleaseBody {
            tag_name: &request.tag_name,
            name: &request.title,
            body: &request.note,
            draft: request.draft,
            prerelease: request.prerelease,
        };

        let response = self
            .client
            .patch(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let release: GiteaRelease = self.handle_response(response).await?;
        Ok(release.into())
    }

    async fn list_attachments(&self, release_id: i64) -> Result<Vec<Attachment>, ForgeError> {
        let url = self.repo_url(&format!("releases/{}/assets", release_id));

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let attachments: Vec<GiteaAttachment> = self.handle_response(response).await?;
        Ok(attachments.into_iter().map(Into::into).collect())
    }

    async fn create_attachment(
        &self,
        release_id: i64,
        upload: AttachmentUpload,
    ) -> Result<Attachment, ForgeError> {
        let url = self.repo_url(&format!("releases/{}/assets", release_id));

        let body = Body::wrap_stream(ReaderStream::new(upload.file));
        let part = Part::stream_with_length(body, upload.size).file_name(upload.name.clone());
        let form = Form::new().part("attachment", part);

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .query(&[("name", upload.name.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let attachment: GiteaAttachment = self.handle_response(response).await?;
        Ok(attachment.into())
    }

    async fn delete_attachment(
        &self,
        release_id: i64,
        attachment_id: i64,
    ) -> Result<(), ForgeError> {
        let url = self.repo_url(&format!(
            "releases/{}/assets/{}",
            release_id, attachment_id
        ));

        let response = self
            .client
            .delete(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        self.handle_empty_response(response).await
    }
}

/// Total item count advertised by a list response, if any.
fn total_count(response: &Response) -> Option<usize> {
    response
        .headers()
        .get(TOTAL_COUNT_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

// =============================================================================
// Gitea API types (internal)
// =============================================================================

/// Request body for creating or editing a release.
#[derive(Serialize)]
struct ReleaseBody<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
    prerelease: bool,
}

/// Gitea error response format.
#[derive(Deserialize)]
struct GiteaErrorResponse {
    #[serde(default)]
    message: String,
}

/// Gitea release response format.
#[derive(Deserialize)]
struct GiteaRelease {
    id: i64,
    tag_name: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    prerelease: bool,
    html_url: Option<String>,
}

/// Gitea attachment response format.
#[derive(Deserialize)]
struct GiteaAttachment {
    id: i64,
    name: String,
    #[serde(default)]
    size: u64,
    browser_download_url: Option<String>,
}

impl From<GiteaRelease> for Release {
    fn from(r: GiteaRelease) -> Self {
        Release {
            id: r.id,
            tag_name: r.tag_name,
            title: r.name,
            note: r.body,
            draft: r.draft,
            prerelease: r.prerelease,
            url: r.html_url,
        }
    }
}

impl From<GiteaAttachment> for Attachment {
    fn from(a: GiteaAttachment) -> Self {
        Attachment {
            id: a.id,
            name: a.name,
            size: a.size,
            download_url: a.browser_download_url,
        }
    }
}
