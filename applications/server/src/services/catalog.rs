//! Spotify Web API adapter for curated collection lookups.
//!
//! Authenticates with the client-credentials flow and reuses the access
//! token until shortly before it expires. Collection tracks are read page by
//! page by following `next` links.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use vibe_core::{CatalogError, CatalogTrack, MusicCatalog};

/// Tokens are refreshed this long before the catalog says they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

const PAGE_SIZE: u32 = 100;

/// Upper bound on pages read for a single collection
const MAX_PAGES: usize = 100;

#[derive(Debug, Clone)]
pub struct CatalogCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TracksPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    id: Option<String>,
    name: String,
    #[serde(default)]
    artists: Vec<ApiArtist>,
    preview_url: Option<String>,
    #[serde(default)]
    external_urls: ExternalUrls,
    album: Option<ApiAlbum>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    #[serde(default)]
    images: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    url: String,
}

impl ApiTrack {
    /// Local files in a playlist carry no catalog id and are skipped
    fn into_catalog_track(self) -> Option<CatalogTrack> {
        let catalog_id = self.id?;
        Some(CatalogTrack {
            title: self.name,
            artist: self
                .artists
                .into_iter()
                .next()
                .map_or_else(|| "Unknown".to_string(), |a| a.name),
            catalog_id,
            preview_url: self.preview_url,
            external_url: self.external_urls.spotify.unwrap_or_default(),
            artwork_url: self
                .album
                .and_then(|album| album.images.into_iter().next())
                .map(|image| image.url),
        })
    }
}

/// Music catalog client for the Spotify Web API
pub struct SpotifyCatalog {
    http: Client,
    credentials: CatalogCredentials,
    api_base_url: String,
    auth_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyCatalog {
    pub fn new(
        credentials: CatalogCredentials,
        api_base_url: &str,
        auth_url: &str,
        timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        let mut builder = Client::builder().user_agent(format!(
            "VibeTuner/{} (Server)",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            credentials,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.to_string(),
            token: Mutex::new(None),
        })
    }

    /// Current access token, fetching a new one when missing or stale
    async fn access_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        if self.credentials.client_id.is_empty() || self.credentials.client_secret.is_empty() {
            return Err(CatalogError::Auth("catalog credentials not configured".to_string()));
        }

        debug!(url = %self.auth_url, "Requesting catalog access token");

        let response = self
            .http
            .post(&self.auth_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Catalog token request rejected");
            return Err(CatalogError::Auth(format!("HTTP {status}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        info!(expires_in = token.expires_in, "Obtained catalog access token");

        Ok(token.access_token)
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }

    async fn check_status(
        &self,
        response: Response,
        collection_id: &str,
    ) -> Result<Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        warn!(status = %status, error = %error_text, collection_id, "Catalog request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                self.forget_token().await;
                CatalogError::Auth(format!("HTTP {status}"))
            }
            StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimited,
            StatusCode::NOT_FOUND => CatalogError::NotFound(collection_id.to_string()),
            _ => CatalogError::Request(format!("HTTP {status}")),
        })
    }
}

#[async_trait]
impl MusicCatalog for SpotifyCatalog {
    async fn collection_tracks(&self, collection_id: &str) -> Result<Vec<CatalogTrack>, CatalogError> {
        let token = self.access_token().await?;

        let mut tracks = Vec::new();
        let mut next = Some(format!(
            "{}/v1/playlists/{}/tracks?offset=0&limit={}",
            self.api_base_url, collection_id, PAGE_SIZE
        ));

        let mut visited = HashSet::new();

        while let Some(url) = next.take() {
            if visited.len() >= MAX_PAGES || !visited.insert(url.clone()) {
                warn!(
                    collection_id,
                    pages = visited.len(),
                    "Collection pagination does not terminate"
                );
                return Err(CatalogError::InvalidResponse(format!(
                    "pagination of {collection_id} does not terminate"
                )));
            }

            debug!(url = %url, "Fetching collection page");

            let response = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .send()
                .await
                .map_err(|e| CatalogError::Request(e.to_string()))?;
            let response = self.check_status(response, collection_id).await?;

            let page: TracksPage = response
                .json()
                .await
                .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

            tracks.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.track)
                    .filter_map(ApiTrack::into_catalog_track),
            );
            next = page.next;
        }

        debug!(collection_id, count = tracks.len(), "Collection tracks loaded");

        Ok(tracks)
    }
}
