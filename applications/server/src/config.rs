/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_classifier")]
    pub classifier: ClassifierSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body (image uploads)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_token_expiration_days")]
    pub token_expiration_days: u64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierSettings {
    /// Base URL of the face/emotion inference service
    #[serde(default = "default_classifier_url")]
    pub base_url: String,

    /// Per-request timeout; unbounded when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_catalog_api_url")]
    pub api_base_url: String,

    #[serde(default = "default_catalog_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_tracks_per_recommendation")]
    pub tracks_per_recommendation: usize,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` falls back to `./config.toml` when absent. Environment
    /// variables use the `VIBE_` prefix and `__` between section and key,
    /// e.g. `VIBE_AUTH__JWT_SECRET`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("VIBE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set VIBE_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }

        if self.catalog.client_id.is_empty() || self.catalog.client_secret.is_empty() {
            tracing::warn!("Catalog credentials not set; recommendations will be empty");
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        max_upload_bytes: default_max_upload_bytes(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/vibe_tuner.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        token_expiration_days: default_token_expiration_days(),
        bcrypt_cost: default_bcrypt_cost(),
    }
}

fn default_token_expiration_days() -> u64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_classifier() -> ClassifierSettings {
    ClassifierSettings {
        base_url: default_classifier_url(),
        timeout_secs: None,
    }
}

fn default_classifier_url() -> String {
    "http://127.0.0.1:8501".to_string()
}

fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        client_id: String::new(),
        client_secret: String::new(),
        api_base_url: default_catalog_api_url(),
        auth_url: default_catalog_auth_url(),
        tracks_per_recommendation: default_tracks_per_recommendation(),
        timeout_secs: None,
    }
}

fn default_catalog_api_url() -> String {
    "https://api.spotify.com".to_string()
}

fn default_catalog_auth_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_tracks_per_recommendation() -> usize {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            classifier: default_classifier(),
            catalog: default_catalog(),
        }
    }
}
