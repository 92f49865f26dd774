//! Configuration module
//!
//! Settings are read from the environment (with `.env` support via `dotenvy`) into
//! [`AppConfig`]. Every value has a default except the database URL; provider keys are
//! optional so the server can start without them and report the missing key per request.

use std::env;
use std::time::Duration;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_BODY_MB: usize = 25;
const HTTP_CONCURRENCY_LIMIT: usize = 1_000;
const PROVIDER_TIMEOUT_SECS: u64 = 120;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const GEMINI_IMAGE_MODEL: &str = "gemini-2.0-flash-exp";
const GEMINI_IMAGE_MODEL_ULTRA: &str = "gemini-2.5-flash-image-preview";
const GEMINI_TEXT_MODEL: &str = "gemini-2.0-flash-exp";
const UPLOAD_POST_ENDPOINT: &str = "https://app.upload-post.com/api/upload";
const PAYMENT_API_BASE: &str = "https://api.test.bictorys.com";
const OPENAI_API_BASE: &str = "https://api.openai.com";
const OPENAI_TTS_MODEL: &str = "tts-1";
const BLOB_API_BASE: &str = "https://blob.vercel-storage.com";

const REDESIGN_MAX_RETRIES: u32 = 1;
const ENHANCE_MAX_ATTEMPTS: u32 = 3;
const RETRY_DEFAULT_DELAY_SECS: u64 = 30;
const RETRY_MAX_DELAY_SECS: u64 = 120;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub max_request_body_bytes: usize,
    pub http_concurrency_limit: usize,
    /// `json` switches the log formatter to structured JSON lines
    pub log_format: String,
}

/// Outbound provider credentials and endpoints
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_image_model: String,
    pub gemini_image_model_ultra: String,
    pub gemini_text_model: String,
    pub upload_post_api_key: Option<String>,
    pub upload_post_endpoint: String,
    pub payment_secret_key: Option<String>,
    pub payment_api_base: String,
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub openai_tts_model: String,
    pub timeout_seconds: u64,
}

/// Retry and backoff policy for AI generation
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Retries per theme inside a redesign batch
    pub redesign_max_retries: u32,
    /// Total attempts for a single-image enhancement
    pub enhance_max_attempts: u32,
    pub default_delay_secs: u64,
    pub max_delay_secs: u64,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub blob_token: Option<String>,
    pub blob_api_base: String,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub providers: ProviderConfig,
    pub retry: RetryConfig,
    pub storage: StorageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                db_max_connections: MAX_CONNECTIONS,
                db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
                environment: "development".to_string(),
                max_request_body_bytes: MAX_REQUEST_BODY_MB * 1024 * 1024,
                http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
                log_format: "compact".to_string(),
            },
            database_url: "postgresql://localhost:5432/hestia".to_string(),
            providers: ProviderConfig {
                gemini_api_key: None,
                gemini_api_base: GEMINI_API_BASE.to_string(),
                gemini_image_model: GEMINI_IMAGE_MODEL.to_string(),
                gemini_image_model_ultra: GEMINI_IMAGE_MODEL_ULTRA.to_string(),
                gemini_text_model: GEMINI_TEXT_MODEL.to_string(),
                upload_post_api_key: None,
                upload_post_endpoint: UPLOAD_POST_ENDPOINT.to_string(),
                payment_secret_key: None,
                payment_api_base: PAYMENT_API_BASE.to_string(),
                openai_api_key: None,
                openai_api_base: OPENAI_API_BASE.to_string(),
                openai_tts_model: OPENAI_TTS_MODEL.to_string(),
                timeout_seconds: PROVIDER_TIMEOUT_SECS,
            },
            retry: RetryConfig {
                redesign_max_retries: REDESIGN_MAX_RETRIES,
                enhance_max_attempts: ENHANCE_MAX_ATTEMPTS,
                default_delay_secs: RETRY_DEFAULT_DELAY_SECS,
                max_delay_secs: RETRY_MAX_DELAY_SECS,
            },
            storage: StorageConfig {
                backend: StorageBackend::Blob,
                blob_token: None,
                blob_api_base: BLOB_API_BASE.to_string(),
                local_storage_path: None,
                local_storage_base_url: None,
            },
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn var_or(name: &str, default: &str) -> String {
    optional_var(name).unwrap_or_else(|| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    optional_var(name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = AppConfig::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = var_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("POSTGRES_URL"))
            .map_err(|_| anyhow::anyhow!("DATABASE_URL (or POSTGRES_URL) must be set"))?;

        let storage_backend = match optional_var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::default(),
        };

        let base = BaseConfig {
            server_port: var_or("PORT", &SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: parsed_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            environment,
            max_request_body_bytes: parsed_or("MAX_REQUEST_BODY_MB", MAX_REQUEST_BODY_MB)
                * 1024
                * 1024,
            http_concurrency_limit: parsed_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format: var_or("LOG_FORMAT", &defaults.base.log_format).to_lowercase(),
        };

        let providers = ProviderConfig {
            gemini_api_key: optional_var("GEMINI_API_KEY"),
            gemini_api_base: var_or("GEMINI_API_BASE", GEMINI_API_BASE),
            gemini_image_model: var_or("GEMINI_IMAGE_MODEL", GEMINI_IMAGE_MODEL),
            gemini_image_model_ultra: var_or("GEMINI_IMAGE_MODEL_ULTRA", GEMINI_IMAGE_MODEL_ULTRA),
            gemini_text_model: var_or("GEMINI_TEXT_MODEL", GEMINI_TEXT_MODEL),
            upload_post_api_key: optional_var("UPLOAD_POST_API_KEY"),
            upload_post_endpoint: var_or("UPLOAD_POST_ENDPOINT", UPLOAD_POST_ENDPOINT),
            payment_secret_key: optional_var("BICTORYS_SECRET_KEY"),
            payment_api_base: var_or("BICTORYS_API_BASE", PAYMENT_API_BASE),
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openai_api_base: var_or("OPENAI_API_BASE", OPENAI_API_BASE),
            openai_tts_model: var_or("OPENAI_TTS_MODEL", OPENAI_TTS_MODEL),
            timeout_seconds: parsed_or("PROVIDER_TIMEOUT_SECS", PROVIDER_TIMEOUT_SECS),
        };

        let retry = RetryConfig {
            redesign_max_retries: parsed_or("REDESIGN_MAX_RETRIES", REDESIGN_MAX_RETRIES),
            enhance_max_attempts: parsed_or("ENHANCE_MAX_ATTEMPTS", ENHANCE_MAX_ATTEMPTS),
            default_delay_secs: parsed_or("RETRY_DEFAULT_DELAY_SECS", RETRY_DEFAULT_DELAY_SECS),
            max_delay_secs: parsed_or("RETRY_MAX_DELAY_SECS", RETRY_MAX_DELAY_SECS),
        };

        let storage = StorageConfig {
            backend: storage_backend,
            blob_token: optional_var("BLOB_READ_WRITE_TOKEN"),
            blob_api_base: var_or("BLOB_API_BASE", BLOB_API_BASE),
            local_storage_path: optional_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: optional_var("LOCAL_STORAGE_BASE_URL"),
        };

        Ok(AppConfig {
            base,
            database_url,
            providers,
            retry,
            storage,
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.storage.backend {
            StorageBackend::Blob if self.storage.blob_token.is_none() => {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=blob requires BLOB_READ_WRITE_TOKEN to be set"
                ));
            }
            StorageBackend::Local
                if self.storage.local_storage_path.is_none()
                    || self.storage.local_storage_base_url.is_none() =>
            {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL"
                ));
            }
            _ => {}
        }

        if self.retry.enhance_max_attempts == 0 {
            return Err(anyhow::anyhow!("ENHANCE_MAX_ATTEMPTS must be at least 1"));
        }

        if self.retry.max_delay_secs < self.retry.default_delay_secs {
            return Err(anyhow::anyhow!(
                "RETRY_MAX_DELAY_SECS must not be lower than RETRY_DEFAULT_DELAY_SECS"
            ));
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<AppConfig>);

impl Config {
    fn inner(&self) -> &AppConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = AppConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn from_app_config(config: AppConfig) -> Self {
        Config(Box::new(config))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn is_production(&self) -> bool {
        self.inner().is_production()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.inner().base.max_request_body_bytes
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn providers(&self) -> &ProviderConfig {
        &self.inner().providers
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().providers.timeout_seconds)
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.inner().retry
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.inner().storage
    }
}
