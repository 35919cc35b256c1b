//! Configuration module
//!
//! Process configuration is read once from the environment (optionally seeded
//! from a `.env` file) and passed explicitly to the components that need it.

use std::env;
use std::path::PathBuf;

const SERVER_PORT: u16 = 8091;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const MAX_VIDEO_SIZE_MB: usize = 1024;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub database_url: String,
    pub db_max_connections: u32,
    // Local asset storage (thumbnails)
    pub assets_root: PathBuf,
    pub public_base_url: String,
    // Remote object storage (videos)
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    // Ingestion
    pub staging_dir: PathBuf,
    pub ffprobe_path: String,
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_thumbnail_size_mb = env::var("MAX_THUMBNAIL_SIZE_MB")
            .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_THUMBNAIL_SIZE_MB);

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let config = Config {
            server_port,
            environment,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            assets_root: env::var("ASSETS_ROOT")
                .unwrap_or_else(|_| "./assets".to_string())
                .into(),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
            s3_bucket: env::var("S3_BUCKET")
                .map_err(|_| anyhow::anyhow!("S3_BUCKET must be set"))?,
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .map_err(|_| anyhow::anyhow!("S3_REGION or AWS_REGION must be set"))?,
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            max_thumbnail_size_bytes: max_thumbnail_size_mb * 1024 * 1024,
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        if self.s3_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("S3_BUCKET cannot be empty"));
        }
        if !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must start with http:// or https://"
            ));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Base URL local assets are served under, e.g. `http://localhost:8091/assets`.
    pub fn assets_base_url(&self) -> String {
        format!("{}/assets", self.public_base_url.trim_end_matches('/'))
    }
}
