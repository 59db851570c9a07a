//! Environment-driven configuration.
//!
//! Everything is read once at startup. A `.env` file is honored during
//! development (loaded in `main` before this runs).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const PROMPT: &str = "Describe this image and suggest a workout plan.";

/// Uploads larger than this are rejected with 413.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Cap on concurrent outbound provider calls.
pub const MAX_IN_FLIGHT: usize = 8;

pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_key: String,
    /// Provider API root, e.g. `https://api.openai.com/v1`. Overridable so
    /// tests can point at a local stub.
    pub base_url: String,
    pub model: String,
    pub public_dir: PathBuf,
    /// Where uploads are spooled while a request is in flight.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub max_in_flight: usize,
    pub provider_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a port number")?,
            Err(_) => DEFAULT_PORT,
        };

        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let public_dir = std::env::var_os("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public"));
        let upload_dir = std::env::var_os("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            port,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            public_dir,
            upload_dir,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            max_in_flight: MAX_IN_FLIGHT,
            provider_timeout: PROVIDER_TIMEOUT,
        })
    }
}
