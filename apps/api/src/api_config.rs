use std::env;
use std::time::Duration;

use rally_core::AppError;
use url::Url;

/// Runtime configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout: Duration,
    pub auth_introspect_url: String,
    pub image_store_upload_url: String,
    pub image_store_api_key: Option<String>,
}

impl ApiConfig {
    /// Reads and validates the configuration from environment variables.
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let geocoder_base_url = env::var("GEOCODER_BASE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_owned());
        let geocoder_user_agent =
            env::var("GEOCODER_USER_AGENT").unwrap_or_else(|_| "rally-api".to_owned());
        let geocoder_timeout_secs = env::var("GEOCODER_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(5);

        let auth_introspect_url = required_env("AUTH_INTROSPECT_URL")?;
        let image_store_upload_url = required_env("IMAGE_STORE_UPLOAD_URL")?;
        let image_store_api_key = env::var("IMAGE_STORE_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty());

        for (name, value) in [
            ("FRONTEND_URL", frontend_url.as_str()),
            ("GEOCODER_BASE_URL", geocoder_base_url.as_str()),
            ("AUTH_INTROSPECT_URL", auth_introspect_url.as_str()),
            ("IMAGE_STORE_UPLOAD_URL", image_store_upload_url.as_str()),
        ] {
            Url::parse(value)
                .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))?;
        }

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            api_host,
            api_port,
            geocoder_base_url,
            geocoder_user_agent,
            geocoder_timeout: Duration::from_secs(geocoder_timeout_secs.max(1)),
            auth_introspect_url,
            image_store_upload_url,
            image_store_api_key,
        })
    }
}

fn required_env(name: &str) -> Result<String, AppError> {
    let value =
        env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
