use crate::error::AppError;
use std::env;

const DEFAULT_REGION: &str = "na1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub region: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("RIOT_API_KEY").map_err(|_| {
            AppError::ConfigError(
                "RIOT_API_KEY not found in environment or .env file".to_string(),
            )
        })?;

        let region = env::var("RIOT_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());

        let timeout_secs = match env::var("RIOT_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                AppError::ConfigError(format!("RIOT_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_key,
            region,
            timeout_secs,
        })
    }
}
