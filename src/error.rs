use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API returned status {status} for {endpoint}")]
    ApiStatus { status: u16, endpoint: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("CSV error: {0}")]
    CsvError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::CsvError(err.to_string())
    }
}
