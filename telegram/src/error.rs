use thiserror::Error;
pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed bot token")]
    MalformedToken,
    #[error("malformed url")]
    MalformedUrl(#[from] url::ParseError),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("telegram error {}: {}", .0.error_code, .0.description)]
    Telegram(ApiError),
    #[error("unexpected value: {0}")]
    Value(serde_json::Value),
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct ApiError {
    pub error_code: i64,
    pub description: String,
}

impl Error {
    pub fn telegram(value: ApiError) -> Self {
        Self::Telegram(value)
    }

    pub fn value(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}
