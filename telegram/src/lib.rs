use futures::{future, Future as StdFuture, FutureExt, Stream as StdStream, TryFutureExt};
use reqwest::{Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{pin::Pin, time::Duration};

/// A type alias for `Future` that may return `crate::error::Error`
pub type Future<T> = Pin<Box<dyn StdFuture<Output = Result<T>> + Send>>;

/// A type alias for `Stream` that may result in `crate::error::Error`
pub type Stream<T> = Pin<Box<dyn StdStream<Item = Result<T>> + Send>>;

mod error;

pub mod messages;
pub mod updates;

pub use error::{ApiError, Error, Result};

/// The default timeout for API requests. Long polls borrow the same
/// connection, so this must exceed `updates::LONG_POLL_TIMEOUT`.
pub const DEFAULT_TIMEOUT: u64 = 65;

/// The Bot API endpoint all method urls are derived from
pub const API_ENDPOINT: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct BotAuth {
    endpoint: Url,
}

#[derive(Debug, Clone)]
pub enum AuthMode {
    Bot(BotAuth),
}

impl AuthMode {
    pub fn new_bot_token(token: &str) -> Result<Self> {
        if token.trim().is_empty() || token.contains('/') {
            return Err(Error::MalformedToken);
        }
        let endpoint = Url::parse(&format!("{API_ENDPOINT}/bot{token}/"))?;
        Ok(Self::Bot(BotAuth { endpoint }))
    }

    pub fn to_endpoint_url(&self) -> Url {
        match self {
            Self::Bot(auth) => auth.endpoint.clone(),
        }
    }

    /// Bot API methods are addressed as path segments below the
    /// token-scoped endpoint, e.g. `.../bot<token>/sendMessage`
    pub fn to_request_url(&self, api_method: &str) -> Result<Url> {
        self.to_endpoint_url()
            .join(api_method.trim_start_matches('/'))
            .map_err(Error::from)
    }
}

/// The `{ok, result, ...}` envelope every Bot API response is wrapped in
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

fn decode_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let envelope: ApiResponse<T> = serde_json::from_slice(bytes)?;
    if !envelope.ok {
        return Err(Error::telegram(ApiError {
            error_code: envelope.error_code.unwrap_or_default(),
            description: envelope.description.unwrap_or_default(),
        }));
    }
    envelope
        .result
        .ok_or_else(|| Error::value(serde_json::Value::Null))
}

#[derive(Clone, Debug)]
pub struct Client {
    auth: AuthMode,
    client: reqwest::Client,
}

pub mod client {
    pub fn from_bot_token(token: &str) -> crate::Result<crate::Client> {
        let auth = crate::AuthMode::new_bot_token(token)?;
        Ok(crate::Client::new(auth))
    }
}

impl Client {
    /// Create a new client with the default request timeout
    pub fn new(auth: AuthMode) -> Self {
        Self::new_with_timeout(auth, DEFAULT_TIMEOUT)
    }

    /// Create a new client with the given request timeout value
    pub fn new_with_timeout(auth: AuthMode, timeout: u64) -> Self {
        let client = reqwest::Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(timeout))
            .build()
            .unwrap();
        Self { auth, client }
    }

    fn request(&self, method: Method, api_method: &str) -> Result<RequestBuilder> {
        let url = self.auth.to_request_url(api_method)?;
        Ok(self.client.request(method, url))
    }

    pub fn fetch<T, Q>(&self, api_method: &str, query: &Q) -> Future<T>
    where
        T: 'static + DeserializeOwned + Send,
        Q: Serialize + ?Sized,
    {
        match self.request(Method::GET, api_method) {
            Ok(builder) => builder
                .query(query)
                .send()
                .map_err(Error::from)
                .and_then(|response| response.bytes().map_err(Error::from))
                .and_then(|bytes| async move { decode_slice(&bytes) })
                .boxed(),
            Err(e) => future::err(e).boxed(),
        }
    }

    pub fn post<T, R>(&self, api_method: &str, json: &T) -> Future<R>
    where
        T: Serialize + ?Sized,
        R: 'static + DeserializeOwned + std::marker::Send,
    {
        match self.request(Method::POST, api_method) {
            Ok(builder) => builder
                .json(json)
                .send()
                .map_err(Error::from)
                .and_then(|response| response.bytes().map_err(Error::from))
                .and_then(|bytes| async move { decode_slice(&bytes) })
                .boxed(),
            Err(e) => future::err(e).boxed(),
        }
    }
}
