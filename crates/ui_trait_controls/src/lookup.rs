//! External data lookups for `data` traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Failure of a single lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Lookup request failed: {0}")]
    Transport(String),

    #[error("Lookup service answered with status {0}")]
    Status(u16),

    #[error("Lookup response is not valid JSON: {0}")]
    Decode(String),

    #[error("Lookup response has no field '{0}'")]
    MissingField(String),

    #[error("Lookup field '{0}' is not a scalar value")]
    NotScalar(String),

    #[error("Invalid lookup endpoint '{0}'")]
    InvalidEndpoint(String),
}

/// Source of externally resolved trait values.
///
/// One call fetches one record and returns exactly one scalar field of it as
/// text. Implementations must not panic on service failures.
#[async_trait]
pub trait DataLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<String, LookupError>;
}

fn default_endpoint() -> String {
    "https://swapi.dev/api/people/{query}/".to_string()
}

fn default_field() -> String {
    "/name".to_string()
}

fn default_fallback_query() -> String {
    "1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Where and what to fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpLookupConfig {
    /// URL template; `{query}` is replaced with the url-encoded field text
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// JSON pointer (`/name`) or top-level key of the extracted field
    #[serde(default = "default_field")]
    pub field: String,
    /// Query used when the field is empty
    #[serde(default = "default_fallback_query")]
    pub fallback_query: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpLookupConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            field: default_field(),
            fallback_query: default_fallback_query(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `GET` lookup against a JSON web service
pub struct HttpLookup {
    client: reqwest::Client,
    config: HttpLookupConfig,
}

impl HttpLookup {
    pub fn new(config: HttpLookupConfig) -> Result<Self, LookupError> {
        if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
            return Err(LookupError::InvalidEndpoint(config.endpoint));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpLookupConfig {
        &self.config
    }

    /// URL fetched for a given field text
    pub fn request_url(&self, query: &str) -> String {
        let query = match query.trim() {
            "" => self.config.fallback_query.trim(),
            trimmed => trimmed,
        };
        self.config
            .endpoint
            .replace("{query}", &urlencoding::encode(query))
    }
}

#[async_trait]
impl DataLookup for HttpLookup {
    async fn lookup(&self, query: &str) -> Result<String, LookupError> {
        let url = self.request_url(query);
        tracing::debug!("Looking up {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let record: Value = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;

        extract_field(&record, &self.config.field)
    }
}

/// Pull one scalar out of a record as text.
pub fn extract_field(record: &Value, field: &str) -> Result<String, LookupError> {
    let value = if field.starts_with('/') {
        record.pointer(field)
    } else {
        record.get(field)
    };

    match value {
        None | Some(Value::Null) => Err(LookupError::MissingField(field.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(LookupError::NotScalar(field.to_string())),
    }
}
