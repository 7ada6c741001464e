use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("Invalid key set URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch key set: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to read key set: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse key set: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplies the issuer's public signing keys
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn key_set(&self) -> Result<JwkSet, KeySetError>;
}

/// Key set loaded once from JSON, never refreshed.
#[derive(Debug, Clone)]
pub struct StaticKeySet {
    keys: JwkSet,
}

impl StaticKeySet {
    pub fn new(keys: JwkSet) -> Self {
        Self { keys }
    }

    pub fn from_json(json: &str) -> Result<Self, KeySetError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KeySetError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[async_trait]
impl KeySource for StaticKeySet {
    async fn key_set(&self) -> Result<JwkSet, KeySetError> {
        Ok(self.keys.clone())
    }
}

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Key set fetched from the issuer's JWKS endpoint on every verification.
#[derive(Debug, Clone)]
pub struct RemoteKeySet {
    url: String,
    client: reqwest::Client,
}

impl RemoteKeySet {
    pub fn new(url: impl Into<String>) -> Result<Self, KeySetError> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// `https://<domain>/.well-known/jwks.json`
    pub fn for_domain(domain: &str) -> Result<Self, KeySetError> {
        let base = url::Url::parse(&format!("https://{}/", domain.trim_end_matches('/')))
            .map_err(|_| KeySetError::InvalidUrl(domain.to_string()))?;
        let url = base
            .join(".well-known/jwks.json")
            .map_err(|_| KeySetError::InvalidUrl(domain.to_string()))?;
        Self::new(url)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySource for RemoteKeySet {
    async fn key_set(&self) -> Result<JwkSet, KeySetError> {
        let keys = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        Ok(keys)
    }
}
