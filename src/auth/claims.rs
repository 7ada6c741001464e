use serde::{Deserialize, Serialize};

/// `aud` may be a single string or a list (Auth0 adds its userinfo audience).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

/// Decoded bearer token payload handed to handlers after the guard passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub aud: Option<Audience>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
    /// Granted capability strings such as `post:drinks`
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}
