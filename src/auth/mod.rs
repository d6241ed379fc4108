//! Authentication module
//!
//! Every request carries the API key as a bearer token. The metadata API
//! additionally accepts a client secret in its own header.

/// Header carrying the optional client secret
pub const CLIENT_SECRET_HEADER: &str = "X-Airtable-Client-Secret";

/// API credentials supplied once at client construction
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    client_secret: Option<String>,
}

impl Credentials {
    /// Bearer-token credentials
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client_secret: None,
        }
    }

    /// Attach the secondary secret used by the metadata API
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.client_secret = (!secret.is_empty()).then_some(secret);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// Authentication headers for one request
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )];
        if let Some(secret) = &self.client_secret {
            headers.push((CLIENT_SECRET_HEADER.to_string(), secret.clone()));
        }
        headers
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("has_client_secret", &self.client_secret.is_some())
            .finish()
    }
}
