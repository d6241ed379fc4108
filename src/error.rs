//! Error types for the Airtable CDK
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the Airtable CDK
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Validation Errors (raised before any I/O)
    // ============================================================================
    #[error("Invalid request: {message}")]
    Validation { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("Transport failure: {message}")]
    Transport { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error(
        "the API is limited to 5 requests per second per base; gave up after {retries} retries. \
         Wait 30 seconds before subsequent requests will succeed"
    )]
    RateLimitExceeded { retries: u32 },

    #[error("{}: \"{message}\"", .kind.description())]
    Client {
        kind: ClientErrorKind,
        message: String,
    },

    #[error("{}: \"{message}\"", .kind.description())]
    Server {
        kind: ServerErrorKind,
        message: String,
    },

    #[error("Unexpected HTTP {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    // ============================================================================
    // Pagination
    // ============================================================================
    #[error("no more pages in list")]
    EndOfList,

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Build the error for a non-2xx, non-429 status.
    ///
    /// `message` is the diagnostic text extracted from the response body.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if let Some(kind) = ClientErrorKind::from_status(status) {
            return Self::Client { kind, message };
        }
        if let Some(kind) = ServerErrorKind::from_status(status) {
            return Self::Server { kind, message };
        }
        Self::UnexpectedStatus { status, message }
    }

    /// HTTP status that produced this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RateLimitExceeded { .. } => Some(429),
            Error::Client { kind, .. } => Some(kind.status()),
            Error::Server { kind, .. } => Some(kind.status()),
            Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the caller may safely retry the failed request
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Server { kind, .. } => kind.is_retry_safe(),
            _ => false,
        }
    }

    /// Check if this is the pager's end-of-list sentinel
    pub fn is_end_of_list(&self) -> bool {
        matches!(self, Error::EndOfList)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

/// Terminal 4xx outcomes, one per documented status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    BadRequest,
    Unauthorized,
    PaymentRequired,
    Forbidden,
    NotFound,
    PayloadTooLarge,
    InvalidRequest,
}

impl ClientErrorKind {
    /// Map a status code to its client error kind
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::BadRequest),
            401 => Some(Self::Unauthorized),
            402 => Some(Self::PaymentRequired),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            413 => Some(Self::PayloadTooLarge),
            422 => Some(Self::InvalidRequest),
            _ => None,
        }
    }

    pub fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::PaymentRequired => 402,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::PayloadTooLarge => 413,
            Self::InvalidRequest => 422,
        }
    }

    /// Documented meaning of the status
    pub fn description(self) -> &'static str {
        match self {
            Self::BadRequest => {
                "the request encoding is invalid; the request can't be parsed as a valid JSON"
            }
            Self::Unauthorized => {
                "accessing a protected resource without authorization or with invalid credentials"
            }
            Self::PaymentRequired => {
                "the account associated with the API key making requests hits a quota \
                 that can be increased by upgrading the account plan"
            }
            Self::Forbidden => {
                "accessing a protected resource with API credentials that don't have \
                 access to that resource"
            }
            Self::NotFound => {
                "route or resource is not found; the request hit an undefined route, \
                 or the resource doesn't exist (e.g. has been deleted)"
            }
            Self::PayloadTooLarge => "the request exceeded the maximum allowed payload size",
            Self::InvalidRequest => {
                "the request data is invalid; this includes most of the base-specific validations"
            }
        }
    }
}

/// Terminal 5xx outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorKind {
    Internal,
    BadGateway,
    Unavailable,
}

impl ServerErrorKind {
    /// Map a status code to its server error kind
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            500 => Some(Self::Internal),
            502 => Some(Self::BadGateway),
            503 => Some(Self::Unavailable),
            _ => None,
        }
    }

    pub fn status(self) -> u16 {
        match self {
            Self::Internal => 500,
            Self::BadGateway => 502,
            Self::Unavailable => 503,
        }
    }

    /// 502 and 503 are documented as safe to retry
    pub fn is_retry_safe(self) -> bool {
        matches!(self, Self::BadGateway | Self::Unavailable)
    }

    /// Documented meaning of the status
    pub fn description(self) -> &'static str {
        match self {
            Self::Internal => "the server encountered an unexpected condition",
            Self::BadGateway => {
                "the servers are restarting or an unexpected outage is in progress; \
                 requests are safe to retry"
            }
            Self::Unavailable => {
                "the server could not process your request in time; \
                 retry the request with backoff"
            }
        }
    }
}

/// Result type alias for the Airtable CDK
pub type Result<T> = std::result::Result<T, Error>;
