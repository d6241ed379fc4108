//! HTTP module
//!
//! Turns `RequestSpec`s into HTTP round-trips and HTTP responses into typed
//! outcomes.
//!
//! # Features
//!
//! - **Injectable Transport**: `Transport` trait with a reqwest implementation
//! - **Rate-Limit Recovery**: fixed-delay, bounded retry on 429
//! - **Status Classification**: one error kind per documented status
//! - **Error Bodies**: best-effort decoding of the API's error envelopes
//! - **Throttle**: optional token bucket using governor

mod error_body;
mod executor;
mod rate_limit;
mod request;
mod transport;

pub use error_body::decode_error_body;
pub use executor::{Executor, RetryPolicy, DEFAULT_API_URL};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::RequestSpec;
pub use transport::{
    HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportConfig,
};

#[cfg(test)]
pub(crate) mod testing;
