//! Typed table operations
//!
//! `Airtable` binds a base to an `Executor` and exposes list / get / create /
//! update / replace / delete plus the two metadata calls. Every table
//! operation validates its parameters before any request is built.

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{
    Executor, RateLimiter, ReqwestTransport, RequestSpec, Transport, TransportConfig,
};
use crate::pagination::{ListPager, ListSource};
use crate::params::Parameters;
use crate::types::{Bases, Method, Record, RecordList, Tables};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Client for one base
#[derive(Debug, Clone)]
pub struct Airtable {
    base: String,
    executor: Executor,
}

impl Airtable {
    /// Client over the default reqwest transport
    pub fn new(credentials: Credentials, base: impl Into<String>) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self::with_transport(transport, credentials, base))
    }

    /// Client over a caller-supplied transport
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        credentials: Credentials,
        base: impl Into<String>,
    ) -> Self {
        Self::with_executor(Executor::new(transport, credentials), base)
    }

    pub fn with_executor(executor: Executor, base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            executor,
        }
    }

    /// Build a client from validated configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::with_config(&TransportConfig {
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config.user_agent.clone(),
        })?;
        Ok(Self::from_config_with_transport(config, Arc::new(transport)))
    }

    /// Build a client from configuration over a caller-supplied transport
    pub fn from_config_with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let mut credentials = Credentials::new(&config.api_key);
        if let Some(secret) = &config.client_secret {
            credentials = credentials.with_client_secret(secret);
        }

        let mut executor = Executor::new(transport, credentials)
            .with_api_url(&config.api_url)
            .with_retry(config.retry)
            .with_debug(config.debug);
        if let Some(throttle) = &config.throttle {
            executor = executor.with_throttle(RateLimiter::new(throttle));
        }

        Self::with_executor(executor, &config.base)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// List one page of records
    pub async fn list(&self, params: &Parameters) -> Result<RecordList> {
        self.list_as(params).await
    }

    /// List one page into a caller-defined envelope
    pub async fn list_as<T: DeserializeOwned>(&self, params: &Parameters) -> Result<T> {
        let spec = RequestSpec::table(Method::GET, &self.base, params, None)?;
        self.executor.execute_json(&spec).await
    }

    /// Fetch one record
    pub async fn get(&self, params: &Parameters, id: &str) -> Result<Record> {
        self.get_as(params, id).await
    }

    pub async fn get_as<T: DeserializeOwned>(&self, params: &Parameters, id: &str) -> Result<T> {
        let spec = RequestSpec::table(Method::GET, &self.base, params, Some(id))?;
        self.executor.execute_json(&spec).await
    }

    /// Create one or more records (POST)
    pub async fn create<B, T>(&self, params: &Parameters, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let spec = RequestSpec::table(Method::POST, &self.base, params, None)?.with_json(body)?;
        self.executor.execute_json(&spec).await
    }

    /// Update the given fields of a record (PATCH)
    pub async fn update<B, T>(&self, params: &Parameters, id: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let spec =
            RequestSpec::table(Method::PATCH, &self.base, params, Some(id))?.with_json(body)?;
        self.executor.execute_json(&spec).await
    }

    /// Replace a record, clearing every field not in `body` (PUT)
    pub async fn replace<B, T>(&self, params: &Parameters, id: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let spec = RequestSpec::table(Method::PUT, &self.base, params, Some(id))?.with_json(body)?;
        self.executor.execute_json(&spec).await
    }

    /// Delete a record
    pub async fn delete(&self, params: &Parameters, id: &str) -> Result<()> {
        let spec = RequestSpec::table(Method::DELETE, &self.base, params, Some(id))?;
        self.executor.execute_discard(&spec).await
    }

    /// Bases visible to the credentials
    pub async fn list_bases(&self) -> Result<Bases> {
        let spec = RequestSpec::new(Method::GET, ["meta", "bases"]);
        self.executor.execute_json(&spec).await
    }

    /// Table schema of a base
    pub async fn base_schema(&self, base_id: &str) -> Result<Tables> {
        if base_id.trim().is_empty() {
            return Err(Error::validation("base id is required"));
        }
        let spec = RequestSpec::new(Method::GET, ["meta", "bases", base_id, "tables"]);
        self.executor.execute_json(&spec).await
    }

    /// Page through a list, starting from the first page
    pub fn pager(&self, params: Parameters) -> ListPager<'_, Self> {
        ListPager::new(self, params)
    }
}

#[async_trait]
impl ListSource for Airtable {
    async fn list(&self, params: &Parameters) -> Result<RecordList> {
        debug!(table = %params.name, offset = %params.offset, "listing page");
        self.list_as(params).await
    }
}
