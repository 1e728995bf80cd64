//! The injected data-source seam

use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Identity of an upstream endpoint; one per payload
pub use dora_model::InputName as Endpoint;

/// Anything that can hand back the raw JSON payload of an endpoint
///
/// Implementations do no reshaping: validation and coercion belong to the
/// snapshot builder, so every source is interchangeable in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Fetch one endpoint's payload
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value, SourceError>;

    /// Short human-readable description for logs
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: MetricSource + ?Sized> MetricSource for Arc<T> {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value, SourceError> {
        (**self).fetch(endpoint).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
