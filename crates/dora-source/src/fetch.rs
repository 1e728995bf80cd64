//! All-or-nothing fan-out fetch
//!
//! The assignments request and the four series requests are issued together.
//! The first failure aborts the whole fetch, and the join as a whole is
//! bounded by a client-side timeout.

use crate::error::SourceError;
use crate::source::{Endpoint, MetricSource};
use dora_model::{MetricKey, RawPayloads};
use futures::future::{try_join, try_join_all};
use std::time::{Duration, Instant};

/// Fetch all five payloads concurrently
///
/// # Errors
/// - the first `FetchFailure` reported by any request
/// - `FetchTimeout` if the join does not complete within `timeout`
pub async fn fetch_all<S>(source: &S, timeout: Duration) -> Result<RawPayloads, SourceError>
where
    S: MetricSource + ?Sized,
{
    let started = Instant::now();
    let series = try_join_all(MetricKey::ALL.map(|key| async move {
        let payload = source.fetch(Endpoint::Series(key)).await?;
        Ok::<_, SourceError>((key, payload))
    }));
    let join = try_join(source.fetch(Endpoint::Assignments), series);

    let result = match tokio::time::timeout(timeout, join).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::FetchTimeout { after: timeout }),
    };

    match result {
        Ok((assignments, series)) => {
            tracing::info!(
                source = %source.describe(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "fetched all payloads"
            );
            Ok(RawPayloads {
                assignments,
                series: series.into_iter().collect(),
            })
        }
        Err(e) => {
            tracing::warn!(source = %source.describe(), error = %e, "fetch aborted");
            Err(e)
        }
    }
}
