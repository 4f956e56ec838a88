//! Caller-level deadline for external calls
//!
//! Every vector search, completion and translation goes through
//! [`with_deadline`] so that a slow collaborator surfaces as an ordinary
//! [`Error::Timeout`] which the calling tier can swallow.

use std::future::Future;
use std::time::Duration;

use crate::{Error, Result};

/// Run `fut`, failing with [`Error::Timeout`] once `limit` elapses.
pub async fn with_deadline<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(limit.as_millis() as u64)),
    }
}
