//! Write path for the request log
//!
//! The repository is the only writer to the store: one durable insert per
//! handled call, awaited by the handler, no retries. A successful return
//! means the entry is committed and visible to subsequent reads.

use crate::request_log::store::{NewRequestLog, RequestLogEntry, RequestLogStore};
use anyhow::{bail, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct RequestLogRepository {
    store: Arc<RequestLogStore>,
}

impl RequestLogRepository {
    pub fn new(store: Arc<RequestLogStore>) -> Self {
        Self { store }
    }

    /// Persist one call record and return it with its assigned id.
    ///
    /// Rejects inconsistent entries: an error message requires an error
    /// status code. Persistence failures propagate to the caller, which
    /// decides how to surface them.
    pub async fn record(&self, entry: NewRequestLog) -> Result<RequestLogEntry> {
        if entry.endpoint.is_empty() {
            bail!("request log endpoint must not be empty");
        }
        if entry.error_message.is_some() && entry.status_code < 400 {
            bail!(
                "inconsistent request log entry: error_message set with status_code {}",
                entry.status_code
            );
        }

        let persisted = self.store.insert(&entry).await?;

        tracing::debug!(
            id = persisted.id,
            endpoint = %persisted.endpoint,
            status_code = persisted.status_code,
            "Recorded request log entry"
        );

        Ok(persisted)
    }
}
