//! SQLite storage for the request log
//!
//! Connection pooling, automatic migrations, and WAL mode so concurrent
//! handlers can append without lost writes.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;

/// One persisted call record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub id: i64,
    pub endpoint: String,
    pub request_data: serde_json::Value,
    pub response_data: serde_json::Value,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status_code: u16,
    pub error_message: Option<String>,
    pub response_time_ms: Option<f64>,
}

/// A call record about to be written
///
/// `success`/`failure` cover the two shapes handlers produce; the
/// remaining fields are filled with the builder methods.
#[derive(Debug, Clone)]
pub struct NewRequestLog {
    pub endpoint: String,
    pub request_data: serde_json::Value,
    pub response_data: serde_json::Value,
    pub model: Option<String>,
    pub status_code: u16,
    pub error_message: Option<String>,
    pub response_time_ms: Option<f64>,
}

impl NewRequestLog {
    pub fn success(
        endpoint: &str,
        request_data: serde_json::Value,
        response_data: serde_json::Value,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            request_data,
            response_data,
            model: None,
            status_code: 200,
            error_message: None,
            response_time_ms: None,
        }
    }

    pub fn failure(
        endpoint: &str,
        request_data: serde_json::Value,
        status_code: u16,
        error_message: &str,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            request_data,
            response_data: serde_json::json!({ "error": error_message }),
            model: None,
            status_code,
            error_message: Some(error_message.to_string()),
            response_time_ms: None,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn with_response_time(mut self, milliseconds: f64) -> Self {
        self.response_time_ms = Some(milliseconds);
        self
    }
}

/// Filter for querying the request log (CLI and tests)
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub status_code: Option<u16>,
    pub errors_only: bool,
    pub limit: Option<usize>,
    /// Oldest first instead of the default newest first
    pub oldest_first: bool,
}

/// Request log database handle
///
/// Manages the SQLite connection pool. All writes go through
/// [`crate::request_log::RequestLogRepository`].
pub struct RequestLogStore {
    pool: SqlitePool,
}

impl RequestLogStore {
    /// Open (creating if missing) the request log database and run
    /// migrations.
    ///
    /// `database_url` is a sqlx SQLite URL, e.g. `sqlite:data/request_logs.db`.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30))
            .pragma("synchronous", "NORMAL");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .context("Failed to connect to request log database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run request log migrations")?;

        tracing::info!("Request log database ready");

        Ok(Self { pool })
    }

    /// Insert one entry and return the persisted row (assigned id and
    /// created_at included). One transaction per call, no batching.
    pub(crate) async fn insert(&self, new: &NewRequestLog) -> Result<RequestLogEntry> {
        let request_json = serde_json::to_string(&new.request_data)
            .context("Failed to serialize request payload")?;
        let response_json = serde_json::to_string(&new.response_data)
            .context("Failed to serialize response payload")?;

        let row = sqlx::query(
            "INSERT INTO request_logs
                 (endpoint, request_data, response_data, model, status_code, error_message, response_time_ms)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING id, endpoint, request_data, response_data, model, created_at, status_code, error_message, response_time_ms",
        )
        .bind(&new.endpoint)
        .bind(&request_json)
        .bind(&response_json)
        .bind(&new.model)
        .bind(new.status_code as i64)
        .bind(&new.error_message)
        .bind(new.response_time_ms)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert request log entry")?;

        entry_from_row(&row)
    }

    /// Query entries, newest first unless the filter says otherwise.
    pub async fn query(&self, filter: &LogFilter) -> Result<Vec<RequestLogEntry>> {
        let mut sql = String::from(
            "SELECT id, endpoint, request_data, response_data, model, created_at, status_code, error_message, response_time_ms
             FROM request_logs",
        );

        let mut clauses: Vec<&str> = Vec::new();
        if filter.endpoint.is_some() {
            clauses.push("endpoint = ?");
        }
        if filter.model.is_some() {
            clauses.push("model = ?");
        }
        if filter.status_code.is_some() {
            clauses.push("status_code = ?");
        }
        if filter.errors_only {
            clauses.push("error_message IS NOT NULL");
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        if filter.oldest_first {
            sql.push_str(" ORDER BY id ASC");
        } else {
            sql.push_str(" ORDER BY id DESC");
        }

        if filter.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query = sqlx::query(&sql);
        if let Some(endpoint) = &filter.endpoint {
            query = query.bind(endpoint);
        }
        if let Some(model) = &filter.model {
            query = query.bind(model);
        }
        if let Some(status_code) = filter.status_code {
            query = query.bind(status_code as i64);
        }
        if let Some(limit) = filter.limit {
            query = query.bind(limit as i64);
        }

        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(entry_from_row).collect()
    }

    /// Total number of entries
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM request_logs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    /// Get the underlying connection pool (for advanced usage)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<RequestLogEntry> {
    let request_data = serde_json::from_str(&row.get::<String, _>("request_data"))
        .context("Corrupt request_data in request log row")?;
    let response_data = serde_json::from_str(&row.get::<String, _>("response_data"))
        .context("Corrupt response_data in request log row")?;

    Ok(RequestLogEntry {
        id: row.get("id"),
        endpoint: row.get("endpoint"),
        request_data,
        response_data,
        model: row.get("model"),
        created_at: row.get("created_at"),
        status_code: row.get::<i64, _>("status_code") as u16,
        error_message: row.get("error_message"),
        response_time_ms: row.get("response_time_ms"),
    })
}
