//! Request-logging subsystem
//!
//! Every handled API call produces exactly one durable row in SQLite:
//! endpoint, request/response payloads, outcome, and timing. The log is
//! append-only; nothing here updates or deletes rows.
//!
//! ```text
//! handler ──► RequestLogRepository::record ──► RequestLogStore (SQLite, WAL)
//! ```
//!
//! The write is awaited inside the handler, so a successful response
//! implies the row is committed, and a failed write surfaces to the caller.

pub mod repository;
pub mod store;

pub use repository::RequestLogRepository;
pub use store::{LogFilter, NewRequestLog, RequestLogEntry, RequestLogStore};
