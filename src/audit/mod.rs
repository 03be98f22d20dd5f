//! Audit trail for Libris
//!
//! Records every successful mutation (catalog and membership changes, loans,
//! returns and password changes) in an append-only, line-delimited JSON log
//! next to the settings file.
//!
//! Auditing is best-effort: a failed audit write is reported through
//! `tracing` and never fails the operation that produced it.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
