//! Audit logging system for APU-CLI
//!
//! Every create, update and delete of catalog items, clients, projects,
//! analyses and budgets is appended to a line-delimited JSON log with
//! before/after snapshots. Entries for analyses and budgets also carry the
//! grand total on both sides, so re-pricing shows up as a money movement.
//!
//! - `Audited`: how a record names itself in the log
//! - `AuditEntry`: one logged operation
//! - `AuditLogger`: appends entries and reads a filtered tail back
//! - `generate_diff`: a one-line summary of the fields that changed

mod diff;
mod entry;
mod logger;
mod subjects;

pub use diff::generate_diff;
pub use entry::{AuditEntry, Audited, EntityType, Operation, TotalChange};
pub use logger::{AuditFilter, AuditLogger};
