//! Audit logging system for NodeBudget
//!
//! Records store mutations (budget creation, node set replacement, expense
//! create/delete) with before/after values in an append-only JSONL log.
//!
//! # Example
//!
//! ```rust,ignore
//! use nodebudget::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::node_set_replaced(budget.id, &removed, &inserted))?;
//!
//! for entry in logger.read_recent(10)? {
//!     println!("{}", entry.format_human_readable());
//! }
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, NodeCount, Operation};
pub use logger::AuditLogger;
