//! Data store access
//!
//! CSV-backed platform data and the policy corpus. Read-only: audit results
//! are never written back.

pub mod dataset;
pub mod policy;

pub use dataset::{AuditSubject, Dataset};
pub use policy::load_policies;
