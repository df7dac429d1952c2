//! Hall pass domain logic.
//!
//! Pure types and transition functions with no I/O. The storage layer
//! (`hallpass-db`) persists what these functions compute, and the API crate
//! serializes access per resource name.

pub mod audit_log;
pub mod error;
pub mod lock;
pub mod outcome;
pub mod request;
pub mod student_id;
pub mod summary;
pub mod types;
