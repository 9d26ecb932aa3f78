//! # Domain Layer
//!
//! Configuration, the managed-root predicate, reports and error types.

pub mod errors;
pub mod layout;
pub mod paths;
pub mod report;
