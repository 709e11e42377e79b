//! Screen-scoped workflow state and the pure operations on it.

pub mod listing;
pub mod submission;
