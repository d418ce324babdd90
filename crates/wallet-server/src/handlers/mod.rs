//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod budget;
pub mod categories;
pub mod dashboard;
pub mod reports;
pub mod transactions;

// Re-export all handlers for use in router
pub use budget::*;
pub use categories::*;
pub use dashboard::*;
pub use reports::*;
pub use transactions::*;
