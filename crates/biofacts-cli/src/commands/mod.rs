//! Command implementations.

pub mod categories;
pub mod extract;
pub mod report;

pub use self::categories::execute_categories;
pub use self::extract::{execute_extract, run_pipeline};
pub use self::report::execute_report;
