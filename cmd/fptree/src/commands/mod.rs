//! CLI commands module.

mod compare;
mod index;
mod report;
mod search;
mod util;

pub use compare::CompareCommand;
pub use index::{IndexCommand, RunCommand};
pub use report::ReportCommand;
pub use search::SearchCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
