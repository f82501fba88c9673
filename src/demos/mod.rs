//! Sample documents rendered by the `main` demo binary.

pub mod report;
pub mod run_all;
pub mod shared;
pub mod table;

pub use report::run as run_report;
pub use run_all::run as run_all_demos;
pub use table::run as run_table;
