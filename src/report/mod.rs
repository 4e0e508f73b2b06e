//! Report module - summary text, scatter plot and exports

pub mod json_export;
pub mod scatter;
pub mod stats_summary;
pub mod summary;

pub use json_export::*;
pub use scatter::*;
pub use stats_summary::*;
pub use summary::*;
