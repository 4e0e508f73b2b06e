//! Pipeline module - load, clean and analyze the subject table

pub mod cleaner;
pub mod correlation;
pub mod error;
pub mod loader;
pub mod missing;
pub mod regression;

pub use cleaner::*;
pub use correlation::*;
pub use error::AnalysisError;
pub use loader::*;
pub use missing::*;
pub use regression::*;
