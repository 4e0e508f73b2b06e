//! Neurostat: Subject Table Analysis Library
//!
//! A library for relating hippocampal volume to cognitive score (MMSE)
//! using pairwise-complete Pearson correlation and complete-case OLS regression.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
