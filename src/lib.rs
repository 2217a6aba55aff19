//! docs-sync library.
//!
//! Detects documentation changes, uploads them for translation and publishes
//! them either as a pull request or as a direct push to the main line.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod git;
pub mod status;
pub mod upload;
pub mod workflow;

pub use error::Error;
