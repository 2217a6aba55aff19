//! CLI command handlers for docs-sync.

pub mod classify;
pub mod process;
