//! Terminal output for every subcommand.
//!
//! Formatting lives here so the scoring code stays free of presentation and
//! output changes stay localized.

pub mod format;

pub use format::*;
