//! `gauge-votes` library crate.
//!
//! The binary (`gv`) is a thin wrapper around this library so that:
//!
//! - the scoring pipeline is testable without spawning processes or touching the network
//! - callers can embed the pipeline with their own configuration and snapshot source

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod scoring;
