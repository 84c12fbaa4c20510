//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - per-epoch pool records (`PoolRecord`) and the scored metrics (`Metric`)
//! - caller-supplied configuration (`WeightConfig`, `SafetyThresholds`, `RunConfig`, ...)
//! - pipeline outputs (`ScoredPool`)

pub mod types;

pub use types::*;
