//! Input/output helpers.
//!
//! - run configuration JSON (`config`)
//! - pasted multiplier tables (`overrides`)
//! - result exports (CSV/JSON) (`export`)

pub mod config;
pub mod export;
pub mod overrides;

pub use config::*;
pub use export::*;
pub use overrides::*;
