//! Remote data sources.
//!
//! - epoch gauge snapshot (`lynex`)
//! - gauge bribe totals (`bribes`)
//! - per-protocol epoch fees/bribes (`metrics`)
//! - token holder balances from transfer logs (`holders`)

pub mod bribes;
pub mod holders;
pub mod lynex;
pub mod metrics;

pub use bribes::{BribeClient, sum_bribes};
pub use holders::{
    Holder, HolderClient, TransferEvent, decode_transfer, display_address, display_units, parse_token,
    reconstruct_balances,
};
pub use lynex::{RawGauge, SnapshotClient, read_snapshot_file, snapshot_to_pools};
pub use metrics::{EpochMetrics, MetricsClient, MetricsTable, Protocol, ProtocolMetrics};
