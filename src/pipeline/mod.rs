//! The estimation pipeline: per-segment modeling fan-out, system totals,
//! current derivation and duty-cycle binning.
//!
//! Everything here is synchronous, pure computation over in-memory series;
//! each run owns its inputs and outputs.

pub mod aggregator;
pub mod current;
pub mod histogram;

pub use aggregator::aggregate;
pub use current::to_current;
pub use histogram::{bin, Bin};
