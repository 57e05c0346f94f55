//! Input/output helpers.
//!
//! - CSV ingest + normalization (`ingest`)
//! - table exports (CSV) (`export`)
//! - dashboard snapshot JSON (`snapshot`)

pub mod export;
pub mod ingest;
pub mod snapshot;

pub use export::*;
pub use ingest::{load, parse_date, read_table};
pub use snapshot::*;
