//! Input/output helpers.
//!
//! - CSV ingest + indexing (`ingest`)
//! - daily series export (CSV) (`export`)
//! - dashboard JSON read/write (`snapshot`)

pub mod export;
pub mod ingest;
pub mod snapshot;

pub use export::*;
pub use ingest::*;
pub use snapshot::*;
