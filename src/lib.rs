//! Versioned key-value cells.
//!
//! A cell is one versioned record of a sparse, column-oriented table: row,
//! column family, qualifier, timestamp, type and value. This crate provides
//! the cell model and the byte-level algorithms that operate on it: field
//! extraction, matching and ordering, common-prefix computation, sentinel
//! keys for range bounds, flat-key serialization and scanning, plus a redb
//! key type that stores cells in cell order.

pub mod cell;
pub mod encoding;
pub mod error;
pub mod scanner;
pub mod sentinel;
pub mod table;
pub mod util;

// Re-export common types for convenience
pub use cell::{BufferedCell, Cell, CellType, KeyValue, LATEST_TIMESTAMP, OLDEST_TIMESTAMP};
pub use encoding::FlatKey;
pub use error::{Error, Result};
pub use scanner::CellScanner;
pub use sentinel::SentinelCell;
pub use table::{CellTable, CellTableConfig, ReadableCellTable};
