//! Type codes and timestamp constants.
//!
//! Type codes are persisted as a single byte in the flat key. Delete codes
//! occupy one contiguous band so `is_delete` is a single range check.

use std::fmt;

/// Timestamp meaning "latest", resolved to a concrete value before persistence.
pub const LATEST_TIMESTAMP: i64 = i64::MAX;

/// Smallest possible timestamp; sorts after every other version.
pub const OLDEST_TIMESTAMP: i64 = i64::MIN;

/// Classification of a cell as a value write or one of the delete variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellType {
    /// Sentinel only; never persisted.
    Minimum = 0,
    Put = 4,
    Delete = 8,
    DeleteFamilyVersion = 10,
    DeleteColumn = 12,
    DeleteFamily = 14,
    /// Sentinel only; never persisted.
    Maximum = 255,
}

impl CellType {
    /// Lowest code of the delete band.
    pub const LOWEST_DELETE_CODE: u8 = CellType::Delete as u8;

    /// Highest code of the delete band.
    pub const HIGHEST_DELETE_CODE: u8 = CellType::DeleteFamily as u8;

    /// Returns the on-disk code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Resolves a code back to its type, if it is a known one.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellType::Minimum),
            4 => Some(CellType::Put),
            8 => Some(CellType::Delete),
            10 => Some(CellType::DeleteFamilyVersion),
            12 => Some(CellType::DeleteColumn),
            14 => Some(CellType::DeleteFamily),
            255 => Some(CellType::Maximum),
            _ => None,
        }
    }

    /// Whether the code lies in the delete band.
    pub fn is_delete_code(code: u8) -> bool {
        Self::LOWEST_DELETE_CODE <= code && code <= Self::HIGHEST_DELETE_CODE
    }

    pub fn name(self) -> &'static str {
        match self {
            CellType::Minimum => "Minimum",
            CellType::Put => "Put",
            CellType::Delete => "Delete",
            CellType::DeleteFamilyVersion => "DeleteFamilyVersion",
            CellType::DeleteColumn => "DeleteColumn",
            CellType::DeleteFamily => "DeleteFamily",
            CellType::Maximum => "Maximum",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<CellType> for u8 {
    fn from(value: CellType) -> Self {
        value.code()
    }
}

/// Renders a timestamp for diagnostics, naming the two sentinel values.
pub fn human_readable_timestamp(timestamp: i64) -> String {
    match timestamp {
        LATEST_TIMESTAMP => "LATEST_TIMESTAMP".to_string(),
        OLDEST_TIMESTAMP => "OLDEST_TIMESTAMP".to_string(),
        ts => ts.to_string(),
    }
}
