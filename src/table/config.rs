//! Configuration for cell tables.

use super::CellTableDefinition;
use crate::error::TableError;
use crate::Result;
use redb::TableDefinition;

/// Configuration for a redb table holding cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellTableConfig {
    /// Name of the redb table.
    pub table_name: String,

    /// Whether inserts replace `LATEST_TIMESTAMP` with the current wall clock
    /// time in milliseconds.
    ///
    /// When disabled, such cells are stored with `LATEST_TIMESTAMP` as is.
    pub resolve_latest_timestamp: bool,
}

impl CellTableConfig {
    /// Creates a validated configuration.
    ///
    /// # Arguments
    /// * `table_name` - Name of the redb table, must not be empty
    /// * `resolve_latest_timestamp` - Whether inserts resolve `LATEST_TIMESTAMP`
    ///
    /// # Returns
    /// Validated configuration or error
    pub fn new(table_name: impl Into<String>, resolve_latest_timestamp: bool) -> Result<Self> {
        let table_name = table_name.into();
        if table_name.is_empty() {
            return Err(TableError::InvalidTableName(table_name).into());
        }

        Ok(Self {
            table_name,
            resolve_latest_timestamp,
        })
    }

    /// The redb definition of the configured table.
    pub fn definition(&self) -> CellTableDefinition<'_> {
        TableDefinition::new(&self.table_name)
    }
}

impl Default for CellTableConfig {
    fn default() -> Self {
        Self {
            table_name: "cells".to_string(),
            resolve_latest_timestamp: true,
        }
    }
}
