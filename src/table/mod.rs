//! Cell storage on redb.
//!
//! Cells are stored with their flat key as the redb key and their value as
//! the redb value. The key type orders entries by the cell comparator, so
//! row and column scans are plain range scans bounded by sentinel keys.
//!
//! Sequence ids and tags are not persisted: two cells with equal keys
//! occupy the same entry.

pub mod config;
pub mod key;

pub use config::CellTableConfig;

use crate::cell::key_value::check_width;
use crate::cell::{Cell, KeyValue, MAX_FAMILY_LENGTH, MAX_ROW_LENGTH};
use crate::encoding::{encode_flat_key, FlatKey};
use crate::error::TableError;
use crate::scanner::CellScanner;
use crate::sentinel::{
    first_on_next_row, first_on_row_col_key, first_on_row_key, last_on_row_col_key,
    last_on_row_key,
};
use crate::util::field::{update_latest_stamp, value_bytes};
use crate::util::text::to_string_binary;
use crate::Result;
use redb::{ReadableTable, TableDefinition};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Definition of a redb table holding cells.
pub type CellTableDefinition<'a> = TableDefinition<'a, FlatKey<'static>, &'static [u8]>;

/// Read operations on any readable cell table.
pub trait ReadableCellTable {
    /// Looks up the cell stored under exactly the key of `key`.
    fn get_cell<C: Cell + ?Sized>(&self, key: &C) -> Result<Option<KeyValue>>;

    /// Scans every cell of `row`, in cell order.
    fn scan_row(&self, row: &[u8]) -> Result<TableCellScanner<'_>>;

    /// Scans every version of `row/family:qualifier`, newest first.
    fn scan_column(&self, row: &[u8], family: &[u8], qualifier: &[u8])
        -> Result<TableCellScanner<'_>>;
}

/// Write operations on a cell table.
pub trait CellTable {
    /// Stores a cell, resolving `LATEST_TIMESTAMP` to the wall clock when the
    /// configuration asks for it.
    ///
    /// # Returns
    /// The timestamp the cell was stored with
    fn insert_cell<C: Cell + ?Sized>(&mut self, cell: &C, config: &CellTableConfig) -> Result<i64> {
        self.insert_cell_at(cell, config, current_time_millis())
    }

    /// Stores a cell, resolving `LATEST_TIMESTAMP` to `now` when the
    /// configuration asks for it.
    fn insert_cell_at<C: Cell + ?Sized>(
        &mut self,
        cell: &C,
        config: &CellTableConfig,
        now: i64,
    ) -> Result<i64>;

    /// Removes the entry stored under the key of `cell`.
    ///
    /// # Returns
    /// Whether an entry was removed
    fn delete_cell<C: Cell + ?Sized>(&mut self, cell: &C) -> Result<bool>;
}

fn current_time_millis() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        Err(err) => {
            warn!(
                behind_ms = err.duration().as_millis() as u64,
                "system clock is before the epoch, using 0"
            );
            0
        }
    }
}

fn range_error(err: redb::StorageError) -> crate::Error {
    TableError::ScanFailed(format!("Failed to create range iterator: {}", err)).into()
}

impl<T> ReadableCellTable for T
where
    T: ReadableTable<FlatKey<'static>, &'static [u8]>,
{
    fn get_cell<C: Cell + ?Sized>(&self, key: &C) -> Result<Option<KeyValue>> {
        let key = FlatKey::from_cell(key);
        match self.get(&key)? {
            Some(guard) => Ok(Some(KeyValue::from_flat_key(key.as_bytes(), guard.value())?)),
            None => Ok(None),
        }
    }

    fn scan_row(&self, row: &[u8]) -> Result<TableCellScanner<'_>> {
        check_width("row", row.len(), MAX_ROW_LENGTH)?;

        let first = first_on_row_key(row);
        let start = FlatKey::from_cell(&first);
        debug!(row = %to_string_binary(row), "scanning row");

        // A row at full width has no next row to bound it.
        let range = if row.len() < MAX_ROW_LENGTH {
            let end = FlatKey::from_cell(&first_on_next_row(&first)?);
            self.range(start..end)
        } else {
            let end = FlatKey::from_cell(&last_on_row_key(row));
            self.range(start..=end)
        };
        Ok(TableCellScanner::new(range.map_err(range_error)?))
    }

    fn scan_column(
        &self,
        row: &[u8],
        family: &[u8],
        qualifier: &[u8],
    ) -> Result<TableCellScanner<'_>> {
        check_width("row", row.len(), MAX_ROW_LENGTH)?;
        check_width("family", family.len(), MAX_FAMILY_LENGTH)?;

        let start = FlatKey::from_cell(&first_on_row_col_key(row, family, qualifier));
        let end = FlatKey::from_cell(&last_on_row_col_key(row, family, qualifier));
        debug!(
            row = %to_string_binary(row),
            family = %to_string_binary(family),
            qualifier = %to_string_binary(qualifier),
            "scanning column"
        );

        let range = self.range(start..=end).map_err(range_error)?;
        Ok(TableCellScanner::new(range))
    }
}

impl CellTable for redb::Table<'_, FlatKey<'static>, &'static [u8]> {
    fn insert_cell_at<C: Cell + ?Sized>(
        &mut self,
        cell: &C,
        config: &CellTableConfig,
        now: i64,
    ) -> Result<i64> {
        let mut stored = KeyValue::from_flat_key(&encode_flat_key(cell), value_bytes(cell))?;
        if config.resolve_latest_timestamp {
            update_latest_stamp(&mut stored, now)?;
        }

        let key = FlatKey::parse(stored.key())?;
        debug!(table = %config.table_name, key = %key, "inserting cell");
        self.insert(&key, value_bytes(&stored))?;

        Ok(stored.timestamp())
    }

    fn delete_cell<C: Cell + ?Sized>(&mut self, cell: &C) -> Result<bool> {
        let key = FlatKey::from_cell(cell);
        debug!(key = %key, "deleting cell");
        Ok(self.remove(&key)?.is_some())
    }
}

/// Scanner over a range of a cell table.
///
/// Each cell is copied out of the table as a [`KeyValue`].
pub struct TableCellScanner<'a> {
    range: redb::Range<'a, FlatKey<'static>, &'static [u8]>,
    current: Option<KeyValue>,
    exhausted: bool,
}

impl<'a> TableCellScanner<'a> {
    fn new(range: redb::Range<'a, FlatKey<'static>, &'static [u8]>) -> Self {
        Self {
            range,
            current: None,
            exhausted: false,
        }
    }

    fn finish(&mut self) {
        self.current = None;
        self.exhausted = true;
    }
}

impl CellScanner for TableCellScanner<'_> {
    type Cell = KeyValue;

    fn current(&self) -> Option<&KeyValue> {
        self.current.as_ref()
    }

    fn advance(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }

        match self.range.next() {
            Some(Ok((key_guard, value_guard))) => {
                let key = key_guard.value();
                match KeyValue::from_flat_key(key.as_bytes(), value_guard.value()) {
                    Ok(cell) => {
                        self.current = Some(cell);
                        Ok(true)
                    }
                    Err(err) => {
                        warn!(error = %err, "unreadable cell in table");
                        self.finish();
                        Err(err)
                    }
                }
            }
            Some(Err(err)) => {
                self.finish();
                Err(TableError::ScanFailed(format!(
                    "Database error during iteration: {}",
                    err
                ))
                .into())
            }
            None => {
                self.finish();
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellType, LATEST_TIMESTAMP};
    use crate::error::CellError;
    use crate::util::field::{clone_qualifier, clone_row, clone_value};
    use redb::{Database, ReadableDatabase};
    use tempfile::NamedTempFile;

    fn put(row: &[u8], qualifier: &[u8], ts: i64, value: &[u8]) -> KeyValue {
        KeyValue::new(row, b"cf", qualifier, ts, CellType::Put, value).unwrap()
    }

    fn drain(scanner: &mut TableCellScanner<'_>) -> Vec<KeyValue> {
        let mut cells = Vec::new();
        while scanner.advance().unwrap() {
            cells.push(scanner.current().unwrap().clone());
        }
        cells
    }

    #[test]
    fn test_insert_resolves_latest() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::create(temp_file.path()).unwrap();
        let config = CellTableConfig::default();

        let write_txn = db.begin_write().unwrap();
        {
            let mut table = write_txn.open_table(config.definition()).unwrap();
            let ts = table
                .insert_cell_at(&put(b"r", b"q", LATEST_TIMESTAMP, b"v"), &config, 1_000)
                .unwrap();
            assert_eq!(ts, 1_000);

            let ts = table
                .insert_cell_at(&put(b"r", b"q", 5, b"old"), &config, 1_000)
                .unwrap();
            assert_eq!(ts, 5);
        }
        write_txn.commit().unwrap();

        let read_txn = db.begin_read().unwrap();
        let table = read_txn.open_table(config.definition()).unwrap();
        let stored = table.get_cell(&put(b"r", b"q", 1_000, b"")).unwrap().unwrap();
        assert_eq!(clone_value(&stored), b"v");
        assert!(table.get_cell(&put(b"r", b"q", LATEST_TIMESTAMP, b"")).unwrap().is_none());
    }

    #[test]
    fn test_insert_keeps_latest_when_disabled() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::create(temp_file.path()).unwrap();
        let config = CellTableConfig::new("raw", false).unwrap();

        let write_txn = db.begin_write().unwrap();
        {
            let mut table = write_txn.open_table(config.definition()).unwrap();
            let cell = put(b"r", b"q", LATEST_TIMESTAMP, b"v");
            assert_eq!(table.insert_cell(&cell, &config).unwrap(), LATEST_TIMESTAMP);
            assert!(table.get_cell(&cell).unwrap().is_some());
        }
        write_txn.commit().unwrap();
    }

    #[test]
    fn test_scan_row_in_cell_order() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::create(temp_file.path()).unwrap();
        let config = CellTableConfig::default();

        let write_txn = db.begin_write().unwrap();
        {
            let mut table = write_txn.open_table(config.definition()).unwrap();
            for cell in [
                put(b"r1", b"b", 1, b"b1"),
                put(b"r1", b"a", 1, b"a1"),
                put(b"r1", b"a", 2, b"a2"),
                put(b"r0", b"a", 1, b"x"),
                put(b"r1\x00", b"a", 1, b"x"),
                put(b"r2", b"a", 1, b"x"),
            ] {
                table.insert_cell(&cell, &config).unwrap();
            }

            let mut scanner = table.scan_row(b"r1").unwrap();
            assert!(scanner.current().is_none());
            let cells = drain(&mut scanner);
            let values: Vec<_> = cells.iter().map(clone_value).collect();
            assert_eq!(values, vec![b"a2".to_vec(), b"a1".to_vec(), b"b1".to_vec()]);
            assert!(cells.iter().all(|cell| clone_row(cell) == b"r1"));
            assert!(!scanner.advance().unwrap());
        }
        write_txn.commit().unwrap();
    }

    #[test]
    fn test_scan_row_rejects_oversized_row() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::create(temp_file.path()).unwrap();
        let config = CellTableConfig::default();

        let write_txn = db.begin_write().unwrap();
        {
            let mut table = write_txn.open_table(config.definition()).unwrap();
            // 70_000 truncated to 16 bits is 4464.
            let truncated = vec![b'a'; 70_000 % 65_536];
            table.insert_cell(&put(&truncated, b"q", 1, b"v"), &config).unwrap();

            for len in [MAX_ROW_LENGTH + 1, 70_000] {
                assert!(matches!(
                    table.scan_row(&vec![b'a'; len]),
                    Err(crate::Error::Cell(CellError::FieldTooLong { field: "row", .. }))
                ));
            }
            assert_eq!(drain(&mut table.scan_row(&truncated).unwrap()).len(), 1);

            let widest = vec![b'z'; MAX_ROW_LENGTH];
            table.insert_cell(&put(&widest, b"q", 1, b"w"), &config).unwrap();
            let cells = drain(&mut table.scan_row(&widest).unwrap());
            assert_eq!(cells.len(), 1);
            assert_eq!(clone_value(&cells[0]), b"w");
        }
        write_txn.commit().unwrap();
    }

    #[test]
    fn test_current_time_is_after_epoch() {
        assert!(current_time_millis() > 0);
    }

    #[test]
    fn test_scan_column_and_delete() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::create(temp_file.path()).unwrap();
        let config = CellTableConfig::default();

        let write_txn = db.begin_write().unwrap();
        {
            let mut table = write_txn.open_table(config.definition()).unwrap();
            for ts in [3, 1, 2] {
                table.insert_cell(&put(b"r", b"q", ts, b"v"), &config).unwrap();
            }
            table.insert_cell(&put(b"r", b"q2", 9, b"v"), &config).unwrap();
            let delete = KeyValue::new(b"r", b"cf", b"q", 2, CellType::Delete, b"").unwrap();
            table.insert_cell(&delete, &config).unwrap();

            let cells = drain(&mut table.scan_column(b"r", b"cf", b"q").unwrap());
            let versions: Vec<_> = cells.iter().map(|c| (c.timestamp(), c.type_byte())).collect();
            assert_eq!(
                versions,
                vec![(3, 4), (2, CellType::Delete.code()), (2, 4), (1, 4)]
            );
            assert!(cells.iter().all(|cell| clone_qualifier(cell) == b"q"));

            assert!(table.delete_cell(&put(b"r", b"q", 2, b"")).unwrap());
            assert!(!table.delete_cell(&put(b"r", b"q", 2, b"")).unwrap());
            assert_eq!(drain(&mut table.scan_column(b"r", b"cf", b"q").unwrap()).len(), 3);
        }
        write_txn.commit().unwrap();
    }
}
