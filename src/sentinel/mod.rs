//! Sentinel cells.
//!
//! A sentinel carries only a key prefix plus a fixed timestamp and type, chosen
//! so that it sorts strictly before (`First`) or after (`Last`) every real cell
//! sharing that prefix. Sentinels never have a value or tags, and are passed
//! to the same comparator as real cells to bound seeks and range scans.

use crate::cell::key_value::check_width;
use crate::cell::{Cell, CellType, LATEST_TIMESTAMP, MAX_ROW_LENGTH, OLDEST_TIMESTAMP};
use crate::util::field::{family_bytes, qualifier_bytes, row_bytes};
use crate::Result;
use std::borrow::Cow;
use std::fmt;

/// Which side of its prefix a sentinel sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    First,
    Last,
}

impl Bound {
    fn type_code(self) -> u8 {
        match self {
            Bound::First => CellType::Maximum.code(),
            Bound::Last => CellType::Minimum.code(),
        }
    }

    fn timestamp(self) -> i64 {
        match self {
            Bound::First => LATEST_TIMESTAMP,
            Bound::Last => OLDEST_TIMESTAMP,
        }
    }
}

/// A synthetic bound cell over a row, a column or a column version.
///
/// Field widths are not validated; the bytes must fit the flat key layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentinelCell<'a> {
    Row {
        bound: Bound,
        row: Cow<'a, [u8]>,
    },
    RowColumn {
        bound: Bound,
        row: Cow<'a, [u8]>,
        family: Cow<'a, [u8]>,
        qualifier: Cow<'a, [u8]>,
    },
    RowColumnTimestamp {
        bound: Bound,
        row: Cow<'a, [u8]>,
        family: Cow<'a, [u8]>,
        qualifier: Cow<'a, [u8]>,
        timestamp: i64,
    },
}

impl<'a> SentinelCell<'a> {
    pub fn bound(&self) -> Bound {
        match self {
            SentinelCell::Row { bound, .. }
            | SentinelCell::RowColumn { bound, .. }
            | SentinelCell::RowColumnTimestamp { bound, .. } => *bound,
        }
    }

    pub fn row(&self) -> &[u8] {
        match self {
            SentinelCell::Row { row, .. }
            | SentinelCell::RowColumn { row, .. }
            | SentinelCell::RowColumnTimestamp { row, .. } => row,
        }
    }

    pub fn family(&self) -> &[u8] {
        match self {
            SentinelCell::Row { .. } => &[],
            SentinelCell::RowColumn { family, .. }
            | SentinelCell::RowColumnTimestamp { family, .. } => family,
        }
    }

    pub fn qualifier(&self) -> &[u8] {
        match self {
            SentinelCell::Row { .. } => &[],
            SentinelCell::RowColumn { qualifier, .. }
            | SentinelCell::RowColumnTimestamp { qualifier, .. } => qualifier,
        }
    }

    /// Detaches the sentinel from the cell it was derived from.
    pub fn into_owned(self) -> SentinelCell<'static> {
        fn owned(bytes: Cow<'_, [u8]>) -> Cow<'static, [u8]> {
            Cow::Owned(bytes.into_owned())
        }

        match self {
            SentinelCell::Row { bound, row } => SentinelCell::Row {
                bound,
                row: owned(row),
            },
            SentinelCell::RowColumn {
                bound,
                row,
                family,
                qualifier,
            } => SentinelCell::RowColumn {
                bound,
                row: owned(row),
                family: owned(family),
                qualifier: owned(qualifier),
            },
            SentinelCell::RowColumnTimestamp {
                bound,
                row,
                family,
                qualifier,
                timestamp,
            } => SentinelCell::RowColumnTimestamp {
                bound,
                row: owned(row),
                family: owned(family),
                qualifier: owned(qualifier),
                timestamp,
            },
        }
    }
}

impl Cell for SentinelCell<'_> {
    fn row_array(&self) -> &[u8] {
        self.row()
    }

    fn row_offset(&self) -> usize {
        0
    }

    fn row_length(&self) -> u16 {
        self.row().len() as u16
    }

    fn family_array(&self) -> &[u8] {
        self.family()
    }

    fn family_offset(&self) -> usize {
        0
    }

    fn family_length(&self) -> u8 {
        self.family().len() as u8
    }

    fn qualifier_array(&self) -> &[u8] {
        self.qualifier()
    }

    fn qualifier_offset(&self) -> usize {
        0
    }

    fn qualifier_length(&self) -> usize {
        self.qualifier().len()
    }

    fn timestamp(&self) -> i64 {
        match self {
            SentinelCell::RowColumnTimestamp { timestamp, .. } => *timestamp,
            other => other.bound().timestamp(),
        }
    }

    fn type_byte(&self) -> u8 {
        self.bound().type_code()
    }

    fn sequence_id(&self) -> u64 {
        0
    }

    fn value_array(&self) -> &[u8] {
        &[]
    }

    fn value_offset(&self) -> usize {
        0
    }

    fn value_length(&self) -> usize {
        0
    }

    fn tags_array(&self) -> &[u8] {
        &[]
    }

    fn tags_offset(&self) -> usize {
        0
    }

    fn tags_length(&self) -> usize {
        0
    }
}

impl fmt::Display for SentinelCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::util::text::cell_key_as_string(self))
    }
}

/// Sorts before every cell of `row`.
pub fn first_on_row_key(row: &[u8]) -> SentinelCell<'_> {
    SentinelCell::Row {
        bound: Bound::First,
        row: Cow::Borrowed(row),
    }
}

/// Sorts after every cell of `row`.
pub fn last_on_row_key(row: &[u8]) -> SentinelCell<'_> {
    SentinelCell::Row {
        bound: Bound::Last,
        row: Cow::Borrowed(row),
    }
}

/// Sorts before every version of `row/family:qualifier`.
pub fn first_on_row_col_key<'a>(
    row: &'a [u8],
    family: &'a [u8],
    qualifier: &'a [u8],
) -> SentinelCell<'a> {
    SentinelCell::RowColumn {
        bound: Bound::First,
        row: Cow::Borrowed(row),
        family: Cow::Borrowed(family),
        qualifier: Cow::Borrowed(qualifier),
    }
}

/// Sorts after every version of `row/family:qualifier`.
pub fn last_on_row_col_key<'a>(
    row: &'a [u8],
    family: &'a [u8],
    qualifier: &'a [u8],
) -> SentinelCell<'a> {
    SentinelCell::RowColumn {
        bound: Bound::Last,
        row: Cow::Borrowed(row),
        family: Cow::Borrowed(family),
        qualifier: Cow::Borrowed(qualifier),
    }
}

pub fn first_on_row<C: Cell + ?Sized>(cell: &C) -> SentinelCell<'_> {
    first_on_row_key(row_bytes(cell))
}

pub fn last_on_row<C: Cell + ?Sized>(cell: &C) -> SentinelCell<'_> {
    last_on_row_key(row_bytes(cell))
}

/// First possible key of the row immediately following the cell's row.
///
/// Fails when the cell's row is already at the maximum row width.
pub fn first_on_next_row<C: Cell + ?Sized>(cell: &C) -> Result<SentinelCell<'static>> {
    let row = row_bytes(cell);
    check_width("row", row.len() + 1, MAX_ROW_LENGTH)?;

    let mut next = Vec::with_capacity(row.len() + 1);
    next.extend_from_slice(row);
    next.push(0);
    Ok(SentinelCell::Row {
        bound: Bound::First,
        row: Cow::Owned(next),
    })
}

/// Sorts before every version of the cell's column.
pub fn first_on_row_col<C: Cell + ?Sized>(cell: &C) -> SentinelCell<'_> {
    first_on_row_col_key(row_bytes(cell), family_bytes(cell), qualifier_bytes(cell))
}

/// Sorts before every version of the cell's row and family with `qualifier`.
pub fn first_on_row_family_qualifier<'a, C: Cell + ?Sized>(
    cell: &'a C,
    qualifier: &'a [u8],
) -> SentinelCell<'a> {
    first_on_row_col_key(row_bytes(cell), family_bytes(cell), qualifier)
}

/// Sorts before every cell of the cell's column at exactly `timestamp`.
pub fn first_on_row_col_ts<C: Cell + ?Sized>(cell: &C, timestamp: i64) -> SentinelCell<'_> {
    SentinelCell::RowColumnTimestamp {
        bound: Bound::First,
        row: Cow::Borrowed(row_bytes(cell)),
        family: Cow::Borrowed(family_bytes(cell)),
        qualifier: Cow::Borrowed(qualifier_bytes(cell)),
        timestamp,
    }
}

/// Sorts after every version of the cell's column.
pub fn last_on_row_col<C: Cell + ?Sized>(cell: &C) -> SentinelCell<'_> {
    last_on_row_col_key(row_bytes(cell), family_bytes(cell), qualifier_bytes(cell))
}
