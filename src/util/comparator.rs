//! Total order over cells.
//!
//! Row ascending, family ascending, qualifier ascending, timestamp
//! descending, type code descending, then sequence id descending. A cell with
//! an empty column and the `Minimum` type is the last cell of its row.

use super::field::{family_bytes, qualifier_bytes, row_bytes};
use crate::cell::{Cell, CellType};
use std::cmp::Ordering;

pub fn compare_rows<L, R>(left: &L, right: &R) -> Ordering
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    row_bytes(left).cmp(row_bytes(right))
}

pub fn compare_families<L, R>(left: &L, right: &R) -> Ordering
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    family_bytes(left).cmp(family_bytes(right))
}

pub fn compare_qualifiers<L, R>(left: &L, right: &R) -> Ordering
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    qualifier_bytes(left).cmp(qualifier_bytes(right))
}

/// Family first, then qualifier.
pub fn compare_columns<L, R>(left: &L, right: &R) -> Ordering
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    compare_families(left, right).then_with(|| compare_qualifiers(left, right))
}

/// Descending: the newer version sorts first.
pub fn compare_timestamps(left: i64, right: i64) -> Ordering {
    right.cmp(&left)
}

/// Descending by unsigned code: `Maximum` first, `Minimum` last.
pub fn compare_types(left: u8, right: u8) -> Ordering {
    right.cmp(&left)
}

fn is_last_on_row<C: Cell + ?Sized>(cell: &C) -> bool {
    cell.family_length() == 0
        && cell.qualifier_length() == 0
        && cell.type_byte() == CellType::Minimum.code()
}

/// Orders two cells assumed to share a row.
pub fn compare_without_row<L, R>(left: &L, right: &R) -> Ordering
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    match (is_last_on_row(left), is_last_on_row(right)) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }

    compare_columns(left, right)
        .then_with(|| compare_timestamps(left.timestamp(), right.timestamp()))
        .then_with(|| compare_types(left.type_byte(), right.type_byte()))
}

/// Full key order, without the sequence id tie-break.
pub fn compare_ignoring_sequence_id<L, R>(left: &L, right: &R) -> Ordering
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    compare_rows(left, right).then_with(|| compare_without_row(left, right))
}

/// Full cell order: key order, then the highest sequence id first.
pub fn compare<L, R>(left: &L, right: &R) -> Ordering
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    compare_ignoring_sequence_id(left, right)
        .then_with(|| right.sequence_id().cmp(&left.sequence_id()))
}

/// Whether two row ranges `[start, end)` overlap. An empty bound is unbounded.
pub fn overlapping_keys(start1: &[u8], end1: &[u8], start2: &[u8], end2: &[u8]) -> bool {
    (end2.is_empty() || start1.is_empty() || start1 < end2)
        && (end1.is_empty() || start2.is_empty() || start2 < end1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{BufferedCell, KeyValue, LATEST_TIMESTAMP};
    use bytes::Bytes;

    fn put(row: &[u8], family: &[u8], qualifier: &[u8], ts: i64) -> KeyValue {
        KeyValue::new(row, family, qualifier, ts, CellType::Put, b"v").unwrap()
    }

    #[test]
    fn test_newer_version_sorts_first() {
        let newer = put(b"a", b"cf", b"q1", 100);
        let older = KeyValue::new(b"a", b"cf", b"q1", 99, CellType::Put, b"v2").unwrap();
        assert_eq!(compare(&newer, &older), Ordering::Less);
        assert_eq!(compare(&older, &newer), Ordering::Greater);
    }

    #[test]
    fn test_field_precedence() {
        let cells = vec![
            put(b"a", b"cf", b"q", 1),
            put(b"a", b"cf", b"q1", 5),
            put(b"a", b"cf", b"q1", 1),
            put(b"a", b"cg", b"a", 1),
            put(b"ab", b"", b"", 1),
            put(b"b", b"a", b"a", LATEST_TIMESTAMP),
        ];
        for pair in cells.windows(2) {
            assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less, "{:?}", pair);
        }
    }

    #[test]
    fn test_delete_sorts_before_put_at_same_timestamp() {
        let put = put(b"r", b"cf", b"q", 10);
        let delete = KeyValue::new(b"r", b"cf", b"q", 10, CellType::Delete, b"").unwrap();
        assert_eq!(compare(&delete, &put), Ordering::Less);
    }

    #[test]
    fn test_sequence_id_breaks_ties() {
        let low = put(b"r", b"cf", b"q", 10).with_sequence_id(1);
        let high = put(b"r", b"cf", b"q", 10).with_sequence_id(2);
        assert_eq!(compare(&high, &low), Ordering::Less);
        assert_eq!(compare_ignoring_sequence_id(&high, &low), Ordering::Equal);
    }

    #[test]
    fn test_last_on_row_marker() {
        let last = KeyValue::new(b"r", b"", b"", i64::MIN, CellType::Minimum, b"").unwrap();
        let cell = put(b"r", b"zz", b"zz", i64::MIN);
        assert_eq!(compare(&last, &cell), Ordering::Greater);
        assert_eq!(compare(&cell, &last), Ordering::Less);
        assert_eq!(compare(&last, &last), Ordering::Equal);

        // A later row still sorts after the marker.
        let next = put(b"s", b"", b"", 1);
        assert_eq!(compare(&last, &next), Ordering::Less);
    }

    #[test]
    fn test_backings_order_identically() {
        let a = put(b"row", b"cf", b"q1", 3);
        let b = put(b"row", b"cf", b"q2", 3);
        let vb = BufferedCell::new(Bytes::copy_from_slice(b.record()), 0, b.record().len()).unwrap();
        assert_eq!(compare(&a, &b), compare(&a, &vb));
        assert_eq!(compare(&vb, &a), Ordering::Greater);
    }

    #[test]
    fn test_overlapping_keys() {
        assert!(overlapping_keys(b"a", b"c", b"b", b"d"));
        assert!(!overlapping_keys(b"a", b"b", b"b", b"c"));
        assert!(overlapping_keys(b"", b"b", b"a", b""));
        assert!(overlapping_keys(b"x", b"", b"a", b"y"));
        assert!(!overlapping_keys(b"x", b"", b"a", b"x"));
    }
}
