//! Field matching.
//!
//! Each matcher answers whether a field of a cell denotes the same bytes as
//! the corresponding field of another cell, or as a caller-supplied slice.
//! Both sides are resolved through [`field_bytes`], so array-backed and
//! buffer-backed cells can be mixed freely. An absent slice (`None`) stands
//! for a zero-length field.

use super::field::{family_bytes, field_bytes, qualifier_bytes, row_bytes, value_bytes};
use crate::cell::{Cell, Field};

fn matching_field<L, R>(left: &L, right: &R, field: Field) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    field_bytes(left, field) == field_bytes(right, field)
}

fn matching_optional(field: &[u8], other: Option<&[u8]>) -> bool {
    match other {
        Some(bytes) => field == bytes,
        None => field.is_empty(),
    }
}

/// Whether both cells have the same row.
pub fn matching_rows<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    left.row_length() == right.row_length() && matching_field(left, right, Field::Row)
}

/// Whether the cell's row equals `row`.
pub fn matching_row<C: Cell + ?Sized>(cell: &C, row: Option<&[u8]>) -> bool {
    matching_optional(row_bytes(cell), row)
}

pub fn matching_family<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    left.family_length() == right.family_length() && matching_field(left, right, Field::Family)
}

/// Whether the cell's family equals `family`.
pub fn matching_family_bytes<C: Cell + ?Sized>(cell: &C, family: Option<&[u8]>) -> bool {
    matching_optional(family_bytes(cell), family)
}

pub fn matching_qualifier<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    left.qualifier_length() == right.qualifier_length()
        && matching_field(left, right, Field::Qualifier)
}

/// Whether the cell's qualifier equals `qualifier`.
pub fn matching_qualifier_bytes<C: Cell + ?Sized>(cell: &C, qualifier: Option<&[u8]>) -> bool {
    matching_optional(qualifier_bytes(cell), qualifier)
}

/// Family and qualifier both match.
pub fn matching_column<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    matching_family(left, right) && matching_qualifier(left, right)
}

/// Whether the cell's family and qualifier equal the given ones.
pub fn matching_column_bytes<C: Cell + ?Sized>(
    cell: &C,
    family: Option<&[u8]>,
    qualifier: Option<&[u8]>,
) -> bool {
    matching_family_bytes(cell, family) && matching_qualifier_bytes(cell, qualifier)
}

pub fn matching_value<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    left.value_length() == right.value_length() && matching_field(left, right, Field::Value)
}

/// Whether the cell's value equals `value`.
pub fn matching_value_bytes<C: Cell + ?Sized>(cell: &C, value: Option<&[u8]>) -> bool {
    matching_optional(value_bytes(cell), value)
}

/// Timestamp equality; symmetric whatever the sort direction.
pub fn matching_timestamp<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    left.timestamp() == right.timestamp()
}

pub fn matching_type<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    left.type_byte() == right.type_byte()
}

/// Row, family and qualifier all match.
pub fn matching_row_column<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    let left_len =
        left.row_length() as usize + left.family_length() as usize + left.qualifier_length();
    let right_len =
        right.row_length() as usize + right.family_length() as usize + right.qualifier_length();
    if left_len != right_len {
        return false;
    }

    matching_rows(left, right) && matching_column(left, right)
}

/// Key equality: row, family, qualifier, timestamp and type.
///
/// The sequence id is not consulted.
pub fn equals<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    matching_rows(left, right)
        && matching_family(left, right)
        && matching_qualifier(left, right)
        && matching_timestamp(left, right)
        && matching_type(left, right)
}

/// Key equality without regard to the sequence id: row, family, qualifier,
/// timestamp and type.
pub fn equals_ignore_mvcc_version<L, R>(left: &L, right: &R) -> bool
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    if !matching_rows(left, right) {
        return false;
    }
    if !matching_column(left, right) {
        return false;
    }
    if !matching_timestamp(left, right) {
        return false;
    }
    matching_type(left, right)
}
