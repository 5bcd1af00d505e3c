//! Common-prefix length over the flat key encoding.
//!
//! Used by prefix-compressing encoders to decide how many leading key bytes a
//! cell shares with its predecessor. The count is taken over the serialized
//! flat key, but no key is ever materialized: fields are compared in place.

use super::field::{family_bytes, qualifier_bytes, row_bytes};
use crate::cell::{Cell, FAMILY_LENGTH_SIZE, ROW_LENGTH_SIZE, TIMESTAMP_SIZE, TYPE_SIZE};

fn common_prefix(left: &[u8], right: &[u8]) -> usize {
    left.iter()
        .zip(right.iter())
        .take_while(|(l, r)| l == r)
        .count()
}

/// Number of leading bytes the flat keys of two cells have in common.
///
/// The walk stops at the first field that differs. With
/// `bypass_family_check` the caller asserts both cells share a family, so the
/// family length byte and the family of `left` are counted without looking.
/// Without `with_ts_type` the walk ends after the qualifier.
pub fn find_common_prefix_in_flat_key<L, R>(
    left: &L,
    right: &R,
    bypass_family_check: bool,
    with_ts_type: bool,
) -> usize
where
    L: Cell + ?Sized,
    R: Cell + ?Sized,
{
    let left_row_len = left.row_length();
    let right_row_len = right.row_length();
    if left_row_len != right_row_len {
        return common_prefix(&left_row_len.to_be_bytes(), &right_row_len.to_be_bytes());
    }

    let mut prefix = ROW_LENGTH_SIZE;
    let row_common = common_prefix(row_bytes(left), row_bytes(right));
    prefix += row_common;
    if row_common < left_row_len as usize {
        return prefix;
    }

    let left_family_len = left.family_length() as usize;
    if bypass_family_check {
        prefix += FAMILY_LENGTH_SIZE + left_family_len;
    } else {
        if left_family_len != right.family_length() as usize {
            return prefix;
        }
        prefix += FAMILY_LENGTH_SIZE;
        let family_common = common_prefix(family_bytes(left), family_bytes(right));
        prefix += family_common;
        if family_common < left_family_len {
            return prefix;
        }
    }

    let qualifier_common = common_prefix(qualifier_bytes(left), qualifier_bytes(right));
    prefix += qualifier_common;
    let longest_qualifier = left.qualifier_length().max(right.qualifier_length());
    if !with_ts_type || qualifier_common != longest_qualifier {
        return prefix;
    }

    let ts_common = common_prefix(
        &left.timestamp().to_be_bytes(),
        &right.timestamp().to_be_bytes(),
    );
    prefix += ts_common;
    if ts_common < TIMESTAMP_SIZE {
        return prefix;
    }

    if left.type_byte() == right.type_byte() {
        prefix += TYPE_SIZE;
    }
    prefix
}
