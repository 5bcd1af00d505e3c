//! Size estimates used to pre-size buffers.
//!
//! Exact when the cell reports its own lengths, otherwise a sum of field
//! lengths plus the fixed record overhead. These are sizing hints only.

use crate::cell::{Cell, KEY_INFRASTRUCTURE_SIZE, TIMESTAMP_TYPE_SIZE};

/// Length prefix written ahead of each record by the page codec.
const RECORD_PREFIX_SIZE: usize = 4;

fn key_element_lengths<C: Cell + ?Sized>(cell: &C) -> usize {
    cell.row_length() as usize
        + cell.family_length() as usize
        + cell.qualifier_length()
        + TIMESTAMP_TYPE_SIZE
}

pub fn estimated_serialized_size_of<C: Cell + ?Sized>(cell: &C) -> usize {
    if let Some(sized) = cell.as_self_sized() {
        return sized.record_length() + RECORD_PREFIX_SIZE;
    }

    key_element_lengths(cell)
        + cell.value_length()
        + cell.tags_length()
        + KEY_INFRASTRUCTURE_SIZE
        + RECORD_PREFIX_SIZE
}

/// Flat key length when tracked, otherwise a low estimate without the
/// length prefixes.
pub fn estimated_serialized_size_of_key<C: Cell + ?Sized>(cell: &C) -> usize {
    match cell.as_self_sized() {
        Some(sized) => sized.key_length(),
        None => key_element_lengths(cell),
    }
}

pub fn estimated_heap_size_of<C: Cell + ?Sized>(cell: &C) -> usize {
    match cell.as_heap_size() {
        Some(heap) => heap.heap_size(),
        None => estimated_serialized_size_of(cell),
    }
}
