//! Free-function utilities over any [`Cell`](crate::cell::Cell).
//!
//! All of them accept array-backed and buffer-backed cells interchangeably,
//! in any combination.

pub mod comparator;
pub mod field;
pub mod matching;
pub mod predicate;
pub mod prefix;
pub mod size;
pub mod text;

pub use comparator::{
    compare, compare_columns, compare_families, compare_ignoring_sequence_id, compare_qualifiers,
    compare_rows, compare_timestamps, compare_types, compare_without_row, overlapping_keys,
};
pub use field::{
    clone_family, clone_field, clone_qualifier, clone_row, clone_tags, clone_value,
    copy_family_to, copy_field_to, copy_qualifier_to, copy_row_to, copy_tags_to, copy_value_to,
    fill_range, row_as_int, row_byte, set_sequence_id, set_timestamp, set_timestamp_from_bytes,
    tags_iter, update_latest_stamp, update_latest_stamp_from_bytes, value_as_double,
    value_as_long, ByteRange,
};
pub use matching::{
    equals, equals_ignore_mvcc_version, matching_column, matching_column_bytes, matching_family,
    matching_family_bytes, matching_qualifier, matching_qualifier_bytes, matching_row,
    matching_row_column, matching_rows, matching_timestamp, matching_type, matching_value,
    matching_value_bytes,
};
pub use predicate::{
    is_delete, is_delete_column_or_family, is_delete_column_version, is_delete_columns,
    is_delete_family, is_delete_family_version, is_delete_type,
};
pub use prefix::find_common_prefix_in_flat_key;
pub use size::{
    estimated_heap_size_of, estimated_serialized_size_of, estimated_serialized_size_of_key,
};
pub use text::{cell_key_as_string, cell_to_string, to_string_binary};
