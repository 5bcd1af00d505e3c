//! Cell model.
//!
//! A cell is one versioned key-value record: row, family, qualifier,
//! timestamp, type, value and tags, plus a sequence id used to break ties
//! between otherwise identical keys. This module defines the `Cell`
//! capability contract, the optional extension capabilities a concrete cell
//! may implement, and the concrete cell types shipped with the crate.

use bytes::Bytes;
use std::sync::Arc;

pub mod buffered;
pub mod key_value;
pub mod tags;
pub mod types;

// Re-export main types for public API
pub use buffered::BufferedCell;
pub use key_value::KeyValue;
pub use tags::{Tag, TagsIter};
pub use types::{human_readable_timestamp, CellType, LATEST_TIMESTAMP, OLDEST_TIMESTAMP};

/// Size of the row length prefix in the flat key.
pub const ROW_LENGTH_SIZE: usize = 2;
/// Size of the family length prefix in the flat key.
pub const FAMILY_LENGTH_SIZE: usize = 1;
/// Size of the encoded timestamp.
pub const TIMESTAMP_SIZE: usize = 8;
/// Size of the encoded type code.
pub const TYPE_SIZE: usize = 1;
pub const TIMESTAMP_TYPE_SIZE: usize = TIMESTAMP_SIZE + TYPE_SIZE;
/// Fixed bytes of a flat key beyond the row, family and qualifier bytes.
pub const KEY_INFRASTRUCTURE_SIZE: usize = ROW_LENGTH_SIZE + FAMILY_LENGTH_SIZE + TIMESTAMP_TYPE_SIZE;

/// Largest permitted row length.
pub const MAX_ROW_LENGTH: usize = u16::MAX as usize;
/// Largest permitted family length.
pub const MAX_FAMILY_LENGTH: usize = u8::MAX as usize;
/// Largest permitted qualifier length.
pub const MAX_QUALIFIER_LENGTH: usize = i32::MAX as usize;

/// The five byte-range fields of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Row,
    Family,
    Qualifier,
    Value,
    Tags,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Row => "row",
            Field::Family => "family",
            Field::Qualifier => "qualifier",
            Field::Value => "value",
            Field::Tags => "tags",
        }
    }
}

/// The cell capability contract.
///
/// Every byte-range field is exposed as `(array, offset, length)`. Cells whose
/// bytes live inside a larger shared buffer may additionally expose
/// [`BufferBackedCell`] through [`Cell::as_buffer_backed`]; the utilities in
/// [`crate::util`] read through that capability when it is present. Both paths
/// must yield the same bytes.
///
/// The mutation capabilities take `&mut self`, so they can only be exercised
/// while the caller holds the cell exclusively, i.e. before it is shared.
pub trait Cell {
    fn row_array(&self) -> &[u8];
    fn row_offset(&self) -> usize;
    fn row_length(&self) -> u16;

    fn family_array(&self) -> &[u8];
    fn family_offset(&self) -> usize;
    fn family_length(&self) -> u8;

    fn qualifier_array(&self) -> &[u8];
    fn qualifier_offset(&self) -> usize;
    fn qualifier_length(&self) -> usize;

    /// Version of the cell. Larger timestamps sort first.
    fn timestamp(&self) -> i64;

    /// Raw type code, see [`CellType`].
    fn type_byte(&self) -> u8;

    /// Write-ordering token; not part of key equality.
    fn sequence_id(&self) -> u64;

    fn value_array(&self) -> &[u8];
    fn value_offset(&self) -> usize;
    fn value_length(&self) -> usize;

    fn tags_array(&self) -> &[u8];
    fn tags_offset(&self) -> usize;
    fn tags_length(&self) -> usize;

    /// Buffer-positioned access to the same fields, if the cell is a view
    /// over a shared buffer.
    fn as_buffer_backed(&self) -> Option<&dyn BufferBackedCell> {
        None
    }

    fn as_settable_sequence_id(&mut self) -> Option<&mut dyn SettableSequenceId> {
        None
    }

    fn as_settable_timestamp(&mut self) -> Option<&mut dyn SettableTimestamp> {
        None
    }

    /// Self-reported heap footprint, if the cell tracks it.
    fn as_heap_size(&self) -> Option<&dyn HeapSize> {
        None
    }

    /// Exact serialized lengths, if the cell tracks them.
    fn as_self_sized(&self) -> Option<&dyn SelfSized> {
        None
    }

    /// Whether the cell carries only a key (no value section at all).
    fn is_key_only(&self) -> bool {
        false
    }
}

/// Buffer-positioned access to the fields of a cell.
///
/// Positions are absolute offsets into the returned buffer; lengths come from
/// the [`Cell`] accessors.
pub trait BufferBackedCell {
    fn row_buffer(&self) -> &Bytes;
    fn row_position(&self) -> usize;

    fn family_buffer(&self) -> &Bytes;
    fn family_position(&self) -> usize;

    fn qualifier_buffer(&self) -> &Bytes;
    fn qualifier_position(&self) -> usize;

    fn value_buffer(&self) -> &Bytes;
    fn value_position(&self) -> usize;

    fn tags_buffer(&self) -> &Bytes;
    fn tags_position(&self) -> usize;
}

/// Capability to assign the sequence id of a cell before it is published.
pub trait SettableSequenceId {
    fn set_sequence_id(&mut self, seq_id: u64);
}

/// Capability to rewrite the timestamp of a cell before it is published.
pub trait SettableTimestamp {
    fn set_timestamp(&mut self, timestamp: i64);

    /// Sets the timestamp from its 8-byte big-endian encoding.
    fn set_timestamp_bytes(&mut self, timestamp: [u8; TIMESTAMP_SIZE]) {
        self.set_timestamp(i64::from_be_bytes(timestamp));
    }
}

/// Capability to report the heap footprint of a cell.
pub trait HeapSize {
    fn heap_size(&self) -> usize;
}

/// Capability to report exact serialized lengths.
pub trait SelfSized {
    /// Length of the whole serialized record.
    fn record_length(&self) -> usize;

    /// Length of the flat key portion.
    fn key_length(&self) -> usize;
}

macro_rules! delegate_read_accessors {
    () => {
        fn row_array(&self) -> &[u8] {
            (**self).row_array()
        }
        fn row_offset(&self) -> usize {
            (**self).row_offset()
        }
        fn row_length(&self) -> u16 {
            (**self).row_length()
        }
        fn family_array(&self) -> &[u8] {
            (**self).family_array()
        }
        fn family_offset(&self) -> usize {
            (**self).family_offset()
        }
        fn family_length(&self) -> u8 {
            (**self).family_length()
        }
        fn qualifier_array(&self) -> &[u8] {
            (**self).qualifier_array()
        }
        fn qualifier_offset(&self) -> usize {
            (**self).qualifier_offset()
        }
        fn qualifier_length(&self) -> usize {
            (**self).qualifier_length()
        }
        fn timestamp(&self) -> i64 {
            (**self).timestamp()
        }
        fn type_byte(&self) -> u8 {
            (**self).type_byte()
        }
        fn sequence_id(&self) -> u64 {
            (**self).sequence_id()
        }
        fn value_array(&self) -> &[u8] {
            (**self).value_array()
        }
        fn value_offset(&self) -> usize {
            (**self).value_offset()
        }
        fn value_length(&self) -> usize {
            (**self).value_length()
        }
        fn tags_array(&self) -> &[u8] {
            (**self).tags_array()
        }
        fn tags_offset(&self) -> usize {
            (**self).tags_offset()
        }
        fn tags_length(&self) -> usize {
            (**self).tags_length()
        }
        fn as_buffer_backed(&self) -> Option<&dyn BufferBackedCell> {
            (**self).as_buffer_backed()
        }
        fn as_heap_size(&self) -> Option<&dyn HeapSize> {
            (**self).as_heap_size()
        }
        fn as_self_sized(&self) -> Option<&dyn SelfSized> {
            (**self).as_self_sized()
        }
        fn is_key_only(&self) -> bool {
            (**self).is_key_only()
        }
    };
}

impl<C: Cell + ?Sized> Cell for &C {
    delegate_read_accessors!();
}

impl<C: Cell + ?Sized> Cell for Box<C> {
    delegate_read_accessors!();

    fn as_settable_sequence_id(&mut self) -> Option<&mut dyn SettableSequenceId> {
        (**self).as_settable_sequence_id()
    }

    fn as_settable_timestamp(&mut self) -> Option<&mut dyn SettableTimestamp> {
        (**self).as_settable_timestamp()
    }
}

// Shared cells are only mutable while the handle is unique.
impl<C: Cell + ?Sized> Cell for Arc<C> {
    delegate_read_accessors!();

    fn as_settable_sequence_id(&mut self) -> Option<&mut dyn SettableSequenceId> {
        Arc::get_mut(self).and_then(|cell| cell.as_settable_sequence_id())
    }

    fn as_settable_timestamp(&mut self) -> Option<&mut dyn SettableTimestamp> {
        Arc::get_mut(self).and_then(|cell| cell.as_settable_timestamp())
    }
}
