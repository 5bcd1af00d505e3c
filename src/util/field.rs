//! Field extraction utilities.
//!
//! Every function here resolves a field through [`field_bytes`], which reads
//! through the buffer-access capability when the cell has one and through the
//! array accessors otherwise. No function copies unless it says so.

use crate::cell::tags::TagsIter;
use crate::cell::{Cell, Field, LATEST_TIMESTAMP, TIMESTAMP_SIZE};
use crate::error::CellError;
use crate::Result;

/// A borrowed `(bytes, offset, length)` window, refilled in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteRange<'a> {
    bytes: &'a [u8],
    offset: usize,
    length: usize,
}

impl<'a> ByteRange<'a> {
    pub fn new(bytes: &'a [u8], offset: usize, length: usize) -> Self {
        Self {
            bytes,
            offset,
            length,
        }
    }

    /// Points the range at a new window and returns it for chaining.
    pub fn set(&mut self, bytes: &'a [u8], offset: usize, length: usize) -> &mut Self {
        self.bytes = bytes;
        self.offset = offset;
        self.length = length;
        self
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The bytes inside the window.
    pub fn as_slice(&self) -> &'a [u8] {
        &self.bytes[self.offset..self.offset + self.length]
    }
}

/// Length of a field as declared by the cell.
pub fn field_length<C: Cell + ?Sized>(cell: &C, field: Field) -> usize {
    match field {
        Field::Row => cell.row_length() as usize,
        Field::Family => cell.family_length() as usize,
        Field::Qualifier => cell.qualifier_length(),
        Field::Value => cell.value_length(),
        Field::Tags => cell.tags_length(),
    }
}

/// The `(array, offset)` pair of a field through the array accessors.
fn array_parts<C: Cell + ?Sized>(cell: &C, field: Field) -> (&[u8], usize) {
    match field {
        Field::Row => (cell.row_array(), cell.row_offset()),
        Field::Family => (cell.family_array(), cell.family_offset()),
        Field::Qualifier => (cell.qualifier_array(), cell.qualifier_offset()),
        Field::Value => (cell.value_array(), cell.value_offset()),
        Field::Tags => (cell.tags_array(), cell.tags_offset()),
    }
}

/// Borrows the bytes of a field without copying.
pub fn field_bytes<C: Cell + ?Sized>(cell: &C, field: Field) -> &[u8] {
    let length = field_length(cell, field);
    if length == 0 {
        return &[];
    }

    match cell.as_buffer_backed() {
        Some(buffered) => {
            let (buf, position) = match field {
                Field::Row => (buffered.row_buffer(), buffered.row_position()),
                Field::Family => (buffered.family_buffer(), buffered.family_position()),
                Field::Qualifier => (buffered.qualifier_buffer(), buffered.qualifier_position()),
                Field::Value => (buffered.value_buffer(), buffered.value_position()),
                Field::Tags => (buffered.tags_buffer(), buffered.tags_position()),
            };
            &buf[position..position + length]
        }
        None => {
            let (array, offset) = array_parts(cell, field);
            &array[offset..offset + length]
        }
    }
}

pub fn row_bytes<C: Cell + ?Sized>(cell: &C) -> &[u8] {
    field_bytes(cell, Field::Row)
}

pub fn family_bytes<C: Cell + ?Sized>(cell: &C) -> &[u8] {
    field_bytes(cell, Field::Family)
}

pub fn qualifier_bytes<C: Cell + ?Sized>(cell: &C) -> &[u8] {
    field_bytes(cell, Field::Qualifier)
}

pub fn value_bytes<C: Cell + ?Sized>(cell: &C) -> &[u8] {
    field_bytes(cell, Field::Value)
}

pub fn tags_bytes<C: Cell + ?Sized>(cell: &C) -> &[u8] {
    field_bytes(cell, Field::Tags)
}

/// Copies a field into a freshly allocated vector of exactly its length.
pub fn clone_field<C: Cell + ?Sized>(cell: &C, field: Field) -> Vec<u8> {
    field_bytes(cell, field).to_vec()
}

pub fn clone_row<C: Cell + ?Sized>(cell: &C) -> Vec<u8> {
    clone_field(cell, Field::Row)
}

pub fn clone_family<C: Cell + ?Sized>(cell: &C) -> Vec<u8> {
    clone_field(cell, Field::Family)
}

pub fn clone_qualifier<C: Cell + ?Sized>(cell: &C) -> Vec<u8> {
    clone_field(cell, Field::Qualifier)
}

pub fn clone_value<C: Cell + ?Sized>(cell: &C) -> Vec<u8> {
    clone_field(cell, Field::Value)
}

pub fn clone_tags<C: Cell + ?Sized>(cell: &C) -> Vec<u8> {
    clone_field(cell, Field::Tags)
}

/// Copies a field into `destination` at `destination_offset`.
///
/// Returns the offset just past the copied bytes, so several fields can be
/// chained into one buffer.
///
/// # Panics
/// If `destination` is too small to hold the field at that offset.
pub fn copy_field_to<C: Cell + ?Sized>(
    cell: &C,
    field: Field,
    destination: &mut [u8],
    destination_offset: usize,
) -> usize {
    let bytes = field_bytes(cell, field);
    let end = destination_offset + bytes.len();
    destination[destination_offset..end].copy_from_slice(bytes);
    end
}

pub fn copy_row_to<C: Cell + ?Sized>(cell: &C, destination: &mut [u8], offset: usize) -> usize {
    copy_field_to(cell, Field::Row, destination, offset)
}

pub fn copy_family_to<C: Cell + ?Sized>(cell: &C, destination: &mut [u8], offset: usize) -> usize {
    copy_field_to(cell, Field::Family, destination, offset)
}

pub fn copy_qualifier_to<C: Cell + ?Sized>(
    cell: &C,
    destination: &mut [u8],
    offset: usize,
) -> usize {
    copy_field_to(cell, Field::Qualifier, destination, offset)
}

pub fn copy_value_to<C: Cell + ?Sized>(cell: &C, destination: &mut [u8], offset: usize) -> usize {
    copy_field_to(cell, Field::Value, destination, offset)
}

pub fn copy_tags_to<C: Cell + ?Sized>(cell: &C, destination: &mut [u8], offset: usize) -> usize {
    copy_field_to(cell, Field::Tags, destination, offset)
}

/// Points `range` at a field of the cell through the array accessors.
pub fn fill_range<'a, 'r, C: Cell + ?Sized>(
    cell: &'a C,
    field: Field,
    range: &'r mut ByteRange<'a>,
) -> &'r mut ByteRange<'a> {
    let (array, offset) = array_parts(cell, field);
    range.set(array, offset, field_length(cell, field))
}

/// Reads one byte of the row.
///
/// # Panics
/// If `index` is not below the row length.
pub fn row_byte<C: Cell + ?Sized>(cell: &C, index: usize) -> u8 {
    row_bytes(cell)[index]
}

/// Restartable walk over the tags of a cell.
pub fn tags_iter<C: Cell + ?Sized>(cell: &C) -> TagsIter<'_> {
    TagsIter::new(tags_bytes(cell))
}

fn leading_bytes<const N: usize>(bytes: &[u8], field: Field) -> Result<[u8; N]> {
    match bytes.get(..N) {
        Some(prefix) => {
            let mut out = [0u8; N];
            out.copy_from_slice(prefix);
            Ok(out)
        }
        None => Err(CellError::FieldTooShort {
            field: field.name(),
            len: bytes.len(),
            needed: N,
        }
        .into()),
    }
}

/// Interprets the first four row bytes as a big-endian `i32`.
pub fn row_as_int<C: Cell + ?Sized>(cell: &C) -> Result<i32> {
    Ok(i32::from_be_bytes(leading_bytes(row_bytes(cell), Field::Row)?))
}

/// Interprets the first eight value bytes as a big-endian `i64`.
pub fn value_as_long<C: Cell + ?Sized>(cell: &C) -> Result<i64> {
    Ok(i64::from_be_bytes(leading_bytes(value_bytes(cell), Field::Value)?))
}

/// Interprets the first eight value bytes as a big-endian IEEE 754 double.
pub fn value_as_double<C: Cell + ?Sized>(cell: &C) -> Result<f64> {
    Ok(f64::from_bits(u64::from_be_bytes(leading_bytes(
        value_bytes(cell),
        Field::Value,
    )?)))
}

/// Assigns the sequence id of a cell that supports it.
pub fn set_sequence_id<C: Cell + ?Sized>(cell: &mut C, seq_id: u64) -> Result<()> {
    match cell.as_settable_sequence_id() {
        Some(settable) => {
            settable.set_sequence_id(seq_id);
            Ok(())
        }
        None => Err(CellError::UnsupportedCapability("SettableSequenceId").into()),
    }
}

/// Rewrites the timestamp of a cell that supports it.
pub fn set_timestamp<C: Cell + ?Sized>(cell: &mut C, timestamp: i64) -> Result<()> {
    match cell.as_settable_timestamp() {
        Some(settable) => {
            settable.set_timestamp(timestamp);
            Ok(())
        }
        None => Err(CellError::UnsupportedCapability("SettableTimestamp").into()),
    }
}

/// Rewrites the timestamp from its big-endian encoding at `offset` of `bytes`.
pub fn set_timestamp_from_bytes<C: Cell + ?Sized>(
    cell: &mut C,
    bytes: &[u8],
    offset: usize,
) -> Result<()> {
    let encoded = bytes
        .get(offset..)
        .and_then(|rest| rest.get(..TIMESTAMP_SIZE))
        .and_then(|ts| <[u8; TIMESTAMP_SIZE]>::try_from(ts).ok())
        .ok_or_else(|| {
            crate::Error::InvalidInput(format!(
                "timestamp needs {} bytes at offset {}, buffer holds {}",
                TIMESTAMP_SIZE,
                offset,
                bytes.len()
            ))
        })?;
    match cell.as_settable_timestamp() {
        Some(settable) => {
            settable.set_timestamp_bytes(encoded);
            Ok(())
        }
        None => Err(CellError::UnsupportedCapability("SettableTimestamp").into()),
    }
}

/// Replaces a `LATEST_TIMESTAMP` with `timestamp`.
///
/// Returns whether the timestamp was changed.
pub fn update_latest_stamp<C: Cell + ?Sized>(cell: &mut C, timestamp: i64) -> Result<bool> {
    if cell.timestamp() == LATEST_TIMESTAMP {
        set_timestamp(cell, timestamp)?;
        return Ok(true);
    }
    Ok(false)
}

/// Replaces a `LATEST_TIMESTAMP` with the timestamp encoded at `offset` of `bytes`.
pub fn update_latest_stamp_from_bytes<C: Cell + ?Sized>(
    cell: &mut C,
    bytes: &[u8],
    offset: usize,
) -> Result<bool> {
    if cell.timestamp() == LATEST_TIMESTAMP {
        set_timestamp_from_bytes(cell, bytes, offset)?;
        return Ok(true);
    }
    Ok(false)
}
