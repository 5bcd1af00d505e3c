//! Owned, array-backed cell.
//!
//! A `KeyValue` keeps the whole record in one contiguous buffer:
//!
//! Record: [key_len: u32 BE][value_len: u32 BE][flat key][value][tags_len: u16 BE][tags]
//! Flat key: [row_len: u16 BE][row][family_len: u8][family][qualifier][timestamp: i64 BE][type]
//!
//! The tags section is only present when the cell has tags.

use super::{
    Cell, CellType, HeapSize, SelfSized, SettableSequenceId, SettableTimestamp,
    FAMILY_LENGTH_SIZE, KEY_INFRASTRUCTURE_SIZE, LATEST_TIMESTAMP, MAX_FAMILY_LENGTH,
    MAX_QUALIFIER_LENGTH, MAX_ROW_LENGTH, ROW_LENGTH_SIZE, TIMESTAMP_SIZE, TYPE_SIZE,
};
use crate::error::{CellError, EncodingError};
use crate::Result;
use std::fmt;

/// Size of the key length and value length prefixes of a record.
pub const KEYVALUE_INFRASTRUCTURE_SIZE: usize = 8;
/// Size of the tags length prefix of a record.
pub const TAGS_LENGTH_SIZE: usize = 2;
/// Largest permitted tags field.
pub const MAX_TAGS_LENGTH: usize = u16::MAX as usize;

/// Field offsets of a record, resolved once when the record is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordLayout {
    pub key_length: usize,
    pub row_offset: usize,
    pub row_length: u16,
    pub family_offset: usize,
    pub family_length: u8,
    pub qualifier_offset: usize,
    pub qualifier_length: usize,
    pub timestamp_offset: usize,
    pub type_offset: usize,
    pub value_offset: usize,
    pub value_length: usize,
    pub tags_offset: usize,
    pub tags_length: usize,
    pub record_length: usize,
}

impl RecordLayout {
    /// Validates a record occupying exactly `data`.
    ///
    /// Any bytes after the value must form a complete tags section.
    pub fn parse(data: &[u8]) -> std::result::Result<Self, EncodingError> {
        if data.len() < KEYVALUE_INFRASTRUCTURE_SIZE {
            return Err(EncodingError::InvalidRecord(format!(
                "record header needs {} bytes, got {}",
                KEYVALUE_INFRASTRUCTURE_SIZE,
                data.len()
            )));
        }

        let key_length = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        let value_length = u32::from_be_bytes([data[4], data[5], data[6], data[7]]) as usize;
        if key_length < KEY_INFRASTRUCTURE_SIZE {
            return Err(EncodingError::InvalidRecord(format!(
                "key length {} is below the {} byte minimum",
                key_length, KEY_INFRASTRUCTURE_SIZE
            )));
        }

        let key_end = KEYVALUE_INFRASTRUCTURE_SIZE + key_length;
        let value_end = key_end + value_length;
        if data.len() < value_end {
            return Err(EncodingError::InvalidRecord(format!(
                "record declares {} bytes, buffer holds {}",
                value_end,
                data.len()
            )));
        }

        let (tags_offset, tags_length) = if data.len() == value_end {
            (value_end, 0)
        } else {
            if data.len() < value_end + TAGS_LENGTH_SIZE {
                return Err(EncodingError::InvalidRecord(
                    "truncated tags length".to_string(),
                ));
            }
            let tags_length = u16::from_be_bytes([data[value_end], data[value_end + 1]]) as usize;
            let tags_offset = value_end + TAGS_LENGTH_SIZE;
            if data.len() != tags_offset + tags_length {
                return Err(EncodingError::InvalidRecord(format!(
                    "tags length {} does not match the {} remaining bytes",
                    tags_length,
                    data.len() - tags_offset
                )));
            }
            (tags_offset, tags_length)
        };

        let row_offset = KEYVALUE_INFRASTRUCTURE_SIZE + ROW_LENGTH_SIZE;
        let row_length = u16::from_be_bytes([
            data[KEYVALUE_INFRASTRUCTURE_SIZE],
            data[KEYVALUE_INFRASTRUCTURE_SIZE + 1],
        ]);
        let family_length_offset = row_offset + row_length as usize;
        if family_length_offset + FAMILY_LENGTH_SIZE + TIMESTAMP_SIZE + TYPE_SIZE > key_end {
            return Err(EncodingError::InvalidRecord(format!(
                "row length {} overruns key length {}",
                row_length, key_length
            )));
        }

        let family_length = data[family_length_offset];
        let family_offset = family_length_offset + FAMILY_LENGTH_SIZE;
        let qualifier_offset = family_offset + family_length as usize;
        let timestamp_offset = key_end - TIMESTAMP_SIZE - TYPE_SIZE;
        if qualifier_offset > timestamp_offset {
            return Err(EncodingError::InvalidRecord(format!(
                "family length {} overruns key length {}",
                family_length, key_length
            )));
        }

        Ok(Self {
            key_length,
            row_offset,
            row_length,
            family_offset,
            family_length,
            qualifier_offset,
            qualifier_length: timestamp_offset - qualifier_offset,
            timestamp_offset,
            type_offset: key_end - TYPE_SIZE,
            value_offset: key_end,
            value_length,
            tags_offset,
            tags_length,
            record_length: data.len(),
        })
    }

    /// Shifts every absolute offset by `base`.
    pub fn offset_by(mut self, base: usize) -> Self {
        self.row_offset += base;
        self.family_offset += base;
        self.qualifier_offset += base;
        self.timestamp_offset += base;
        self.type_offset += base;
        self.value_offset += base;
        self.tags_offset += base;
        self
    }
}

pub(crate) fn check_width(field: &'static str, len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(CellError::FieldTooLong { field, len, max }.into());
    }
    Ok(())
}

/// Writes a complete record for the given fields.
fn encode_record(
    row: &[u8],
    family: &[u8],
    qualifier: &[u8],
    timestamp: i64,
    type_code: u8,
    value: &[u8],
    tags: &[u8],
) -> Result<Vec<u8>> {
    check_width("row", row.len(), MAX_ROW_LENGTH)?;
    check_width("family", family.len(), MAX_FAMILY_LENGTH)?;
    check_width("qualifier", qualifier.len(), MAX_QUALIFIER_LENGTH)?;
    check_width("tags", tags.len(), MAX_TAGS_LENGTH)?;

    let key_length = KEY_INFRASTRUCTURE_SIZE + row.len() + family.len() + qualifier.len();
    check_width("key", key_length, u32::MAX as usize)?;
    check_width("value", value.len(), u32::MAX as usize)?;

    let tags_section = if tags.is_empty() {
        0
    } else {
        TAGS_LENGTH_SIZE + tags.len()
    };
    let mut buf =
        Vec::with_capacity(KEYVALUE_INFRASTRUCTURE_SIZE + key_length + value.len() + tags_section);

    // Record header
    buf.extend_from_slice(&(key_length as u32).to_be_bytes());
    buf.extend_from_slice(&(value.len() as u32).to_be_bytes());

    // Flat key
    buf.extend_from_slice(&(row.len() as u16).to_be_bytes());
    buf.extend_from_slice(row);
    buf.push(family.len() as u8);
    buf.extend_from_slice(family);
    buf.extend_from_slice(qualifier);
    buf.extend_from_slice(&timestamp.to_be_bytes());
    buf.push(type_code);

    buf.extend_from_slice(value);

    if !tags.is_empty() {
        buf.extend_from_slice(&(tags.len() as u16).to_be_bytes());
        buf.extend_from_slice(tags);
    }

    Ok(buf)
}

/// An owned cell holding its record in a single buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyValue {
    bytes: Vec<u8>,
    layout: RecordLayout,
    seq_id: u64,
}

impl KeyValue {
    /// Creates a cell without tags.
    pub fn new(
        row: &[u8],
        family: &[u8],
        qualifier: &[u8],
        timestamp: i64,
        cell_type: CellType,
        value: &[u8],
    ) -> Result<Self> {
        Self::with_tags(row, family, qualifier, timestamp, cell_type, value, &[])
    }

    /// Creates a cell carrying an already serialized tags field.
    pub fn with_tags(
        row: &[u8],
        family: &[u8],
        qualifier: &[u8],
        timestamp: i64,
        cell_type: CellType,
        value: &[u8],
        tags: &[u8],
    ) -> Result<Self> {
        Self::from_parts(row, family, qualifier, timestamp, cell_type.code(), value, tags)
    }

    /// Creates a cell from a raw type code.
    pub fn from_parts(
        row: &[u8],
        family: &[u8],
        qualifier: &[u8],
        timestamp: i64,
        type_code: u8,
        value: &[u8],
        tags: &[u8],
    ) -> Result<Self> {
        let bytes = encode_record(row, family, qualifier, timestamp, type_code, value, tags)?;
        Self::from_record(bytes)
    }

    /// Creates a key-like cell for a row and column.
    ///
    /// The type is `Maximum` and the timestamp `LATEST_TIMESTAMP`, so the cell
    /// sorts before every real cell of the same column.
    pub fn create_key(row: &[u8], family: &[u8], qualifier: &[u8]) -> Result<Self> {
        Self::new(row, family, qualifier, LATEST_TIMESTAMP, CellType::Maximum, &[])
    }

    /// Creates a key-like cell for a row with empty family and qualifier.
    pub fn create_row_key(row: &[u8]) -> Result<Self> {
        Self::create_key(row, &[], &[])
    }

    /// Wraps an already serialized record, validating its layout.
    pub fn from_record(bytes: Vec<u8>) -> Result<Self> {
        let layout = RecordLayout::parse(&bytes)?;
        Ok(Self {
            bytes,
            layout,
            seq_id: 0,
        })
    }

    /// Builds a cell from an encoded flat key and a value.
    pub fn from_flat_key(key: &[u8], value: &[u8]) -> Result<Self> {
        check_width("key", key.len(), u32::MAX as usize)?;
        check_width("value", value.len(), u32::MAX as usize)?;

        let mut bytes = Vec::with_capacity(KEYVALUE_INFRASTRUCTURE_SIZE + key.len() + value.len());
        bytes.extend_from_slice(&(key.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&(value.len() as u32).to_be_bytes());
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(value);
        Self::from_record(bytes)
    }

    /// Returns the cell with its sequence id set.
    pub fn with_sequence_id(mut self, seq_id: u64) -> Self {
        self.seq_id = seq_id;
        self
    }

    /// The whole serialized record.
    pub fn record(&self) -> &[u8] {
        &self.bytes
    }

    /// The flat key portion of the record.
    pub fn key(&self) -> &[u8] {
        &self.bytes[KEYVALUE_INFRASTRUCTURE_SIZE..KEYVALUE_INFRASTRUCTURE_SIZE + self.layout.key_length]
    }

    /// The type of the cell, if its code is a known one.
    pub fn cell_type(&self) -> Option<CellType> {
        CellType::from_code(self.type_byte())
    }

    pub fn into_record(self) -> Vec<u8> {
        self.bytes
    }
}

impl Cell for KeyValue {
    fn row_array(&self) -> &[u8] {
        &self.bytes
    }

    fn row_offset(&self) -> usize {
        self.layout.row_offset
    }

    fn row_length(&self) -> u16 {
        self.layout.row_length
    }

    fn family_array(&self) -> &[u8] {
        &self.bytes
    }

    fn family_offset(&self) -> usize {
        self.layout.family_offset
    }

    fn family_length(&self) -> u8 {
        self.layout.family_length
    }

    fn qualifier_array(&self) -> &[u8] {
        &self.bytes
    }

    fn qualifier_offset(&self) -> usize {
        self.layout.qualifier_offset
    }

    fn qualifier_length(&self) -> usize {
        self.layout.qualifier_length
    }

    fn timestamp(&self) -> i64 {
        let start = self.layout.timestamp_offset;
        let mut ts = [0u8; TIMESTAMP_SIZE];
        ts.copy_from_slice(&self.bytes[start..start + TIMESTAMP_SIZE]);
        i64::from_be_bytes(ts)
    }

    fn type_byte(&self) -> u8 {
        self.bytes[self.layout.type_offset]
    }

    fn sequence_id(&self) -> u64 {
        self.seq_id
    }

    fn value_array(&self) -> &[u8] {
        &self.bytes
    }

    fn value_offset(&self) -> usize {
        self.layout.value_offset
    }

    fn value_length(&self) -> usize {
        self.layout.value_length
    }

    fn tags_array(&self) -> &[u8] {
        &self.bytes
    }

    fn tags_offset(&self) -> usize {
        self.layout.tags_offset
    }

    fn tags_length(&self) -> usize {
        self.layout.tags_length
    }

    fn as_settable_sequence_id(&mut self) -> Option<&mut dyn SettableSequenceId> {
        Some(self)
    }

    fn as_settable_timestamp(&mut self) -> Option<&mut dyn SettableTimestamp> {
        Some(self)
    }

    fn as_heap_size(&self) -> Option<&dyn HeapSize> {
        Some(self)
    }

    fn as_self_sized(&self) -> Option<&dyn SelfSized> {
        Some(self)
    }
}

impl SettableSequenceId for KeyValue {
    fn set_sequence_id(&mut self, seq_id: u64) {
        self.seq_id = seq_id;
    }
}

impl SettableTimestamp for KeyValue {
    fn set_timestamp(&mut self, timestamp: i64) {
        let start = self.layout.timestamp_offset;
        self.bytes[start..start + TIMESTAMP_SIZE].copy_from_slice(&timestamp.to_be_bytes());
    }
}

impl HeapSize for KeyValue {
    fn heap_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.bytes.capacity()
    }
}

impl SelfSized for KeyValue {
    fn record_length(&self) -> usize {
        self.layout.record_length
    }

    fn key_length(&self) -> usize {
        self.layout.key_length
    }
}

impl fmt::Debug for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::util::text::cell_key_as_string(self))
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::util::text::cell_key_as_string(self))
    }
}
