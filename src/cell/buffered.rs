//! Buffer-backed cell view.
//!
//! A `BufferedCell` points at a record inside a shared, reference-counted
//! page (for example a decoded storage block) without copying it. It exposes
//! the buffer-access capability so utilities can read straight from the page.
//!
//! Page: [record_len: u32 BE][record][record_len: u32 BE][record]...

use super::key_value::{KeyValue, RecordLayout};
use super::{BufferBackedCell, Cell, TIMESTAMP_SIZE};
use crate::error::EncodingError;
use crate::Result;
use bytes::{BufMut, Bytes, BytesMut};

/// Size of the length prefix in front of each record of a page.
pub const RECORD_LENGTH_SIZE: usize = 4;

/// A read-only cell view over a record at some position of a shared buffer.
#[derive(Debug, Clone)]
pub struct BufferedCell {
    buf: Bytes,
    position: usize,
    layout: RecordLayout,
    seq_id: u64,
}

impl BufferedCell {
    /// Creates a view over the `length` byte record starting at `position`.
    pub fn new(buf: Bytes, position: usize, length: usize) -> Result<Self> {
        let record = position
            .checked_add(length)
            .and_then(|end| buf.get(position..end))
            .ok_or_else(|| {
                EncodingError::InvalidRecord(format!(
                    "record at {} with length {} exceeds buffer of {} bytes",
                    position,
                    length,
                    buf.len()
                ))
            })?;
        let layout = RecordLayout::parse(record)?.offset_by(position);
        Ok(Self {
            buf,
            position,
            layout,
            seq_id: 0,
        })
    }

    /// Returns the view with a sequence id attached.
    pub fn with_sequence_id(mut self, seq_id: u64) -> Self {
        self.seq_id = seq_id;
        self
    }

    /// Position of the record inside the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Position just past the record.
    pub fn end_position(&self) -> usize {
        self.position + self.layout.record_length
    }

    /// Serializes cells into a page of length-prefixed records.
    pub fn encode_page<'a, I>(cells: I) -> Bytes
    where
        I: IntoIterator<Item = &'a KeyValue>,
    {
        let mut page = BytesMut::new();
        for cell in cells {
            let record = cell.record();
            page.put_u32(record.len() as u32);
            page.put_slice(record);
        }
        page.freeze()
    }

    /// Walks a page of length-prefixed records, sharing the page buffer.
    pub fn decode_page(buf: Bytes) -> Result<Vec<BufferedCell>> {
        let mut cells = Vec::new();
        let mut position = 0;
        while position < buf.len() {
            let header = buf
                .get(position..position + RECORD_LENGTH_SIZE)
                .ok_or_else(|| {
                    EncodingError::InvalidRecord(format!(
                        "truncated record length at {}",
                        position
                    ))
                })?;
            let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
            let cell = BufferedCell::new(buf.clone(), position + RECORD_LENGTH_SIZE, length)?;
            position = cell.end_position();
            cells.push(cell);
        }
        Ok(cells)
    }
}

impl Cell for BufferedCell {
    fn row_array(&self) -> &[u8] {
        &self.buf
    }

    fn row_offset(&self) -> usize {
        self.layout.row_offset
    }

    fn row_length(&self) -> u16 {
        self.layout.row_length
    }

    fn family_array(&self) -> &[u8] {
        &self.buf
    }

    fn family_offset(&self) -> usize {
        self.layout.family_offset
    }

    fn family_length(&self) -> u8 {
        self.layout.family_length
    }

    fn qualifier_array(&self) -> &[u8] {
        &self.buf
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
        ts.copy_from_slice(&self.buf[start..start + TIMESTAMP_SIZE]);
        i64::from_be_bytes(ts)
    }

    fn type_byte(&self) -> u8 {
        self.buf[self.layout.type_offset]
    }

    fn sequence_id(&self) -> u64 {
        self.seq_id
    }

    fn value_array(&self) -> &[u8] {
        &self.buf
    }

    fn value_offset(&self) -> usize {
        self.layout.value_offset
    }

    fn value_length(&self) -> usize {
        self.layout.value_length
    }

    fn tags_array(&self) -> &[u8] {
        &self.buf
    }

    fn tags_offset(&self) -> usize {
        self.layout.tags_offset
    }

    fn tags_length(&self) -> usize {
        self.layout.tags_length
    }

    fn as_buffer_backed(&self) -> Option<&dyn BufferBackedCell> {
        Some(self)
    }
}

impl BufferBackedCell for BufferedCell {
    fn row_buffer(&self) -> &Bytes {
        &self.buf
    }

    fn row_position(&self) -> usize {
        self.layout.row_offset
    }

    fn family_buffer(&self) -> &Bytes {
        &self.buf
    }

    fn family_position(&self) -> usize {
        self.layout.family_offset
    }

    fn qualifier_buffer(&self) -> &Bytes {
        &self.buf
    }

    fn qualifier_position(&self) -> usize {
        self.layout.qualifier_offset
    }

    fn value_buffer(&self) -> &Bytes {
        &self.buf
    }

    fn value_position(&self) -> usize {
        self.layout.value_offset
    }

    fn tags_buffer(&self) -> &Bytes {
        &self.buf
    }

    fn tags_position(&self) -> usize {
        self.layout.tags_offset
    }
}
