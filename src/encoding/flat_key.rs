//! Flat key encoding.
//!
//! The flat key is the canonical byte layout of a cell key, as stored on disk
//! and sent on the wire:
//!
//! [row_len: u16 BE][row][family_len: u8][family][qualifier][timestamp: i64 BE][type: u8]
//!
//! The qualifier length is implied by the total key length.

use crate::cell::{
    Cell, CellType, FAMILY_LENGTH_SIZE, KEY_INFRASTRUCTURE_SIZE, ROW_LENGTH_SIZE,
    TIMESTAMP_SIZE, TYPE_SIZE,
};
use crate::error::EncodingError;
use crate::util::field::{family_bytes, qualifier_bytes, row_bytes};
use crate::Result;
use std::borrow::Cow;
use std::fmt;
use std::io::Write;

/// Length of the flat key of a cell.
pub fn flat_key_length<C: Cell + ?Sized>(cell: &C) -> usize {
    KEY_INFRASTRUCTURE_SIZE
        + cell.row_length() as usize
        + cell.family_length() as usize
        + cell.qualifier_length()
}

/// Writes the flat key of a cell to `out`.
///
/// # Arguments
/// * `cell` - Any cell, array-backed or buffer-backed
/// * `out` - Destination sink
///
/// # Returns
/// An I/O error from the sink, if any
pub fn write_flat_key<C, W>(cell: &C, out: &mut W) -> Result<()>
where
    C: Cell + ?Sized,
    W: Write + ?Sized,
{
    out.write_all(&cell.row_length().to_be_bytes())?;
    out.write_all(row_bytes(cell))?;
    out.write_all(&[cell.family_length()])?;
    out.write_all(family_bytes(cell))?;
    out.write_all(qualifier_bytes(cell))?;
    out.write_all(&cell.timestamp().to_be_bytes())?;
    out.write_all(&[cell.type_byte()])?;
    Ok(())
}

/// Encodes the flat key of a cell into a new buffer of exactly its length.
pub fn encode_flat_key<C: Cell + ?Sized>(cell: &C) -> Vec<u8> {
    let mut buf = Vec::with_capacity(flat_key_length(cell));
    buf.extend_from_slice(&cell.row_length().to_be_bytes());
    buf.extend_from_slice(row_bytes(cell));
    buf.push(cell.family_length());
    buf.extend_from_slice(family_bytes(cell));
    buf.extend_from_slice(qualifier_bytes(cell));
    buf.extend_from_slice(&cell.timestamp().to_be_bytes());
    buf.push(cell.type_byte());
    buf
}

/// Writes the row length and row bytes of the flat key, skipping the first
/// `common_prefix` bytes already shared with the previous key.
///
/// # Arguments
/// * `cell` - Cell whose row is written
/// * `common_prefix` - Leading key bytes the reader already has
/// * `out` - Destination sink
pub fn write_row_key_excluding_common<C, W>(cell: &C, common_prefix: usize, out: &mut W) -> Result<()>
where
    C: Cell + ?Sized,
    W: Write + ?Sized,
{
    let length = cell.row_length().to_be_bytes();
    if common_prefix < ROW_LENGTH_SIZE {
        out.write_all(&length[common_prefix..])?;
    }

    let row = row_bytes(cell);
    let skip = common_prefix.saturating_sub(ROW_LENGTH_SIZE).min(row.len());
    out.write_all(&row[skip..])?;
    Ok(())
}

/// A decoded flat key, usable as a key-only cell.
#[derive(Clone, PartialEq, Eq)]
pub struct FlatKey<'a> {
    bytes: Cow<'a, [u8]>,
    row_length: u16,
    family_length: u8,
    qualifier_length: usize,
}

impl<'a> FlatKey<'a> {
    /// Validates and wraps a flat key.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        Self::from_cow(Cow::Borrowed(bytes))
    }

    /// Validates and takes ownership of a flat key.
    pub fn from_vec(bytes: Vec<u8>) -> Result<FlatKey<'static>> {
        FlatKey::from_cow(Cow::Owned(bytes))
    }

    fn from_cow(bytes: Cow<'a, [u8]>) -> Result<Self> {
        if bytes.len() < KEY_INFRASTRUCTURE_SIZE {
            return Err(EncodingError::InvalidFlatKey(format!(
                "flat key needs at least {} bytes, got {}",
                KEY_INFRASTRUCTURE_SIZE,
                bytes.len()
            ))
            .into());
        }

        let row_length = u16::from_be_bytes([bytes[0], bytes[1]]);
        let family_length_offset = ROW_LENGTH_SIZE + row_length as usize;
        if family_length_offset + FAMILY_LENGTH_SIZE + TIMESTAMP_SIZE + TYPE_SIZE > bytes.len() {
            return Err(EncodingError::InvalidFlatKey(format!(
                "row length {} overruns key of {} bytes",
                row_length,
                bytes.len()
            ))
            .into());
        }

        let family_length = bytes[family_length_offset];
        let fixed = KEY_INFRASTRUCTURE_SIZE + row_length as usize + family_length as usize;
        if fixed > bytes.len() {
            return Err(EncodingError::InvalidFlatKey(format!(
                "family length {} overruns key of {} bytes",
                family_length,
                bytes.len()
            ))
            .into());
        }

        Ok(Self {
            qualifier_length: bytes.len() - fixed,
            bytes,
            row_length,
            family_length,
        })
    }

    /// Encodes the key of any cell.
    pub fn from_cell<C: Cell + ?Sized>(cell: &C) -> FlatKey<'static> {
        FlatKey {
            bytes: Cow::Owned(encode_flat_key(cell)),
            row_length: cell.row_length(),
            family_length: cell.family_length(),
            qualifier_length: cell.qualifier_length(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn cell_type(&self) -> Option<CellType> {
        CellType::from_code(self.type_byte())
    }

    pub fn into_owned(self) -> FlatKey<'static> {
        FlatKey {
            bytes: Cow::Owned(self.bytes.into_owned()),
            row_length: self.row_length,
            family_length: self.family_length,
            qualifier_length: self.qualifier_length,
        }
    }

    fn timestamp_offset(&self) -> usize {
        self.bytes.len() - TIMESTAMP_SIZE - TYPE_SIZE
    }
}

impl Cell for FlatKey<'_> {
    fn row_array(&self) -> &[u8] {
        &self.bytes
    }

    fn row_offset(&self) -> usize {
        ROW_LENGTH_SIZE
    }

    fn row_length(&self) -> u16 {
        self.row_length
    }

    fn family_array(&self) -> &[u8] {
        &self.bytes
    }

    fn family_offset(&self) -> usize {
        ROW_LENGTH_SIZE + self.row_length as usize + FAMILY_LENGTH_SIZE
    }

    fn family_length(&self) -> u8 {
        self.family_length
    }

    fn qualifier_array(&self) -> &[u8] {
        &self.bytes
    }

    fn qualifier_offset(&self) -> usize {
        self.family_offset() + self.family_length as usize
    }

    fn qualifier_length(&self) -> usize {
        self.qualifier_length
    }

    fn timestamp(&self) -> i64 {
        let start = self.timestamp_offset();
        let mut ts = [0u8; TIMESTAMP_SIZE];
        ts.copy_from_slice(&self.bytes[start..start + TIMESTAMP_SIZE]);
        i64::from_be_bytes(ts)
    }

    fn type_byte(&self) -> u8 {
        self.bytes[self.bytes.len() - TYPE_SIZE]
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

    fn is_key_only(&self) -> bool {
        true
    }
}

impl fmt::Debug for FlatKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::util::text::cell_key_as_string(self))
    }
}

impl fmt::Display for FlatKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::util::text::cell_key_as_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{BufferedCell, KeyValue, LATEST_TIMESTAMP};
    use crate::sentinel::last_on_row_col_key;
    use crate::util::field::{clone_family, clone_qualifier, clone_row};
    use bytes::Bytes;

    #[test]
    fn test_write_then_parse() {
        let kv = KeyValue::new(b"row", b"cf", b"qual", -3, CellType::DeleteColumn, b"v").unwrap();
        let mut out = Vec::new();
        write_flat_key(&kv, &mut out).unwrap();

        assert_eq!(out, kv.key());
        assert_eq!(out.len(), flat_key_length(&kv));

        let key = FlatKey::parse(&out).unwrap();
        assert_eq!(clone_row(&key), b"row");
        assert_eq!(clone_family(&key), b"cf");
        assert_eq!(clone_qualifier(&key), b"qual");
        assert_eq!(key.timestamp(), -3);
        assert_eq!(key.cell_type(), Some(CellType::DeleteColumn));
        assert!(key.is_key_only());
    }

    #[test]
    fn test_layout_bytes() {
        let kv = KeyValue::new(b"r", b"f", b"q", 1, CellType::Put, b"").unwrap();
        assert_eq!(
            encode_flat_key(&kv),
            vec![0, 1, b'r', 1, b'f', b'q', 0, 0, 0, 0, 0, 0, 0, 1, 4]
        );
    }

    #[test]
    fn test_buffered_and_sentinel_keys() {
        let kv = KeyValue::new(b"row", b"cf", b"q", 9, CellType::Put, b"value").unwrap();
        let view = BufferedCell::new(Bytes::copy_from_slice(kv.record()), 0, kv.record().len()).unwrap();
        assert_eq!(encode_flat_key(&view), kv.key());

        let sentinel = last_on_row_col_key(b"row", b"cf", b"q");
        let key = FlatKey::from_cell(&sentinel);
        assert_eq!(key.as_bytes().len(), flat_key_length(&sentinel));
        assert_eq!(key, FlatKey::parse(key.as_bytes()).unwrap());
    }

    #[test]
    fn test_row_key_excluding_common() {
        let kv = KeyValue::new(b"abc", b"f", b"q", LATEST_TIMESTAMP, CellType::Put, b"").unwrap();
        let write = |common: usize| {
            let mut out = Vec::new();
            write_row_key_excluding_common(&kv, common, &mut out).unwrap();
            out
        };

        assert_eq!(write(0), vec![0, 3, b'a', b'b', b'c']);
        assert_eq!(write(1), vec![3, b'a', b'b', b'c']);
        assert_eq!(write(2), b"abc".to_vec());
        assert_eq!(write(4), b"c".to_vec());
        assert!(write(5).is_empty());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        assert!(FlatKey::parse(&[0, 1, b'r']).is_err());
        // Row length claims more than the key holds.
        assert!(FlatKey::parse(&[0, 9, b'r', 0, 0, 0, 0, 0, 0, 0, 0, 1, 4]).is_err());
        // Family length claims more than the key holds.
        assert!(FlatKey::parse(&[0, 1, b'r', 5, 0, 0, 0, 0, 0, 0, 0, 1, 4]).is_err());
        assert!(FlatKey::from_vec(vec![0, 1, b'r', 0, 0, 0, 0, 0, 0, 0, 0, 1, 4]).is_ok());
    }
}
