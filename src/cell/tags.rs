//! Cell tags.
//!
//! The tags field of a cell is a concatenation of tag records:
//! `[2 bytes BE: type + payload length][1 byte: type][payload]`.

use super::key_value::check_width;
use crate::Result;

/// Size of the tag length prefix.
pub const TAG_LENGTH_SIZE: usize = 2;
/// Size of the tag type byte.
pub const TAG_TYPE_SIZE: usize = 1;
/// Largest payload a single tag can carry.
pub const MAX_TAG_PAYLOAD: usize = u16::MAX as usize - TAG_TYPE_SIZE;

/// A single tag borrowed from a tags field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    tag_type: u8,
    value: &'a [u8],
}

impl<'a> Tag<'a> {
    /// Creates a tag from its type and payload.
    pub fn new(tag_type: u8, value: &'a [u8]) -> Self {
        Self { tag_type, value }
    }

    pub fn tag_type(&self) -> u8 {
        self.tag_type
    }

    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Length of the serialized record including its length prefix.
    pub fn encoded_len(&self) -> usize {
        TAG_LENGTH_SIZE + TAG_TYPE_SIZE + self.value.len()
    }

    /// Appends the serialized record to `out`.
    ///
    /// Fails without writing when the payload exceeds [`MAX_TAG_PAYLOAD`].
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        check_width("tag", self.value.len(), MAX_TAG_PAYLOAD)?;
        let tag_len = (TAG_TYPE_SIZE + self.value.len()) as u16;
        out.extend_from_slice(&tag_len.to_be_bytes());
        out.push(self.tag_type);
        out.extend_from_slice(self.value);
        Ok(())
    }
}

/// Serializes a list of tags into a tags field.
pub fn encode_tags(tags: &[Tag<'_>]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(tags.iter().map(Tag::encoded_len).sum());
    for tag in tags {
        tag.write_to(&mut buf)?;
    }
    Ok(buf)
}

/// Forward-only iterator over the tag records of a tags field.
///
/// A truncated trailing record ends the iteration.
#[derive(Debug, Clone)]
pub struct TagsIter<'a> {
    tags: &'a [u8],
    pos: usize,
}

impl<'a> TagsIter<'a> {
    pub fn new(tags: &'a [u8]) -> Self {
        Self { tags, pos: 0 }
    }
}

impl<'a> Iterator for TagsIter<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.tags[self.pos..];
        if rest.len() < TAG_LENGTH_SIZE + TAG_TYPE_SIZE {
            self.pos = self.tags.len();
            return None;
        }

        let tag_len = u16::from_be_bytes([rest[0], rest[1]]) as usize;
        if tag_len < TAG_TYPE_SIZE || rest.len() < TAG_LENGTH_SIZE + tag_len {
            self.pos = self.tags.len();
            return None;
        }

        let tag_type = rest[TAG_LENGTH_SIZE];
        let value = &rest[TAG_LENGTH_SIZE + TAG_TYPE_SIZE..TAG_LENGTH_SIZE + tag_len];
        self.pos += TAG_LENGTH_SIZE + tag_len;
        Some(Tag { tag_type, value })
    }
}
