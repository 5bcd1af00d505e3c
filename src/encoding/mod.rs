//! Key encoding and decoding utilities for storage.
//!
//! This module handles the canonical flat key byte format shared by storage
//! and the wire.

pub mod flat_key;

pub use flat_key::{
    encode_flat_key, flat_key_length, write_flat_key, write_row_key_excluding_common, FlatKey,
};
