//! Human-readable rendering of cells for logs and debugging.

use super::field::{family_bytes, qualifier_bytes, row_bytes, tags_bytes, value_bytes};
use crate::cell::{human_readable_timestamp, Cell, CellType};
use std::fmt::Write;

const PRINTABLE_SYMBOLS: &[u8] = b"`~!@#$%^&*()-_=+[]{}|;:'\",.<>/? ";

/// Renders bytes keeping printable ASCII and escaping the rest as `\xHH`.
pub fn to_string_binary(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b.is_ascii_alphanumeric() || PRINTABLE_SYMBOLS.contains(&b) {
            out.push(b as char);
        } else {
            let _ = write!(out, "\\x{:02X}", b);
        }
    }
    out
}

fn type_name(code: u8) -> String {
    match CellType::from_code(code) {
        Some(cell_type) => cell_type.name().to_string(),
        None => format!("Unknown({})", code),
    }
}

/// `row/family:qualifier/timestamp/Type/vlen=N/seqid=N`.
///
/// The `:` only appears with a non-empty family and `vlen` is left out for
/// key-only cells.
pub fn cell_key_as_string<C: Cell + ?Sized>(cell: &C) -> String {
    let mut out = to_string_binary(row_bytes(cell));
    out.push('/');
    if cell.family_length() > 0 {
        out.push_str(&to_string_binary(family_bytes(cell)));
        out.push(':');
    }
    out.push_str(&to_string_binary(qualifier_bytes(cell)));
    out.push('/');
    out.push_str(&human_readable_timestamp(cell.timestamp()));
    out.push('/');
    out.push_str(&type_name(cell.type_byte()));
    if !cell.is_key_only() {
        let _ = write!(out, "/vlen={}", cell.value_length());
    }
    let _ = write!(out, "/seqid={}", cell.sequence_id());
    out
}

/// The key rendering, followed in verbose mode by the tags (when present)
/// and the value (unless key-only).
pub fn cell_to_string<C: Cell + ?Sized>(cell: &C, verbose: bool) -> String {
    let mut out = cell_key_as_string(cell);
    if verbose {
        if cell.tags_length() > 0 {
            out.push('/');
            out.push_str(&to_string_binary(tags_bytes(cell)));
        }
        if !cell.is_key_only() {
            out.push('/');
            out.push_str(&to_string_binary(value_bytes(cell)));
        }
    }
    out
}
