//! Type predicates over cells.

use crate::cell::{Cell, CellType};

/// Whether the cell's type lies in the delete band.
pub fn is_delete<C: Cell + ?Sized>(cell: &C) -> bool {
    CellType::is_delete_code(cell.type_byte())
}

/// Exactly the `Delete` (single version) code.
pub fn is_delete_type<C: Cell + ?Sized>(cell: &C) -> bool {
    cell.type_byte() == CellType::Delete.code()
}

pub fn is_delete_family<C: Cell + ?Sized>(cell: &C) -> bool {
    cell.type_byte() == CellType::DeleteFamily.code()
}

pub fn is_delete_family_version<C: Cell + ?Sized>(cell: &C) -> bool {
    cell.type_byte() == CellType::DeleteFamilyVersion.code()
}

pub fn is_delete_columns<C: Cell + ?Sized>(cell: &C) -> bool {
    cell.type_byte() == CellType::DeleteColumn.code()
}

/// A delete of one version of one column. Only the `Delete` code qualifies.
pub fn is_delete_column_version<C: Cell + ?Sized>(cell: &C) -> bool {
    cell.type_byte() == CellType::Delete.code()
}

pub fn is_delete_column_or_family<C: Cell + ?Sized>(cell: &C) -> bool {
    let code = cell.type_byte();
    code == CellType::DeleteColumn.code() || code == CellType::DeleteFamily.code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::KeyValue;

    fn of(cell_type: CellType) -> KeyValue {
        KeyValue::new(b"r", b"f", b"q", 1, cell_type, b"").unwrap()
    }

    #[test]
    fn test_delete_band() {
        assert!(!is_delete(&of(CellType::Put)));
        assert!(is_delete(&of(CellType::Delete)));
        assert!(is_delete(&of(CellType::DeleteFamilyVersion)));
        assert!(is_delete(&of(CellType::DeleteColumn)));
        assert!(is_delete(&of(CellType::DeleteFamily)));
        assert!(!is_delete(&of(CellType::Minimum)));
        assert!(!is_delete(&of(CellType::Maximum)));

        // Unnamed codes inside the band still count.
        let odd = KeyValue::from_parts(b"r", b"f", b"q", 1, 9, b"", b"").unwrap();
        assert!(is_delete(&odd));
    }

    #[test]
    fn test_specific_kinds() {
        assert!(is_delete_type(&of(CellType::Delete)));
        assert!(is_delete_column_version(&of(CellType::Delete)));
        assert!(!is_delete_column_version(&of(CellType::DeleteColumn)));
        assert!(is_delete_columns(&of(CellType::DeleteColumn)));
        assert!(is_delete_family(&of(CellType::DeleteFamily)));
        assert!(is_delete_family_version(&of(CellType::DeleteFamilyVersion)));
        assert!(!is_delete_family(&of(CellType::DeleteFamilyVersion)));

        assert!(is_delete_column_or_family(&of(CellType::DeleteColumn)));
        assert!(is_delete_column_or_family(&of(CellType::DeleteFamily)));
        assert!(!is_delete_column_or_family(&of(CellType::Delete)));
    }
}
