//! Scanner adapters over in-memory sources.

use super::CellScanner;
use crate::cell::Cell;
use crate::Result;
use std::collections::{btree_map, BTreeMap};
use tracing::trace;

/// Scans a slice of cells in order.
#[derive(Debug)]
pub struct ArrayCellScanner<'a, C> {
    cells: &'a [C],
    next: usize,
    current: Option<&'a C>,
}

impl<'a, C: Cell> ArrayCellScanner<'a, C> {
    pub fn new(cells: &'a [C]) -> Self {
        Self {
            cells,
            next: 0,
            current: None,
        }
    }
}

impl<C: Cell> CellScanner for ArrayCellScanner<'_, C> {
    type Cell = C;

    fn current(&self) -> Option<&C> {
        self.current
    }

    fn advance(&mut self) -> Result<bool> {
        self.current = self.cells.get(self.next);
        if self.current.is_some() {
            self.next += 1;
            return Ok(true);
        }
        // Park past the end so a later call cannot see cells again.
        self.next = self.cells.len();
        Ok(false)
    }
}

/// Scans the cells yielded by an iterator.
pub struct IterCellScanner<I: Iterator> {
    iter: Option<I>,
    current: Option<I::Item>,
}

impl<I> IterCellScanner<I>
where
    I: Iterator,
    I::Item: Cell,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(cells: T) -> Self {
        Self {
            iter: Some(cells.into_iter()),
            current: None,
        }
    }
}

impl<I> CellScanner for IterCellScanner<I>
where
    I: Iterator,
    I::Item: Cell,
{
    type Cell = I::Item;

    fn current(&self) -> Option<&I::Item> {
        self.current.as_ref()
    }

    fn advance(&mut self) -> Result<bool> {
        self.current = self.iter.as_mut().and_then(Iterator::next);
        if self.current.is_none() {
            // Some iterators resume after returning None; drop it instead.
            self.iter = None;
        }
        Ok(self.current.is_some())
    }
}

/// Scans a sequence of scanners one after the other.
///
/// Each source is drained before the next one is started.
pub struct NestedCellScanner<S> {
    active: Option<S>,
    pending: std::vec::IntoIter<S>,
}

impl<S: CellScanner> NestedCellScanner<S> {
    pub fn new(sources: Vec<S>) -> Self {
        let mut pending = sources.into_iter();
        Self {
            active: pending.next(),
            pending,
        }
    }
}

impl<S: CellScanner> CellScanner for NestedCellScanner<S> {
    type Cell = S::Cell;

    fn current(&self) -> Option<&S::Cell> {
        self.active.as_ref().and_then(|source| source.current())
    }

    fn advance(&mut self) -> Result<bool> {
        while let Some(source) = self.active.as_mut() {
            if source.advance()? {
                return Ok(true);
            }
            self.active = self.pending.next();
            trace!(remaining = self.pending.len(), "cell source exhausted");
        }
        Ok(false)
    }
}

/// Scans a family map: families in key order, then each family's cells in
/// list order.
#[derive(Debug)]
pub struct FamilyMapCellScanner<'a, C> {
    families: btree_map::Values<'a, Vec<u8>, Vec<C>>,
    cells: Option<std::slice::Iter<'a, C>>,
    current: Option<&'a C>,
}

impl<'a, C: Cell> FamilyMapCellScanner<'a, C> {
    pub fn new(map: &'a BTreeMap<Vec<u8>, Vec<C>>) -> Self {
        Self {
            families: map.values(),
            cells: None,
            current: None,
        }
    }
}

impl<C: Cell> CellScanner for FamilyMapCellScanner<'_, C> {
    type Cell = C;

    fn current(&self) -> Option<&C> {
        self.current
    }

    fn advance(&mut self) -> Result<bool> {
        loop {
            if let Some(cell) = self.cells.as_mut().and_then(Iterator::next) {
                self.current = Some(cell);
                return Ok(true);
            }
            match self.families.next() {
                Some(family) => self.cells = Some(family.iter()),
                None => {
                    self.current = None;
                    return Ok(false);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellType, KeyValue};
    use crate::util::field::clone_qualifier;

    fn kv(family: &[u8], qualifier: &[u8]) -> KeyValue {
        KeyValue::new(b"row", family, qualifier, 1, CellType::Put, b"v").unwrap()
    }

    fn drain<S: CellScanner>(scanner: &mut S) -> Vec<Vec<u8>> {
        let mut seen = Vec::new();
        while scanner.advance().unwrap() {
            seen.push(clone_qualifier(scanner.current().unwrap()));
        }
        seen
    }

    #[test]
    fn test_array_scanner() {
        let cells = vec![kv(b"cf", b"a"), kv(b"cf", b"b")];
        let mut scanner = ArrayCellScanner::new(&cells);

        assert!(scanner.current().is_none());
        assert_eq!(drain(&mut scanner), vec![b"a".to_vec(), b"b".to_vec()]);
        assert!(scanner.current().is_none());
        assert!(!scanner.advance().unwrap());
        assert!(!scanner.advance().unwrap());
    }

    #[test]
    fn test_empty_array_scanner() {
        let cells: Vec<KeyValue> = Vec::new();
        let mut scanner = ArrayCellScanner::new(&cells);
        assert!(!scanner.advance().unwrap());
        assert!(scanner.current().is_none());
    }

    #[test]
    fn test_iter_scanner_latches_exhaustion() {
        let mut scanner = IterCellScanner::new(vec![kv(b"cf", b"a")]);
        assert!(scanner.current().is_none());
        assert!(scanner.advance().unwrap());
        assert_eq!(clone_qualifier(scanner.current().unwrap()), b"a");
        assert!(!scanner.advance().unwrap());
        assert!(!scanner.advance().unwrap());
        assert!(scanner.current().is_none());
    }

    #[test]
    fn test_nested_scanner_skips_empty_sources() {
        let first = vec![kv(b"cf", b"a")];
        let empty: Vec<KeyValue> = Vec::new();
        let last = vec![kv(b"cf", b"b"), kv(b"cf", b"c")];
        let mut scanner = NestedCellScanner::new(vec![
            ArrayCellScanner::new(&first),
            ArrayCellScanner::new(&empty),
            ArrayCellScanner::new(&last),
        ]);

        assert!(scanner.current().is_none());
        assert_eq!(
            drain(&mut scanner),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]
        );
        assert!(!scanner.advance().unwrap());
        assert!(scanner.current().is_none());
    }

    #[test]
    fn test_nested_boxed_sources() {
        let first = vec![kv(b"cf", b"a")];
        let sources: Vec<Box<dyn CellScanner<Cell = KeyValue> + '_>> = vec![
            Box::new(ArrayCellScanner::new(&first)),
            Box::new(IterCellScanner::new(vec![kv(b"cf", b"z")])),
        ];
        let mut scanner = NestedCellScanner::new(sources);
        assert_eq!(drain(&mut scanner), vec![b"a".to_vec(), b"z".to_vec()]);
    }

    #[test]
    fn test_family_map_order() {
        let mut map = BTreeMap::new();
        map.insert(b"cf2".to_vec(), vec![kv(b"cf2", b"c3")]);
        map.insert(b"cf1".to_vec(), vec![kv(b"cf1", b"c1"), kv(b"cf1", b"c2")]);
        map.insert(b"cf0".to_vec(), Vec::new());

        let mut scanner = FamilyMapCellScanner::new(&map);
        assert!(scanner.current().is_none());
        assert_eq!(
            drain(&mut scanner),
            vec![b"c1".to_vec(), b"c2".to_vec(), b"c3".to_vec()]
        );
        assert!(!scanner.advance().unwrap());
    }
}
