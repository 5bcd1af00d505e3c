//! Pull-based cell scanning.
//!
//! A [`CellScanner`] is a single forward-only cursor: call
//! [`advance`](CellScanner::advance) and, while it returns `true`, read
//! [`current`](CellScanner::current). Scanners cannot be restarted, and once
//! `advance` has returned `false` it keeps returning `false`.

pub mod adapters;

pub use adapters::{ArrayCellScanner, FamilyMapCellScanner, IterCellScanner, NestedCellScanner};

use crate::cell::Cell;
use crate::Result;

/// A forward-only cursor over cells.
pub trait CellScanner {
    type Cell: Cell + ?Sized;

    /// The cell under the cursor. `None` before the first `advance` and after
    /// exhaustion.
    fn current(&self) -> Option<&Self::Cell>;

    /// Moves to the next cell, returning whether there is one.
    fn advance(&mut self) -> Result<bool>;
}

impl<S: CellScanner + ?Sized> CellScanner for Box<S> {
    type Cell = S::Cell;

    fn current(&self) -> Option<&Self::Cell> {
        (**self).current()
    }

    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }
}

impl<S: CellScanner + ?Sized> CellScanner for &mut S {
    type Cell = S::Cell;

    fn current(&self) -> Option<&Self::Cell> {
        (**self).current()
    }

    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }
}
