//! redb key type for flat keys.
//!
//! Stored keys are raw flat keys. Comparison decodes both sides and applies
//! the cell order, so a table iterates its cells in the same order the
//! comparator sorts them.

use crate::encoding::FlatKey;
use crate::util::comparator::compare_ignoring_sequence_id;
use redb::{Key, TypeName, Value};
use std::cmp::Ordering;
use tracing::warn;

impl Value for FlatKey<'static> {
    type SelfType<'a>
        = FlatKey<'a>
    where
        Self: 'a;

    type AsBytes<'a>
        = &'a [u8]
    where
        Self: 'a;

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        match FlatKey::parse(data) {
            Ok(key) => key,
            Err(err) => panic!("stored flat key is corrupt: {}", err),
        }
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        value.as_bytes()
    }

    fn type_name() -> TypeName {
        TypeName::new("redb_cells::FlatKey")
    }
}

impl Key for FlatKey<'static> {
    fn compare(data1: &[u8], data2: &[u8]) -> Ordering {
        match (FlatKey::parse(data1), FlatKey::parse(data2)) {
            (Ok(left), Ok(right)) => compare_ignoring_sequence_id(&left, &right),
            (left, right) => {
                warn!(
                    left_valid = left.is_ok(),
                    right_valid = right.is_ok(),
                    "comparing unparsable flat keys bytewise"
                );
                data1.cmp(data2)
            }
        }
    }
}
