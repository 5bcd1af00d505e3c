//! Property tests for matching, ordering, prefix computation and flat keys.

use bytes::Bytes;
use proptest::prelude::*;
use redb_cells::encoding::{encode_flat_key, flat_key_length, write_flat_key, FlatKey};
use redb_cells::sentinel::{first_on_next_row, first_on_row, last_on_row};
use redb_cells::util::{
    clone_family, clone_qualifier, clone_row, compare, equals, equals_ignore_mvcc_version,
    find_common_prefix_in_flat_key, matching_column, matching_row_column, matching_rows,
    matching_value,
};
use redb_cells::{BufferedCell, Cell, CellType, KeyValue, LATEST_TIMESTAMP, OLDEST_TIMESTAMP};
use std::cmp::Ordering;

fn small_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..3, 0..=max_len)
}

fn arb_timestamp() -> impl Strategy<Value = i64> {
    prop_oneof![Just(LATEST_TIMESTAMP), Just(OLDEST_TIMESTAMP), -3i64..3]
}

fn arb_type() -> impl Strategy<Value = CellType> {
    prop::sample::select(vec![
        CellType::Put,
        CellType::Delete,
        CellType::DeleteFamilyVersion,
        CellType::DeleteColumn,
        CellType::DeleteFamily,
    ])
}

fn arb_cell_with_qualifier(
    qualifier: impl Strategy<Value = Vec<u8>>,
) -> impl Strategy<Value = KeyValue> {
    (
        small_bytes(3),
        small_bytes(2),
        qualifier,
        arb_timestamp(),
        arb_type(),
        small_bytes(3),
        0u64..3,
    )
        .prop_map(|(row, family, qualifier, ts, cell_type, value, seq_id)| {
            KeyValue::new(&row, &family, &qualifier, ts, cell_type, &value)
                .unwrap()
                .with_sequence_id(seq_id)
        })
}

fn arb_cell() -> impl Strategy<Value = KeyValue> {
    arb_cell_with_qualifier(small_bytes(2))
}

fn view(kv: &KeyValue) -> BufferedCell {
    BufferedCell::new(Bytes::copy_from_slice(kv.record()), 0, kv.record().len())
        .unwrap()
        .with_sequence_id(kv.sequence_id())
}

fn common_prefix(left: &[u8], right: &[u8]) -> usize {
    left.iter()
        .zip(right)
        .take_while(|(l, r)| l == r)
        .count()
}

proptest! {
    #[test]
    fn prop_matching_is_symmetric_across_backings(a in arb_cell(), b in arb_cell()) {
        let (va, vb) = (view(&a), view(&b));

        prop_assert_eq!(matching_rows(&a, &b), matching_rows(&b, &a));
        prop_assert_eq!(matching_rows(&a, &b), matching_rows(&va, &vb));
        prop_assert_eq!(matching_rows(&a, &b), matching_rows(&va, &b));
        prop_assert_eq!(matching_column(&a, &b), matching_column(&vb, &a));
        prop_assert_eq!(matching_row_column(&a, &b), matching_row_column(&b, &va));
        prop_assert_eq!(matching_value(&a, &b), matching_value(&vb, &va));
        prop_assert_eq!(equals(&a, &b), equals(&vb, &va));

        prop_assert_eq!(matching_rows(&a, &b), clone_row(&a) == clone_row(&b));
        prop_assert_eq!(
            matching_column(&a, &b),
            clone_family(&a) == clone_family(&b) && clone_qualifier(&a) == clone_qualifier(&b)
        );
    }

    #[test]
    fn prop_equals_implies_equals_ignore_mvcc_version(a in arb_cell(), b in arb_cell()) {
        if equals(&a, &b) {
            prop_assert!(equals_ignore_mvcc_version(&a, &b));
        }
    }

    #[test]
    fn prop_compare_is_antisymmetric(a in arb_cell(), b in arb_cell()) {
        prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        prop_assert_eq!(compare(&a, &b), compare(&view(&a), &view(&b)));
        if compare(&a, &b) == Ordering::Equal {
            prop_assert!(equals(&a, &b));
        }
    }

    #[test]
    fn prop_compare_is_transitive(a in arb_cell(), b in arb_cell(), c in arb_cell()) {
        if compare(&a, &b) != Ordering::Greater && compare(&b, &c) != Ordering::Greater {
            prop_assert_ne!(compare(&a, &c), Ordering::Greater);
        }
    }

    #[test]
    fn prop_prefix_of_self_is_whole_key(a in arb_cell()) {
        prop_assert_eq!(find_common_prefix_in_flat_key(&a, &a, false, true), flat_key_length(&a));
        prop_assert_eq!(find_common_prefix_in_flat_key(&a, &view(&a), false, true), flat_key_length(&a));
    }

    #[test]
    fn prop_prefix_matches_encoded_keys(
        a in arb_cell_with_qualifier(prop::collection::vec(0u8..3, 2)),
        b in arb_cell_with_qualifier(prop::collection::vec(0u8..3, 2)),
    ) {
        let expected = common_prefix(&encode_flat_key(&a), &encode_flat_key(&b));
        prop_assert_eq!(find_common_prefix_in_flat_key(&a, &b, false, true), expected);
    }

    #[test]
    fn prop_prefix_with_different_row_lengths(a in arb_cell(), b in arb_cell()) {
        prop_assume!(a.row_length() != b.row_length());
        let prefix = find_common_prefix_in_flat_key(&a, &b, false, true);
        prop_assert!(prefix <= 2);
        prop_assert_eq!(
            prefix,
            common_prefix(&a.row_length().to_be_bytes(), &b.row_length().to_be_bytes())
        );
    }

    #[test]
    fn prop_flat_key_roundtrip(a in arb_cell()) {
        let mut out = Vec::new();
        write_flat_key(&view(&a), &mut out).unwrap();
        let key = FlatKey::parse(&out).unwrap();

        prop_assert_eq!(clone_row(&key), clone_row(&a));
        prop_assert_eq!(clone_family(&key), clone_family(&a));
        prop_assert_eq!(clone_qualifier(&key), clone_qualifier(&a));
        prop_assert_eq!(key.timestamp(), a.timestamp());
        prop_assert_eq!(key.type_byte(), a.type_byte());
    }

    #[test]
    fn prop_sentinels_bound_their_row(a in arb_cell()) {
        prop_assert_eq!(compare(&first_on_row(&a), &a), Ordering::Less);
        prop_assert_eq!(compare(&a, &last_on_row(&a)), Ordering::Less);

        let next = first_on_next_row(&a).unwrap();
        prop_assert_eq!(compare(&last_on_row(&a), &next), Ordering::Less);
    }
}

#[test]
fn test_newer_version_of_same_column_sorts_first() {
    let newer = KeyValue::new(b"a", b"cf", b"q1", 100, CellType::Put, b"v1").unwrap();
    let older = KeyValue::new(b"a", b"cf", b"q1", 99, CellType::Put, b"v2").unwrap();

    assert!(matching_row_column(&newer, &older));
    assert!(!matching_value(&newer, &older));
    assert_eq!(compare(&newer, &older), Ordering::Less);
}
