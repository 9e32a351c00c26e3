//! Property-based tests for the key index and table.
//!
//! Uses proptest to drive arbitrary insert/delete sequences and checks the
//! ordering, uniqueness, and consistency properties after every run.

use chrono::NaiveDate;
use proptest::prelude::*;
use std::collections::BTreeSet;

use recdb_storage::{BstIndex, Position, RecDbError, Record, Table, TraversalOrder};

#[derive(Debug, Clone)]
enum Op {
    Insert(String),
    Delete(String),
}

/// Short keys over a small alphabet so inserts and deletes collide often.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,3}"
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => key_strategy().prop_map(Op::Insert),
        1 => key_strategy().prop_map(Op::Delete),
    ]
}

fn record(key: &str) -> Record {
    Record::new(key, key.to_uppercase(), NaiveDate::from_ymd_opt(2000, 2, 29).unwrap())
}

proptest! {
    /// In-order keys strictly ascend after any insert/delete sequence.
    #[test]
    fn test_in_order_strictly_ascending(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut table = Table::new();
        for op in &ops {
            match op {
                Op::Insert(k) => { let _ = table.insert(record(k)); }
                Op::Delete(k) => { let _ = table.delete_by_key(k); }
            }
        }

        let in_order = table.traverse(TraversalOrder::InOrder);
        prop_assert!(in_order.windows(2).all(|w| w[0].key() < w[1].key()));
        prop_assert!(table.check_consistency().is_ok());
    }

    /// Table contents match a set model; errors fire exactly when expected.
    #[test]
    fn test_table_matches_set_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut table = Table::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    let result = table.insert(record(&k));
                    if model.insert(k) {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert!(matches!(result, Err(RecDbError::DuplicateKey(_))));
                    }
                }
                Op::Delete(k) => {
                    let result = table.delete_by_key(&k);
                    if model.remove(&k) {
                        prop_assert!(result.is_ok());
                        prop_assert!(table.lookup_by_key(&k).is_none());
                        prop_assert!(table.index().search(&k).is_none());
                    } else {
                        prop_assert!(matches!(result, Err(RecDbError::KeyNotFound(_))));
                    }
                }
            }
        }

        let sorted: Vec<&str> = table.materialize_sorted().into_iter().map(|r| r.key()).collect();
        let expected: Vec<&str> = model.iter().map(String::as_str).collect();
        prop_assert_eq!(sorted, expected);

        for key in &model {
            let expected = record(key);
            prop_assert_eq!(table.lookup_by_key(key), Some(&expected));
        }
    }

    /// All four traversals visit every node exactly once.
    #[test]
    fn test_traversal_sizes_conserved(keys in prop::collection::btree_set(key_strategy(), 0..60)) {
        let mut index = BstIndex::new();
        for (i, key) in keys.iter().enumerate() {
            index.insert(record(key), Position(i)).unwrap();
        }

        for order in TraversalOrder::ALL {
            let visited = index.traverse(order);
            prop_assert_eq!(visited.len(), index.len());
            let distinct: BTreeSet<&str> = visited.iter().map(|r| r.key()).collect();
            prop_assert_eq!(distinct.len(), index.len());
        }
    }

    /// A cloned index is unaffected by later mutation of the original.
    #[test]
    fn test_clone_isolated(
        keys in prop::collection::vec(key_strategy(), 1..60),
        removals in prop::collection::vec(key_strategy(), 0..30),
    ) {
        let index = BstIndex::from_entries(
            keys.iter().enumerate().map(|(i, k)| (record(k), Position(i))),
        );
        let before: Vec<String> = index.pre_order().iter().map(|r| r.key().to_string()).collect();

        let mut mutated = index.clone();
        for key in &removals {
            mutated.remove(key);
        }
        prop_assert!(mutated.check_invariants().is_ok());

        let after: Vec<String> = index.pre_order().iter().map(|r| r.key().to_string()).collect();
        prop_assert_eq!(before, after);
        prop_assert!(index.check_invariants().is_ok());
    }
}
