//! Property tests for TableStore invariants under random operation mixes.

use hashbrown::HashMap;
use proptest::prelude::*;
use tabula_core::schema::Column;
use tabula_core::{DataType, Value};
use tabula_storage::TableStore;

#[derive(Debug, Clone)]
enum Op {
    Insert(Option<i64>, String),
    Delete(usize),
    Save(usize, Option<i64>, String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (proptest::option::of(0..40i64), "[a-z]{1,6}")
            .prop_map(|(k, s)| Op::Insert(k, s)),
        (0usize..60).prop_map(Op::Delete),
        (0usize..60, proptest::option::of(0..40i64), "[a-z]{1,6}")
            .prop_map(|(p, k, s)| Op::Save(p, k, s)),
    ]
}

fn keyed_store() -> TableStore {
    let columns = vec![
        Column::new("id", DataType::Auto).unwrap(),
        Column::new("name", DataType::String).unwrap(),
    ];
    TableStore::new("t".into(), columns, Some(0), HashMap::new()).unwrap()
}

fn key_of(v: &Option<i64>) -> Value {
    match v {
        Some(n) => Value::Number(*n as f64),
        None => Value::Null,
    }
}

proptest! {
    /// No two live rows ever share a primary-key value, no matter what
    /// sequence of inserts, deletes and saves ran before.
    #[test]
    fn live_primary_keys_stay_unique(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let mut store = keyed_store();
        for op in ops {
            match op {
                Op::Insert(k, s) => {
                    let _ = store.add_row(vec![key_of(&k), Value::String(s)]);
                }
                Op::Delete(p) => {
                    store.delete_row(p);
                }
                Op::Save(p, k, s) => {
                    let _ = store.save_row(p, vec![key_of(&k), Value::String(s)]);
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for (_, row) in store.live_rows() {
            prop_assert!(seen.insert(row[0].clone()), "duplicate live key {:?}", row[0]);
        }
    }

    /// The primary index agrees with a full scan after any operation mix.
    #[test]
    fn index_matches_scan(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let mut store = keyed_store();
        for op in ops {
            match op {
                Op::Insert(k, s) => {
                    let _ = store.add_row(vec![key_of(&k), Value::String(s)]);
                }
                Op::Delete(p) => {
                    store.delete_row(p);
                }
                Op::Save(p, k, s) => {
                    let _ = store.save_row(p, vec![key_of(&k), Value::String(s)]);
                }
            }
        }

        for (position, row) in store.live_rows() {
            prop_assert_eq!(store.find_pk(&row[0]), Some(position));
        }
    }

    /// A deleted position stays dead; inserts only ever append.
    #[test]
    fn tombstones_are_permanent(keys in proptest::collection::vec(0..100i64, 1..30)) {
        let mut store = keyed_store();
        let mut dead = Vec::new();

        for (i, k) in keys.iter().enumerate() {
            let inserted = store.add_row(vec![Value::Number(*k as f64), format!("r{i}").into()]);
            if let Ok((position, _)) = inserted {
                if i % 3 == 0 {
                    store.delete_row(position);
                    dead.push(position);
                }
            }
        }

        for position in &dead {
            prop_assert!(store.row(*position).is_none());
        }

        // New inserts land past every existing slot.
        let watermark = store.slot_count();
        if let Ok((position, _)) = store.add_row(vec![Value::Number(1000.0), "tail".into()]) {
            prop_assert_eq!(position, watermark);
        }
    }

    /// Generated auto keys never collide with manually supplied keys.
    #[test]
    fn auto_keys_skip_manual_values(manual in proptest::collection::vec(0..50i64, 1..20)) {
        let mut store = keyed_store();
        for k in &manual {
            let _ = store.add_row(vec![Value::Number(*k as f64), "m".into()]);
        }
        for _ in 0..20 {
            store.add_row(vec![Value::Null, "g".into()]).unwrap();
        }
    }
}
