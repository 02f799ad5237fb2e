#![cfg(test)]

// Property tests for ChainHashMap kept inside the crate so they can
// inspect chain lengths against a model.

use crate::resolve;
use crate::table::ChainHashMap;
use crate::KeyHash;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Operations address keys by pool index so failing cases shrink towards
// short pools and early keys. Pool keys use a small alphabet to force
// character-sum collisions.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    InsertKeep(usize, i32),
    InsertSum(usize, i32),
    Remove(usize),
    RemoveWith(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[A-D]{1,4}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::InsertKeep(i, v)),
            (idx.clone(), -1000i32..1000).prop_map(|(i, v)| OpI::InsertSum(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::RemoveWith),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[A-D]{0,4}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_scenario<H: KeyHash>(
    mut sut: ChainHashMap<i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k, v).expect("pool keys are non-empty");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            OpI::InsertKeep(i, v) => {
                let k = &pool[i];
                sut.insert_with_resolver(k, v, resolve::keep)
                    .expect("pool keys are non-empty");
                model.entry(k.clone()).or_insert(v);
            }
            OpI::InsertSum(i, v) => {
                let k = &pool[i];
                sut.insert_with_resolver(k, v, |old, new| old.wrapping_add(new))
                    .expect("pool keys are non-empty");
                let mv = model.entry(k.clone()).or_insert(0);
                *mv = mv.wrapping_add(v);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(sut.get(k).is_none());
            }
            OpI::RemoveWith(i) => {
                let k = &pool[i];
                let mut destroyed = Vec::new();
                let hit = sut.remove_with(k, |v| destroyed.push(v));
                let expected = model.remove(k);
                prop_assert_eq!(hit, expected.is_some());
                prop_assert_eq!(destroyed, expected.into_iter().collect::<Vec<_>>());
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.saturating_add(d);
                }
                if let Some(mv) = model.get_mut(k) {
                    *mv = mv.saturating_add(d);
                }
            }
            OpI::Iterate => {
                let mut visits = 0usize;
                let mut s_keys = BTreeSet::new();
                sut.iterate(|k, v| {
                    visits += 1;
                    s_keys.insert((k.to_string(), *v));
                });
                let m_keys: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(visits, model.len(), "each key visited exactly once");
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        // Post-conditions after each op
        // 1) Size parity
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // 2) Chain lengths add up and every chained key belongs to its slot
        let mut chained = 0;
        for slot in 0..sut.slot_count() {
            let keys: Vec<&str> = sut.slot_keys(slot).collect();
            prop_assert_eq!(Some(keys.len()), sut.chain_len(slot));
            for k in keys {
                prop_assert_eq!(sut.slot_of(k), slot);
            }
            chained += sut.chain_len(slot).unwrap_or(0);
        }
        prop_assert_eq!(chained, model.len());
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `insert` replaces and returns the displaced value; resolvers see (old, new).
// - `remove`/`remove_with` match the model and leave other keys untouched.
// - `iterate` visits each live key exactly once.
// - Chain lengths sum to `len`; every key sits in the slot it hashes to.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), slots in 1usize..=5) {
        let sut: ChainHashMap<i32> = ChainHashMap::new(slots).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}

// Property: Same state-machine invariants as above with a constant hash,
// which forces every key into one chain and stresses head/middle/tail
// splicing.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_single_chain((pool, ops) in arb_scenario(), slots in 1usize..=5) {
        let sut = ChainHashMap::with_hasher(slots, |_: &str| 0u64).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}
