use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Small alphabets force long shared prefixes and every split/merge shape.
fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(prop::sample::select(b"ab/".to_vec()), 0..=8),
        prop::collection::vec(prop::sample::select(b"acq\x00\xff".to_vec()), 0..=6),
        prop::collection::vec(any::<u8>(), 0..=24),
    ]
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "key_strategy()")] Vec<u8>, u64),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 2)]
    Get(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 1)]
    RemoveBranch(#[proptest(strategy = "key_strategy()")] Vec<u8>),
}

fn assert_same(t: &Tree<u64>, m: &BTreeMap<Vec<u8>, u64>) {
    let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
    let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(got, expected, "\n{}", t.dump());
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut t: Tree<u64> = Tree::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(t.insert(&key, value), m.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                }
                Op::RemoveBranch(prefix) => {
                    let doomed: Vec<Vec<u8>> = m.keys().filter(|k| k.starts_with(&prefix)).cloned().collect();
                    prop_assert_eq!(t.remove_branch(&prefix), !doomed.is_empty());
                    for key in doomed {
                        m.remove(&key);
                    }
                }
            }
            prop_assert_eq!(t.len(), m.len());
            prop_assert_eq!(t.validate(), Ok(()));
        }

        assert_same(&t, &m);
    }

    #[test]
    fn prop_closeup_matches_prefix_filter(
        keys in prop::collection::vec(key_strategy(), 0..=64),
        prefix in key_strategy(),
    ) {
        let t: Tree<usize> = keys.iter().enumerate().map(|(i, k)| (k, i)).collect();
        let expected: Vec<Vec<u8>> = t.keys().filter(|k| k.starts_with(&prefix)).collect();

        match t.closeup(&prefix) {
            Some(view) => {
                let got: Vec<Vec<u8>> = view.iter().map(|(k, _)| k).collect();
                prop_assert_eq!(&got, &expected);
                prop_assert!(!got.is_empty());
                prop_assert!(view.prefix().starts_with(&prefix));
                for key in &got {
                    prop_assert_eq!(view.get(key), t.get(key));
                }
            }
            None => prop_assert!(expected.is_empty()),
        }
    }

    #[test]
    fn prop_clone_preserves_structure(keys in prop::collection::vec(key_strategy(), 0..=64)) {
        let t: Tree<usize> = keys.iter().enumerate().map(|(i, k)| (k, i)).collect();
        let copy = t.clone();
        prop_assert_eq!(copy.dump(), t.dump());
        prop_assert_eq!(copy.validate(), Ok(()));
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

fn small_set() -> Vec<Vec<u8>> {
    ["", "a", "c", "q", "aa", "ab", "ba"]
        .iter()
        .map(|k| k.as_bytes().to_vec())
        .collect()
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = small_set();

    for_each_permutation(&keys, |perm| {
        let mut t: Tree<u64> = Tree::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for k in perm {
            let v = k.len() as u64;
            assert_eq!(t.insert(&k, v), m.insert(k, v));
        }

        assert_eq!(t.validate(), Ok(()), "\n{}", t.dump());
        assert_same(&t, &m);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = small_set();

    let mut base_tree: Tree<u64> = Tree::new();
    let mut base_map: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        let v = i as u64;
        assert_eq!(base_tree.insert(k, v), base_map.insert(k.clone(), v));
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base_tree.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.remove(&k), m.remove(k.as_slice()));
            assert_eq!(t.len(), m.len());
            assert_eq!(t.validate(), Ok(()), "\n{}", t.dump());
            assert_same(&t, &m);
        }
        assert!(t.is_empty());
        assert!(t.root().is_none());
    });
}

#[test]
fn randomized_insert_remove_get() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(2);
    let mut t: Tree<u64> = Tree::new();
    let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    let alphabet = b"/abcdefghijklmnopqrstuvwxyz0123456789";

    for _ in 0..50_000 {
        let op = rng.gen_range(0..100);
        let len = rng.gen_range(0..16);
        let key: Vec<u8> = (0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect();

        match op {
            0..=49 => {
                let v: u64 = rng.gen();
                assert_eq!(t.insert(&key, v), m.insert(key, v));
            }
            50..=74 => {
                assert_eq!(t.remove(&key), m.remove(&key));
            }
            _ => {
                assert_eq!(t.get(&key), m.get(&key));
            }
        }
    }

    assert_eq!(t.len(), m.len());
    assert_eq!(t.validate(), Ok(()));
    assert_same(&t, &m);
}
