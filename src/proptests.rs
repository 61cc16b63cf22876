use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::{Arena, CellId};

/// Key wrapper whose strategy mixes a tiny range (to force duplicate
/// groups and deep shared prefixes) with arbitrary 64-bit values.
#[derive(Debug, Clone, Copy)]
struct Key(i64);

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            (-4i64..=4).prop_map(Key),
            (-1000i64..=1000).prop_map(Key),
            any::<i64>().prop_map(Key),
        ]
        .boxed()
    }
}

#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Insert(Key),
    Remove(Key),
    Lookup(Key),
    LookupGe(Key),
    LookupLe(Key),
}

/// Reference multimap: per key, live cell ids in insertion order.
#[derive(Default)]
struct Model {
    map: BTreeMap<i64, Vec<CellId>>,
    len: usize,
}

/// Harness executing actions against the tree and the model in lockstep.
struct Test {
    arena: Arena<i64>,
    root: crate::Root,
    model: Model,
}

impl Test {
    fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_root();
        Test {
            arena,
            root,
            model: Model::default(),
        }
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Insert(Key(k)) => {
                let id = self.arena.alloc(k, ());
                let got = self.arena.insert(self.root, id);
                assert_eq!(got, id, "non-unique insert must link the new cell");
                self.model.map.entry(k).or_default().push(id);
                self.model.len += 1;
            }
            Action::Remove(Key(k)) => {
                let expect = self.model.map.get_mut(&k).map(|ids| ids.remove(0));
                if self.model.map.get(&k).is_some_and(|ids| ids.is_empty()) {
                    self.model.map.remove(&k);
                }
                let found = self.arena.lookup(self.root, k);
                assert_eq!(found, expect, "remove target mismatch for key {k}");
                if let Some(id) = expect {
                    self.arena.remove(id);
                    assert!(!self.arena.is_linked(id));
                    self.arena.free(id);
                    self.model.len -= 1;
                }
            }
            Action::Lookup(Key(k)) => {
                let expect = self.model.map.get(&k).map(|ids| ids[0]);
                assert_eq!(self.arena.lookup(self.root, k), expect);
            }
            Action::LookupGe(Key(k)) => {
                let expect = self.model.map.range(k..).next().map(|(_, ids)| ids[0]);
                assert_eq!(self.arena.lookup_ge(self.root, k), expect);
            }
            Action::LookupLe(Key(k)) => {
                let expect = self
                    .model
                    .map
                    .range(..=k)
                    .next_back()
                    .map(|(_, ids)| *ids.last().unwrap());
                assert_eq!(self.arena.lookup_le(self.root, k), expect);
            }
        }

        // Full structural validation plus an ordered sweep after every
        // action: the trees under test stay small, so this is cheap.
        let count = self.arena.check_tree(self.root).unwrap();
        assert_eq!(count, self.model.len);

        let got: Vec<(i64, CellId)> = self
            .arena
            .iter(self.root)
            .map(|id| (self.arena.key(id), id))
            .collect();
        let want: Vec<(i64, CellId)> = self
            .model
            .map
            .iter()
            .flat_map(|(k, ids)| ids.iter().map(move |id| (*k, *id)))
            .collect();
        assert_eq!(got, want, "in-order traversal diverged from the model");
    }
}

/// Harness for a unique-keys tree: the model maps each key to the one
/// incumbent cell.
struct UniqueTest {
    arena: Arena<i64>,
    root: crate::Root,
    model: BTreeMap<i64, CellId>,
}

impl UniqueTest {
    fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_unique_root();
        UniqueTest {
            arena,
            root,
            model: BTreeMap::new(),
        }
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Insert(Key(k)) => {
                let id = self.arena.alloc(k, ());
                let got = self.arena.insert(self.root, id);
                match self.model.get(&k) {
                    Some(&incumbent) => {
                        assert_eq!(got, incumbent, "collision must return the incumbent");
                        assert_ne!(got, id);
                        assert!(!self.arena.is_linked(id));
                        self.arena.free(id);
                    }
                    None => {
                        assert_eq!(got, id);
                        self.model.insert(k, id);
                    }
                }
            }
            Action::Remove(Key(k)) => {
                let expect = self.model.remove(&k);
                assert_eq!(self.arena.lookup(self.root, k), expect);
                if let Some(id) = expect {
                    self.arena.remove(id);
                    self.arena.free(id);
                }
            }
            Action::Lookup(Key(k)) => {
                assert_eq!(self.arena.lookup(self.root, k), self.model.get(&k).copied());
            }
            Action::LookupGe(Key(k)) => {
                let expect = self.model.range(k..).next().map(|(_, id)| *id);
                assert_eq!(self.arena.lookup_ge(self.root, k), expect);
            }
            Action::LookupLe(Key(k)) => {
                let expect = self.model.range(..=k).next_back().map(|(_, id)| *id);
                assert_eq!(self.arena.lookup_le(self.root, k), expect);
            }
        }

        let count = self.arena.check_tree(self.root).unwrap();
        assert_eq!(count, self.model.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn proptest_vs_multimap_model(actions in prop::collection::vec(any::<Action>(), 1..64)) {
        let mut test = Test::new();
        for action in actions {
            test.execute(action);
        }
    }

    #[test]
    fn proptest_unique_vs_map_model(actions in prop::collection::vec(any::<Action>(), 1..64)) {
        let mut test = UniqueTest::new();
        for action in actions {
            test.execute(action);
        }
    }
}
