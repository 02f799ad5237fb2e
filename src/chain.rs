//! Chain: index-linked collision chains stored in a shared entry arena.
//!
//! Every entry of a table lives in one `SlotMap` arena; a `Chain` only
//! records the id of its head entry and its length. Links are arena ids,
//! so unlinking never touches raw pointers and dropping the arena
//! releases every entry at once.
//!
//! All structural changes go through a search-then-splice pair:
//! `search` reports where a key sits (or where the chain ends), and
//! `append` / `update` / `unlink` consume that position. A position is only
//! valid for the chain and arena it was computed from, and only until the
//! next structural change.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena id of a chained entry.
    pub(crate) struct EntryId;
}

#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: String,
    pub(crate) value: V,
    pub(crate) next: Option<EntryId>,
}

pub(crate) type Arena<V> = SlotMap<EntryId, Entry<V>>;

/// Result of looking a key up in one chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Search {
    /// The key is stored at `at`; `prev` is its predecessor (`None` at the head).
    Found { prev: Option<EntryId>, at: EntryId },
    /// The key is absent; `tail` is the last entry (`None` if the chain is empty).
    Missing { tail: Option<EntryId> },
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Chain {
    head: Option<EntryId>,
    len: usize,
}

impl Chain {
    pub(crate) const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    #[inline]
    pub(crate) fn head(&self) -> Option<EntryId> {
        self.head
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Walks the chain from the head looking for `key`.
    pub(crate) fn search<V>(&self, arena: &Arena<V>, key: &str) -> Search {
        let mut prev = None;
        let mut cur = self.head;
        while let Some(id) = cur {
            let Some(entry) = arena.get(id) else {
                break;
            };
            if entry.key == key {
                return Search::Found { prev, at: id };
            }
            prev = Some(id);
            cur = entry.next;
        }
        Search::Missing { tail: prev }
    }

    pub(crate) fn find<V>(&self, arena: &Arena<V>, key: &str) -> Option<EntryId> {
        match self.search(arena, key) {
            Search::Found { at, .. } => Some(at),
            Search::Missing { .. } => None,
        }
    }

    /// Links a new entry after `tail`, taken from a `Missing` search.
    pub(crate) fn append<V>(
        &mut self,
        arena: &mut Arena<V>,
        tail: Option<EntryId>,
        key: String,
        value: V,
    ) -> EntryId {
        let id = arena.insert(Entry {
            key,
            value,
            next: None,
        });
        match tail.and_then(|t| arena.get_mut(t)) {
            Some(last) => last.next = Some(id),
            None => {
                debug_assert!(self.is_empty(), "append without tail on non-empty chain");
                self.head = Some(id);
            }
        }
        self.len += 1;
        id
    }

    /// Replaces the value stored at `at` with `f(old)`, keeping the entry's
    /// position in the chain. `prev`/`at` come from a `Found` search.
    ///
    /// The entry is unlinked while `f` runs, so if `f` panics the entry is
    /// dropped and the chain stays well formed without it.
    pub(crate) fn update<V, F>(
        &mut self,
        arena: &mut Arena<V>,
        prev: Option<EntryId>,
        at: EntryId,
        f: F,
    ) -> Option<EntryId>
    where
        F: FnOnce(V) -> V,
    {
        let Entry { key, value, next } = self.unlink(arena, prev, at)?;
        let value = f(value);
        let id = arena.insert(Entry { key, value, next });
        self.relink(arena, prev, Some(id));
        self.len += 1;
        Some(id)
    }

    /// Unlinks the entry at `at` and takes it out of the arena. `prev`/`at`
    /// come from a `Found` search.
    pub(crate) fn unlink<V>(
        &mut self,
        arena: &mut Arena<V>,
        prev: Option<EntryId>,
        at: EntryId,
    ) -> Option<Entry<V>> {
        let entry = arena.remove(at)?;
        self.relink(arena, prev, entry.next);
        self.len -= 1;
        Some(entry)
    }

    fn relink<V>(&mut self, arena: &mut Arena<V>, prev: Option<EntryId>, to: Option<EntryId>) {
        match prev {
            Some(p) => {
                if let Some(e) = arena.get_mut(p) {
                    e.next = to;
                }
            }
            None => self.head = to,
        }
    }

    pub(crate) fn walk<'a, V>(&self, arena: &'a Arena<V>) -> Walk<'a, V> {
        Walk {
            arena,
            cur: self.head,
        }
    }
}

/// Head-to-tail traversal of one chain.
pub(crate) struct Walk<'a, V> {
    arena: &'a Arena<V>,
    cur: Option<EntryId>,
}

impl<'a, V> Walk<'a, V> {
    pub(crate) fn empty(arena: &'a Arena<V>) -> Self {
        Self { arena, cur: None }
    }
}

impl<'a, V> Iterator for Walk<'a, V> {
    type Item = &'a Entry<V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.arena.get(self.cur?)?;
        self.cur = entry.next;
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(keys: &[&str]) -> (Chain, Arena<usize>) {
        let mut arena = Arena::with_key();
        let mut chain = Chain::new();
        for (i, k) in keys.iter().enumerate() {
            match chain.search(&arena, k) {
                Search::Missing { tail } => {
                    chain.append(&mut arena, tail, (*k).to_string(), i);
                }
                Search::Found { .. } => panic!("duplicate key in fixture: {k}"),
            }
        }
        (chain, arena)
    }

    fn keys(chain: &Chain, arena: &Arena<usize>) -> Vec<String> {
        chain.walk(arena).map(|e| e.key.clone()).collect()
    }

    fn remove(chain: &mut Chain, arena: &mut Arena<usize>, key: &str) -> Option<usize> {
        match chain.search(arena, key) {
            Search::Found { prev, at } => chain.unlink(arena, prev, at).map(|e| e.value),
            Search::Missing { .. } => None,
        }
    }

    #[test]
    fn search_empty_chain_reports_no_tail() {
        let arena: Arena<usize> = Arena::with_key();
        let chain = Chain::new();
        assert_eq!(chain.search(&arena, "a"), Search::Missing { tail: None });
        assert!(chain.is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let (chain, arena) = build(&["a", "b", "c"]);
        assert_eq!(keys(&chain, &arena), ["a", "b", "c"]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn search_reports_predecessor() {
        let (chain, arena) = build(&["a", "b", "c"]);
        let a = chain.find(&arena, "a").unwrap();
        let b = chain.find(&arena, "b").unwrap();
        assert_eq!(
            chain.search(&arena, "a"),
            Search::Found { prev: None, at: a }
        );
        match chain.search(&arena, "c") {
            Search::Found { prev, .. } => assert_eq!(prev, Some(b)),
            other => panic!("unexpected search result: {other:?}"),
        }
        let c = chain.find(&arena, "c").unwrap();
        assert_eq!(
            chain.search(&arena, "zz"),
            Search::Missing { tail: Some(c) }
        );
    }

    #[test]
    fn unlink_sole_entry_empties_chain() {
        let (mut chain, mut arena) = build(&["only"]);
        assert_eq!(remove(&mut chain, &mut arena, "only"), Some(0));
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(arena.is_empty());
    }

    /// Removing the head of a longer chain promotes its successor.
    #[test]
    fn unlink_head_promotes_next() {
        let (mut chain, mut arena) = build(&["a", "b", "c"]);
        assert_eq!(remove(&mut chain, &mut arena, "a"), Some(0));
        assert_eq!(keys(&chain, &arena), ["b", "c"]);
    }

    /// Only the matching entry is released, never its neighbours.
    #[test]
    fn unlink_middle_and_tail_free_only_the_match() {
        let (mut chain, mut arena) = build(&["a", "b", "c", "d"]);
        assert_eq!(remove(&mut chain, &mut arena, "b"), Some(1));
        assert_eq!(keys(&chain, &arena), ["a", "c", "d"]);
        assert_eq!(remove(&mut chain, &mut arena, "d"), Some(3));
        assert_eq!(keys(&chain, &arena), ["a", "c"]);
        assert_eq!(arena.len(), 2);
        assert_eq!(chain.len(), 2);

        // Appending after a tail removal links from the new tail.
        match chain.search(&arena, "e") {
            Search::Missing { tail } => {
                chain.append(&mut arena, tail, "e".to_string(), 4);
            }
            other => panic!("unexpected search result: {other:?}"),
        }
        assert_eq!(keys(&chain, &arena), ["a", "c", "e"]);
    }

    #[test]
    fn update_keeps_position_and_key() {
        let (mut chain, mut arena) = build(&["a", "b", "c"]);
        let Search::Found { prev, at } = chain.search(&arena, "b") else {
            panic!("b must be present");
        };
        chain.update(&mut arena, prev, at, |v| v + 100).unwrap();
        assert_eq!(keys(&chain, &arena), ["a", "b", "c"]);
        let values: Vec<usize> = chain.walk(&arena).map(|e| e.value).collect();
        assert_eq!(values, [0, 101, 2]);
        assert_eq!(chain.len(), 3);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn update_head_relinks_head() {
        let (mut chain, mut arena) = build(&["a", "b"]);
        let Search::Found { prev, at } = chain.search(&arena, "a") else {
            panic!("a must be present");
        };
        chain.update(&mut arena, prev, at, |_| 7).unwrap();
        assert_eq!(keys(&chain, &arena), ["a", "b"]);
        assert_eq!(chain.walk(&arena).next().map(|e| e.value), Some(7));
    }

    #[test]
    fn panicking_update_drops_entry_and_keeps_chain_well_formed() {
        let (mut chain, mut arena) = build(&["a", "b", "c"]);
        let Search::Found { prev, at } = chain.search(&arena, "b") else {
            panic!("b must be present");
        };
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            chain.update(&mut arena, prev, at, |_| panic!("resolver failed"));
        }));
        assert!(res.is_err());
        assert_eq!(keys(&chain, &arena), ["a", "c"]);
        assert_eq!(chain.len(), 2);
        assert_eq!(arena.len(), 2);
    }
}
