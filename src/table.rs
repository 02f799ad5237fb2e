//! ChainHashMap: fixed slot array over an entry arena, one chain per slot.

use crate::chain::{Arena, Chain, Search, Walk};
use crate::error::TableError;
use crate::hashing::{CharSum, KeyHash};
use core::fmt;
use log::{debug, error, trace};
use slotmap::SlotMap;

/// Slot count used by `ChainHashMapBuilder` when none is given.
pub const DEFAULT_SLOT_COUNT: usize = 16;

/// A hash table with owned string keys and a fixed number of slots.
///
/// Keys hashing to the same slot are kept in a singly linked chain in
/// insertion order. The slot count and hash strategy never change after
/// construction; there is no resizing.
pub struct ChainHashMap<V, H = CharSum> {
    hasher: H,
    chains: Box<[Chain]>,
    entries: Arena<V>,
}

impl<V> ChainHashMap<V> {
    /// Creates a table with `slot_count` empty slots and the `CharSum` hash.
    pub fn new(slot_count: usize) -> Result<Self, TableError> {
        Self::with_hasher(slot_count, CharSum)
    }
}

impl<V, H> ChainHashMap<V, H>
where
    H: KeyHash,
{
    pub fn with_hasher(slot_count: usize, hasher: H) -> Result<Self, TableError> {
        if slot_count == 0 {
            return Err(TableError::ZeroSlots);
        }
        let chains = allocate_slots(slot_count);
        debug!("created table with {} slots", slot_count);
        Ok(Self {
            hasher,
            chains,
            entries: SlotMap::with_key(),
        })
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn slot_count(&self) -> usize {
        self.chains.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot index `key` maps to: its hash modulo the slot count.
    #[inline]
    pub fn slot_of(&self, key: &str) -> usize {
        (self.hasher.hash_key(key) % self.chains.len() as u64) as usize
    }

    /// Inserts `data` under `key`, replacing any existing value.
    ///
    /// Returns the displaced value, if the key was already present.
    pub fn insert(&mut self, key: &str, data: V) -> Result<Option<V>, TableError> {
        if key.is_empty() {
            return Err(TableError::EmptyKey);
        }
        let slot = self.slot_of(key);
        let chain = &mut self.chains[slot];
        match chain.search(&self.entries, key) {
            Search::Found { at, .. } => {
                trace!("insert {:?}: replacing value in slot {}", key, slot);
                Ok(self
                    .entries
                    .get_mut(at)
                    .map(|e| core::mem::replace(&mut e.value, data)))
            }
            Search::Missing { tail } => {
                trace!("insert {:?}: new entry in slot {}", key, slot);
                chain.append(&mut self.entries, tail, key.to_owned(), data);
                Ok(None)
            }
        }
    }

    /// Inserts `data` under `key`. If the key is already present, the
    /// stored value becomes `resolve(old, data)`; otherwise `resolve` is
    /// not called and a new entry owning a copy of `key` is appended to the
    /// slot's chain.
    ///
    /// An empty key is rejected with `TableError::EmptyKey` and the table
    /// is left untouched.
    pub fn insert_with_resolver<F>(
        &mut self,
        key: &str,
        data: V,
        resolve: F,
    ) -> Result<(), TableError>
    where
        F: FnOnce(V, V) -> V,
    {
        if key.is_empty() {
            return Err(TableError::EmptyKey);
        }
        let slot = self.slot_of(key);
        let chain = &mut self.chains[slot];
        match chain.search(&self.entries, key) {
            Search::Found { prev, at } => {
                trace!("insert {:?}: resolving collision in slot {}", key, slot);
                chain.update(&mut self.entries, prev, at, |old| resolve(old, data));
            }
            Search::Missing { tail } => {
                trace!("insert {:?}: new entry in slot {}", key, slot);
                chain.append(&mut self.entries, tail, key.to_owned(), data);
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let id = self.chains[self.slot_of(key)].find(&self.entries, key)?;
        self.entries.get(id).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let id = self.chains[self.slot_of(key)].find(&self.entries, key)?;
        self.entries.get_mut(id).map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.chains[self.slot_of(key)]
            .find(&self.entries, key)
            .is_some()
    }

    /// Removes `key` and hands its value back. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let slot = self.slot_of(key);
        let chain = &mut self.chains[slot];
        match chain.search(&self.entries, key) {
            Search::Found { prev, at } => {
                trace!("remove {:?}: unlinked from slot {}", key, slot);
                chain.unlink(&mut self.entries, prev, at).map(|e| e.value)
            }
            Search::Missing { .. } => {
                trace!("remove {:?}: not present", key);
                None
            }
        }
    }

    /// Removes `key` and passes its value to `destroy`. Returns whether the
    /// key was present; `destroy` only runs if it was.
    ///
    /// The entry is already unlinked when `destroy` runs.
    pub fn remove_with<F>(&mut self, key: &str, destroy: F) -> bool
    where
        F: FnOnce(V),
    {
        match self.remove(key) {
            Some(v) => {
                destroy(v);
                true
            }
            None => false,
        }
    }

    /// Drops every entry. The slot count is kept.
    pub fn clear(&mut self) {
        debug!("clearing {} entries", self.entries.len());
        self.entries.clear();
        self.chains.fill(Chain::new());
    }

    /// Calls `f` on every entry: slots in ascending order, each chain from
    /// head to tail.
    pub fn iterate<F>(&self, mut f: F)
    where
        F: FnMut(&str, &V),
    {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    /// Like `iterate`, with mutable access to the values.
    pub fn iterate_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut V),
    {
        for chain in self.chains.iter() {
            let mut cur = chain.head();
            while let Some(id) = cur {
                let Some(e) = self.entries.get_mut(id) else {
                    break;
                };
                f(e.key.as_str(), &mut e.value);
                cur = e.next;
            }
        }
    }

    /// Entries in slot order, then chain order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            entries: &self.entries,
            chains: self.chains.iter(),
            walk: Walk::empty(&self.entries),
            remaining: self.entries.len(),
        }
    }

    /// Mutable access to every entry, in unspecified order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries
            .values_mut()
            .map(|e| (e.key.as_str(), &mut e.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Number of entries chained in `slot`, or `None` past the last slot.
    pub fn chain_len(&self, slot: usize) -> Option<usize> {
        self.chains.get(slot).map(Chain::len)
    }

    /// Keys chained in `slot`, head first. Empty past the last slot.
    pub fn slot_keys(&self, slot: usize) -> SlotKeys<'_, V> {
        let walk = match self.chains.get(slot) {
            Some(chain) => chain.walk(&self.entries),
            None => Walk::empty(&self.entries),
        };
        SlotKeys { walk }
    }
}

/// Allocation of the slot array is fail-fast: a table that cannot hold its
/// slots cannot exist.
fn allocate_slots(slot_count: usize) -> Box<[Chain]> {
    let mut chains = Vec::new();
    if let Err(e) = chains.try_reserve_exact(slot_count) {
        error!("allocating {} slots failed: {}", slot_count, e);
        std::process::abort();
    }
    chains.resize(slot_count, Chain::new());
    chains.into_boxed_slice()
}

impl<V: fmt::Debug, H: KeyHash> fmt::Debug for ChainHashMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V, H: KeyHash> IntoIterator for &'a ChainHashMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(key, value)` pairs of a `ChainHashMap`.
pub struct Iter<'a, V> {
    entries: &'a Arena<V>,
    chains: core::slice::Iter<'a, Chain>,
    walk: Walk<'a, V>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.walk.next() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((e.key.as_str(), &e.value));
            }
            self.walk = self.chains.next()?.walk(self.entries);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Keys of a single slot's chain, head first.
pub struct SlotKeys<'a, V> {
    walk: Walk<'a, V>,
}

impl<'a, V> Iterator for SlotKeys<'a, V> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next().map(|e| e.key.as_str())
    }
}

/// Construction-time configuration for a `ChainHashMap`.
#[derive(Clone, Debug)]
pub struct ChainHashMapBuilder<H> {
    slots: usize,
    hasher: H,
}

impl ChainHashMapBuilder<CharSum> {
    pub fn new() -> Self {
        Self {
            slots: DEFAULT_SLOT_COUNT,
            hasher: CharSum,
        }
    }
}

impl Default for ChainHashMapBuilder<CharSum> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: KeyHash> ChainHashMapBuilder<H> {
    pub fn slots(mut self, slot_count: usize) -> Self {
        self.slots = slot_count;
        self
    }

    pub fn hasher<H2: KeyHash>(self, hasher: H2) -> ChainHashMapBuilder<H2> {
        ChainHashMapBuilder {
            slots: self.slots,
            hasher,
        }
    }

    pub fn build<V>(self) -> Result<ChainHashMap<V, H>, TableError> {
        ChainHashMap::with_hasher(self.slots, self.hasher)
    }
}
