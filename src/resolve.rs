//! Stock collision resolvers for `ChainHashMap::insert_with_resolver`.
//!
//! A resolver receives `(old, new)` when an insert targets a key that is
//! already present and returns the value to keep. Any `FnOnce(V, V) -> V`
//! works; these cover the two common policies.

/// New data wins. This is the policy `ChainHashMap::insert` applies.
#[inline]
pub fn replace<V>(_old: V, new: V) -> V {
    new
}

/// Existing data persists; the new value is dropped.
#[inline]
pub fn keep<V>(old: V, _new: V) -> V {
    old
}
