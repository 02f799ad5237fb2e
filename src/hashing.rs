//! Key hashing strategies.
//!
//! A table is parameterised by a `KeyHash` chosen at construction. The
//! strategy maps a key to a `u64`; the table reduces that modulo its slot
//! count. The only requirement is determinism: the same key must hash to
//! the same value for the lifetime of the table.

use core::hash::{BuildHasher, Hasher};

/// Maps a string key to an unsigned integer.
pub trait KeyHash {
    fn hash_key(&self, key: &str) -> u64;
}

/// Default strategy: the sum of the key's UTF-8 byte values.
///
/// Anagrams collide by construction (`"AC"` and `"CA"` both hash to 132),
/// which is fine: chaining handles collisions, it does not avoid them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CharSum;

impl KeyHash for CharSum {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        key.bytes()
            .fold(0u64, |acc, b| acc.wrapping_add(u64::from(b)))
    }
}

impl<F> KeyHash for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Runs keys through a std-style `BuildHasher` (e.g. `RandomState`).
///
/// Only the key bytes are written, so two adapters built from the same
/// `BuildHasher` state always agree.
#[derive(Clone, Debug, Default)]
pub struct BuildHasherAdapter<S> {
    hasher: S,
}

impl<S: BuildHasher> BuildHasherAdapter<S> {
    pub fn new(hasher: S) -> Self {
        Self { hasher }
    }
}

impl<S: BuildHasher> KeyHash for BuildHasherAdapter<S> {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        let mut h = self.hasher.build_hasher();
        h.write(key.as_bytes());
        h.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::RandomState;

    #[test]
    fn char_sum_matches_byte_sum() {
        assert_eq!(CharSum.hash_key("AC"), 132);
        assert_eq!(CharSum.hash_key("AAA"), 65 * 3);
        assert_eq!(CharSum.hash_key(""), 0);
    }

    #[test]
    fn char_sum_collides_on_anagrams() {
        assert_eq!(CharSum.hash_key("ACA"), CharSum.hash_key("CAA"));
        assert_eq!(CharSum.hash_key("AAC"), CharSum.hash_key("CAA"));
    }

    /// Multi-byte characters contribute each of their UTF-8 bytes.
    #[test]
    fn char_sum_counts_utf8_bytes() {
        // 'é' is 0xC3 0xA9
        assert_eq!(CharSum.hash_key("é"), 0xC3 + 0xA9);
    }

    #[test]
    fn closures_and_fn_pointers_are_strategies() {
        fn always_seven(_: &str) -> u64 {
            7
        }
        let len_hash = |k: &str| k.len() as u64;
        assert_eq!(len_hash.hash_key("abcd"), 4);
        assert_eq!(always_seven.hash_key("anything"), 7);
    }

    #[test]
    fn build_hasher_adapter_is_deterministic_per_state() {
        let a = BuildHasherAdapter::new(RandomState::new());
        let b = a.clone();
        assert_eq!(a.hash_key("key"), a.hash_key("key"));
        assert_eq!(a.hash_key("key"), b.hash_key("key"));
    }
}
