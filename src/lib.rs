//! chain-hashmap: a fixed-size, single-threaded hash table with owned
//! string keys and separate chaining.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: the smallest useful associative container whose collision
//!   handling is explicit and independently testable.
//! - Layers:
//!   - `chain`: index-linked chains over one `SlotMap` arena of entries,
//!     with a search-then-splice API (`search`, then `append`, `update`
//!     or `unlink`).
//!   - `ChainHashMap<V, H>`: a fixed array of chains, a `KeyHash`
//!     strategy to pick the slot, and the public insert/get/remove/iterate
//!     surface.
//!
//! Constraints
//! - The slot count is fixed at construction; there is no resizing or
//!   load-factor management.
//! - Keys are unique across the table: a key maps to exactly one slot and
//!   appears at most once in that slot's chain.
//! - New keys are appended at the tail of their chain, so iteration is
//!   slot order, then insertion order within a slot.
//! - Single-threaded. Nothing here is synchronised; wrap the table in a
//!   lock to share it.
//!
//! Ownership
//! - The table owns every entry and the `String` copy of its key. Values
//!   are whatever `V` the caller picks (a borrowed `&T`, an `Rc<T>`, an
//!   id...). The table never looks inside them.
//! - Dropping the table drops the arena, and with it every entry.
//! - User code (resolvers, `remove_with` destroy hooks, iteration
//!   callbacks) only ever runs while the chains are well formed.
//!
//! Errors
//! - Contract violations (zero slots, empty key) are reported as
//!   `TableError`; the table is unchanged when one is returned.
//! - Absent keys are not errors: `get` returns `None`, `remove` is a no-op.
//! - Failing to allocate the slot array aborts the process after logging.
//!
//! Logging goes through the `log` facade; the crate never installs a
//! logger.

mod chain;
pub mod error;
pub mod hashing;
pub mod resolve;
mod table;
mod table_proptest;

// Public surface
pub use error::TableError;
pub use hashing::{BuildHasherAdapter, CharSum, KeyHash};
pub use table::{ChainHashMap, ChainHashMapBuilder, Iter, SlotKeys, DEFAULT_SLOT_COUNT};
