//! Errors reported for contract violations at the table boundary.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// A table needs at least one slot to index into.
    #[error("slot count must be greater than zero")]
    ZeroSlots,
    /// Keys are non-empty strings; the table is left unchanged.
    #[error("key must not be empty")]
    EmptyKey,
}
