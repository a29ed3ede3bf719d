//! Whole-structure invariant checks.
//!
//! A type implementing [`DebugInvariants`] can report its first broken
//! invariant as a [`MeshError`], or assert on it. The assertion compiles to
//! nothing unless `debug_assertions`, `check-invariants` or
//! `strict-invariants` is on. Nothing in the crate asserts on its own.

use crate::mesh_error::MeshError;

/// Full invariant check over a mesh-like structure.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshError>;
}

/// Panic with `[invariants] <context>: <error>` if `$expr` is an `Err`.
/// Expands to nothing in release builds without an invariants feature.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
