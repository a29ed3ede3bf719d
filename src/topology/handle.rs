//! `Handle<T>`: a type-tagged, generation-checked reference to a mesh element
//!
//! Elements never reference each other by pointer. Every link (`next`,
//! `prev`, `adjacent`, owning vertex, owning face, ...) is a `Handle`: an
//! `(offset, generation)` pair that must be re-resolved against its arena on
//! every use.
//!
//! This module provides:
//! - The generic `Handle<T>` newtype and per-kind aliases
//!   ([`EdgeHandle`], [`VertexHandle`], [`FaceHandle`], [`PointHandle`]) so
//!   handles of different element kinds can never be mixed up.
//! - The sentinel convention: offset 0 never names a real record.
//! - The generation convention: generation 0 means "not checked"; handles
//!   built from a bare offset use it.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use super::element::{Edge, Element, Face, Point, Vertex};

/// Offset of a slot inside an arena.
pub type Offset = u32;
/// Per-slot reuse counter.
pub type Generation = u32;

/// Generation value that disables the generation check on lookup.
pub const IGNORED_GENERATION: Generation = 0;

/// A weak, copyable reference to an element of kind `T`.
///
/// # Memory layout
/// Two `u32`s; the kind tag is a zero-sized marker.
#[repr(C)]
pub struct Handle<T> {
    offset: Offset,
    generation: Generation,
    _kind: PhantomData<fn() -> T>,
}

pub type EdgeHandle = Handle<Edge>;
pub type VertexHandle = Handle<Vertex>;
pub type FaceHandle = Handle<Face>;
pub type PointHandle = Handle<Point>;

impl<T> Handle<T> {
    /// The sentinel handle. Never resolves.
    pub const INVALID: Self = Self {
        offset: 0,
        generation: IGNORED_GENERATION,
        _kind: PhantomData,
    };

    /// Handle to `offset` that skips the generation check on lookup.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use hedge_mesh::topology::handle::EdgeHandle;
    /// let e = EdgeHandle::new(3);
    /// assert_eq!(e.offset(), 3);
    /// assert_eq!(e.generation(), 0);
    /// ```
    #[inline]
    pub const fn new(offset: Offset) -> Self {
        Self::with_generation(offset, IGNORED_GENERATION)
    }

    /// Handle to `offset` that only resolves while the slot is at `generation`.
    #[inline]
    pub const fn with_generation(offset: Offset, generation: Generation) -> Self {
        Self {
            offset,
            generation,
            _kind: PhantomData,
        }
    }

    #[inline]
    pub const fn offset(self) -> Offset {
        self.offset
    }

    #[inline]
    pub const fn generation(self) -> Generation {
        self.generation
    }

    /// `true` unless this is the sentinel. Says nothing about whether the
    /// handle still resolves.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.offset != 0
    }

    /// Turn this handle back into the sentinel.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::INVALID;
    }

    /// Offset comparison where a zero generation on either side acts as a
    /// wildcard.
    ///
    /// `==` is always strict; use this only for caller-built probe handles.
    #[inline]
    pub fn matches(self, other: Self) -> bool {
        self.offset == other.offset
            && (self.generation == IGNORED_GENERATION
                || other.generation == IGNORED_GENERATION
                || self.generation == other.generation)
    }
}

// -----------------------------------------------------------------------------
// Value-type traits (implemented by hand so `T` needs no bounds)
// -----------------------------------------------------------------------------

impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> Default for Handle<T> {
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state);
        self.generation.hash(state);
    }
}

/// Ordered by offset first, so a min-heap of handles yields the lowest
/// free slot.
impl<T> Ord for Handle<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset
            .cmp(&other.offset)
            .then(self.generation.cmp(&other.generation))
    }
}

impl<T> PartialOrd for Handle<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// -----------------------------------------------------------------------------
// Formatting traits
// -----------------------------------------------------------------------------

/// Prints as `edge(3@1)`.
impl<T: Element> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}@{})", T::KIND, self.offset, self.generation)
    }
}

impl<T: Element> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sentinel() {
        let def = EdgeHandle::default();
        assert_eq!(def.offset(), 0);
        assert_eq!(def.generation(), 0);
        assert!(!def.is_valid());
        assert_eq!(def, EdgeHandle::INVALID);
    }

    #[test]
    fn copies_compare_equal() {
        let e1 = EdgeHandle::with_generation(1, 1);
        let e2 = e1;
        assert_eq!(e1, e2);
        assert_ne!(EdgeHandle::default(), e1);
    }

    #[test]
    fn ordering_follows_offset() {
        let e2 = EdgeHandle::with_generation(1, 1);
        let e3 = EdgeHandle::with_generation(20, 0);
        assert!(e3 > e2);
        assert!(e2 < e3);
    }

    #[test]
    fn equality_is_strict_but_matches_is_not() {
        let live = VertexHandle::with_generation(4, 7);
        let probe = VertexHandle::new(4);
        assert_ne!(live, probe);
        assert!(live.matches(probe));
        assert!(probe.matches(live));
        assert!(!live.matches(VertexHandle::with_generation(4, 8)));
        assert!(!live.matches(VertexHandle::new(5)));
    }

    #[test]
    fn reset_returns_to_sentinel() {
        let mut p = PointHandle::with_generation(9, 2);
        assert!(p.is_valid());
        p.reset();
        assert!(!p.is_valid());
        assert_eq!(p, PointHandle::INVALID);
    }

    #[test]
    fn debug_and_display() {
        let f = FaceHandle::with_generation(2, 5);
        assert_eq!(format!("{:?}", f), "face(2@5)");
        assert_eq!(format!("{}", EdgeHandle::new(7)), "edge(7@0)");
    }

    #[test]
    fn usable_as_set_key() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(EdgeHandle::with_generation(1, 1));
        set.insert(EdgeHandle::with_generation(1, 2));
        set.insert(EdgeHandle::with_generation(1, 1));
        assert_eq!(set.len(), 2);
    }
}
