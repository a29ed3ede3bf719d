//! MeshError: Unified error type for hedge-mesh public APIs
//!
//! Most topology operations in this crate are total: they report failure by
//! returning an invalid handle and emitting a diagnostic through the `log`
//! facade. The fallible building blocks underneath them (`Arena::try_get`,
//! `Arena::try_emplace`, invariant validation) return this error type so the
//! cause stays inspectable.

use std::fmt;
use thiserror::Error;

/// The four kinds of element a mesh stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Edge,
    Vertex,
    Face,
    Point,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Edge => "edge",
            ElementKind::Vertex => "vertex",
            ElementKind::Face => "face",
            ElementKind::Point => "point",
        };
        f.write_str(name)
    }
}

/// Unified error type for hedge-mesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Offset 0 is reserved and never resolves to a record.
    #[error("{kind} handle is the sentinel (offset 0)")]
    SentinelHandle { kind: ElementKind },
    /// The handle points past the end of the arena.
    #[error("{kind} offset {offset} exceeds storage size {len}")]
    OffsetOutOfRange {
        kind: ElementKind,
        offset: u32,
        len: usize,
    },
    /// The slot was recycled since the handle was issued.
    #[error("{kind} generation mismatch at offset {offset}: handle has {expected}, slot has {found}")]
    StaleHandle {
        kind: ElementKind,
        offset: u32,
        expected: u32,
        found: u32,
    },
    /// The slot is on the free list.
    #[error("{kind} at offset {offset} is inactive")]
    InactiveElement { kind: ElementKind, offset: u32 },
    /// Geometry is degenerate or malformed for the requested computation.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// No further offsets can be addressed.
    #[error("{kind} arena reached its maximum addressable offset")]
    ArenaExhausted { kind: ElementKind },

    // --- invariant violations ---
    /// An edge has no resolvable twin.
    #[error("edge {edge} has no resolvable adjacent edge")]
    TwinMissing { edge: u32 },
    /// An edge's twin does not point back at it.
    #[error("edge {edge} is adjacent to {adjacent}, which points back at {back}")]
    TwinAsymmetric { edge: u32, adjacent: u32, back: u32 },
    /// A face's root edge does not resolve.
    #[error("face {face} has no resolvable root edge")]
    FaceRootMissing { face: u32 },
    /// Walking `next` from a face's root never returns to it.
    #[error("face {face} edge loop does not close")]
    FaceLoopOpen { face: u32 },
    /// The closed loop and the face's edge set disagree in size.
    #[error("face {face} loop has {found} edges but its edge set has {expected}")]
    FaceLoopLength {
        face: u32,
        expected: usize,
        found: usize,
    },
    /// An edge in a face loop is stamped with a different face.
    #[error("edge {edge} in the loop of face {face} is not stamped with that face")]
    EdgeFaceMismatch { face: u32, edge: u32 },
    /// A vertex's outgoing edge does not originate at that vertex.
    #[error("vertex {vertex} references edge {edge}, which does not originate at it")]
    VertexEdgeMismatch { vertex: u32, edge: u32 },
    /// A vertex is missing from its point's back-reference set.
    #[error("vertex {vertex} is missing from the vertex set of point {point}")]
    PointVertexMissing { point: u32, vertex: u32 },
    /// A point's back-reference set names a vertex that no longer refers to it.
    #[error("point {point} lists vertex {vertex}, which does not reference it")]
    PointVertexStale { point: u32, vertex: u32 },
    /// The reported count differs from the number of live records.
    #[error("{kind} count is {reported} but {live} records are live")]
    CountMismatch {
        kind: ElementKind,
        reported: usize,
        live: usize,
    },
}
