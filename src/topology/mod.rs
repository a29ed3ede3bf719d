//! Top-level module for half-edge mesh topology.
//!
//! This module provides the storage layer and the navigation layer:
//! - [`handle`]: typed, generation-checked element references
//! - [`element`]: the edge, vertex, face and point records
//! - [`arena`]: slot storage with a sentinel slot and lowest-first reuse
//! - [`kernel`]: the storage contract plus edge, vertex and face construction
//! - [`refs`]: copyable traversal proxies that never fail
//! - [`validation`]: read-only topology invariant checks
//!
//! Most users go through `Mesh` and `MeshBuilder` rather than this module
//! directly.

pub mod arena;
pub mod element;
pub mod handle;
pub mod kernel;
pub mod refs;
pub mod validation;

pub use arena::Arena;
pub use element::{Edge, Element, ElementHeader, ElementStatus, Face, Point, Vertex};
pub use handle::{EdgeHandle, FaceHandle, Handle, PointHandle, VertexHandle};
pub use kernel::{
    BasicKernel, ElementStore, Kernel, KernelCapacity, KernelTopologyExt, LoopWalk, walk_loop,
};
pub use refs::{EdgeRef, ElementRef, FaceRef, PointRef, VertexRef};
pub use validation::{ValidationOptions, validate_face, validate_kernel};
