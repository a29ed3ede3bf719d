#![cfg_attr(docsrs, feature(doc_cfg))]
//! # hedge-mesh
//!
//! hedge-mesh is an in-memory half-edge mesh built on a generational-handle
//! arena. Elements (edges, vertices, faces, points) never hold references to
//! each other; every link is a typed [`Handle`](topology::Handle) that is
//! re-resolved, and generation-checked, on every use. Freed slots are reused
//! lowest-offset first without disturbing live handles to other slots.
//!
//! ## Layers
//! - [`topology::arena`]: one slot arena per element kind
//! - [`topology::kernel`]: the storage contract plus the three topology
//!   construction operations (`make_edge_pair`, `connect_edges`, `make_face`)
//! - [`topology::refs`]: copyable traversal proxies that degrade to an
//!   invalid proxy instead of failing
//! - [`builder`]: edge-loop and mesh builders
//! - [`mesh::Mesh`]: the owning facade
//!
//! ## Failure model
//! Topology operations are total. Bad input produces a sentinel handle (or an
//! invalid proxy) and a diagnostic through the [`log`] facade; nothing
//! panics. The fallible building blocks underneath return
//! [`MeshError`](mesh_error::MeshError).
//!
//! ## Invariant checking
//! [`MeshBuilder`](builder::MeshBuilder) checks each face it adds locally and
//! logs any violation. Whole-mesh checks are explicit:
//! [`DebugInvariants::debug_assert_invariants`] panics on the first violation
//! when `debug_assertions` or the `check-invariants` / `strict-invariants`
//! features are on, and [`Mesh::validate_with`](mesh::Mesh::validate_with)
//! returns it instead.
//!
//! ## Example
//! ```rust
//! use hedge_mesh::prelude::*;
//!
//! let mut mesh = Mesh::new();
//! let mut builder = MeshBuilder::new(&mut mesh);
//! let face = builder.add_triangle_at([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
//! let root = builder.mesh().face(face).root_edge().handle();
//! let second = builder.extend_edge_at(root, [-1.0, 0.0, 0.0]);
//! assert!(second.is_valid());
//! assert_eq!(mesh.face_count(), 2);
//! assert!(!mesh.edge(root).is_boundary());
//! ```

pub mod builder;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::builder::{EdgeLoopBuilder, MeshBuilder};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{Normal, Position};
    pub use crate::mesh::Mesh;
    pub use crate::mesh_error::{ElementKind, MeshError};
    pub use crate::topology::element::{Edge, Element, Face, Point, Vertex};
    pub use crate::topology::handle::{EdgeHandle, FaceHandle, Handle, PointHandle, VertexHandle};
    pub use crate::topology::kernel::{
        BasicKernel, ElementStore, Kernel, KernelCapacity, KernelTopologyExt,
    };
    pub use crate::topology::refs::{EdgeRef, FaceRef, PointRef, VertexRef};
    pub use crate::topology::validation::ValidationOptions;
}
