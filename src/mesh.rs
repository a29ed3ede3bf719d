//! Mesh: the owning facade over a storage kernel.
//!
//! A [`Mesh`] exclusively owns one [`Kernel`] and hands out traversal proxies
//! that borrow it. Counts reported here exclude each arena's sentinel slot.
//!
//! # Invariants
//!
//! - Every edge has a twin whose own twin is that edge.
//! - Walking `next` from a face's root edge returns to it after exactly as
//!   many edges as the face's edge set holds, each stamped with the face.
//! - A vertex's outgoing edge originates at that vertex.
//! - A point's vertex set holds exactly the vertices bound to it.
//!
//! The builder checks them for each face it adds, on that face only. The
//! whole mesh is checked on request via
//! [`validate_invariants`](DebugInvariants::validate_invariants), or
//! [`debug_assert_invariants`](DebugInvariants::debug_assert_invariants) in
//! debug builds and with the `check-invariants` or `strict-invariants`
//! feature.

use std::fmt;

use crate::debug_invariants::DebugInvariants;
use crate::geometry::metrics::normalize;
use crate::geometry::{Normal, Position, add};
use crate::mesh_error::MeshError;
use crate::topology::element::Point;
use crate::topology::handle::{EdgeHandle, FaceHandle, PointHandle, VertexHandle};
use crate::topology::kernel::{BasicKernel, Kernel, KernelCapacity};
use crate::topology::refs::{EdgeRef, FaceRef, PointRef, VertexRef};
use crate::topology::validation::{ValidationOptions, validate_kernel};

/// A half-edge mesh.
pub struct Mesh {
    kernel: Box<dyn Kernel>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::with_kernel(Box::new(BasicKernel::new()))
    }
}

impl Mesh {
    /// Empty mesh over a [`BasicKernel`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh over a [`BasicKernel`] with reserved room.
    pub fn with_capacity(capacity: KernelCapacity) -> Self {
        Self::with_kernel(Box::new(BasicKernel::with_capacity(capacity)))
    }

    /// Empty mesh over an arbitrary backing store.
    pub fn with_kernel(kernel: Box<dyn Kernel>) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &dyn Kernel {
        self.kernel.as_ref()
    }

    pub fn kernel_mut(&mut self) -> &mut dyn Kernel {
        self.kernel.as_mut()
    }

    // --- counts (sentinel excluded) ---

    pub fn point_count(&self) -> usize {
        self.kernel.point_count().saturating_sub(1)
    }

    pub fn vertex_count(&self) -> usize {
        self.kernel.vertex_count().saturating_sub(1)
    }

    /// Number of half-edges.
    pub fn edge_count(&self) -> usize {
        self.kernel.edge_count().saturating_sub(1)
    }

    pub fn face_count(&self) -> usize {
        self.kernel.face_count().saturating_sub(1)
    }

    // --- proxies ---

    pub fn edge(&self, handle: EdgeHandle) -> EdgeRef<'_> {
        EdgeRef::new(self.kernel(), handle)
    }

    pub fn vertex(&self, handle: VertexHandle) -> VertexRef<'_> {
        VertexRef::new(self.kernel(), handle)
    }

    pub fn face(&self, handle: FaceHandle) -> FaceRef<'_> {
        FaceRef::new(self.kernel(), handle)
    }

    pub fn point(&self, handle: PointHandle) -> PointRef<'_> {
        PointRef::new(self.kernel(), handle)
    }

    // --- points ---

    /// Store a free-standing point.
    pub fn add_point(&mut self, position: Position) -> PointHandle {
        self.kernel.emplace_point(Point::at(position))
    }

    /// Move a point. Returns `false` if `point` does not resolve.
    pub fn set_position(&mut self, point: PointHandle, position: Position) -> bool {
        match self.kernel.point_mut(point) {
            Some(p) => {
                p.position = position;
                true
            }
            None => false,
        }
    }

    // --- normals ---

    /// Compute, store and return the normal of `face`'s loop.
    pub fn calculate_face_normal(&mut self, face: FaceHandle) -> Option<Normal> {
        let normal = self.face(face).compute_normal()?;
        let record = self.kernel.face_mut(face)?;
        record.normal = Some(normal);
        Some(normal)
    }

    /// Normal of the face owning `vertex`'s outgoing edge, stored on the
    /// vertex. The face normal is calculated first if it is missing.
    pub fn calculate_vertex_normal(&mut self, vertex: VertexHandle) -> Option<Normal> {
        let face = self.vertex(vertex).face();
        if !face.is_valid() {
            log::warn!("Unable to calculate normal of {vertex}: no face on its outgoing edge.");
            return None;
        }
        let normal = match face.normal() {
            Some(n) => n,
            None => {
                let handle = face.handle();
                self.calculate_face_normal(handle)?
            }
        };
        self.kernel.vertex_mut(vertex)?.normal = Some(normal);
        Some(normal)
    }

    /// Normalised sum of the normals of every vertex bound to `point`,
    /// stored on the point.
    pub fn calculate_point_normal(&mut self, point: PointHandle) -> Option<Normal> {
        let vertices = self.point(point).vertices();
        if vertices.is_empty() {
            log::warn!("Unable to calculate normal of {point}: no vertices reference it.");
            return None;
        }
        let mut sum = [0.0; 3];
        for v in vertices {
            if let Some(n) = self.calculate_vertex_normal(v) {
                sum = add(sum, n);
            }
        }
        let normal = normalize(sum)
            .map_err(|e| log::warn!("Unable to calculate normal of {point}: {e}"))
            .ok()?;
        self.kernel.point_mut(point)?.normal = Some(normal);
        Some(normal)
    }

    /// Compact storage.
    pub fn defrag(&mut self) {
        self.kernel.defrag();
    }

    /// Check the invariants selected by `options`.
    pub fn validate_with(&self, options: ValidationOptions) -> Result<(), MeshError> {
        validate_kernel(self.kernel(), options)
    }
}

impl DebugInvariants for Mesh {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Mesh invalid");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        self.validate_with(ValidationOptions::all())
    }
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("points", &self.point_count())
            .field("vertices", &self.vertex_count())
            .field("edges", &self.edge_count())
            .field("faces", &self.face_count())
            .finish()
    }
}
