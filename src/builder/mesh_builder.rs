//! Mesh builder: triangle and polygon construction on top of
//! [`EdgeLoopBuilder`].
//!
//! Every method returns the new face, or the sentinel handle if any step
//! failed. Failures are not rolled back; edges and vertices allocated before
//! the failing step stay in the mesh.
//!
//! Each new face is checked locally (its loop, the twins of its edges and
//! their vertices); a violation is logged, never raised.

use super::edge_loop::EdgeLoopBuilder;
use crate::geometry::Position;
use crate::mesh::Mesh;
use crate::topology::handle::{EdgeHandle, FaceHandle, PointHandle};
use crate::topology::kernel::KernelTopologyExt;
use crate::topology::validation::validate_face;

pub struct MeshBuilder<'m> {
    mesh: &'m mut Mesh,
}

impl<'m> MeshBuilder<'m> {
    pub fn new(mesh: &'m mut Mesh) -> Self {
        Self { mesh }
    }

    pub fn mesh(&self) -> &Mesh {
        self.mesh
    }

    /// Triangle `p0 -> p1 -> p2` over existing points.
    pub fn add_triangle(&mut self, p0: PointHandle, p1: PointHandle, p2: PointHandle) -> FaceHandle {
        self.add_polygon(&[p0, p1, p2])
    }

    /// Insert three points and build a triangle over them.
    pub fn add_triangle_at(&mut self, positions: [Position; 3]) -> FaceHandle {
        let [p0, p1, p2] = positions.map(|p| self.mesh.add_point(p));
        self.add_triangle(p0, p1, p2)
    }

    /// Closed polygon over `points`, in order. Needs at least three points.
    pub fn add_polygon(&mut self, points: &[PointHandle]) -> FaceHandle {
        let [first, rest @ ..] = points else {
            log::error!("Unable to build a face from an empty point list.");
            return FaceHandle::INVALID;
        };
        if points.len() < 3 {
            log::error!("A face requires at least 3 points; {} given.", points.len());
            return FaceHandle::INVALID;
        }
        let root = {
            let mut builder = self.start_edge_loop(*first);
            for &p in rest {
                builder.add_point(p);
            }
            builder.close()
        };
        self.finish_face(root, "MeshBuilder::add_polygon")
    }

    /// Triangle on the free side of `edge`, with `point` as its third corner.
    ///
    /// `edge` must be on a boundary with a face on one side only; the new
    /// face is built on its adjacent edge and traverses `edge` in the
    /// opposite direction.
    pub fn extend_edge(&mut self, edge: EdgeHandle, point: PointHandle) -> FaceHandle {
        let (twin, end) = {
            let e = self.mesh.edge(edge);
            (e.adjacent().handle(), e.points()[1])
        };
        if !end.is_valid() {
            log::error!("Unable to extend {edge}: its end point does not resolve.");
            return FaceHandle::INVALID;
        }
        let end = end.handle();
        let root = self
            .start_edge_loop_from_edge(twin)
            .add_point(point)
            .add_point(end)
            .close();
        self.finish_face(root, "MeshBuilder::extend_edge")
    }

    /// Insert a point and extend `edge` to it.
    pub fn extend_edge_at(&mut self, edge: EdgeHandle, position: Position) -> FaceHandle {
        let point = self.mesh.add_point(position);
        self.extend_edge(edge, point)
    }

    /// Edge-loop builder starting at `point`.
    pub fn start_edge_loop(&mut self, point: PointHandle) -> EdgeLoopBuilder<'_> {
        EdgeLoopBuilder::from_point(self.mesh.kernel_mut(), point)
    }

    /// Edge-loop builder rooted at the free edge `edge`.
    pub fn start_edge_loop_from_edge(&mut self, edge: EdgeHandle) -> EdgeLoopBuilder<'_> {
        EdgeLoopBuilder::from_edge(self.mesh.kernel_mut(), edge)
    }

    fn finish_face(&mut self, root: EdgeHandle, context: &str) -> FaceHandle {
        if !root.is_valid() {
            log::error!("{context}: edge loop could not be started.");
            return FaceHandle::INVALID;
        }
        let face = self.mesh.kernel_mut().make_face(root);
        if face.is_valid() {
            log::debug!("{context}: added {face}");
            if let Err(e) = validate_face(self.mesh.kernel(), face) {
                log::error!("{context}: {face} is malformed: {e}");
            }
        }
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::kernel::Kernel;
    use crate::debug_invariants::DebugInvariants;

    #[test]
    fn triangle_counts_half_edges() {
        let mut mesh = Mesh::new();
        let f = MeshBuilder::new(&mut mesh).add_triangle_at([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        assert!(f.is_valid());
        assert_eq!(mesh.edge_count(), 6);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.point_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        for e in mesh.face(f).loop_edges() {
            assert!(e.is_boundary());
        }
    }

    #[test]
    fn polygon_needs_three_points() {
        let mut mesh = Mesh::new();
        let p = mesh.add_point([0.0; 3]);
        let q = mesh.add_point([1.0, 0.0, 0.0]);
        let mut builder = MeshBuilder::new(&mut mesh);
        assert!(!builder.add_polygon(&[]).is_valid());
        assert!(!builder.add_polygon(&[p, q]).is_valid());
        assert_eq!(mesh.edge_count(), 0);
    }

    #[test]
    fn quad_polygon_closes() {
        let mut mesh = Mesh::new();
        let p: Vec<_> = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]
        .into_iter()
        .map(|x| mesh.add_point(x))
        .collect();
        let f = MeshBuilder::new(&mut mesh).add_polygon(&p);
        assert!(f.is_valid());
        assert_eq!(mesh.face(f).edges().len(), 4);
        assert!((mesh.face(f).area().unwrap() - 1.0).abs() < 1e-12);
        assert!(mesh.validate_invariants().is_ok());
    }

    #[test]
    fn building_after_removing_half_an_edge_pair() {
        let mut mesh = Mesh::new();
        let stray = mesh.kernel_mut().make_edge_pair();
        mesh.kernel_mut().remove_edge(stray);
        let f = MeshBuilder::new(&mut mesh).add_triangle_at([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        assert!(f.is_valid());
        assert_eq!(mesh.face_count(), 1);
        assert!(mesh.face(f).area().is_some());
        assert!(validate_face(mesh.kernel(), f).is_ok());
    }

    #[test]
    fn building_after_removing_a_used_point() {
        let mut mesh = Mesh::new();
        let mut builder = MeshBuilder::new(&mut mesh);
        let first = builder.add_triangle_at([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let p = builder.mesh().face(first).root_edge().vertex().point().handle();
        mesh.kernel_mut().remove_point(p);
        let second = MeshBuilder::new(&mut mesh).add_triangle_at([
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
        ]);
        assert!(second.is_valid());
        assert_eq!(mesh.face_count(), 2);
        assert!(validate_face(mesh.kernel(), second).is_ok());
        assert!(validate_face(mesh.kernel(), first).is_err());
    }

    #[test]
    fn extending_a_faced_side_fails() {
        let mut mesh = Mesh::new();
        let mut builder = MeshBuilder::new(&mut mesh);
        let f = builder.add_triangle_at([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let root = builder.mesh().face(f).root_edge().handle();
        let twin = builder.mesh().edge(root).adjacent().handle();
        // the twin's free side is `root`, which already has a face
        assert!(!builder.extend_edge_at(twin, [1.0, 1.0, 0.0]).is_valid());
        assert_eq!(mesh.face_count(), 1);
    }
}
