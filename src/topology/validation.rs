//! Topology validation helpers.
//!
//! Every check is read-only and reports the first violation it finds as a
//! [`MeshError`]. [`validate_kernel`] runs the checks selected by a
//! [`ValidationOptions`]; `Mesh` uses it for its `DebugInvariants` impl.
//! [`validate_face`] checks a single face and is what the builder runs
//! after each face it adds.

use super::element::{Edge, Element, Face, Point, Vertex};
use super::handle::{EdgeHandle, FaceHandle};
use super::kernel::{ElementStore, Kernel, LoopWalk, walk_loop};
use crate::mesh_error::MeshError;

/// Optional validation toggles for half-edge topology checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Every edge has a resolvable twin that points back at it.
    pub check_twins: bool,
    /// Every face's loop closes, matches its edge set and is stamped with it.
    pub check_face_loops: bool,
    /// Every vertex's outgoing edge originates at that vertex.
    pub check_vertex_edges: bool,
    /// Point/vertex back-references agree in both directions.
    pub check_point_vertices: bool,
    /// Reported counts equal the live record counts (sentinel included).
    pub check_counts: bool,
}

impl ValidationOptions {
    /// Enable all topology validation checks.
    pub fn all() -> Self {
        Self {
            check_twins: true,
            check_face_loops: true,
            check_vertex_edges: true,
            check_point_vertices: true,
            check_counts: true,
        }
    }

    /// Disable every check; enable the ones you need field by field.
    pub fn none() -> Self {
        Self {
            check_twins: false,
            check_face_loops: false,
            check_vertex_edges: false,
            check_point_vertices: false,
            check_counts: false,
        }
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Run the checks enabled in `options` against `kernel`.
pub fn validate_kernel<K>(kernel: &K, options: ValidationOptions) -> Result<(), MeshError>
where
    K: Kernel + ?Sized,
{
    if options.check_counts {
        validate_counts(kernel)?;
    }
    if options.check_twins {
        validate_twins(kernel)?;
    }
    if options.check_face_loops {
        validate_face_loops(kernel)?;
    }
    if options.check_vertex_edges {
        validate_vertex_edges(kernel)?;
    }
    if options.check_point_vertices {
        validate_point_vertices(kernel)?;
    }
    Ok(())
}

fn count_matches<E, K>(kernel: &K) -> Result<(), MeshError>
where
    E: Element,
    K: ElementStore<E> + ?Sized,
{
    let reported = kernel.count();
    let live = kernel.handles().len() + 1;
    if reported != live {
        return Err(MeshError::CountMismatch {
            kind: E::KIND,
            reported,
            live,
        });
    }
    Ok(())
}

/// `count()` of each store equals its live handles plus the sentinel.
pub fn validate_counts<K: Kernel + ?Sized>(kernel: &K) -> Result<(), MeshError> {
    count_matches::<Edge, K>(kernel)?;
    count_matches::<Vertex, K>(kernel)?;
    count_matches::<Face, K>(kernel)?;
    count_matches::<Point, K>(kernel)
}

/// Every edge's adjacent edge resolves and names it back.
pub fn validate_twins<K: Kernel + ?Sized>(kernel: &K) -> Result<(), MeshError> {
    for handle in ElementStore::<Edge>::handles(kernel) {
        let Some(edge) = kernel.edge(handle) else {
            continue;
        };
        let Some(twin) = kernel.edge(edge.adjacent) else {
            return Err(MeshError::TwinMissing {
                edge: handle.offset(),
            });
        };
        if twin.adjacent != handle {
            return Err(MeshError::TwinAsymmetric {
                edge: handle.offset(),
                adjacent: edge.adjacent.offset(),
                back: twin.adjacent.offset(),
            });
        }
    }
    Ok(())
}

/// Every face's root resolves, its `next` walk closes over exactly its edge
/// set, and each edge on the way is stamped with the face.
pub fn validate_face_loops<K: Kernel + ?Sized>(kernel: &K) -> Result<(), MeshError> {
    for handle in ElementStore::<Face>::handles(kernel) {
        if kernel.face(handle).is_some() {
            face_loop(kernel, handle)?;
        }
    }
    Ok(())
}

/// Loop edges of `handle`, checked the way [`validate_face_loops`] checks
/// every face.
fn face_loop<K>(kernel: &K, handle: FaceHandle) -> Result<Vec<EdgeHandle>, MeshError>
where
    K: Kernel + ?Sized,
{
    let f = handle.offset();
    let Some(face) = kernel.face(handle) else {
        return Err(MeshError::InactiveElement {
            kind: Face::KIND,
            offset: f,
        });
    };
    if kernel.edge(face.root_edge).is_none() {
        return Err(MeshError::FaceRootMissing { face: f });
    }
    let LoopWalk::Closed(edges) = walk_loop(kernel, face.root_edge) else {
        return Err(MeshError::FaceLoopOpen { face: f });
    };
    if edges.len() != face.edges.len() {
        return Err(MeshError::FaceLoopLength {
            face: f,
            expected: face.edges.len(),
            found: edges.len(),
        });
    }
    for &e in &edges {
        let stamped = kernel.edge(e).is_some_and(|edge| edge.face == handle);
        if !stamped || !face.edges.contains(&e) {
            return Err(MeshError::EdgeFaceMismatch {
                face: f,
                edge: e.offset(),
            });
        }
    }
    Ok(edges)
}

/// Local checks for one face: its loop, the twins of its loop edges, and
/// the vertices those edges leave from.
///
/// Touches only the face's own loop; damage elsewhere is not reported.
pub fn validate_face<K: Kernel + ?Sized>(kernel: &K, handle: FaceHandle) -> Result<(), MeshError> {
    for e in face_loop(kernel, handle)? {
        let Some(edge) = kernel.edge(e) else {
            continue;
        };
        match kernel.edge(edge.adjacent) {
            None => return Err(MeshError::TwinMissing { edge: e.offset() }),
            Some(twin) if twin.adjacent != e => {
                return Err(MeshError::TwinAsymmetric {
                    edge: e.offset(),
                    adjacent: edge.adjacent.offset(),
                    back: twin.adjacent.offset(),
                });
            }
            Some(_) => {}
        }
        let Some(vertex) = kernel.vertex(edge.vertex) else {
            return Err(MeshError::VertexEdgeMismatch {
                vertex: edge.vertex.offset(),
                edge: e.offset(),
            });
        };
        let listed = kernel
            .point(vertex.point)
            .is_some_and(|p| p.vertices.contains(&edge.vertex));
        if !listed {
            return Err(MeshError::PointVertexMissing {
                point: vertex.point.offset(),
                vertex: edge.vertex.offset(),
            });
        }
    }
    Ok(())
}

/// Every vertex with an outgoing edge is that edge's origin.
pub fn validate_vertex_edges<K: Kernel + ?Sized>(kernel: &K) -> Result<(), MeshError> {
    for handle in ElementStore::<Vertex>::handles(kernel) {
        let Some(vertex) = kernel.vertex(handle) else {
            continue;
        };
        if !vertex.edge.is_valid() {
            continue;
        }
        let originates = kernel
            .edge(vertex.edge)
            .is_some_and(|edge| edge.vertex == handle);
        if !originates {
            return Err(MeshError::VertexEdgeMismatch {
                vertex: handle.offset(),
                edge: vertex.edge.offset(),
            });
        }
    }
    Ok(())
}

/// Vertices appear in their point's vertex set and points list only vertices
/// that reference them.
pub fn validate_point_vertices<K: Kernel + ?Sized>(kernel: &K) -> Result<(), MeshError> {
    for handle in ElementStore::<Vertex>::handles(kernel) {
        let Some(vertex) = kernel.vertex(handle) else {
            continue;
        };
        let listed = kernel
            .point(vertex.point)
            .is_some_and(|p| p.vertices.contains(&handle));
        if !listed {
            return Err(MeshError::PointVertexMissing {
                point: vertex.point.offset(),
                vertex: handle.offset(),
            });
        }
    }
    for handle in ElementStore::<Point>::handles(kernel) {
        let Some(point) = kernel.point(handle) else {
            continue;
        };
        for &v in &point.vertices {
            let refers_back = kernel.vertex(v).is_some_and(|vertex| vertex.point == handle);
            if !refers_back {
                return Err(MeshError::PointVertexStale {
                    point: handle.offset(),
                    vertex: v.offset(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::kernel::{BasicKernel, KernelTopologyExt};

    fn triangle(k: &mut BasicKernel) -> (FaceHandle, [EdgeHandle; 3]) {
        let p = [
            k.emplace_point(Point::new(0.0, 0.0, 0.0)),
            k.emplace_point(Point::new(1.0, 0.0, 0.0)),
            k.emplace_point(Point::new(0.0, 1.0, 0.0)),
        ];
        let e = [k.make_edge_pair(), k.make_edge_pair(), k.make_edge_pair()];
        k.connect_edges(e[0], p[0], e[1]);
        k.connect_edges(e[1], p[1], e[2]);
        k.connect_edges(e[2], p[2], e[0]);
        (k.make_face(e[0]), e)
    }

    #[test]
    fn well_formed_triangle_passes() {
        let mut k = BasicKernel::new();
        let (f, _) = triangle(&mut k);
        assert!(f.is_valid());
        assert_eq!(validate_kernel(&k, ValidationOptions::all()), Ok(()));
    }

    #[test]
    fn empty_kernel_passes() {
        let k = BasicKernel::new();
        assert!(validate_kernel(&k, ValidationOptions::default()).is_ok());
    }

    #[test]
    fn broken_twin_is_reported() {
        let mut k = BasicKernel::new();
        let a = k.make_edge_pair();
        let b = k.make_edge_pair();
        k.edge_mut(a).unwrap().adjacent = b;
        assert!(matches!(
            validate_twins(&k),
            Err(MeshError::TwinAsymmetric { .. })
        ));
        k.edge_mut(a).unwrap().adjacent = EdgeHandle::INVALID;
        assert_eq!(validate_twins(&k), Err(MeshError::TwinMissing { edge: a.offset() }));
    }

    #[test]
    fn unstamped_loop_edge_is_reported() {
        let mut k = BasicKernel::new();
        let (f, e) = triangle(&mut k);
        k.edge_mut(e[1]).unwrap().face = FaceHandle::INVALID;
        assert_eq!(
            validate_face_loops(&k),
            Err(MeshError::EdgeFaceMismatch {
                face: f.offset(),
                edge: e[1].offset(),
            })
        );
    }

    #[test]
    fn opened_loop_is_reported() {
        let mut k = BasicKernel::new();
        let (f, e) = triangle(&mut k);
        k.edge_mut(e[2]).unwrap().next = EdgeHandle::INVALID;
        assert_eq!(
            validate_face_loops(&k),
            Err(MeshError::FaceLoopOpen { face: f.offset() })
        );
    }

    #[test]
    fn removed_point_leaves_dangling_vertices() {
        let mut k = BasicKernel::new();
        let (_, e) = triangle(&mut k);
        let v = k.edge(e[1]).unwrap().vertex;
        let p = k.vertex(v).unwrap().point;
        k.remove_point(p);
        assert!(matches!(
            validate_point_vertices(&k),
            Err(MeshError::PointVertexMissing { .. })
        ));
        // the twin and loop structure is untouched
        let mut opts = ValidationOptions::all();
        opts.check_point_vertices = false;
        assert!(validate_kernel(&k, opts).is_ok());
    }

    #[test]
    fn face_check_ignores_damage_elsewhere() {
        let mut k = BasicKernel::new();
        let stray = k.make_edge_pair();
        let (f, _) = triangle(&mut k);
        k.remove_edge(stray);
        assert!(validate_twins(&k).is_err());
        assert_eq!(validate_face(&k, f), Ok(()));
    }

    #[test]
    fn face_check_reports_a_broken_loop_twin() {
        let mut k = BasicKernel::new();
        let (f, e) = triangle(&mut k);
        let twin = k.edge(e[2]).unwrap().adjacent;
        k.remove_edge(twin);
        assert_eq!(validate_face(&k, f), Err(MeshError::TwinMissing { edge: e[2].offset() }));
        assert!(validate_face(&k, FaceHandle::new(7)).is_err());
    }

    #[test]
    fn none_skips_everything() {
        let mut k = BasicKernel::new();
        let a = k.make_edge_pair();
        k.edge_mut(a).unwrap().adjacent = EdgeHandle::INVALID;
        assert!(validate_kernel(&k, ValidationOptions::none()).is_ok());
        assert!(validate_kernel(&k, ValidationOptions::all()).is_err());
    }
}
