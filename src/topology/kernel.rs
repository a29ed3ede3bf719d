//! Storage kernel: the abstract element store a mesh is built on.
//!
//! [`Kernel`] is the contract a backing store fulfils: per element kind it
//! resolves, stores, removes and counts records ([`ElementStore`]). The
//! topology construction routines ([`KernelTopologyExt::make_edge_pair`],
//! [`KernelTopologyExt::connect_edges`], [`KernelTopologyExt::make_face`])
//! are written once against that contract and blanket-implemented for every
//! kernel, so alternative stores inherit them unchanged.
//!
//! [`BasicKernel`] is the default store: one [`Arena`] per element kind.

use hashbrown::HashSet;

use super::arena::Arena;
use super::element::{Edge, Element, Face, Point, Vertex};
use super::handle::{EdgeHandle, FaceHandle, Handle, PointHandle, VertexHandle};

/// Uniform storage operations for one element kind.
pub trait ElementStore<E: Element> {
    /// Resolve `handle`; `None` if it is the sentinel, out of range or stale.
    fn get(&self, handle: Handle<E>) -> Option<&E>;
    fn get_mut(&mut self, handle: Handle<E>) -> Option<&mut E>;
    /// Store `element` by move; the sentinel if storage is exhausted.
    fn emplace(&mut self, element: E) -> Handle<E>;
    /// Retire the record behind `handle`; no-op if it does not resolve.
    fn remove(&mut self, handle: Handle<E>);
    /// Live slots, the sentinel included.
    fn count(&self) -> usize;
    /// Handles of every live record.
    fn handles(&self) -> Vec<Handle<E>>;

    /// Store a copy of `element`.
    fn insert(&mut self, element: &E) -> Handle<E> {
        self.emplace(element.clone())
    }

    /// The full `(offset, generation)` handle currently naming the record
    /// `handle` resolves to.
    fn canonical(&self, handle: Handle<E>) -> Option<Handle<E>> {
        self.get(handle)
            .map(|e| Handle::with_generation(handle.offset(), e.generation()))
    }
}

/// A complete element store for half-edge meshes.
///
/// The typed accessors are conveniences over the four [`ElementStore`]
/// supertraits.
pub trait Kernel:
    ElementStore<Edge> + ElementStore<Vertex> + ElementStore<Face> + ElementStore<Point>
{
    /// Compact storage. Optional for backends.
    fn defrag(&mut self);

    // --- resolve ---

    fn edge(&self, handle: EdgeHandle) -> Option<&Edge> {
        ElementStore::<Edge>::get(self, handle)
    }
    fn edge_mut(&mut self, handle: EdgeHandle) -> Option<&mut Edge> {
        ElementStore::<Edge>::get_mut(self, handle)
    }
    fn vertex(&self, handle: VertexHandle) -> Option<&Vertex> {
        ElementStore::<Vertex>::get(self, handle)
    }
    fn vertex_mut(&mut self, handle: VertexHandle) -> Option<&mut Vertex> {
        ElementStore::<Vertex>::get_mut(self, handle)
    }
    fn face(&self, handle: FaceHandle) -> Option<&Face> {
        ElementStore::<Face>::get(self, handle)
    }
    fn face_mut(&mut self, handle: FaceHandle) -> Option<&mut Face> {
        ElementStore::<Face>::get_mut(self, handle)
    }
    fn point(&self, handle: PointHandle) -> Option<&Point> {
        ElementStore::<Point>::get(self, handle)
    }
    fn point_mut(&mut self, handle: PointHandle) -> Option<&mut Point> {
        ElementStore::<Point>::get_mut(self, handle)
    }

    // --- create ---

    fn emplace_edge(&mut self, edge: Edge) -> EdgeHandle {
        ElementStore::<Edge>::emplace(self, edge)
    }
    fn emplace_vertex(&mut self, vertex: Vertex) -> VertexHandle {
        ElementStore::<Vertex>::emplace(self, vertex)
    }
    fn emplace_face(&mut self, face: Face) -> FaceHandle {
        ElementStore::<Face>::emplace(self, face)
    }
    fn emplace_point(&mut self, point: Point) -> PointHandle {
        ElementStore::<Point>::emplace(self, point)
    }

    // --- remove ---

    fn remove_edge(&mut self, handle: EdgeHandle) {
        ElementStore::<Edge>::remove(self, handle)
    }
    fn remove_vertex(&mut self, handle: VertexHandle) {
        ElementStore::<Vertex>::remove(self, handle)
    }
    fn remove_face(&mut self, handle: FaceHandle) {
        ElementStore::<Face>::remove(self, handle)
    }
    fn remove_point(&mut self, handle: PointHandle) {
        ElementStore::<Point>::remove(self, handle)
    }

    // --- count (sentinel slot included) ---

    fn edge_count(&self) -> usize {
        ElementStore::<Edge>::count(self)
    }
    fn vertex_count(&self) -> usize {
        ElementStore::<Vertex>::count(self)
    }
    fn face_count(&self) -> usize {
        ElementStore::<Face>::count(self)
    }
    fn point_count(&self) -> usize {
        ElementStore::<Point>::count(self)
    }
}

/// Outcome of walking `next` links from a root edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopWalk {
    /// The walk returned to the root; edges in visiting order.
    Closed(Vec<EdgeHandle>),
    /// A self-connected edge, a loop shorter than three edges, or a cycle
    /// that never passes the root again.
    Degenerate { at: EdgeHandle, len: usize },
    /// An edge on the way did not resolve.
    Disconnected { at: EdgeHandle },
}

/// Walk the `next` chain starting at `root` until it closes or breaks.
///
/// Read-only; `root` should be a canonical handle.
pub fn walk_loop<K: Kernel + ?Sized>(kernel: &K, root: EdgeHandle) -> LoopWalk {
    let mut visited = Vec::new();
    let mut seen = HashSet::new();
    let mut current = root;
    loop {
        let Some(edge) = kernel.edge(current) else {
            return LoopWalk::Disconnected { at: current };
        };
        visited.push(current);
        seen.insert(current);

        let next = edge.next;
        if next == current {
            return LoopWalk::Degenerate {
                at: current,
                len: visited.len(),
            };
        }
        if next == root {
            break;
        }
        if seen.contains(&next) {
            return LoopWalk::Degenerate {
                at: next,
                len: visited.len(),
            };
        }
        current = next;
    }
    if visited.len() < 3 {
        return LoopWalk::Degenerate {
            at: root,
            len: visited.len(),
        };
    }
    LoopWalk::Closed(visited)
}

/// Topology construction over any [`Kernel`].
///
/// Blanket-implemented; backends cannot override these.
pub trait KernelTopologyExt: Kernel {
    /// Create an empty edge and its adjacent edge; returns the first one.
    fn make_edge_pair(&mut self) -> EdgeHandle {
        let first = self.emplace_edge(Edge::default());
        let second = self.emplace_edge(Edge::default());
        if !first.is_valid() || !second.is_valid() {
            log::error!("Unable to allocate an edge pair.");
            self.remove_edge(first);
            self.remove_edge(second);
            return EdgeHandle::INVALID;
        }
        if let Some(e) = self.edge_mut(first) {
            e.adjacent = second;
        }
        if let Some(e) = self.edge_mut(second) {
            e.adjacent = first;
        }
        first
    }

    /// Connect `in_edge` to `out_edge` through a new vertex bound to `point`.
    ///
    /// All three handles are checked before anything is written; on failure
    /// the mesh is untouched and the sentinel is returned.
    fn connect_edges(
        &mut self,
        in_edge: EdgeHandle,
        point: PointHandle,
        out_edge: EdgeHandle,
    ) -> VertexHandle {
        if !in_edge.is_valid() {
            log::error!("Invalid in edge index specified. Unable to create associated vertex.");
            return VertexHandle::INVALID;
        }
        if !point.is_valid() {
            log::error!("Invalid point index specified. Unable to create vertex.");
            return VertexHandle::INVALID;
        }
        if !out_edge.is_valid() {
            log::error!("Invalid out edge index specified. Unable to create associated vertex.");
            return VertexHandle::INVALID;
        }

        let Some(in_edge) = ElementStore::<Edge>::canonical(self, in_edge) else {
            log::error!("Invalid edge specified for incoming edge.");
            return VertexHandle::INVALID;
        };
        let Some(point) = ElementStore::<Point>::canonical(self, point) else {
            log::error!("Invalid point specified.");
            return VertexHandle::INVALID;
        };
        let Some(out_edge) = ElementStore::<Edge>::canonical(self, out_edge) else {
            log::error!("Invalid edge specified for outgoing edge.");
            return VertexHandle::INVALID;
        };

        let vertex = self.emplace_vertex(Vertex::new(point, out_edge));
        if !vertex.is_valid() {
            log::error!("Failed to create associated vertex. Edges can not be connected.");
            return VertexHandle::INVALID;
        }

        if let Some(e) = self.edge_mut(in_edge) {
            e.next = out_edge;
        }
        if let Some(e) = self.edge_mut(out_edge) {
            e.prev = in_edge;
            e.vertex = vertex;
        }
        if let Some(p) = self.point_mut(point) {
            p.vertices.insert(vertex);
        }
        vertex
    }

    /// Create a face for the closed edge loop through `root_edge` and stamp
    /// every edge of the loop with it.
    ///
    /// The loop is validated first; an open, self-connected or too short
    /// loop yields the sentinel and leaves the mesh untouched.
    fn make_face(&mut self, root_edge: EdgeHandle) -> FaceHandle {
        let Some(root) = ElementStore::<Edge>::canonical(self, root_edge) else {
            log::error!("Invalid root edge specified.");
            return FaceHandle::INVALID;
        };

        let edges = match walk_loop(&*self, root) {
            LoopWalk::Closed(edges) => edges,
            LoopWalk::Disconnected { at } => {
                log::error!("Disconnected edge loop at {at}. Unable to build face.");
                return FaceHandle::INVALID;
            }
            LoopWalk::Degenerate { at, len } if len < 3 => {
                log::error!(
                    "A face requires a connected edge loop of at least 3 edges; \
                     loop at {at} has {len}."
                );
                return FaceHandle::INVALID;
            }
            LoopWalk::Degenerate { at, .. } => {
                log::error!("Edge loop re-enters itself at {at} without reaching the root.");
                return FaceHandle::INVALID;
            }
        };
        log::debug!("Completed edge loop of {} edges.", edges.len());

        let mut face = Face::new(root);
        face.edges = edges.iter().copied().collect();
        let face_handle = self.emplace_face(face);
        if !face_handle.is_valid() {
            log::error!("Unable to allocate a face.");
            return FaceHandle::INVALID;
        }
        for edge in edges {
            if let Some(e) = self.edge_mut(edge) {
                e.face = face_handle;
            }
        }
        face_handle
    }
}

impl<K: Kernel + ?Sized> KernelTopologyExt for K {}

// -----------------------------------------------------------------------------
// Arena-backed kernel
// -----------------------------------------------------------------------------

/// Reservation hints for a [`BasicKernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KernelCapacity {
    pub points: usize,
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

impl KernelCapacity {
    /// Room for a triangle mesh with `triangles` faces built independently
    /// (no shared edges).
    pub fn for_triangles(triangles: usize) -> Self {
        Self {
            points: triangles * 3,
            vertices: triangles * 3,
            edges: triangles * 6,
            faces: triangles,
        }
    }
}

/// The default kernel: one [`Arena`] per element kind.
#[derive(Debug, Clone, Default)]
pub struct BasicKernel {
    edges: Arena<Edge>,
    vertices: Arena<Vertex>,
    faces: Arena<Face>,
    points: Arena<Point>,
}

impl BasicKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: KernelCapacity) -> Self {
        Self {
            edges: Arena::with_capacity(capacity.edges),
            vertices: Arena::with_capacity(capacity.vertices),
            faces: Arena::with_capacity(capacity.faces),
            points: Arena::with_capacity(capacity.points),
        }
    }

    pub fn reserve(&mut self, additional: KernelCapacity) {
        self.edges.reserve(additional.edges);
        self.vertices.reserve(additional.vertices);
        self.faces.reserve(additional.faces);
        self.points.reserve(additional.points);
    }

    pub fn edges(&self) -> &Arena<Edge> {
        &self.edges
    }
    pub fn vertices(&self) -> &Arena<Vertex> {
        &self.vertices
    }
    pub fn faces(&self) -> &Arena<Face> {
        &self.faces
    }
    pub fn points(&self) -> &Arena<Point> {
        &self.points
    }
}

macro_rules! arena_element_store {
    ($element:ty, $field:ident) => {
        impl ElementStore<$element> for BasicKernel {
            fn get(&self, handle: Handle<$element>) -> Option<&$element> {
                self.$field.get(handle)
            }
            fn get_mut(&mut self, handle: Handle<$element>) -> Option<&mut $element> {
                self.$field.get_mut(handle)
            }
            fn emplace(&mut self, element: $element) -> Handle<$element> {
                self.$field.emplace(element)
            }
            fn remove(&mut self, handle: Handle<$element>) {
                self.$field.remove(handle)
            }
            fn count(&self) -> usize {
                self.$field.count()
            }
            fn handles(&self) -> Vec<Handle<$element>> {
                self.$field.handles()
            }
        }
    };
}

arena_element_store!(Edge, edges);
arena_element_store!(Vertex, vertices);
arena_element_store!(Face, faces);
arena_element_store!(Point, points);

impl Kernel for BasicKernel {
    fn defrag(&mut self) {
        log::warn!("defrag not yet implemented.");
    }
}
