//! Element records stored in the arenas.
//!
//! Each record starts with an [`ElementHeader`] (status, scratch tag and slot
//! generation) followed by its topological links, all expressed as handles.

use hashbrown::HashSet;

use super::handle::{EdgeHandle, FaceHandle, Generation, Handle, PointHandle, VertexHandle};
use super::kernel::Kernel;
use crate::geometry::{Normal, Position};
use crate::mesh_error::ElementKind;

/// Whether a slot holds a live record or sits on the free list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u16)]
pub enum ElementStatus {
    #[default]
    Active = 0x0000,
    Inactive = 0x8000,
}

/// Bookkeeping shared by every element record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHeader {
    pub status: ElementStatus,
    /// Scratch field for loop and visitation marking.
    pub tag: u16,
    /// Starts at 1; 0 is reserved for handles that skip the check.
    pub generation: Generation,
}

impl Default for ElementHeader {
    fn default() -> Self {
        Self {
            status: ElementStatus::Active,
            tag: 0,
            generation: 1,
        }
    }
}

impl ElementHeader {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ElementStatus::Active
    }
}

/// Common interface of the four record types.
pub trait Element: Clone + Default + 'static {
    const KIND: ElementKind;

    fn header(&self) -> &ElementHeader;
    fn header_mut(&mut self) -> &mut ElementHeader;

    /// Look `handle` up in `kernel`'s store for this element kind.
    fn resolve<'k>(kernel: &'k dyn Kernel, handle: Handle<Self>) -> Option<&'k Self>;

    #[inline]
    fn generation(&self) -> Generation {
        self.header().generation
    }

    #[inline]
    fn is_active(&self) -> bool {
        self.header().is_active()
    }
}

/// One directed side of a mesh edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edge {
    pub header: ElementHeader,
    /// Vertex this half-edge leaves from.
    pub vertex: VertexHandle,
    /// Face on this side; invalid while the edge is on an open boundary.
    pub face: FaceHandle,
    pub next: EdgeHandle,
    pub prev: EdgeHandle,
    /// Opposite-direction twin. Always set for edges made in pairs.
    pub adjacent: EdgeHandle,
}

/// A corner of a face loop, bound to a shared [`Point`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    pub header: ElementHeader,
    pub point: PointHandle,
    /// Outgoing edge whose `vertex` is this vertex.
    pub edge: EdgeHandle,
    pub normal: Option<Normal>,
}

/// A face bounded by one closed loop of edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Face {
    pub header: ElementHeader,
    pub root_edge: EdgeHandle,
    /// Every edge of the loop, unordered.
    pub edges: HashSet<EdgeHandle>,
    pub normal: Option<Normal>,
}

/// A position in space shared by any number of vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    pub header: ElementHeader,
    pub position: Position,
    pub normal: Option<Normal>,
    /// Back-references to the vertices bound to this point.
    pub vertices: HashSet<VertexHandle>,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::at([x, y, z])
    }

    pub fn at(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl From<Position> for Point {
    fn from(position: Position) -> Self {
        Self::at(position)
    }
}

impl Vertex {
    pub fn new(point: PointHandle, edge: EdgeHandle) -> Self {
        Self {
            point,
            edge,
            ..Self::default()
        }
    }
}

impl Face {
    pub fn new(root_edge: EdgeHandle) -> Self {
        Self {
            root_edge,
            ..Self::default()
        }
    }
}

// -----------------------------------------------------------------------------
// Element impls
// -----------------------------------------------------------------------------

impl Element for Edge {
    const KIND: ElementKind = ElementKind::Edge;

    fn header(&self) -> &ElementHeader {
        &self.header
    }
    fn header_mut(&mut self) -> &mut ElementHeader {
        &mut self.header
    }
    fn resolve<'k>(kernel: &'k dyn Kernel, handle: EdgeHandle) -> Option<&'k Self> {
        kernel.edge(handle)
    }
}

impl Element for Vertex {
    const KIND: ElementKind = ElementKind::Vertex;

    fn header(&self) -> &ElementHeader {
        &self.header
    }
    fn header_mut(&mut self) -> &mut ElementHeader {
        &mut self.header
    }
    fn resolve<'k>(kernel: &'k dyn Kernel, handle: VertexHandle) -> Option<&'k Self> {
        kernel.vertex(handle)
    }
}

impl Element for Face {
    const KIND: ElementKind = ElementKind::Face;

    fn header(&self) -> &ElementHeader {
        &self.header
    }
    fn header_mut(&mut self) -> &mut ElementHeader {
        &mut self.header
    }
    fn resolve<'k>(kernel: &'k dyn Kernel, handle: FaceHandle) -> Option<&'k Self> {
        kernel.face(handle)
    }
}

impl Element for Point {
    const KIND: ElementKind = ElementKind::Point;

    fn header(&self) -> &ElementHeader {
        &self.header
    }
    fn header_mut(&mut self) -> &mut ElementHeader {
        &mut self.header
    }
    fn resolve<'k>(kernel: &'k dyn Kernel, handle: PointHandle) -> Option<&'k Self> {
        kernel.point(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_start_active_at_generation_one() {
        let e = Edge::default();
        assert!(e.is_active());
        assert_eq!(e.generation(), 1);
        assert_eq!(e.header.tag, 0);
        assert!(!e.adjacent.is_valid());
    }

    #[test]
    fn edges_can_be_updated() {
        let mut edge = Edge::default();
        let vert = VertexHandle::new(3);
        edge.vertex = vert;
        assert_eq!(edge.vertex, vert);
    }

    #[test]
    fn points_carry_their_position() {
        let p = Point::new(1.0, 2.0, 3.0);
        assert_eq!(p.position, [1.0, 2.0, 3.0]);
        assert!(p.vertices.is_empty());
        assert_eq!(Point::from([1.0, 2.0, 3.0]), p);
    }
}
