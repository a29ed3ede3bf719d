//! Traversal proxies: copyable `(kernel, handle)` pairs for graph navigation.
//!
//! An [`ElementRef`] never fails. Navigating from a proxy whose handle does
//! not resolve yields an invalid proxy, and every accessor on an invalid
//! proxy yields another invalid proxy, so long chains such as
//! `edge.next().adjacent().next().vertex().point()` are always safe to write
//! and can be checked once at the end with [`ElementRef::is_valid`].

use std::fmt;

use hashbrown::HashSet;

use super::element::{Edge, Element, Face, Point, Vertex};
use super::handle::{EdgeHandle, Handle, VertexHandle};
use super::kernel::Kernel;
use crate::geometry::metrics::{polygon_area, polygon_normal};
use crate::geometry::{Normal, Position};

/// A handle bound to the kernel it should be resolved against.
pub struct ElementRef<'a, E: Element> {
    kernel: Option<&'a dyn Kernel>,
    handle: Handle<E>,
}

pub type EdgeRef<'a> = ElementRef<'a, Edge>;
pub type VertexRef<'a> = ElementRef<'a, Vertex>;
pub type FaceRef<'a> = ElementRef<'a, Face>;
pub type PointRef<'a> = ElementRef<'a, Point>;

impl<'a, E: Element> ElementRef<'a, E> {
    pub fn new(kernel: &'a dyn Kernel, handle: Handle<E>) -> Self {
        Self {
            kernel: Some(kernel),
            handle,
        }
    }

    /// A proxy bound to nothing.
    pub const fn invalid() -> Self {
        Self {
            kernel: None,
            handle: Handle::INVALID,
        }
    }

    #[inline]
    pub fn handle(&self) -> Handle<E> {
        self.handle
    }

    /// The record behind this proxy, if it still resolves.
    pub fn element(&self) -> Option<&'a E> {
        self.kernel.and_then(|k| E::resolve(k, self.handle))
    }

    /// Bound to a kernel, not the sentinel, and resolvable.
    pub fn is_valid(&self) -> bool {
        self.kernel.is_some() && self.handle.is_valid() && self.element().is_some()
    }

    /// Proxy for the handle `link` reads from this element, or an invalid
    /// proxy if this element does not resolve.
    fn follow<F: Element>(&self, link: impl FnOnce(&E) -> Handle<F>) -> ElementRef<'a, F> {
        match (self.kernel, self.element()) {
            (Some(kernel), Some(element)) => ElementRef::new(kernel, link(element)),
            _ => {
                log::debug!("Navigation from unresolvable {}; returning invalid proxy", self.handle);
                ElementRef::invalid()
            }
        }
    }
}

impl<E: Element> Clone for ElementRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Element> Copy for ElementRef<'_, E> {}

impl<E: Element> Default for ElementRef<'_, E> {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Proxies compare by handle only.
impl<E: Element> PartialEq for ElementRef<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<E: Element> Eq for ElementRef<'_, E> {}

impl<E: Element> fmt::Debug for ElementRef<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("handle", &self.handle)
            .field("bound", &self.kernel.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Edge navigation
// -----------------------------------------------------------------------------

impl<'a> ElementRef<'a, Edge> {
    /// Vertex the edge leaves from.
    pub fn vertex(&self) -> VertexRef<'a> {
        self.follow(|e| e.vertex)
    }

    pub fn face(&self) -> FaceRef<'a> {
        self.follow(|e| e.face)
    }

    pub fn next(&self) -> EdgeRef<'a> {
        self.follow(|e| e.next)
    }

    pub fn prev(&self) -> EdgeRef<'a> {
        self.follow(|e| e.prev)
    }

    pub fn adjacent(&self) -> EdgeRef<'a> {
        self.follow(|e| e.adjacent)
    }

    /// True if the edge does not resolve, has no face, or its twin has no
    /// face.
    pub fn is_boundary(&self) -> bool {
        if self.element().is_none() {
            return true;
        }
        !self.face().is_valid() || !self.adjacent().face().is_valid()
    }

    /// Origin and destination points.
    pub fn points(&self) -> [PointRef<'a>; 2] {
        [self.vertex().point(), self.next().vertex().point()]
    }

    /// Origin and destination vertices.
    pub fn vertices(&self) -> [VertexRef<'a>; 2] {
        [self.vertex(), self.next().vertex()]
    }
}

// -----------------------------------------------------------------------------
// Face navigation and queries
// -----------------------------------------------------------------------------

impl<'a> ElementRef<'a, Face> {
    pub fn root_edge(&self) -> EdgeRef<'a> {
        self.follow(|f| f.root_edge)
    }

    /// The face's edge set; empty for an invalid proxy.
    pub fn edges(&self) -> HashSet<EdgeHandle> {
        self.element().map(|f| f.edges.clone()).unwrap_or_default()
    }

    /// Loop edges in `next` order starting at the root edge.
    ///
    /// Stops early if the loop is broken; never yields more edges than the
    /// face's edge set holds.
    pub fn loop_edges(&self) -> Vec<EdgeRef<'a>> {
        let Some(face) = self.element() else {
            return Vec::new();
        };
        let root = self.root_edge();
        let mut out = Vec::with_capacity(face.edges.len());
        let mut current = root;
        while current.is_valid() && out.len() < face.edges.len() {
            out.push(current);
            current = current.next();
            if current == root {
                break;
            }
        }
        out
    }

    /// Positions of the loop's corners, or `None` if any corner is missing.
    pub fn corner_positions(&self) -> Option<Vec<Position>> {
        let loop_edges = self.loop_edges();
        if loop_edges.is_empty() {
            return None;
        }
        loop_edges
            .iter()
            .map(|e| e.vertex().point().position())
            .collect()
    }

    /// Area of the face, summed over the fan at its first corner.
    pub fn area(&self) -> Option<f64> {
        let corners = self.corner_positions()?;
        polygon_area(&corners)
            .map_err(|e| log::warn!("Unable to compute area of {}: {e}", self.handle))
            .ok()
    }

    /// Normal computed from the current corner positions (not stored).
    pub fn compute_normal(&self) -> Option<Normal> {
        let corners = self.corner_positions()?;
        polygon_normal(&corners)
            .map_err(|e| log::warn!("Unable to compute normal of {}: {e}", self.handle))
            .ok()
    }

    /// Stored normal, if one has been calculated.
    pub fn normal(&self) -> Option<Normal> {
        self.element().and_then(|f| f.normal)
    }
}

// -----------------------------------------------------------------------------
// Vertex and point navigation
// -----------------------------------------------------------------------------

impl<'a> ElementRef<'a, Vertex> {
    /// Outgoing edge.
    pub fn edge(&self) -> EdgeRef<'a> {
        self.follow(|v| v.edge)
    }

    pub fn point(&self) -> PointRef<'a> {
        self.follow(|v| v.point)
    }

    /// Face of the outgoing edge.
    pub fn face(&self) -> FaceRef<'a> {
        self.edge().face()
    }

    pub fn normal(&self) -> Option<Normal> {
        self.element().and_then(|v| v.normal)
    }
}

impl<'a> ElementRef<'a, Point> {
    pub fn position(&self) -> Option<Position> {
        self.element().map(|p| p.position)
    }

    pub fn normal(&self) -> Option<Normal> {
        self.element().and_then(|p| p.normal)
    }

    /// Vertices bound to this point; empty for an invalid proxy.
    pub fn vertices(&self) -> HashSet<VertexHandle> {
        self.element().map(|p| p.vertices.clone()).unwrap_or_default()
    }
}
