//! Edge-loop builder: lays down one closed loop of edges a point at a time.
//!
//! The builder keeps a cursor made of the last edge laid down and the
//! *pending* point, which is where that edge ends. Each
//! [`add_point`](EdgeLoopBuilder::add_point) starts a new edge at the pending
//! point; [`close`](EdgeLoopBuilder::close) connects the last edge back to the
//! root edge, whose origin becomes the final pending point.
//!
//! A builder that fails to initialise, or that has been closed, is
//! *unusable*: further calls only emit diagnostics.

use crate::topology::element::{Element, Point};
use crate::topology::handle::{EdgeHandle, PointHandle};
use crate::topology::kernel::{ElementStore, Kernel, KernelTopologyExt};
use crate::topology::refs::EdgeRef;

pub struct EdgeLoopBuilder<'k> {
    kernel: &'k mut dyn Kernel,
    root_edge: EdgeHandle,
    last_edge: EdgeHandle,
    root_point: PointHandle,
    /// Invalid once the builder is unusable.
    last_point: PointHandle,
}

impl<'k> EdgeLoopBuilder<'k> {
    /// Start a new loop at `point` with a fresh edge pair as its root.
    ///
    /// Allocates nothing if `point` does not resolve.
    pub fn from_point(kernel: &'k mut dyn Kernel, point: PointHandle) -> Self {
        let mut builder = Self::unusable(kernel);
        let Some(point) = ElementStore::<Point>::canonical(&*builder.kernel, point) else {
            log::error!("Loop builder initialized with invalid root point index.");
            return builder;
        };
        let root = builder.kernel.make_edge_pair();
        if !root.is_valid() {
            log::error!("Loop builder could not allocate its root edge.");
            return builder;
        }
        builder.root_edge = root;
        builder.last_edge = root;
        builder.root_point = point;
        builder.last_point = point;
        builder
    }

    /// Start a loop on the free side of an existing edge.
    ///
    /// `edge` becomes the root and must not belong to a face yet. The loop
    /// starts where `edge` ends, which is the origin of its adjacent edge, so
    /// the new loop runs along `edge` opposite to the face on the other side.
    pub fn from_edge(kernel: &'k mut dyn Kernel, edge: EdgeHandle) -> Self {
        let mut builder = Self::unusable(kernel);
        let Some((root, point)) = seed_from_edge(&*builder.kernel, edge) else {
            return builder;
        };
        builder.root_edge = root;
        builder.last_edge = root;
        builder.root_point = point;
        builder.last_point = point;
        builder
    }

    fn unusable(kernel: &'k mut dyn Kernel) -> Self {
        Self {
            kernel,
            root_edge: EdgeHandle::INVALID,
            last_edge: EdgeHandle::INVALID,
            root_point: PointHandle::INVALID,
            last_point: PointHandle::INVALID,
        }
    }

    /// `false` once initialisation failed or the loop was closed.
    pub fn is_usable(&self) -> bool {
        self.last_point.is_valid()
    }

    pub fn root_edge(&self) -> EdgeHandle {
        self.root_edge
    }

    pub fn last_edge(&self) -> EdgeHandle {
        self.last_edge
    }

    /// Point the next edge will start from.
    pub fn pending_point(&self) -> PointHandle {
        self.last_point
    }

    /// Lay down an edge from the pending point and make `point` pending.
    pub fn add_point(&mut self, point: PointHandle) -> &mut Self {
        if !self.is_usable() {
            log::warn!("Unable to add point to uninitialized loop builder.");
            return self;
        }
        let Some(point) = ElementStore::<Point>::canonical(&*self.kernel, point) else {
            log::error!("Invalid point index specified. Unable to extend edge loop.");
            return self;
        };
        let current = self.kernel.make_edge_pair();
        if !current.is_valid() {
            log::error!("Unable to allocate edge. Loop builder is no longer usable.");
            self.last_point.reset();
            return self;
        }
        let vertex = self.kernel.connect_edges(self.last_edge, self.last_point, current);
        if !vertex.is_valid() {
            log::error!("Unable to connect edges. Loop builder is no longer usable.");
            self.last_point.reset();
            return self;
        }
        self.last_point = point;
        self.last_edge = current;
        self
    }

    /// Connect the last edge to the root through the pending point.
    ///
    /// Returns the root edge whether or not closing succeeded. Closing while
    /// the root point is still pending fails without touching the builder,
    /// which stays usable; any other close leaves it unusable.
    pub fn close(&mut self) -> EdgeHandle {
        if !self.is_usable() {
            log::error!("Unable to close an uninitialized loop builder.");
        } else if self.last_point == self.root_point {
            log::error!(
                "Unable to close loop when the previous point and the root point are the same."
            );
        } else {
            let vertex = self
                .kernel
                .connect_edges(self.last_edge, self.last_point, self.root_edge);
            if !vertex.is_valid() {
                log::error!("Unable to connect the last edge back to the root.");
            }
            self.last_point.reset();
        }
        self.root_edge
    }
}

/// Canonical root edge and starting point for a loop on the free side of
/// `edge`.
fn seed_from_edge(kernel: &dyn Kernel, edge: EdgeHandle) -> Option<(EdgeHandle, PointHandle)> {
    if !edge.is_valid() {
        log::error!("Loop builder initialized with invalid root edge.");
        return None;
    }
    let root = EdgeRef::new(kernel, edge);
    let Some(record) = root.element() else {
        log::error!("Loop builder initialized with unresolvable root edge {edge}.");
        return None;
    };
    if root.face().is_valid() {
        log::error!("Root edge {edge} already belongs to a face. Unable to initialize loop builder.");
        return None;
    }
    let adjacent = root.adjacent();
    if !adjacent.is_valid() {
        log::error!("Root edge {edge} has no adjacent edge. Unable to initialize loop builder.");
        return None;
    }
    let start = adjacent.vertex().point();
    if !start.is_valid() {
        log::error!("Loop builder initialized with edge that has no valid points.");
        return None;
    }
    let root = EdgeHandle::with_generation(edge.offset(), record.generation());
    Some((root, start.handle()))
}
