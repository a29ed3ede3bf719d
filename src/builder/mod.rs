//! Incremental builders that sequence kernel mutations into closed faces.
//!
//! - [`EdgeLoopBuilder`] lays down one loop of edges, point by point.
//! - [`MeshBuilder`] drives loop builders to add triangles and polygons and
//!   creates their faces.

pub mod edge_loop;
pub mod mesh_builder;

pub use edge_loop::EdgeLoopBuilder;
pub use mesh_builder::MeshBuilder;
