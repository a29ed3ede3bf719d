//! Area and normal computations for triangles and planar polygons.
//!
//! Polygons are given as their corner positions in loop order. Areas are
//! accumulated over the fan anchored at the first corner, so they are exact
//! for convex polygons; normals use the summed fan cross products (the
//! polygon's vector area), which is robust for any planar loop.

use super::{Normal, Position, add, cross, norm, sub};
use crate::mesh_error::MeshError;

const EPS: f64 = 1e-12;

/// Unsigned area of the triangle `a, b, c`.
pub fn triangle_area(a: Position, b: Position, c: Position) -> f64 {
    0.5 * norm(cross(sub(b, a), sub(c, a)))
}

/// Unit normal of the triangle `a, b, c` (right-handed winding).
pub fn triangle_normal(a: Position, b: Position, c: Position) -> Result<Normal, MeshError> {
    normalize(cross(sub(b, a), sub(c, a)))
}

/// Area of the polygon with the given corners, summed over its fan.
pub fn polygon_area(corners: &[Position]) -> Result<f64, MeshError> {
    if corners.len() < 3 {
        return Err(MeshError::InvalidGeometry(format!(
            "polygon needs at least 3 corners, got {}",
            corners.len()
        )));
    }
    let anchor = corners[0];
    Ok(corners[1..]
        .windows(2)
        .map(|w| triangle_area(anchor, w[0], w[1]))
        .sum())
}

/// Unit normal of the polygon with the given corners.
pub fn polygon_normal(corners: &[Position]) -> Result<Normal, MeshError> {
    if corners.len() < 3 {
        return Err(MeshError::InvalidGeometry(format!(
            "polygon needs at least 3 corners, got {}",
            corners.len()
        )));
    }
    let anchor = corners[0];
    let area_vector = corners[1..]
        .windows(2)
        .fold([0.0; 3], |acc, w| {
            add(acc, cross(sub(w[0], anchor), sub(w[1], anchor)))
        });
    normalize(area_vector)
}

/// Scale `v` to unit length.
pub fn normalize(v: [f64; 3]) -> Result<Normal, MeshError> {
    let len = norm(v);
    if len < EPS {
        return Err(MeshError::InvalidGeometry(
            "cannot normalize a zero-length vector".into(),
        ));
    }
    Ok([v[0] / len, v[1] / len, v[2] / len])
}
