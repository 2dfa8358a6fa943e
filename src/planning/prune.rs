//! Collinearity pruning of raw grid paths.
//!
//! Removes interior waypoints that lie on the straight line between their
//! neighbors, keeping only the points where the direction of travel
//! changes. This is safe only for cell-adjacent paths: every removed
//! point sits on a segment whose cells were already validated by the
//! search, so removal cannot introduce a collision. If the search ever
//! emits non-adjacent steps, the segment-safety property must be
//! re-verified before pruning.

use super::grid::Cell;

/// Determinant tolerance for the collinearity test.
const EPSILON: f32 = 1e-6;

/// Test whether three points are collinear within tolerance, using the
/// determinant of the homogeneous-coordinate matrix [[p1,1],[p2,1],[p3,1]].
#[inline]
fn collinear(p1: Cell, p2: Cell, p3: Cell) -> bool {
    let det = p1.row as f32 * (p2.col - p3.col) as f32
        + p2.row as f32 * (p3.col - p1.col) as f32
        + p3.row as f32 * (p1.col - p2.col) as f32;
    det.abs() < EPSILON
}

/// Remove redundant interior waypoints from a path.
///
/// The result is a strict subsequence of the input that always retains
/// the first and last elements. Paths of length <= 2 are returned
/// unchanged. Idempotent: pruning a pruned path is a no-op.
pub fn prune_path(path: &[Cell]) -> Vec<Cell> {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut pruned = vec![path[0]];

    for i in 1..path.len() - 1 {
        let anchor = *pruned.last().unwrap();
        if !collinear(anchor, path[i], path[i + 1]) {
            pruned.push(path[i]);
        }
    }

    pruned.push(path[path.len() - 1]);
    pruned
}
