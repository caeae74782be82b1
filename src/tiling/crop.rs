// src/tiling/crop.rs

use log::debug;

use crate::slab::ProjectionSlab;

/// Trims an oversized tiling down to the requested field of view.
///
/// Keeps records whose low edge starts before `limits[0]` in x, then, among
/// those, before `limits[1]` in y. Records that still hang over a limit are
/// kept whole; no area weighting is applied to the partial overlap.
pub fn crop(mut slab: ProjectionSlab, limits: [f64; 2]) -> ProjectionSlab {
    let before = slab.len();
    slab.records.retain(|r| r.x - r.half_dx < limits[0]);
    let after_x = slab.len();
    slab.records.retain(|r| r.y - r.half_dy < limits[1]);
    debug!(
        "Cropped to ({}, {}): {} -> {} (x) -> {} (y) records",
        limits[0],
        limits[1],
        before,
        after_x,
        slab.len()
    );
    slab
}
