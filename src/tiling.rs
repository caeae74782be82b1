// src/tiling.rs

//! Periodic tiling of a projection slab.
//!
//! The field of view requested for a slab can be wider than one copy of the
//! simulation domain and is offset by a random lateral shift. This module
//! turns a single-copy slab into one that covers exactly
//! `box_width_fraction` domain widths on each image axis:
//!
//! 1. `replicate` lays out `n x n` copies of the slab, `n = ceil(box_width_fraction)`.
//! 2. `shift::shift_and_wrap` applies the lateral offset and folds records
//!    that fell off the low side back onto the high side.
//! 3. `shift::duplicate_boundary` copies records that straddle an edge of the
//!    tiled square onto the opposite side.
//! 4. `crop::crop` drops everything beyond the requested width.
//!
//! None of these stages touch `value` or `weight`; the field is treated as an
//! areal density and is never re-normalized at tile edges.

pub mod crop;
pub mod shift;

use log::debug;

use crate::geometry::{AxisExtent, ImageBounds};
use crate::slab::{PixelRecord, ProjectionSlab};

pub use crop::crop;
pub use shift::{duplicate_boundary, shift_and_wrap, straddled_edges, Edge, EdgeFlags};

/// The `n x n` square of domain copies a slab is tiled onto, in lateral
/// (image) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiledRegion {
    left: [f64; 2],
    width: [f64; 2],
    tiles: usize,
    box_width_fraction: f64,
}

impl TiledRegion {
    pub fn new(lateral: [AxisExtent; 2], box_width_fraction: f64) -> Self {
        let tiles = (box_width_fraction.ceil() as usize).max(1);
        Self {
            left: [lateral[0].left_edge, lateral[1].left_edge],
            width: [lateral[0].width(), lateral[1].width()],
            tiles,
            box_width_fraction,
        }
    }

    /// Number of domain copies along each image axis.
    pub fn tiles(&self) -> usize {
        self.tiles
    }

    pub fn domain_width(&self, image_axis: usize) -> f64 {
        self.width[image_axis]
    }

    pub fn left(&self, image_axis: usize) -> f64 {
        self.left[image_axis]
    }

    /// Width of the tiled square, `n * width`.
    pub fn span(&self, image_axis: usize) -> f64 {
        self.tiles as f64 * self.width[image_axis]
    }

    pub fn right(&self, image_axis: usize) -> f64 {
        self.left[image_axis] + self.span(image_axis)
    }

    /// Upper bound of the final field of view, `left + box_width_fraction * width`.
    pub fn crop_limit(&self, image_axis: usize) -> f64 {
        self.left[image_axis] + self.box_width_fraction * self.width[image_axis]
    }

    pub fn crop_limits(&self) -> [f64; 2] {
        [self.crop_limit(0), self.crop_limit(1)]
    }

    /// The rectangle the cropped slab is resampled over.
    pub fn image_bounds(&self) -> ImageBounds {
        ImageBounds {
            x_min: self.left[0],
            x_max: self.crop_limit(0),
            y_min: self.left[1],
            y_max: self.crop_limit(1),
        }
    }
}

/// Lays out `n x n` translated copies of `slab`.
///
/// The input records come first, followed by one copy per tile `(i, j)`
/// other than `(0, 0)`, translated by `(i * width_x, j * width_y)`.
pub fn replicate(slab: &ProjectionSlab, region: &TiledRegion) -> ProjectionSlab {
    let n = region.tiles();
    let mut records = Vec::with_capacity(slab.len() * n * n);
    records.extend_from_slice(&slab.records);

    for i in 0..n {
        let dx = i as f64 * region.domain_width(0);
        for j in 0..n {
            if i == 0 && j == 0 {
                continue;
            }
            let dy = j as f64 * region.domain_width(1);
            records.extend(slab.iter().map(|r| PixelRecord {
                x: r.x + dx,
                y: r.y + dy,
                ..*r
            }));
        }
    }

    debug!(
        "Replicated {} records onto {}x{} tiles: {} records",
        slab.len(),
        n,
        n,
        records.len()
    );
    ProjectionSlab::new(records)
}
