// src/tiling/shift.rs

//! Lateral offset, periodic wrap and boundary duplication.

use bitflags::bitflags;
use log::{debug, trace};

use super::TiledRegion;
use crate::slab::{PixelRecord, ProjectionSlab};

bitflags! {
    /// Edges of the tiled square a record's extent crosses.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EdgeFlags: u8 {
        const X_RIGHT  = 1 << 0;
        const Y_TOP    = 1 << 1;
        const X_LEFT   = 1 << 2;
        const Y_BOTTOM = 1 << 3;
    }
}

/// A side of the tiled square that records may hang over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    XRight,
    YTop,
    XLeft,
    YBottom,
}

impl Edge {
    /// Order in which duplicate groups are appended to the slab.
    pub const ALL: [Edge; 4] = [Edge::XRight, Edge::YTop, Edge::XLeft, Edge::YBottom];

    pub fn image_axis(self) -> usize {
        match self {
            Edge::XRight | Edge::XLeft => 0,
            Edge::YTop | Edge::YBottom => 1,
        }
    }

    pub fn flag(self) -> EdgeFlags {
        match self {
            Edge::XRight => EdgeFlags::X_RIGHT,
            Edge::YTop => EdgeFlags::Y_TOP,
            Edge::XLeft => EdgeFlags::X_LEFT,
            Edge::YBottom => EdgeFlags::Y_BOTTOM,
        }
    }

    fn is_high_side(self) -> bool {
        matches!(self, Edge::XRight | Edge::YTop)
    }

    pub fn straddled_by(self, record: &PixelRecord, region: &TiledRegion) -> bool {
        let axis = self.image_axis();
        let pos = record.position(axis);
        let half = record.half_width(axis);
        if self.is_high_side() {
            pos + half > region.right(axis)
        } else {
            pos - half < region.left(axis)
        }
    }

    /// Translation that carries a straddling record to the opposite side.
    pub fn wrap_offset(self, region: &TiledRegion) -> f64 {
        let span = region.span(self.image_axis());
        if self.is_high_side() {
            -span
        } else {
            span
        }
    }

    /// The copy of `record` placed on the opposite side of this edge.
    pub fn duplicate(self, record: &PixelRecord, region: &TiledRegion) -> PixelRecord {
        let mut copy = *record;
        *copy.position_mut(self.image_axis()) += self.wrap_offset(region);
        copy
    }
}

pub fn straddled_edges(record: &PixelRecord, region: &TiledRegion) -> EdgeFlags {
    Edge::ALL
        .iter()
        .filter(|edge| edge.straddled_by(record, region))
        .fold(EdgeFlags::empty(), |flags, edge| flags | edge.flag())
}

/// Subtracts `offset` from every position and folds records that left the
/// tiled square back into it.
///
/// For offsets within one domain width this is the single `+ n * width` wrap
/// on the low side. Larger offsets are reduced modulo the tiled span so
/// that shifting by a whole extra domain width gives the same layout.
pub fn shift_and_wrap(slab: &mut ProjectionSlab, offset: [f64; 2], region: &TiledRegion) {
    let mut wrapped = [0usize; 2];
    for record in slab.records.iter_mut() {
        for axis in 0..2 {
            let left = region.left(axis);
            let pos = record.position_mut(axis);
            *pos -= offset[axis];
            if *pos < left || *pos >= region.right(axis) {
                *pos = left + (*pos - left).rem_euclid(region.span(axis));
                wrapped[axis] += 1;
            }
        }
    }
    debug!(
        "Shifted {} records by ({}, {}); wrapped {} in x, {} in y",
        slab.len(),
        offset[0],
        offset[1],
        wrapped[0],
        wrapped[1]
    );
}

/// Appends a copy of each record hanging over an edge of the tiled square,
/// placed on the opposite side.
///
/// Each edge is tested against the wrapped records only. A record that
/// crosses a corner gets one copy per axis, but those copies are not tested
/// again for the other axis, so the diagonal copy is never made.
pub fn duplicate_boundary(slab: ProjectionSlab, region: &TiledRegion) -> ProjectionSlab {
    let base = slab.records;
    let mut duplicates = Vec::new();
    for edge in Edge::ALL {
        let before = duplicates.len();
        duplicates.extend(
            base.iter()
                .filter(|r| edge.straddled_by(r, region))
                .map(|r| edge.duplicate(r, region)),
        );
        trace!("Edge {:?}: {} duplicates", edge, duplicates.len() - before);
    }
    debug!(
        "Boundary duplication added {} records to {}",
        duplicates.len(),
        base.len()
    );

    let mut records = base;
    records.append(&mut duplicates);
    ProjectionSlab::new(records)
}
