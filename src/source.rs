// src/source.rs

//! The projection collaborator.
//!
//! Slab construction starts from a 2D projection of one snapshot, restricted
//! to the cells a `CellPredicate` selects. How the projection is computed is
//! up to the implementation; the pipeline only relies on the contract below.

pub mod memory;

use anyhow::Result;

use crate::geometry::{Axis, DomainGeometry};
use crate::predicate::CellPredicate;
use crate::slab::ProjectionSlab;

pub use memory::{Cell, CellSnapshot};

/// What to project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRequest<'a> {
    pub field: &'a str,
    pub axis: Axis,
    /// When set, `field` is averaged along the line of sight with this weight.
    pub weight_field: Option<&'a str>,
    /// Center of the projection region, in domain coordinates.
    pub center: [f64; 3],
}

/// A snapshot that can be filtered by region and projected along an axis.
pub trait SnapshotSource {
    /// Name used in logs (usually the snapshot file name).
    fn identifier(&self) -> &str;

    fn domain(&self) -> DomainGeometry;

    /// Projects the cells selected by `region` along `request.axis`.
    ///
    /// Record positions are in domain coordinates on the two lateral axes
    /// (`Axis::lateral`), and the records of two calls with the same region
    /// and axis must line up one to one, whatever the field.
    fn project(&self, request: &ProjectionRequest<'_>, region: &CellPredicate) -> Result<ProjectionSlab>;
}
