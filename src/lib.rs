// src/lib.rs

//! Randomized, periodically tiled projection slabs for light-cone mosaics.
//!
//! A light cone is stacked from 2D projections of a sequence of simulation
//! snapshots, each one shifted by a random lateral offset and cut to a
//! depth and width that depend on its redshift. This crate builds one such
//! slab: it selects the depth window, asks a `SnapshotSource` for the
//! irregular-resolution projection, tiles and shifts it across the periodic
//! domain, crops it to the requested field of view and resamples it onto a
//! fixed grid.
//!
//! Choosing the offsets, stacking slabs and running snapshots in parallel
//! are left to the caller.

pub mod config;
pub mod depth;
pub mod error;
pub mod geometry;
pub mod image;
pub mod pipeline;
pub mod predicate;
pub mod resample;
pub mod slab;
pub mod source;
pub mod tiling;

pub use config::{Config, FieldConfig, TilingSpec};
pub use depth::{DepthCutBuilder, DepthWindow, Interval};
pub use error::{ConfigError, SlabError};
pub use geometry::{Axis, AxisExtent, DomainGeometry, ImageBounds};
pub use image::{Image, OutputImage};
pub use pipeline::{tile_slab, SlabPipeline};
pub use predicate::{CellPredicate, CellView};
pub use resample::{NearestResampler, Resampler};
pub use slab::{Channel, PixelRecord, ProjectionSlab};
pub use source::{Cell, CellSnapshot, ProjectionRequest, SnapshotSource};
pub use tiling::TiledRegion;
