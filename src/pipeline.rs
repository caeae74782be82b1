// src/pipeline.rs

//! Builds one light-cone slab from one snapshot.
//!
//! `SlabPipeline` wires the projection collaborator, the tiling stages and
//! the resampler together. One call to `run` is one invocation: it owns all
//! of its intermediate record collections, holds no state between calls and
//! does nothing random. The caller supplies the randomized
//! `projection_center`, and can run invocations for different snapshots in
//! parallel since they share nothing mutable.

use anyhow::Result;
use log::{debug, info};

use crate::config::{Config, TilingSpec};
use crate::depth::DepthCutBuilder;
use crate::geometry::DomainGeometry;
use crate::image::OutputImage;
use crate::predicate::CellPredicate;
use crate::resample::Resampler;
use crate::slab::{Channel, ProjectionSlab};
use crate::source::{ProjectionRequest, SnapshotSource};
use crate::tiling::{self, TiledRegion};

/// Coordinates the collaborators for slab construction.
///
/// Both dependencies are trait objects so tests and alternative data
/// backends can be swapped in freely.
pub struct SlabPipeline<'a> {
    source: &'a dyn SnapshotSource,
    resampler: &'a dyn Resampler,
}

impl<'a> SlabPipeline<'a> {
    pub fn new(source: &'a dyn SnapshotSource, resampler: &'a dyn Resampler) -> Self {
        SlabPipeline { source, resampler }
    }

    /// Runs every stage for `config` and returns the resampled image(s).
    ///
    /// Fails before touching the source if the configuration is invalid.
    /// Errors from the source or the resampler are passed through as is.
    pub fn run(&self, config: &Config) -> Result<OutputImage> {
        config.validate()?;
        let spec = &config.slice;
        let source_name = if spec.source.is_empty() {
            self.source.identifier()
        } else {
            spec.source.as_str()
        };
        info!(
            "Making projection at z = {:.6} from {}.",
            spec.redshift, source_name
        );

        let domain = self.source.domain();
        let region = self.region(config, &domain);
        let slab = self.project(config, &domain, &region)?;

        let (slab, tiled) = tile_slab(slab, spec, &domain);
        let bounds = tiled.image_bounds();

        let mut field = self
            .resampler
            .resample(&slab, Channel::Value, &bounds, config.pixels)?;

        let weight_field = if config.fields.weight.is_some() {
            slab.require_weights()?;
            let weight = self
                .resampler
                .resample(&slab, Channel::Weight, &bounds, config.pixels)?;
            field.multiply_in_place(&weight)?;
            Some(weight)
        } else {
            None
        };

        Ok(OutputImage {
            field,
            weight_field,
        })
    }

    /// Depth cut for this slab, ANDed with any configured field cuts.
    fn region(&self, config: &Config, domain: &DomainGeometry) -> CellPredicate {
        let spec = &config.slice;
        let depth = DepthCutBuilder::new(
            spec.projection_axis,
            spec.depth_center(),
            spec.box_depth_fraction,
        )
        .predicate(domain);
        CellPredicate::all_of(config.field_cuts.iter().cloned().chain(std::iter::once(depth)))
    }

    /// Projects the field and, when requested, the weight field itself, and
    /// pairs them record by record.
    fn project(
        &self,
        config: &Config,
        domain: &DomainGeometry,
        region: &CellPredicate,
    ) -> Result<ProjectionSlab> {
        let weight_name = config.fields.weight.as_deref();
        let request = ProjectionRequest {
            field: &config.fields.name,
            axis: config.slice.projection_axis,
            weight_field: weight_name,
            center: domain.center(),
        };
        let slab = self.source.project(&request, region)?;

        let Some(weight_name) = weight_name else {
            return Ok(slab);
        };
        let weight_request = ProjectionRequest {
            field: weight_name,
            weight_field: None,
            ..request
        };
        let weights = self.source.project(&weight_request, region)?;
        Ok(slab.attach_weights(&weights)?)
    }
}

/// Runs the geometric stages on a single-copy slab: replicate, shift and
/// wrap, duplicate boundary records, crop.
///
/// Returns the cropped slab together with the tiled region it was laid out
/// on (whose `image_bounds` is the resampling rectangle).
pub fn tile_slab(
    slab: ProjectionSlab,
    spec: &TilingSpec,
    domain: &DomainGeometry,
) -> (ProjectionSlab, TiledRegion) {
    let lateral = domain.lateral(spec.projection_axis);
    let region = TiledRegion::new(lateral, spec.box_width_fraction);
    let center = spec.lateral_center();
    let offset = [
        center[0] * lateral[0].width(),
        center[1] * lateral[1].width(),
    ];

    let projected = slab.len();
    let mut slab = tiling::replicate(&slab, &region);
    tiling::shift_and_wrap(&mut slab, offset, &region);
    let slab = tiling::duplicate_boundary(slab, &region);
    let slab = tiling::crop(slab, region.crop_limits());
    debug!(
        "Tiled {} projected records into {} records over {:?}",
        projected,
        slab.len(),
        region.image_bounds()
    );
    (slab, region)
}

#[cfg(test)]
mod tests;
