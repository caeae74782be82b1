// src/resample.rs

//! Rebinning of irregular slabs onto a fixed-resolution grid.

use anyhow::{ensure, Result};
use log::trace;

use crate::error::SlabError;
use crate::geometry::ImageBounds;
use crate::image::Image;
use crate::slab::{Channel, ProjectionSlab};

/// Turns an irregular slab into a dense `pixels x pixels` image over `bounds`.
///
/// Records may hang over `bounds`; only the covered pixels are written.
/// An empty slab must produce an all-zero image.
pub trait Resampler {
    fn resample(
        &self,
        slab: &ProjectionSlab,
        channel: Channel,
        bounds: &ImageBounds,
        pixels: usize,
    ) -> Result<Image>;
}

/// Point-sampling resampler without antialiasing.
///
/// Each pixel takes the value of the last record, in slab order, whose
/// extent contains the pixel center (half-open: `[x - half_dx, x + half_dx)`).
/// Pixels no record covers stay `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestResampler;

impl NearestResampler {
    pub fn new() -> Self {
        Self
    }
}

/// Range of pixel indices whose centers fall in `[low, high)`.
fn covered_pixels(low: f64, high: f64, origin: f64, pixel_size: f64, pixels: usize) -> (usize, usize) {
    let to_index = |edge: f64| {
        let t = ((edge - origin) / pixel_size - 0.5).ceil();
        t.clamp(0.0, pixels as f64) as usize
    };
    (to_index(low), to_index(high))
}

impl Resampler for NearestResampler {
    fn resample(
        &self,
        slab: &ProjectionSlab,
        channel: Channel,
        bounds: &ImageBounds,
        pixels: usize,
    ) -> Result<Image> {
        ensure!(
            bounds.width() > 0.0 && bounds.height() > 0.0,
            "resample bounds must have positive extent: {:?}",
            bounds
        );
        let mut image = Image::zeros(pixels);
        let px = bounds.width() / pixels as f64;
        let py = bounds.height() / pixels as f64;

        for (index, record) in slab.iter().enumerate() {
            let value = record
                .channel(channel)
                .ok_or(SlabError::MissingWeight { index })?;
            let (i0, i1) = covered_pixels(
                record.x - record.half_dx,
                record.x + record.half_dx,
                bounds.x_min,
                px,
                pixels,
            );
            let (j0, j1) = covered_pixels(
                record.y - record.half_dy,
                record.y + record.half_dy,
                bounds.y_min,
                py,
                pixels,
            );
            for j in j0..j1 {
                for i in i0..i1 {
                    image.set(i, j, value);
                }
            }
        }
        trace!(
            "Resampled {} records ({:?}) onto {}x{} pixels",
            slab.len(),
            channel,
            pixels,
            pixels
        );
        Ok(image)
    }
}
