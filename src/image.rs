// src/image.rs

//! Fixed-resolution output images.

use serde::{Deserialize, Serialize};

use crate::error::SlabError;

/// A square `pixels x pixels` image, stored row-major.
///
/// Column `i` runs along the first image axis and row `j` along the second,
/// so the sample at `(i, j)` lives at `data[j * pixels + i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pixels: usize,
    data: Vec<f64>,
}

impl Image {
    pub fn zeros(pixels: usize) -> Self {
        Self {
            pixels,
            data: vec![0.0; pixels * pixels],
        }
    }

    pub fn pixels(&self) -> usize {
        self.pixels
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[j * self.pixels + i]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[j * self.pixels + i] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.pixels.max(1))
    }

    pub fn is_all_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Pixel-wise product with `other`, which must have the same shape.
    pub fn multiply_in_place(&mut self, other: &Image) -> Result<(), SlabError> {
        if self.pixels != other.pixels {
            return Err(SlabError::ImageShape {
                left: self.pixels,
                right: other.pixels,
            });
        }
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a *= *b;
        }
        Ok(())
    }
}

/// Result of one slab invocation, handed to the light-cone stacker.
///
/// When a weight field was requested, `field` already carries the product
/// `field * weight` and `weight_field` holds the weight image so the stacker
/// can normalize across slabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputImage {
    pub field: Image,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_field: Option<Image>,
}
