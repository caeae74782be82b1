// src/slab.rs

//! Irregular-resolution projection data.
//!
//! A `ProjectionSlab` is the unordered set of `PixelRecord`s produced by one
//! projection of one snapshot. When a weight field is requested, its values
//! ride on the same records as the science field, so every geometric stage
//! moves field and weight together and the two can never fall out of step.

use serde::{Deserialize, Serialize};

use crate::error::SlabError;

/// One rectangular sample of the projected field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRecord {
    /// Center along the first image axis, in domain coordinates.
    pub x: f64,
    /// Center along the second image axis, in domain coordinates.
    pub y: f64,
    pub half_dx: f64,
    pub half_dy: f64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl PixelRecord {
    pub fn new(x: f64, y: f64, half_dx: f64, half_dy: f64, value: f64) -> Self {
        Self {
            x,
            y,
            half_dx,
            half_dy,
            value,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Position along image axis `0` (x) or `1` (y).
    pub fn position(&self, image_axis: usize) -> f64 {
        if image_axis == 0 {
            self.x
        } else {
            self.y
        }
    }

    pub fn position_mut(&mut self, image_axis: usize) -> &mut f64 {
        if image_axis == 0 {
            &mut self.x
        } else {
            &mut self.y
        }
    }

    pub fn half_width(&self, image_axis: usize) -> f64 {
        if image_axis == 0 {
            self.half_dx
        } else {
            self.half_dy
        }
    }

    pub fn same_geometry(&self, other: &PixelRecord) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.half_dx == other.half_dx
            && self.half_dy == other.half_dy
    }

    pub fn channel(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Value => Some(self.value),
            Channel::Weight => self.weight,
        }
    }
}

/// Which per-record quantity a resampler should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Value,
    Weight,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectionSlab {
    pub records: Vec<PixelRecord>,
}

impl ProjectionSlab {
    pub fn new(records: Vec<PixelRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PixelRecord> {
        self.records.iter()
    }

    /// True when every record carries a weight. An empty slab counts as
    /// weighted so that a weighted call cropped down to nothing stays valid.
    pub fn is_weighted(&self) -> bool {
        self.records.iter().all(|r| r.weight.is_some())
    }

    /// Pairs this field slab with the separately projected weight slab.
    ///
    /// Both must hold the same number of records with identical geometry at
    /// every index; the weight slab's `value` becomes each record's `weight`.
    pub fn attach_weights(mut self, weights: &ProjectionSlab) -> Result<Self, SlabError> {
        if self.len() != weights.len() {
            return Err(SlabError::WeightCardinality {
                field: self.len(),
                weight: weights.len(),
            });
        }
        for (index, (record, weight)) in self
            .records
            .iter_mut()
            .zip(weights.records.iter())
            .enumerate()
        {
            if !record.same_geometry(weight) {
                return Err(SlabError::WeightGeometry { index });
            }
            record.weight = Some(weight.value);
        }
        Ok(self)
    }

    /// Checks that the weight channel is present on every record.
    pub fn require_weights(&self) -> Result<(), SlabError> {
        match self.records.iter().position(|r| r.weight.is_none()) {
            Some(index) => Err(SlabError::MissingWeight { index }),
            None => Ok(()),
        }
    }
}

impl FromIterator<PixelRecord> for ProjectionSlab {
    fn from_iter<I: IntoIterator<Item = PixelRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<PixelRecord> for ProjectionSlab {
    fn extend<I: IntoIterator<Item = PixelRecord>>(&mut self, iter: I) {
        self.records.extend(iter)
    }
}
