// src/error.rs

//! Error types for slab construction.
//!
//! `ConfigError` covers precondition failures caught before any stage runs.
//! `SlabError` covers structural problems with the record collections handed
//! over by the projection collaborator (mostly field/weight pairing).
//! Orchestration code returns `anyhow::Result` and lets these convert
//! unchanged, so callers can still `downcast_ref` them.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("box_width_fraction must be finite and > 0, got {0}")]
    InvalidBoxWidth(f64),
    #[error("box_depth_fraction must be in (0, 1], got {0}")]
    InvalidBoxDepth(f64),
    #[error("projection axis must be 0, 1 or 2, got {0}")]
    InvalidAxis(u8),
    #[error("projection_center[{axis}] must be finite, got {value}")]
    NonFiniteCenter { axis: usize, value: f64 },
    #[error("pixel resolution must be at least 1")]
    ZeroPixels,
    #[error("field name must not be empty")]
    EmptyFieldName,
    #[error("weight field name must not be empty when given")]
    EmptyWeightName,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlabError {
    #[error("field slab has {field} records but weight slab has {weight}")]
    WeightCardinality { field: usize, weight: usize },
    #[error("field and weight geometry differ at record {index}")]
    WeightGeometry { index: usize },
    #[error("record {index} has no weight value")]
    MissingWeight { index: usize },
    #[error("image shapes differ: {left} vs {right} pixels")]
    ImageShape { left: usize, right: usize },
}
