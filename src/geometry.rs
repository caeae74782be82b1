// src/geometry.rs

//! Axes, periodic domain extents and image bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// One of the three simulation axes.
///
/// Serialized as its index (`0`, `1`, `2`) so configuration files can keep
/// the conventional integer form. Anything else fails at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two image axes orthogonal to `self`, taken as
    /// `((axis + 1) % 3, (axis + 2) % 3)`.
    pub fn lateral(self) -> (Axis, Axis) {
        let i = self.index();
        (Axis::ALL[(i + 1) % 3], Axis::ALL[(i + 2) % 3])
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl TryFrom<u8> for Axis {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            other => Err(ConfigError::InvalidAxis(other)),
        }
    }
}

impl From<Axis> for u8 {
    fn from(axis: Axis) -> Self {
        axis.index() as u8
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extent of the periodic domain along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisExtent {
    pub left_edge: f64,
    pub right_edge: f64,
}

impl AxisExtent {
    pub fn new(left_edge: f64, right_edge: f64) -> Self {
        Self {
            left_edge,
            right_edge,
        }
    }

    pub fn width(&self) -> f64 {
        self.right_edge - self.left_edge
    }

    pub fn center(&self) -> f64 {
        0.5 * (self.left_edge + self.right_edge)
    }

    /// Maps a normalized coordinate (`0` at the left edge, `1` at the right
    /// edge) into domain coordinates.
    pub fn denormalize(&self, u: f64) -> f64 {
        self.left_edge + u * self.width()
    }
}

impl Default for AxisExtent {
    fn default() -> Self {
        AxisExtent::new(0.0, 1.0)
    }
}

/// The periodic simulation domain, one extent per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DomainGeometry {
    pub axes: [AxisExtent; 3],
}

impl DomainGeometry {
    pub fn new(left_edge: [f64; 3], right_edge: [f64; 3]) -> Self {
        Self {
            axes: [
                AxisExtent::new(left_edge[0], right_edge[0]),
                AxisExtent::new(left_edge[1], right_edge[1]),
                AxisExtent::new(left_edge[2], right_edge[2]),
            ],
        }
    }

    /// The unit cube, `[0, 1)` on every axis.
    pub fn unit() -> Self {
        Self::default()
    }

    pub fn extent(&self, axis: Axis) -> AxisExtent {
        self.axes[axis.index()]
    }

    pub fn center(&self) -> [f64; 3] {
        [
            self.axes[0].center(),
            self.axes[1].center(),
            self.axes[2].center(),
        ]
    }

    /// Extents of the two image axes for a projection along `axis`.
    pub fn lateral(&self, axis: Axis) -> [AxisExtent; 2] {
        let (a, b) = axis.lateral();
        [self.extent(a), self.extent(b)]
    }
}

/// Rectangle handed to the resampler, in lateral domain coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ImageBounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}
