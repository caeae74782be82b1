// src/depth.rs

//! Line-of-sight depth selection.
//!
//! A slab only integrates `box_depth_fraction` of the domain along the
//! projection axis, centered on `projection_center[axis]`. Because the
//! domain is periodic the window can run off either end, in which case it
//! becomes two disjoint pieces that hug opposite faces of the box.

use log::trace;

use crate::geometry::{Axis, DomainGeometry};
use crate::predicate::CellPredicate;

/// Closed interval in normalized domain units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// The selected depth range, in normalized `[0, 1]` units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepthWindow {
    /// The whole depth of the box.
    Full,
    Single(Interval),
    /// Wrapped across a face: the union of both intervals.
    Wrapped(Interval, Interval),
}

impl DepthWindow {
    pub fn intervals(&self) -> Vec<Interval> {
        match *self {
            DepthWindow::Full => vec![Interval::new(0.0, 1.0)],
            DepthWindow::Single(i) => vec![i],
            DepthWindow::Wrapped(a, b) => vec![a, b],
        }
    }
}

/// Builds the depth predicate for one projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthCutBuilder {
    axis: Axis,
    center: f64,
    depth_fraction: f64,
}

impl DepthCutBuilder {
    /// `center` is `projection_center[axis]` in normalized units; values
    /// outside `[0, 1)` are taken modulo 1.
    pub fn new(axis: Axis, center: f64, depth_fraction: f64) -> Self {
        Self {
            axis,
            center: center.rem_euclid(1.0),
            depth_fraction,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn window(&self) -> DepthWindow {
        if self.depth_fraction >= 1.0 {
            return DepthWindow::Full;
        }
        let depth_left = self.center - 0.5 * self.depth_fraction;
        let depth_right = self.center + 0.5 * self.depth_fraction;

        if depth_left < 0.0 {
            DepthWindow::Wrapped(
                Interval::new(0.0, depth_right),
                Interval::new(depth_left + 1.0, 1.0),
            )
        } else if depth_right > 1.0 {
            DepthWindow::Wrapped(
                Interval::new(0.0, depth_right - 1.0),
                Interval::new(depth_left, 1.0),
            )
        } else {
            DepthWindow::Single(Interval::new(depth_left, depth_right))
        }
    }

    /// The window expressed as a predicate in `domain` coordinates.
    pub fn predicate(&self, domain: &DomainGeometry) -> CellPredicate {
        let extent = domain.extent(self.axis);
        let to_domain = |i: Interval| {
            CellPredicate::overlaps(
                self.axis,
                extent.denormalize(i.low),
                extent.denormalize(i.high),
            )
        };
        let predicate = match self.window() {
            DepthWindow::Full => CellPredicate::All,
            DepthWindow::Single(i) => to_domain(i),
            DepthWindow::Wrapped(a, b) => CellPredicate::any_of([to_domain(a), to_domain(b)]),
        };
        trace!("Depth cut along {}: {}", self.axis, predicate);
        predicate
    }
}
