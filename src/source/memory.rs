// src/source/memory.rs

//! An in-memory snapshot of 3D cells.
//!
//! Good enough to drive the pipeline from a JSON file or from tests: every
//! cell is an axis-aligned box with named field values, and cells that share
//! the same lateral footprint form one projected column.

use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{ProjectionRequest, SnapshotSource};
use crate::geometry::{Axis, DomainGeometry};
use crate::predicate::{CellPredicate, CellView};
use crate::slab::{PixelRecord, ProjectionSlab};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub center: [f64; 3],
    pub half_widths: [f64; 3],
    #[serde(default)]
    pub fields: BTreeMap<String, f64>,
}

impl Cell {
    pub fn new(center: [f64; 3], half_widths: [f64; 3]) -> Self {
        Self {
            center,
            half_widths,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

impl CellView for Cell {
    fn center(&self, axis: Axis) -> f64 {
        self.center[axis.index()]
    }

    fn half_width(&self, axis: Axis) -> f64 {
        self.half_widths[axis.index()]
    }

    fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CellSnapshot {
    pub identifier: String,
    pub domain: DomainGeometry,
    pub cells: Vec<Cell>,
}

#[derive(Default)]
struct Column {
    record: Option<PixelRecord>,
    integral: f64,
    weight_integral: f64,
}

impl CellSnapshot {
    pub fn new(identifier: &str, domain: DomainGeometry, cells: Vec<Cell>) -> Self {
        Self {
            identifier: identifier.to_string(),
            domain,
            cells,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse snapshot JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let mut snapshot = Self::from_json_str(&text)
            .with_context(|| format!("Invalid snapshot {}", path.display()))?;
        if snapshot.identifier.is_empty() {
            snapshot.identifier = path.display().to_string();
        }
        Ok(snapshot)
    }

    fn field_of(&self, index: usize, cell: &Cell, name: &str) -> Result<f64> {
        cell.field(name).ok_or_else(|| {
            anyhow!(
                "cell {} of snapshot '{}' has no field '{}'",
                index,
                self.identifier,
                name
            )
        })
    }
}

impl SnapshotSource for CellSnapshot {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn domain(&self) -> DomainGeometry {
        self.domain
    }

    /// Integrates `field` along the line of sight through every column of
    /// selected cells: `sum(value * dl)`, or `sum(value * w * dl) / sum(w * dl)`
    /// with a weight field. Columns come out sorted by footprint, so two
    /// projections over the same region are co-indexed.
    fn project(&self, request: &ProjectionRequest<'_>, region: &CellPredicate) -> Result<ProjectionSlab> {
        let (a, b) = request.axis.lateral();
        let mut columns: BTreeMap<[u64; 4], Column> = BTreeMap::new();
        let mut selected = 0usize;

        for (index, cell) in self.cells.iter().enumerate() {
            if !region.matches(cell) {
                continue;
            }
            selected += 1;
            let value = self.field_of(index, cell, request.field)?;
            let path_length = 2.0 * cell.half_width(request.axis);
            let footprint = PixelRecord::new(
                cell.center(a),
                cell.center(b),
                cell.half_width(a),
                cell.half_width(b),
                0.0,
            );
            let key = [
                footprint.x.to_bits(),
                footprint.y.to_bits(),
                footprint.half_dx.to_bits(),
                footprint.half_dy.to_bits(),
            ];
            let column = columns.entry(key).or_default();
            column.record.get_or_insert(footprint);

            match request.weight_field {
                Some(weight_name) => {
                    let weight = self.field_of(index, cell, weight_name)?;
                    column.integral += value * weight * path_length;
                    column.weight_integral += weight * path_length;
                }
                None => column.integral += value * path_length,
            }
        }

        let weighted = request.weight_field.is_some();
        let records: ProjectionSlab = columns
            .into_values()
            .filter_map(|column| {
                let mut record = column.record?;
                record.value = if !weighted {
                    column.integral
                } else if column.weight_integral != 0.0 {
                    column.integral / column.weight_integral
                } else {
                    0.0
                };
                Some(record)
            })
            .collect();

        debug!(
            "Projected '{}' along {} from '{}': {} of {} cells, {} columns",
            request.field,
            request.axis,
            self.identifier,
            selected,
            self.cells.len(),
            records.len()
        );
        Ok(records)
    }
}
