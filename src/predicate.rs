// src/predicate.rs

//! Typed region-selection predicates over 3D cells.
//!
//! A `CellPredicate` is a small expression tree evaluated by whatever owns
//! the cells (see `SnapshotSource`). It replaces textual filter expressions:
//! there is no string to build, quote or parse, and each piece can be
//! evaluated on its own in tests. The `Display` impl exists only so logs can
//! show what was selected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Axis;

/// Read access to a cell's geometry and field values.
pub trait CellView {
    fn center(&self, axis: Axis) -> f64;
    fn half_width(&self, axis: Axis) -> f64;
    fn field(&self, name: &str) -> Option<f64>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CellPredicate {
    /// Selects every cell.
    #[default]
    All,
    /// Cells whose extent along `axis` overlaps the closed interval
    /// `[low, high]`: `center + half >= low && center - half <= high`.
    Overlaps { axis: Axis, low: f64, high: f64 },
    /// Cells whose `field` value lies in `[min, max]`. Cells without the
    /// field never match.
    FieldRange { field: String, min: f64, max: f64 },
    And { all: Vec<CellPredicate> },
    Or { any: Vec<CellPredicate> },
    Not { inner: Box<CellPredicate> },
}

impl CellPredicate {
    pub fn overlaps(axis: Axis, low: f64, high: f64) -> Self {
        CellPredicate::Overlaps { axis, low, high }
    }

    /// Conjunction that drops `All` terms and collapses trivial cases.
    pub fn all_of(terms: impl IntoIterator<Item = CellPredicate>) -> Self {
        let mut all: Vec<CellPredicate> = terms
            .into_iter()
            .filter(|p| !matches!(p, CellPredicate::All))
            .collect();
        match all.len() {
            0 => CellPredicate::All,
            1 => all.remove(0),
            _ => CellPredicate::And { all },
        }
    }

    pub fn any_of(terms: impl IntoIterator<Item = CellPredicate>) -> Self {
        let mut any: Vec<CellPredicate> = terms.into_iter().collect();
        if any.len() == 1 {
            any.remove(0)
        } else {
            CellPredicate::Or { any }
        }
    }

    pub fn negate(self) -> Self {
        CellPredicate::Not {
            inner: Box::new(self),
        }
    }

    pub fn matches<C: CellView + ?Sized>(&self, cell: &C) -> bool {
        match self {
            CellPredicate::All => true,
            CellPredicate::Overlaps { axis, low, high } => {
                let center = cell.center(*axis);
                let half = cell.half_width(*axis);
                center + half >= *low && center - half <= *high
            }
            CellPredicate::FieldRange { field, min, max } => cell
                .field(field)
                .map_or(false, |v| v >= *min && v <= *max),
            CellPredicate::And { all } => all.iter().all(|p| p.matches(cell)),
            // An empty disjunction selects nothing.
            CellPredicate::Or { any } => any.iter().any(|p| p.matches(cell)),
            CellPredicate::Not { inner } => !inner.matches(cell),
        }
    }
}

impl fmt::Display for CellPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellPredicate::All => f.write_str("true"),
            CellPredicate::Overlaps { axis, low, high } => write!(
                f,
                "({a} + d{a}/2 >= {low:.6} & {a} - d{a}/2 <= {high:.6})",
                a = axis
            ),
            CellPredicate::FieldRange { field, min, max } => {
                write!(f, "({min} <= {field} <= {max})")
            }
            CellPredicate::And { all } => write_joined(f, all, " & "),
            CellPredicate::Or { any } => write_joined(f, any, " | "),
            CellPredicate::Not { inner } => write!(f, "!{inner}"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[CellPredicate], sep: &str) -> fmt::Result {
    if terms.is_empty() {
        return f.write_str(if sep.trim() == "&" { "true" } else { "false" });
    }
    f.write_str("(")?;
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{term}")?;
    }
    f.write_str(")")
}
