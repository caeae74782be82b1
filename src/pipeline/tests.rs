// src/pipeline/tests.rs

use super::*;
use crate::error::{ConfigError, SlabError};
use crate::geometry::Axis;
use crate::image::Image;
use crate::resample::NearestResampler;
use crate::slab::PixelRecord;
use anyhow::anyhow;
use std::cell::RefCell;
use std::collections::HashMap;
use test_log::test;

// --- MockSource Definition ---

/// Serves canned slabs by field name and remembers every request.
struct MockSource {
    domain: DomainGeometry,
    slabs: HashMap<String, ProjectionSlab>,
    fail_with: Option<String>,
    calls: RefCell<Vec<(String, Option<String>, [f64; 3], CellPredicate)>>,
}

impl MockSource {
    fn new() -> Self {
        MockSource {
            domain: DomainGeometry::unit(),
            slabs: HashMap::new(),
            fail_with: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn with_slab(mut self, field: &str, slab: ProjectionSlab) -> Self {
        self.slabs.insert(field.to_string(), slab);
        self
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl SnapshotSource for MockSource {
    fn identifier(&self) -> &str {
        "mock"
    }

    fn domain(&self) -> DomainGeometry {
        self.domain
    }

    fn project(&self, request: &ProjectionRequest<'_>, region: &CellPredicate) -> Result<ProjectionSlab> {
        self.calls.borrow_mut().push((
            request.field.to_string(),
            request.weight_field.map(str::to_string),
            request.center,
            region.clone(),
        ));
        if let Some(message) = &self.fail_with {
            return Err(anyhow!(message.clone()));
        }
        self.slabs
            .get(request.field)
            .cloned()
            .ok_or_else(|| anyhow!("no field {}", request.field))
    }
}

/// An irregular slab tiling the unit square: one coarse cell on the left
/// half and four fine cells on the right half.
fn irregular_slab() -> ProjectionSlab {
    ProjectionSlab::new(vec![
        PixelRecord::new(0.25, 0.5, 0.25, 0.5, 1.0),
        PixelRecord::new(0.625, 0.25, 0.125, 0.25, 2.0),
        PixelRecord::new(0.875, 0.25, 0.125, 0.25, 3.0),
        PixelRecord::new(0.625, 0.75, 0.125, 0.25, 4.0),
        PixelRecord::new(0.875, 0.75, 0.125, 0.25, 5.0),
    ])
}

fn uniform(slab: &ProjectionSlab, value: f64) -> ProjectionSlab {
    slab.iter().map(|r| PixelRecord { value, ..*r }).collect()
}

fn config(pixels: usize) -> Config {
    let mut config = Config::default();
    config.slice.projection_axis = Axis::Z;
    config.pixels = pixels;
    config
}

fn run(source: &MockSource, config: &Config) -> Result<OutputImage> {
    SlabPipeline::new(source, &NearestResampler).run(config)
}

fn unit_bounds() -> crate::geometry::ImageBounds {
    crate::geometry::ImageBounds {
        x_min: 0.0,
        x_max: 1.0,
        y_min: 0.0,
        y_max: 1.0,
    }
}

#[test]
fn unit_width_full_depth_without_shift_matches_direct_resampling() {
    let source = MockSource::new().with_slab("density", irregular_slab());
    let output = run(&source, &config(16)).unwrap();

    let direct = NearestResampler
        .resample(&irregular_slab(), Channel::Value, &unit_bounds(), 16)
        .unwrap();
    assert_eq!(output.field, direct);
    assert!(output.weight_field.is_none());

    let calls = source.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "density");
    assert_eq!(calls[0].2, [0.5, 0.5, 0.5]);
    assert_eq!(calls[0].3, CellPredicate::All);
}

#[test]
fn shifting_by_an_extra_domain_width_gives_identical_images() {
    let source = MockSource::new().with_slab("density", irregular_slab());
    let mut a = config(12);
    a.slice.box_width_fraction = 1.5;
    a.slice.projection_center = [0.25, 0.5, 0.0];
    let mut b = a.clone();
    b.slice.projection_center = [1.25, 1.5, 0.0];

    let image_a = run(&source, &a).unwrap();
    let image_b = run(&source, &b).unwrap();
    assert_eq!(image_a, image_b);
    assert!(!image_a.field.is_all_zero());
}

#[test]
fn wide_field_of_view_repeats_the_domain() {
    let source = MockSource::new().with_slab("density", irregular_slab());
    let mut wide = config(8);
    wide.slice.box_width_fraction = 2.0;
    let image = run(&source, &wide).unwrap().field;

    // Each 4x4 quadrant is one copy of the domain.
    let single = NearestResampler
        .resample(&irregular_slab(), Channel::Value, &unit_bounds(), 4)
        .unwrap();
    for j in 0..8 {
        for i in 0..8 {
            assert_eq!(image.get(i, j), single.get(i % 4, j % 4), "pixel ({i}, {j})");
        }
    }
}

#[test]
fn shift_moves_content_periodically() {
    let source = MockSource::new().with_slab("density", irregular_slab());
    let mut shifted = config(4);
    shifted.slice.projection_center = [0.5, 0.0, 0.0];
    let image = run(&source, &shifted).unwrap().field;

    let direct = NearestResampler
        .resample(&irregular_slab(), Channel::Value, &unit_bounds(), 4)
        .unwrap();
    for j in 0..4 {
        for i in 0..4 {
            assert_eq!(image.get(i, j), direct.get((i + 2) % 4, j));
        }
    }
}

#[test]
fn invalid_config_fails_before_projection() {
    let source = MockSource::new().with_slab("density", irregular_slab());
    let mut bad = config(8);
    bad.slice.box_width_fraction = -1.0;
    let err = run(&source, &bad).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::InvalidBoxWidth(-1.0))
    );
    assert_eq!(source.call_count(), 0);
}

#[test]
fn source_errors_propagate_unchanged() {
    let mut source = MockSource::new();
    source.fail_with = Some("snapshot is unreadable".to_string());
    let err = run(&source, &config(8)).unwrap_err();
    assert_eq!(err.to_string(), "snapshot is unreadable");
    assert_eq!(err.chain().count(), 1);
}

#[test]
fn depth_window_wrapping_zero_is_sent_as_a_union() {
    let source = MockSource::new().with_slab("density", irregular_slab());
    let mut thin = config(8);
    thin.slice.projection_center = [0.0, 0.0, 0.02];
    thin.slice.box_depth_fraction = 0.1;
    run(&source, &thin).unwrap();

    let calls = source.calls.borrow();
    let CellPredicate::Or { any } = &calls[0].3 else {
        panic!("expected a union, got {}", calls[0].3);
    };
    assert_eq!(any.len(), 2);
    let bounds: Vec<(f64, f64)> = any
        .iter()
        .map(|p| match p {
            CellPredicate::Overlaps { axis: Axis::Z, low, high } => (*low, *high),
            other => panic!("unexpected term {other}"),
        })
        .collect();
    assert!((bounds[0].0 - 0.0).abs() < 1e-12 && (bounds[0].1 - 0.07).abs() < 1e-12);
    assert!((bounds[1].0 - 0.97).abs() < 1e-12 && (bounds[1].1 - 1.0).abs() < 1e-12);
}

#[test]
fn field_cuts_are_anded_with_the_depth_cut() {
    let source = MockSource::new().with_slab("density", irregular_slab());
    let cut = CellPredicate::FieldRange {
        field: "temperature".into(),
        min: 0.0,
        max: 1.0e6,
    };
    let mut cfg = config(8);
    cfg.field_cuts = vec![cut.clone()];
    cfg.slice.projection_center = [0.0, 0.0, 0.5];
    cfg.slice.box_depth_fraction = 0.5;
    run(&source, &cfg).unwrap();

    let calls = source.calls.borrow();
    assert_eq!(
        calls[0].3,
        CellPredicate::And {
            all: vec![cut, CellPredicate::overlaps(Axis::Z, 0.25, 0.75)]
        }
    );
}

#[test]
fn unit_weights_leave_the_field_unchanged() {
    let slab = irregular_slab();
    let source = MockSource::new()
        .with_slab("temperature", slab.clone())
        .with_slab("density", uniform(&slab, 1.0));

    let mut unweighted = config(12);
    unweighted.fields.name = "temperature".into();
    unweighted.slice.box_width_fraction = 1.7;
    unweighted.slice.projection_center = [0.3, 0.6, 0.0];
    let mut weighted = unweighted.clone();
    weighted.fields.weight = Some("density".into());

    let plain = run(&source, &unweighted).unwrap();
    let output = run(&source, &weighted).unwrap();
    assert_eq!(output.field, plain.field);

    // Pixels in the gap left by the missing diagonal corner copy stay 0.
    let weight = output.weight_field.expect("weight image");
    assert!(weight.as_slice().iter().all(|&v| v == 1.0 || v == 0.0));
    assert!(weight.as_slice().iter().filter(|&&v| v == 1.0).count() > 100);

    // Weighted field projection, then the weight field projected on its own.
    let calls = source.calls.borrow();
    let weighted_calls: Vec<_> = calls[1..]
        .iter()
        .map(|(field, weight, _, _)| (field.as_str(), weight.as_deref()))
        .collect();
    assert_eq!(
        weighted_calls,
        vec![("temperature", Some("density")), ("density", None)]
    );
}

#[test]
fn weighted_output_is_field_times_weight() {
    let slab = irregular_slab();
    let source = MockSource::new()
        .with_slab("temperature", slab.clone())
        .with_slab("density", uniform(&slab, 2.5));
    let mut cfg = config(4);
    cfg.fields.name = "temperature".into();
    cfg.fields.weight = Some("density".into());
    let output = run(&source, &cfg).unwrap();

    let direct = NearestResampler
        .resample(&slab, Channel::Value, &unit_bounds(), 4)
        .unwrap();
    for (got, want) in output.field.as_slice().iter().zip(direct.as_slice()) {
        assert_eq!(*got, want * 2.5);
    }
}

#[test]
fn mismatched_weight_slab_is_rejected() {
    let slab = irregular_slab();
    let mut short = uniform(&slab, 1.0);
    short.records.pop();
    let source = MockSource::new()
        .with_slab("temperature", slab)
        .with_slab("density", short);
    let mut cfg = config(4);
    cfg.fields.name = "temperature".into();
    cfg.fields.weight = Some("density".into());

    let err = run(&source, &cfg).unwrap_err();
    assert_eq!(
        err.downcast_ref::<SlabError>(),
        Some(&SlabError::WeightCardinality {
            field: 5,
            weight: 4
        })
    );
}

#[test]
fn empty_projection_yields_a_zero_image() {
    let source = MockSource::new().with_slab("density", ProjectionSlab::default());
    let mut cfg = config(6);
    cfg.slice.box_width_fraction = 2.3;
    cfg.fields.weight = Some("density".into());
    let output = run(&source, &cfg).unwrap();
    assert_eq!(output.field, Image::zeros(6));
    assert_eq!(output.weight_field, Some(Image::zeros(6)));
}

#[test]
fn cropped_records_start_inside_the_field_of_view() {
    let spec = TilingSpec {
        projection_axis: Axis::Y,
        projection_center: [0.37, 0.5, 0.81],
        box_width_fraction: 2.3,
        ..TilingSpec::default()
    };
    let domain = DomainGeometry::unit();
    let (slab, region) = tile_slab(irregular_slab(), &spec, &domain);
    assert_eq!(region.tiles(), 3);
    assert!(!slab.is_empty());
    for r in slab.iter() {
        assert!(r.x - r.half_dx < 2.3, "record {r:?}");
        assert!(r.y - r.half_dy < 2.3, "record {r:?}");
    }
}
