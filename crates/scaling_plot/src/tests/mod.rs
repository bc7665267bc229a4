// unit tests

use super::*;

use std::path::PathBuf;

use image::GenericImageView;

use crate::surface::{marker_points, tick_label};

/// One call made against the backend.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    TickLabelSize(u32),
    Plot {
        x: Vec<f64>,
        y: Vec<f64>,
        style: SeriesStyle,
    },
    Scale(Axis, AxisScale),
    Label(Axis, String, u32),
    XLimits(f64, f64),
    Grid(bool),
    Show,
}

/// Test double that records every call.
#[derive(Debug, Default)]
struct RecordingBackend {
    calls: Vec<Call>,
}

impl RecordingBackend {
    fn plots(&self) -> Vec<(&[f64], &[f64], &SeriesStyle)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Plot { x, y, style } => Some((x.as_slice(), y.as_slice(), style)),
                _ => None,
            })
            .collect()
    }
}

impl PlotBackend for RecordingBackend {
    fn set_tick_label_size(&mut self, size: u32) -> Result<(), PlotError> {
        self.calls.push(Call::TickLabelSize(size));
        Ok(())
    }

    fn plot(&mut self, x: &[f64], y: &[f64], style: &SeriesStyle) -> Result<(), PlotError> {
        self.calls.push(Call::Plot {
            x: x.to_vec(),
            y: y.to_vec(),
            style: *style,
        });
        Ok(())
    }

    fn set_scale(&mut self, axis: Axis, scale: AxisScale) -> Result<(), PlotError> {
        self.calls.push(Call::Scale(axis, scale));
        Ok(())
    }

    fn set_label(&mut self, axis: Axis, text: &str, font_size: u32) -> Result<(), PlotError> {
        self.calls.push(Call::Label(axis, text.to_string(), font_size));
        Ok(())
    }

    fn set_x_limits(&mut self, min: f64, max: f64) -> Result<(), PlotError> {
        self.calls.push(Call::XLimits(min, max));
        Ok(())
    }

    fn set_grid(&mut self, visible: bool) -> Result<(), PlotError> {
        self.calls.push(Call::Grid(visible));
        Ok(())
    }

    fn show(&mut self) -> Result<(), PlotError> {
        self.calls.push(Call::Show);
        Ok(())
    }
}

// series

#[test]
fn published_counts_increase_and_are_positive() {
    let series = MeasurementSeries::transaction_scaling();
    let x = series.x();

    assert_eq!(x.len(), 5);
    assert!(x.iter().all(|v| *v > 0.0));
    assert!(x.iter().zip(x.iter().skip(1)).all(|(a, b)| a < b));
}

#[test]
fn published_times_increase_and_are_positive() {
    let series = MeasurementSeries::transaction_scaling();
    let y = series.y();

    assert!(y.iter().all(|v| *v > 0.0));
    assert!(y.iter().zip(y.iter().skip(1)).all(|(a, b)| a < b));
}

#[test]
fn x_bounds_are_data_extremes() {
    let series = MeasurementSeries::transaction_scaling();
    assert_eq!(series.x_bounds(), (1000.0, 10_000_000.0));
}

#[test]
fn measurement_rejects_bad_input() {
    let cases = [
        (vec![1.0, 2.0], vec![1.0]),
        (vec![1.0], vec![1.0]),
        (vec![1.0, 1.0], vec![1.0, 2.0]),
        (vec![2.0, 1.0], vec![1.0, 2.0]),
        (vec![0.0, 1.0], vec![1.0, 2.0]),
        (vec![1.0, 2.0], vec![-1.0, 2.0]),
        (vec![1.0, f64::NAN], vec![1.0, 2.0]),
    ];

    for (x, y) in cases {
        let result = MeasurementSeries::new(x.clone(), y.clone());
        assert!(
            matches!(result, Err(PlotError::InvalidSeries(_))),
            "accepted x={x:?} y={y:?}"
        );
    }
}

#[test]
fn proportional_reference_passes_through_first_point() {
    let measurement = MeasurementSeries::new(vec![10.0, 100.0, 1000.0], vec![2.0, 30.0, 500.0])
        .expect("valid series");
    let reference = ReferenceSeries::proportional_to(&measurement);

    assert_eq!(reference.y().to_vec(), vec![2.0, 20.0, 200.0]);
}

#[test]
fn reference_rejects_non_positive_values() {
    assert!(ReferenceSeries::new(vec![]).is_err());
    assert!(ReferenceSeries::new(vec![1.0, 0.0]).is_err());
    assert!(ReferenceSeries::new(vec![1.0, 10.0]).is_ok());
}

// renderer

#[test]
fn render_published_chart() {
    let mut backend = RecordingBackend::default();
    ScalingPlotRenderer::default()
        .render(&mut backend)
        .expect("matching series render");

    let plots = backend.plots();
    assert_eq!(plots.len(), 2);

    let (x, y, _) = plots[0];
    assert_eq!(x, &[1e3, 1e4, 1e5, 1e6, 1e7]);
    assert_eq!(y, &[10.125, 37.37, 307.769, 2829.759, 31902.483]);

    let (ref_x, ref_y, _) = plots[1];
    assert_eq!(ref_x, x);
    assert_eq!(ref_y, &[10.0, 100.0, 1000.0, 10000.0, 100000.0]);

    assert!(backend.calls.contains(&Call::Scale(Axis::X, AxisScale::Log)));
    assert!(backend.calls.contains(&Call::Scale(Axis::Y, AxisScale::Log)));
    assert!(backend.calls.contains(&Call::XLimits(1000.0, 10_000_000.0)));
    assert!(backend.calls.contains(&Call::Grid(true)));
    assert!(
        backend
            .calls
            .contains(&Call::Label(Axis::X, "No. Transactions".to_string(), 16))
    );
    assert!(
        backend
            .calls
            .contains(&Call::Label(Axis::Y, "Time (s)".to_string(), 16))
    );
}

#[test]
fn render_follows_call_order() {
    let mut backend = RecordingBackend::default();
    ScalingPlotRenderer::default()
        .render(&mut backend)
        .expect("render");

    assert_eq!(backend.calls.first(), Some(&Call::TickLabelSize(16)));
    assert_eq!(backend.calls.last(), Some(&Call::Show));
    assert_eq!(
        backend.calls.iter().filter(|c| **c == Call::Show).count(),
        1
    );
}

#[test]
fn series_styles_are_distinct() {
    let mut backend = RecordingBackend::default();
    ScalingPlotRenderer::default()
        .render(&mut backend)
        .expect("render");

    let plots = backend.plots();
    let measurement = plots[0].2;
    let reference = plots[1].2;

    assert!(matches!(
        measurement,
        SeriesStyle::LineWithMarkers {
            line_width: 2,
            marker_size: 14,
            clip_markers: false,
            ..
        }
    ));
    assert!(reference.is_dashed());
    assert!(!measurement.is_dashed());
    assert_eq!(reference.color(), Rgb::BLACK);
    assert_ne!(measurement, reference);
}

#[test]
fn mismatched_series_fail_before_backend_calls() {
    let renderer = ScalingPlotRenderer::new(
        MeasurementSeries::transaction_scaling(),
        ReferenceSeries::new(vec![1.0, 2.0, 3.0]).expect("valid reference"),
    );
    let mut backend = RecordingBackend::default();

    let result = renderer.render(&mut backend);

    assert!(matches!(
        result,
        Err(PlotError::DimensionMismatch {
            measurement: 5,
            reference: 3
        })
    ));
    assert!(backend.calls.is_empty());
}

#[test]
fn tick_size_stays_with_its_chart() {
    let large = ScalingPlotRenderer::default().with_config(ChartConfig {
        tick_label_size: 24,
        ..ChartConfig::default()
    });
    let plain = ScalingPlotRenderer::default();

    let mut first = RecordingBackend::default();
    let mut second = RecordingBackend::default();
    large.render(&mut first).expect("render");
    plain.render(&mut second).expect("render");

    assert!(first.calls.contains(&Call::TickLabelSize(24)));
    assert!(second.calls.contains(&Call::TickLabelSize(16)));
    assert!(!second.calls.contains(&Call::TickLabelSize(24)));
}

// surface

#[test]
fn surface_kind_from_extension() {
    assert_eq!(
        SurfaceKind::from_path(&PathBuf::from("out/chart.svg")),
        Some(SurfaceKind::Svg)
    );
    assert_eq!(
        SurfaceKind::from_path(&PathBuf::from("chart.PNG")),
        Some(SurfaceKind::Bitmap)
    );
    assert_eq!(SurfaceKind::from_path(&PathBuf::from("chart.pdf")), None);
    assert_eq!(SurfaceKind::from_path(&PathBuf::from("chart")), None);
}

#[test]
fn surface_records_limits_and_log_range() {
    let mut surface = PlotSurface::new(SurfaceConfig::default());
    surface.set_scale(Axis::X, AxisScale::Log).unwrap();
    surface.set_scale(Axis::Y, AxisScale::Log).unwrap();
    surface
        .plot(&[1e3, 1e4, 1e5], &[10.125, 37.37, 307.769], &ChartConfig::default().measurement_style)
        .unwrap();
    surface.set_x_limits(1e3, 1e5).unwrap();

    assert_eq!(surface.x_range().unwrap(), (1e3, 1e5));
    // y is widened to whole decades
    assert_eq!(surface.y_range().unwrap(), (10.0, 1000.0));
}

#[test]
fn surface_rejects_empty_x_limits() {
    let mut surface = PlotSurface::new(SurfaceConfig::default());
    assert!(matches!(
        surface.set_x_limits(10.0, 10.0),
        Err(PlotError::InvalidSeries(_))
    ));
}

#[test]
fn surface_rejects_non_positive_log_range() {
    let mut surface = PlotSurface::new(SurfaceConfig::default());
    surface.set_scale(Axis::Y, AxisScale::Log).unwrap();
    surface
        .plot(&[1.0, 2.0], &[0.0, 5.0], &ChartConfig::default().reference_style)
        .unwrap();

    assert!(matches!(surface.y_range(), Err(PlotError::InvalidSeries(_))));
}

#[test]
fn surface_without_output_directory_is_unavailable() {
    let mut surface = PlotSurface::new(SurfaceConfig {
        path: PathBuf::from("/this/directory/does/not/exist/scaling.png"),
        ..SurfaceConfig::default()
    });

    let result = ScalingPlotRenderer::default().render(&mut surface);

    assert!(matches!(result, Err(PlotError::BackendUnavailable(_))));
}

#[test]
fn surface_with_empty_size_is_unavailable() {
    let mut surface = PlotSurface::new(SurfaceConfig {
        size: (0, 480),
        ..SurfaceConfig::default()
    });

    let result = ScalingPlotRenderer::default().render(&mut surface);

    assert!(matches!(result, Err(PlotError::BackendUnavailable(_))));
}

fn render_to(path: PathBuf) -> Result<(), PlotError> {
    let mut surface = PlotSurface::new(SurfaceConfig {
        kind: SurfaceKind::from_path(&path).unwrap_or_default(),
        path,
        ..SurfaceConfig::default()
    });
    ScalingPlotRenderer::default().render(&mut surface)
}

#[test]
fn surface_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scaling.png");

    render_to(path.clone()).unwrap();

    let image = image::open(&path).unwrap();
    assert_eq!(image.dimensions(), (1024, 768));
}

#[test]
fn surface_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scaling.svg");

    render_to(path.clone()).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("No. Transactions"));
}

#[test]
fn tick_labels_drop_the_fraction() {
    assert_eq!(tick_label(&10.0), "10");
    assert_eq!(tick_label(&10_000_000.0), "10000000");
    assert_eq!(tick_label(&0.25), "0.25");
    assert_eq!(tick_label(&0.0001), "1e-4");
}

#[test]
fn right_margin_fits_the_last_x_tick() {
    let mut surface = PlotSurface::new(SurfaceConfig::default());
    surface.set_tick_label_size(16).unwrap();
    surface
        .plot(&[1e3, 1e7], &[10.0, 1e5], &ChartConfig::default().measurement_style)
        .unwrap();
    surface.set_x_limits(1e3, 1e7).unwrap();

    let (margin, right) = surface.margins().unwrap();

    // half of "10000000" at 16 px
    assert_eq!(margin, 20);
    assert!(right >= 40);
}

#[test]
fn clipped_markers_keep_points_on_the_limits() {
    let points = [(1e3, 1.0), (1e5, 2.0), (1e7, 3.0), (1e8, 4.0)];

    assert_eq!(
        marker_points(&points, true, (1e3, 1e7)),
        vec![(1e3, 1.0), (1e5, 2.0), (1e7, 3.0)]
    );
    assert_eq!(marker_points(&points, false, (1e3, 1e7)), points.to_vec());
}
