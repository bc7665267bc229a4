// Plot surfaces backed by plotters.
//
// A surface records the renderer's calls and draws everything at once when
// the chart is shown: PNG output goes through an image buffer, SVG output is
// written by plotters directly.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::prelude::IntoLogRange;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::backend::PlotBackend;
use crate::chart::{Axis, AxisScale, Rgb, SeriesStyle};
use crate::error::{PlotError, drawing_error};

const FONT_FAMILY: FontFamily<'static> = FontFamily::SansSerif;

/// Output format of a [`PlotSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceKind {
    #[default]
    Bitmap,
    Svg,
}

impl SurfaceKind {
    /// Guess the format from a file extension (`png` or `svg`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(SurfaceKind::Bitmap),
            "svg" => Some(SurfaceKind::Svg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub path: PathBuf,
    /// (width, height) in pixels
    pub size: (u32, u32),
    pub kind: SurfaceKind,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("scaling.png"),
            size: (1024, 768),
            kind: SurfaceKind::Bitmap,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PlottedSeries {
    points: Vec<(f64, f64)>,
    style: SeriesStyle,
}

/// Everything the backend calls have configured so far.
#[derive(Debug, Clone, PartialEq)]
struct ChartState {
    tick_label_size: u32,
    series: Vec<PlottedSeries>,
    x_scale: AxisScale,
    y_scale: AxisScale,
    x_label: Option<(String, u32)>,
    y_label: Option<(String, u32)>,
    x_limits: Option<(f64, f64)>,
    grid: bool,
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            tick_label_size: 12,
            series: Vec::new(),
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
            x_label: None,
            y_label: None,
            x_limits: None,
            grid: false,
        }
    }
}

/// [`PlotBackend`] that writes the finished chart to a PNG or SVG file.
#[derive(Debug, Clone)]
pub struct PlotSurface {
    config: SurfaceConfig,
    state: ChartState,
}

impl PlotSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            state: ChartState::default(),
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    // fail before drawing anything if the output can't be written
    fn check_target(&self) -> Result<(), PlotError> {
        let (width, height) = self.config.size;
        if width == 0 || height == 0 {
            return Err(PlotError::BackendUnavailable(format!(
                "surface size {width}x{height} is empty"
            )));
        }
        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            return Err(PlotError::BackendUnavailable(format!(
                "output directory {} does not exist",
                parent.display()
            )));
        }
        Ok(())
    }
}

impl PlotBackend for PlotSurface {
    fn set_tick_label_size(&mut self, size: u32) -> Result<(), PlotError> {
        self.state.tick_label_size = size;
        Ok(())
    }

    fn plot(&mut self, x: &[f64], y: &[f64], style: &SeriesStyle) -> Result<(), PlotError> {
        if x.len() != y.len() {
            return Err(PlotError::DimensionMismatch {
                measurement: x.len(),
                reference: y.len(),
            });
        }
        self.state.series.push(PlottedSeries {
            points: x.iter().copied().zip(y.iter().copied()).collect(),
            style: *style,
        });
        Ok(())
    }

    fn set_scale(&mut self, axis: Axis, scale: AxisScale) -> Result<(), PlotError> {
        match axis {
            Axis::X => self.state.x_scale = scale,
            Axis::Y => self.state.y_scale = scale,
        }
        Ok(())
    }

    fn set_label(&mut self, axis: Axis, text: &str, font_size: u32) -> Result<(), PlotError> {
        let label = Some((text.to_string(), font_size));
        match axis {
            Axis::X => self.state.x_label = label,
            Axis::Y => self.state.y_label = label,
        }
        Ok(())
    }

    fn set_x_limits(&mut self, min: f64, max: f64) -> Result<(), PlotError> {
        if min.is_nan() || max.is_nan() || min >= max {
            return Err(PlotError::InvalidSeries(format!(
                "x limits [{min}, {max}] are empty"
            )));
        }
        self.state.x_limits = Some((min, max));
        Ok(())
    }

    fn set_grid(&mut self, visible: bool) -> Result<(), PlotError> {
        self.state.grid = visible;
        Ok(())
    }

    fn show(&mut self) -> Result<(), PlotError> {
        if self.state.series.is_empty() {
            return Err(PlotError::InvalidSeries("no series to draw".into()));
        }
        self.check_target()?;

        let path = &self.config.path;
        let (width, height) = self.config.size;

        match self.config.kind {
            SurfaceKind::Bitmap => {
                let mut buffer = vec![0u8; width as usize * height as usize * 3];
                {
                    let root =
                        BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
                    self.state.draw(&root)?;
                    root.present().map_err(drawing_error)?;
                }
                let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
                    PlotError::BackendUnavailable("bitmap buffer has the wrong size".into())
                })?;
                image.save_with_format(path, ImageFormat::Png)?;
            }
            SurfaceKind::Svg => {
                let root = SVGBackend::new(path, (width, height)).into_drawing_area();
                self.state.draw(&root)?;
                root.present().map_err(drawing_error)?;
            }
        }

        log::info!("chart written to {}", path.display());
        Ok(())
    }
}

impl ChartState {
    fn x_range(&self) -> Result<(f64, f64), PlotError> {
        let (min, max) = match self.x_limits {
            Some(limits) => limits,
            None => self.extent(|p| p.0),
        };
        check_range("x", min, max, self.x_scale)
    }

    fn y_range(&self) -> Result<(f64, f64), PlotError> {
        let (min, max) = self.extent(|p| p.1);
        let (min, max) = check_range("y", min, max, self.y_scale)?;

        // widen the data extent a little so no point sits on the border
        match self.y_scale {
            AxisScale::Log => {
                let lo = 10f64.powi(min.log10().floor() as i32);
                let mut hi = 10f64.powi(max.log10().ceil() as i32);
                if hi <= lo {
                    hi = lo * 10.0;
                }
                Ok((lo, hi))
            }
            AxisScale::Linear => {
                let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
                Ok((min - pad, max + pad))
            }
        }
    }

    fn extent(&self, coord: impl Fn(&(f64, f64)) -> f64) -> (f64, f64) {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(coord)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    fn margin(&self) -> u32 {
        // unclipped markers on the border need room for their radius
        self.series
            .iter()
            .map(|s| match s.style {
                SeriesStyle::LineWithMarkers {
                    marker_size,
                    clip_markers: false,
                    ..
                } => marker_size / 2 + 4,
                _ => 0,
            })
            .max()
            .unwrap_or(0)
            .max(20)
    }

    fn right_margin(&self) -> Result<u32, PlotError> {
        // the last x tick label is centred on the plot's right edge
        let (_, x_max) = self.x_range()?;
        let chars = tick_label(&x_max).len() as u32;
        Ok(self.margin().max(chars * self.tick_label_size * 3 / 10 + 4))
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), PlotError> {
        root.fill(&WHITE).map_err(drawing_error)?;

        let (x_min, x_max) = self.x_range()?;
        let (y_min, y_max) = self.y_range()?;

        match (self.x_scale, self.y_scale) {
            (AxisScale::Log, AxisScale::Log) => self.draw_on(
                root,
                (x_min..x_max).log_scale(),
                (y_min..y_max).log_scale(),
            ),
            (AxisScale::Log, AxisScale::Linear) => {
                self.draw_on(root, (x_min..x_max).log_scale(), y_min..y_max)
            }
            (AxisScale::Linear, AxisScale::Log) => {
                self.draw_on(root, x_min..x_max, (y_min..y_max).log_scale())
            }
            (AxisScale::Linear, AxisScale::Linear) => {
                self.draw_on(root, x_min..x_max, y_min..y_max)
            }
        }
    }

    fn draw_on<DB, X, Y>(
        &self,
        root: &DrawingArea<DB, Shift>,
        x_spec: X,
        y_spec: Y,
    ) -> Result<(), PlotError>
    where
        DB: DrawingBackend,
        X: AsRangedCoord<Value = f64>,
        Y: AsRangedCoord<Value = f64>,
        X::CoordDescType: ValueFormatter<f64>,
        Y::CoordDescType: ValueFormatter<f64>,
    {
        let label_area = self.tick_label_size * 4;

        let mut chart = ChartBuilder::on(root)
            .margin(self.margin())
            .margin_right(self.right_margin()?)
            .set_label_area_size(LabelAreaPosition::Left, label_area + 20)
            .set_label_area_size(LabelAreaPosition::Bottom, label_area)
            .build_cartesian_2d(x_spec, y_spec)
            .map_err(drawing_error)?;

        let tick_font = FontDesc::new(FONT_FAMILY, self.tick_label_size as f64, FontStyle::Normal);

        let desc_size = [&self.x_label, &self.y_label]
            .into_iter()
            .flatten()
            .map(|(_, size)| *size)
            .max()
            .unwrap_or(self.tick_label_size);

        {
            let mut mesh = chart.configure_mesh();
            mesh.label_style(tick_font)
                .axis_desc_style(FontDesc::new(
                    FONT_FAMILY,
                    desc_size as f64,
                    FontStyle::Normal,
                ))
                .x_label_formatter(&tick_label)
                .y_label_formatter(&tick_label);
            if let Some((text, _)) = &self.x_label {
                mesh.x_desc(text.clone());
            }
            if let Some((text, _)) = &self.y_label {
                mesh.y_desc(text.clone());
            }
            if !self.grid {
                mesh.disable_mesh();
            }
            mesh.draw().map_err(drawing_error)?;
        }

        let (x_lo, x_hi) = self.x_range()?;

        for series in &self.series {
            let color = to_rgb(series.style.color());
            let line_style = ShapeStyle {
                color: color.to_rgba(),
                filled: false,
                stroke_width: series.style.line_width(),
            };

            match series.style {
                SeriesStyle::LineWithMarkers {
                    marker_size,
                    clip_markers,
                    ..
                } => {
                    chart
                        .draw_series(LineSeries::new(series.points.iter().copied(), line_style))
                        .map_err(drawing_error)?;

                    let markers = marker_points(&series.points, clip_markers, (x_lo, x_hi))
                        .into_iter()
                        .map(|p| Circle::new(p, marker_size / 2, color.filled()));
                    chart.draw_series(markers).map_err(drawing_error)?;
                }
                SeriesStyle::Dashed { dash, gap, .. } => {
                    chart
                        .draw_series(DashedLineSeries::new(
                            series.points.clone(),
                            dash,
                            gap,
                            line_style,
                        ))
                        .map_err(drawing_error)?;
                }
            }
        }

        Ok(())
    }
}

fn check_range(
    axis: &str,
    min: f64,
    max: f64,
    scale: AxisScale,
) -> Result<(f64, f64), PlotError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(PlotError::InvalidSeries(format!(
            "{axis} axis has no finite data range"
        )));
    }
    if scale == AxisScale::Log && min <= 0.0 {
        return Err(PlotError::InvalidSeries(format!(
            "{axis} axis is logarithmic but the range starts at {min}"
        )));
    }
    Ok((min, max))
}

/// Points that get a marker. Clipping leaves out markers centred outside the
/// x limits; markers on the limits are drawn whole.
pub(crate) fn marker_points(
    points: &[(f64, f64)],
    clip: bool,
    (x_lo, x_hi): (f64, f64),
) -> Vec<(f64, f64)> {
    points
        .iter()
        .copied()
        .filter(|(x, _)| !clip || (*x >= x_lo && *x <= x_hi))
        .collect()
}

/// Tick labels without a spurious fraction: `1000`, not `1000.0`.
pub(crate) fn tick_label(value: &f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else if value.abs() < 1e-3 {
        format!("{value:e}")
    } else {
        let text = format!("{value:.3}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn to_rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

#[cfg(test)]
impl PlotSurface {
    pub(crate) fn y_range(&self) -> Result<(f64, f64), PlotError> {
        self.state.y_range()
    }

    pub(crate) fn x_range(&self) -> Result<(f64, f64), PlotError> {
        self.state.x_range()
    }

    pub(crate) fn margins(&self) -> Result<(u32, u32), PlotError> {
        Ok((self.state.margin(), self.state.right_margin()?))
    }
}
