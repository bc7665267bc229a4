// Chart configuration and series styles.

/// Which axis a backend call applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    Linear,
    #[default]
    Log,
}

/// RGB colour of a plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    // default first-series colour of most plotting tools
    pub const BLUE: Rgb = Rgb(31, 119, 180);
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    /// Solid line with a filled marker at every point.
    ///
    /// `clip_markers == false` keeps markers that sit on the plot border
    /// fully visible. With `clip_markers`, markers centred outside the x
    /// limits are left out; those on the limits are still drawn whole, not
    /// cropped at the border.
    LineWithMarkers {
        color: Rgb,
        line_width: u32,
        marker_size: u32,
        clip_markers: bool,
    },
    /// Dashed line without markers; `dash` and `gap` are segment lengths in pixels.
    Dashed {
        color: Rgb,
        line_width: u32,
        dash: u32,
        gap: u32,
    },
}

impl SeriesStyle {
    pub fn color(&self) -> Rgb {
        match *self {
            SeriesStyle::LineWithMarkers { color, .. } => color,
            SeriesStyle::Dashed { color, .. } => color,
        }
    }

    pub fn line_width(&self) -> u32 {
        match *self {
            SeriesStyle::LineWithMarkers { line_width, .. } => line_width,
            SeriesStyle::Dashed { line_width, .. } => line_width,
        }
    }

    pub fn is_dashed(&self) -> bool {
        matches!(self, SeriesStyle::Dashed { .. })
    }
}

/// Presentation settings of the scaling chart.
///
/// The tick-label size is part of this config rather than process state, so
/// two charts rendered in one process never affect each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub x_label: String,
    pub y_label: String,
    pub tick_label_size: u32,
    pub axis_label_size: u32,
    pub grid: bool,
    pub measurement_style: SeriesStyle,
    pub reference_style: SeriesStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            x_scale: AxisScale::Log,
            y_scale: AxisScale::Log,
            x_label: "No. Transactions".to_string(),
            y_label: "Time (s)".to_string(),
            tick_label_size: 16,
            axis_label_size: 16,
            grid: true,
            measurement_style: SeriesStyle::LineWithMarkers {
                color: Rgb::BLUE,
                line_width: 2,
                marker_size: 14,
                clip_markers: false,
            },
            reference_style: SeriesStyle::Dashed {
                color: Rgb::BLACK,
                line_width: 2,
                dash: 10,
                gap: 6,
            },
        }
    }
}
