// Prepared chart geometry domain models
use super::telemetry::ChartPoint;
use serde::Serialize;

/// Fixed insets between the canvas edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const PADDING: Padding = Padding {
    top: 10.0,
    right: 50.0,
    bottom: 30.0,
    left: 60.0,
};

pub const MIN_CANVAS_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Canvas {
    /// Width follows the height so tall charts keep a 2:1 aspect.
    pub fn for_height(height: f64) -> Self {
        Self {
            width: MIN_CANVAS_WIDTH.max(height * 2.0),
            height,
            padding: PADDING,
        }
    }

    pub fn inner_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// Screen y of the plot's bottom edge.
    pub fn baseline(&self) -> f64 {
        self.padding.top + self.inner_height()
    }

    /// Whether a canvas x coordinate lies within the plot's horizontal bounds.
    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.padding.left && x <= self.width - self.padding.right
    }
}

/// A padded `[min, max]` axis range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub const UNIT: Extent = Extent { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Value at `ratio` of the way from `min` to `max`.
    pub fn lerp(&self, ratio: f64) -> f64 {
        self.min + self.span() * ratio
    }

    pub fn fraction(&self, value: f64) -> f64 {
        safe_fraction(value, self.min, self.max)
    }
}

/// Position of `value` within `[lo, hi]`; a zero-width range maps everything
/// to the centre.
pub fn safe_fraction(value: f64, lo: f64, hi: f64) -> f64 {
    if lo == hi {
        0.5
    } else {
        (value - lo) / (hi - lo)
    }
}

/// Mapping from data space (epoch ms, value) to canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale {
    pub canvas: Canvas,
    pub x: Extent,
    pub y: Extent,
}

impl Scale {
    pub fn new(canvas: Canvas, x: Extent, y: Extent) -> Self {
        Self { canvas, x, y }
    }

    pub fn screen_x(&self, epoch_ms: f64) -> f64 {
        self.canvas.padding.left + self.x.fraction(epoch_ms) * self.canvas.inner_width()
    }

    /// Screen y grows downwards, so larger values map higher up.
    pub fn screen_y(&self, value: f64) -> f64 {
        self.canvas.padding.top + (1.0 - self.y.fraction(value)) * self.canvas.inner_height()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YTick {
    pub screen_y: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeTick {
    pub screen_x: f64,
    pub epoch_ms: f64,
    pub label: String,
}

/// Everything a renderer needs for one chart, derived in a single pass from
/// one input snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedGeometry {
    pub path: String,
    pub area: String,
    pub y_ticks: Vec<YTick>,
    pub time_ticks: Vec<TimeTick>,
    pub scale: Scale,
    pub points: Vec<ChartPoint>,
    pub color: String,
    pub show_grid: bool,
}

impl PreparedGeometry {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.scale.canvas
    }

    pub fn x_extent(&self) -> Extent {
        self.scale.x
    }

    pub fn y_extent(&self) -> Extent {
        self.scale.y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverState {
    pub screen_x: f64,
    pub screen_y: f64,
    pub epoch_ms: i64,
    pub value: f64,
    pub label: String,
}
