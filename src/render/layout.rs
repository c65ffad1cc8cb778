//! Figure layout in world space: plot area, data mapping, ticks, contour runs.

use bevy_math::Vec2;

use crate::core::{ContourLayer, Figure, Layer};

/// Fractions of the figure reserved around the plot area
const MARGIN_LEFT: f32 = 0.11;
const MARGIN_RIGHT: f32 = 0.19; // legend
const MARGIN_BOTTOM: f32 = 0.13;
const MARGIN_TOP: f32 = 0.07;

/// Relative padding around scatter-only data
const DATA_MARGIN: f32 = 0.05;

/// Plot area of a figure centered on the world origin, with the data range it
/// displays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub figure_size: Vec2,
    pub world_center: Vec2,
    pub world_size: Vec2,
    pub data_min: Vec2,
    pub data_max: Vec2,
}

impl PlotArea {
    pub fn for_figure(figure: &Figure) -> Self {
        let figure_size = figure.size.pixels();
        let (data_min, data_max) = data_range(figure);

        let left = -figure_size.x * 0.5 + figure_size.x * MARGIN_LEFT;
        let right = figure_size.x * 0.5 - figure_size.x * MARGIN_RIGHT;
        let bottom = -figure_size.y * 0.5 + figure_size.y * MARGIN_BOTTOM;
        let top = figure_size.y * 0.5 - figure_size.y * MARGIN_TOP;

        Self {
            figure_size,
            world_center: Vec2::new((left + right) * 0.5, (bottom + top) * 0.5),
            world_size: Vec2::new(right - left, top - bottom),
            data_min,
            data_max,
        }
    }

    /// World units per data unit along each axis
    pub fn scale(&self) -> Vec2 {
        self.world_size / (self.data_max - self.data_min)
    }

    pub fn data_to_world(&self, p: Vec2) -> Vec2 {
        let data_center = (self.data_min + self.data_max) * 0.5;
        self.world_center + (p - data_center) * self.scale()
    }

    pub fn min_corner(&self) -> Vec2 {
        self.world_center - self.world_size * 0.5
    }

    pub fn max_corner(&self) -> Vec2 {
        self.world_center + self.world_size * 0.5
    }
}

/// Displayed data range: the contour extent when a boundary is present,
/// otherwise the scatter extent plus a small margin.
pub fn data_range(figure: &Figure) -> (Vec2, Vec2) {
    let Some((min, max)) = figure.bounds() else {
        return (Vec2::ZERO, Vec2::ONE);
    };

    let has_contour = figure.layers.iter().any(|l| matches!(l, Layer::Contour(_)));
    let (mut min, mut max) = if has_contour {
        (min, max)
    } else {
        let pad = (max - min) * DATA_MARGIN;
        (min - pad, max + pad)
    };

    // A single distinct value on an axis still needs a visible span
    for axis in 0..2 {
        if max[axis] - min[axis] <= f32::EPSILON {
            min[axis] -= 0.5;
            max[axis] += 0.5;
        }
    }
    (min, max)
}

/// Calculate nice tick step for given range.
pub fn nice_step(range: f32, target_ticks: usize) -> f32 {
    if range <= 0.0 || !range.is_finite() {
        return 1.0;
    }
    let rough = range / target_ticks as f32;
    let exp = rough.log10().floor();
    let base = 10f32.powf(exp);

    let normalized = rough / base;
    let nice = if normalized <= 1.5 {
        1.0
    } else if normalized <= 3.0 {
        2.0
    } else if normalized <= 7.0 {
        5.0
    } else {
        10.0
    };

    nice * base
}

/// Tick positions on a nice step inside `[min, max]`.
pub fn ticks(min: f32, max: f32, target_ticks: usize) -> Vec<f32> {
    let step = nice_step(max - min, target_ticks);
    let first = (min / step).ceil() as i32;
    let last = (max / step).floor() as i32;
    (first..=last).map(|i| i as f32 * step).collect()
}

/// Format tick value for display.
pub fn format_tick(val: f32) -> String {
    if val.abs() < 0.001 && val != 0.0 {
        format!("{:.1e}", val)
    } else if val.abs() >= 10000.0 {
        format!("{:.1e}", val)
    } else if val.fract().abs() < 0.001 {
        format!("{:.0}", val)
    } else if val.abs() < 1.0 {
        format!("{:.2}", val)
    } else {
        format!("{:.1}", val)
    }
}

/// Horizontal stretch of same-level cells within one contour row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRun {
    pub row: usize,
    pub first_col: usize,
    pub last_col: usize,
    pub level: usize,
}

/// Merge neighbouring cells of equal level so each run becomes one quad.
pub fn contour_runs(layer: &ContourLayer) -> Vec<CellRun> {
    let cols = layer.cols();
    let mut runs = Vec::new();
    if cols == 0 {
        return runs;
    }

    for (row, cells) in layer.values.chunks(cols).enumerate() {
        let mut current: Option<CellRun> = None;
        for (col, value) in cells.iter().enumerate() {
            let Some(level) = layer.level_of(value) else {
                runs.extend(current.take());
                continue;
            };
            match current.as_mut() {
                Some(run) if run.level == level => run.last_col = col,
                _ => {
                    runs.extend(current.take());
                    current = Some(CellRun {
                        row,
                        first_col: col,
                        last_col: col,
                        level,
                    });
                }
            }
        }
        runs.extend(current);
    }
    runs
}
