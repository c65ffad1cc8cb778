//! Classifier evaluation over a meshgrid, drawn as a filled-contour layer.

use bevy_math::{UVec2, Vec2};
use error_stack::{Report, ResultExt};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Colormap, ContourLayer, Figure, Layer};
use crate::data::Value;
use crate::grid::Meshgrid;
use crate::{PlotError, PredictError, Result};

/// Anything that labels a batch of 2D points.
///
/// `predict` receives every point of the grid in one call and must return one
/// label per point, in the same order.
pub trait Classifier {
    fn predict(&self, points: &[[f64; 2]]) -> std::result::Result<Vec<Value>, Report<PredictError>>;
}

impl<F> Classifier for F
where
    F: Fn(&[[f64; 2]]) -> std::result::Result<Vec<Value>, Report<PredictError>>,
{
    fn predict(&self, points: &[[f64; 2]]) -> std::result::Result<Vec<Value>, Report<PredictError>> {
        self(points)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourStyle {
    pub colormap: Colormap,
    pub alpha: f32,
}

impl Default for ContourStyle {
    // translucent diverging fill
    fn default() -> Self {
        Self {
            colormap: Colormap::Coolwarm,
            alpha: 0.2,
        }
    }
}

impl ContourStyle {
    pub const fn colormap(mut self, cm: Colormap) -> Self {
        self.colormap = cm;
        self
    }

    pub const fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Predict every grid cell and add the result to `figure` as a contour layer.
///
/// The figure is untouched when prediction fails or returns the wrong number
/// of labels.
pub fn render_boundary(
    figure: &mut Figure,
    classifier: &dyn Classifier,
    grid: &Meshgrid,
    style: &ContourStyle,
) -> Result<()> {
    let (rows, cols) = grid.shape();
    let points = grid.points();

    debug!(cells = points.len(), rows, cols, "predicting decision boundary");
    let labels = classifier
        .predict(&points)
        .change_context(PlotError::Prediction)
        .attach(format!("batch of {} grid points", points.len()))?;

    let actual = labels.len();
    let z = Array2::from_shape_vec((rows, cols), labels).map_err(|_| {
        Report::new(PlotError::ShapeMismatch {
            expected: rows * cols,
            actual,
        })
        .attach(format!("grid shape is ({rows}, {cols})"))
    })?;

    let mut levels: Vec<Value> = z.iter().cloned().collect();
    levels.sort_by(Value::total_cmp);
    levels.dedup_by(|a, b| a.total_cmp(b).is_eq());

    let positions = points
        .iter()
        .map(|&[x, y]| Vec2::new(x as f32, y as f32))
        .collect();

    figure.layers.push(Layer::Contour(ContourLayer {
        dims: UVec2::new(cols as u32, rows as u32),
        positions,
        values: z.into_raw_vec_and_offset().0,
        levels,
        colormap: style.colormap,
        alpha: style.alpha,
    }));
    Ok(())
}
