//! Scatter plot of two feature columns, styled by a categorical target, with an
//! optional decision-boundary overlay.

use bevy_math::Vec2;
use tracing::{debug, warn};

use crate::boundary::{Classifier, render_boundary};
use crate::config::{LayerOrder, PlotConfig};
use crate::core::{Figure, Layer, ScatterGroup, ScatterLayer};
use crate::data::{Dataset, Value};
use crate::grid::build_grid;
use crate::Result;

/// Compose a figure with the default [`PlotConfig`].
pub fn plot(
    data: &Dataset,
    feature1: &str,
    feature2: &str,
    target: &str,
    model: Option<&dyn Classifier>,
) -> Result<Figure> {
    Plotter::default().plot(data, feature1, feature2, target, model)
}

/// Plot composer holding its configuration.
#[derive(Clone, Debug, Default)]
pub struct Plotter {
    config: PlotConfig,
}

impl Plotter {
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn plot(
        &self,
        data: &Dataset,
        feature1: &str,
        feature2: &str,
        target: &str,
        model: Option<&dyn Classifier>,
    ) -> Result<Figure> {
        self.config.validate()?;

        // Resolve every column before anything is drawn
        let xs = data.column(feature1)?;
        let ys = data.column(feature2)?;
        let labels = data.column(target)?;
        let xs = xs.numeric()?;
        let ys = ys.numeric()?;

        let mut kept_x = Vec::with_capacity(xs.len());
        let mut kept_y = Vec::with_capacity(ys.len());
        let mut kept_labels = Vec::with_capacity(xs.len());
        for ((&x, &y), label) in xs.iter().zip(&ys).zip(&labels.values) {
            if x.is_finite() && y.is_finite() && !label.is_missing() {
                kept_x.push(x);
                kept_y.push(y);
                kept_labels.push(label);
            }
        }
        let dropped = data.len() - kept_labels.len();
        if dropped > 0 {
            warn!(dropped, feature1, feature2, target, "skipping rows with missing values");
        }

        let mut figure = Figure::new(self.config.size, self.config.theme.clone());
        figure.x_label = Some(feature1.to_owned());
        figure.y_label = Some(feature2.to_owned());
        figure.legend_title = Some(target.to_owned());

        let scatter = Layer::Scatter(self.scatter_layer(&kept_x, &kept_y, &kept_labels));

        match (model, self.config.layer_order) {
            (None, _) => figure.layers.push(scatter),
            (Some(model), LayerOrder::AsCalled) => {
                figure.layers.push(scatter);
                self.overlay_boundary(&mut figure, model, &kept_x, &kept_y)?;
            }
            (Some(model), LayerOrder::BoundaryBeneath) => {
                self.overlay_boundary(&mut figure, model, &kept_x, &kept_y)?;
                figure.layers.push(scatter);
            }
        }

        debug!(
            layers = figure.layers.len(),
            rows = kept_labels.len(),
            boundary = model.is_some(),
            "composed figure"
        );
        Ok(figure)
    }

    fn overlay_boundary(
        &self,
        figure: &mut Figure,
        model: &dyn Classifier,
        xs: &[f64],
        ys: &[f64],
    ) -> Result<()> {
        let grid = build_grid(xs, ys, self.config.grid_step)?;
        render_boundary(figure, model, &grid, &self.config.boundary)
    }

    fn scatter_layer(&self, xs: &[f64], ys: &[f64], labels: &[&Value]) -> ScatterLayer {
        let categories = category_order(labels);
        let mut groups: Vec<ScatterGroup> = categories
            .iter()
            .enumerate()
            .map(|(i, cat)| ScatterGroup {
                label: cat.to_string(),
                color: self.config.palette[i % self.config.palette.len()],
                marker: self.config.markers[i % self.config.markers.len()],
                points: vec![],
            })
            .collect();

        for ((&x, &y), label) in xs.iter().zip(ys).zip(labels) {
            if let Some(i) = categories.iter().position(|c| c == *label) {
                groups[i].points.push(Vec2::new(x as f32, y as f32));
            }
        }

        ScatterLayer {
            point_area: self.config.point_area,
            groups,
        }
    }
}

/// Numeric categories ascend; text categories keep first-appearance order.
fn category_order(labels: &[&Value]) -> Vec<Value> {
    let mut cats: Vec<Value> = Vec::new();
    for label in labels {
        if !cats.contains(*label) {
            cats.push((*label).clone());
        }
    }
    if cats.iter().all(|c| matches!(c, Value::Number(_))) {
        cats.sort_by(Value::total_cmp);
    }
    cats
}
