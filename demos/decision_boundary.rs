//! Fits a nearest-centroid classifier on a small three-class dataset and shows
//! its decision boundary under the labelled points.
//!
//! `cargo run --example decision_boundary [figure.json]` also saves the figure
//! when a path is given.

use error_stack::Report;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidi_boundary::prelude::*;

/// Assigns each point the class whose mean is closest.
struct NearestCentroid {
    centroids: Vec<(Value, [f64; 2])>,
}

impl NearestCentroid {
    fn fit(xs: &[f64], ys: &[f64], labels: &[Value]) -> Self {
        let mut sums: Vec<(Value, [f64; 2], usize)> = Vec::new();
        for ((&x, &y), label) in xs.iter().zip(ys).zip(labels) {
            match sums.iter_mut().find(|(l, _, _)| l == label) {
                Some((_, sum, n)) => {
                    sum[0] += x;
                    sum[1] += y;
                    *n += 1;
                }
                None => sums.push((label.clone(), [x, y], 1)),
            }
        }
        let centroids = sums
            .into_iter()
            .map(|(label, [sx, sy], n)| (label, [sx / n as f64, sy / n as f64]))
            .collect();
        Self { centroids }
    }
}

impl Classifier for NearestCentroid {
    fn predict(&self, points: &[[f64; 2]]) -> std::result::Result<Vec<Value>, Report<PredictError>> {
        if self.centroids.is_empty() {
            return Err(Report::new(PredictError).attach("classifier has no classes".to_string()));
        }
        Ok(points
            .iter()
            .map(|[x, y]| {
                let dist = |c: &[f64; 2]| (c[0] - x).powi(2) + (c[1] - y).powi(2);
                self.centroids
                    .iter()
                    .min_by(|a, b| dist(&a.1).total_cmp(&dist(&b.1)))
                    .map(|(label, _)| label.clone())
                    .unwrap_or_else(|| Value::from(f64::NAN))
            })
            .collect())
    }
}

fn sample_data() -> Result<Dataset> {
    // (sepal width, petal length, species), a slice of the iris measurements
    let rows = [
        (3.5, 1.4, "setosa"),
        (3.0, 1.4, "setosa"),
        (3.2, 1.3, "setosa"),
        (3.6, 1.4, "setosa"),
        (3.9, 1.7, "setosa"),
        (3.4, 1.5, "setosa"),
        (3.2, 4.7, "versicolor"),
        (3.2, 4.5, "versicolor"),
        (3.1, 4.9, "versicolor"),
        (2.3, 4.0, "versicolor"),
        (2.8, 4.6, "versicolor"),
        (2.8, 4.5, "versicolor"),
        (3.3, 6.0, "virginica"),
        (2.7, 5.1, "virginica"),
        (3.0, 5.9, "virginica"),
        (2.9, 5.6, "virginica"),
        (3.0, 5.8, "virginica"),
        (3.0, 6.6, "virginica"),
    ];

    Dataset::new()
        .with_column("sepal_width", rows.iter().map(|r| r.0))?
        .with_column("petal_length", rows.iter().map(|r| r.1))?
        .with_column("species", rows.iter().map(|r| r.2))
}

fn run() -> Result<()> {
    let data = sample_data()?;
    let xs = data.column("sepal_width")?.numeric()?;
    let ys = data.column("petal_length")?.numeric()?;
    let model = NearestCentroid::fit(&xs, &ys, &data.column("species")?.values);
    info!(classes = model.centroids.len(), "fitted nearest-centroid model");

    let config = PlotConfig::default()
        .grid_step(0.02)
        .layer_order(LayerOrder::BoundaryBeneath)
        .boundary(ContourStyle::default().alpha(0.35));
    info!("training data\n{}", data.format_table(&config.theme.float_format));
    let mut figure = Plotter::new(config).plot(
        &data,
        "sepal_width",
        "petal_length",
        "species",
        Some(&model),
    )?;
    figure.meta.title = Some("Nearest centroid".to_owned());

    if let Some(path) = std::env::args().nth(1) {
        figure.save_json(&path)?;
        info!(%path, "saved figure");
    }

    figure.show();
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidi_boundary=debug,decision_boundary=info".into()),
        )
        .init();

    if let Err(report) = run() {
        error!("{report:?}");
        std::process::exit(1);
    }
}
