//! Padded sampling grids over a pair of feature axes.

use error_stack::Report;
use ndarray::Array2;
use tracing::debug;

use crate::{PlotError, Result};

pub const DEFAULT_STEP: f64 = 0.1;

/// Padding added below the minimum and above the maximum of each axis.
pub const GRID_PADDING: f64 = 1.0;

/// Upper bound on `rows * cols`, keeps a tiny step from exhausting memory.
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Two same-shaped coordinate arrays: `xx[[r, c]]` is the x of cell (r, c),
/// `yy[[r, c]]` its y. Rows follow the y axis, columns the x axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Meshgrid {
    xx: Array2<f64>,
    yy: Array2<f64>,
}

impl Meshgrid {
    pub fn from_arrays(xx: Array2<f64>, yy: Array2<f64>) -> Result<Self> {
        if xx.dim() != yy.dim() {
            return Err(Report::new(PlotError::ShapeMismatch {
                expected: xx.len(),
                actual: yy.len(),
            })
            .attach(format!(
                "xx has shape {:?}, yy has shape {:?}",
                xx.dim(),
                yy.dim()
            )));
        }
        Ok(Self { xx, yy })
    }

    pub fn xx(&self) -> &Array2<f64> {
        &self.xx
    }

    pub fn yy(&self) -> &Array2<f64> {
        &self.yy
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.xx.dim()
    }

    pub fn len(&self) -> usize {
        self.xx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xx.is_empty()
    }

    /// Every cell as an `[x, y]` pair, row-major.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.xx
            .iter()
            .zip(self.yy.iter())
            .map(|(&x, &y)| [x, y])
            .collect()
    }

    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>) {
        (self.xx, self.yy)
    }
}

/// Evenly spaced samples `start, start + step, ...` strictly below `stop`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = sample_count(start, stop, step);
    let mut samples: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    // ceil() can overshoot by one when (stop - start) / step rounds up
    while samples.last().is_some_and(|&v| v >= stop) {
        samples.pop();
    }
    samples
}

fn sample_count(start: f64, stop: f64, step: f64) -> usize {
    let n = ((stop - start) / step).ceil();
    if n > 0.0 { n as usize } else { 0 }
}

fn finite_range(name: &str, values: &[f64]) -> Result<(f64, f64)> {
    if values.is_empty() {
        return Err(Report::new(PlotError::InvalidInput(format!(
            "`{name}` is empty"
        ))));
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(Report::new(PlotError::InvalidInput(format!(
            "`{name}` holds a non-finite value"
        )))
        .attach(format!("{name}[{i}] = {}", values[i])));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok((min - GRID_PADDING, max + GRID_PADDING))
}

/// Build the grid covering `[min(x) - 1, max(x) + 1) x [min(y) - 1, max(y) + 1)`
/// sampled every `step`.
pub fn build_grid(x: &[f64], y: &[f64], step: f64) -> Result<Meshgrid> {
    if !(step > 0.0 && step.is_finite()) {
        return Err(Report::new(PlotError::InvalidInput(format!(
            "`step` must be positive and finite, got {step}"
        ))));
    }

    let (x_min, x_max) = finite_range("x", x)?;
    let (y_min, y_max) = finite_range("y", y)?;

    let cells = ((x_max - x_min) / step).ceil() * ((y_max - y_min) / step).ceil();
    if cells > MAX_GRID_CELLS as f64 {
        return Err(Report::new(PlotError::InvalidInput(format!(
            "`step` {step} is too small for the data range"
        )))
        .attach(format!(
            "grid would hold {cells} cells, limit is {MAX_GRID_CELLS}"
        )));
    }

    let xs = arange(x_min, x_max, step);
    let ys = arange(y_min, y_max, step);
    let (rows, cols) = (ys.len(), xs.len());

    debug!(
        rows,
        cols,
        x_min,
        x_max,
        y_min,
        y_max,
        step,
        "built meshgrid"
    );

    Ok(Meshgrid {
        xx: Array2::from_shape_fn((rows, cols), |(_, c)| xs[c]),
        yy: Array2::from_shape_fn((rows, cols), |(r, _)| ys[r]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coarse_grid_has_expected_samples() {
        let grid = build_grid(&[0.0, 1.0, 0.0, 1.0], &[0.0, 0.0, 1.0, 1.0], 0.5).unwrap();
        assert_eq!(grid.shape(), (6, 6));

        let row0: Vec<f64> = grid.xx().row(0).to_vec();
        assert_eq!(row0, vec![-1.0, -0.5, 0.0, 0.5, 1.0, 1.5]);

        let col0: Vec<f64> = grid.yy().column(0).to_vec();
        assert_eq!(col0, vec![-1.0, -0.5, 0.0, 0.5, 1.0, 1.5]);

        // every row of xx is identical, every column of yy is identical
        assert!(grid.xx().rows().into_iter().all(|r| r.to_vec() == row0));
        assert!(grid.yy().columns().into_iter().all(|c| c.to_vec() == col0));
    }

    #[test]
    fn default_step_drops_the_overshooting_sample() {
        let grid = build_grid(&[0.0, 1.0], &[0.0, 1.0], DEFAULT_STEP).unwrap();
        assert_eq!(grid.shape(), (30, 30));
        assert!(grid.xx().iter().all(|&v| v < 2.0));
    }

    #[test]
    fn samples_stay_inside_the_padded_range() {
        let cases: [(&[f64], &[f64], f64); 4] = [
            (&[3.2, -7.5, 0.01], &[100.0, 101.5], 0.1),
            (&[5.0], &[5.0], 0.3),
            (&[-0.7, 0.7], &[1e3, 1e3 + 0.05], 0.07),
            (&[1.0, 2.0, 3.0], &[-2.0, 2.0], 10.0),
        ];

        for (x, y, step) in cases {
            let grid = build_grid(x, y, step).unwrap();
            assert_eq!(grid.xx().dim(), grid.yy().dim());
            assert!(!grid.is_empty());

            let lo_x = x.iter().copied().fold(f64::INFINITY, f64::min) - 1.0;
            let hi_x = x.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 1.0;
            let lo_y = y.iter().copied().fold(f64::INFINITY, f64::min) - 1.0;
            let hi_y = y.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 1.0;

            assert!(grid.xx().iter().all(|&v| v >= lo_x && v < hi_x), "{x:?} step {step}");
            assert!(grid.yy().iter().all(|&v| v >= lo_y && v < hi_y), "{y:?} step {step}");
        }
    }

    #[test]
    fn grid_is_deterministic() {
        let x = [0.3, 2.9, -1.4, 0.0];
        let y = [7.7, 6.1, 6.6, 8.0];
        let a = build_grid(&x, &y, 0.13).unwrap();
        let b = build_grid(&x, &y, 0.13).unwrap();

        let bits = |g: &Meshgrid| -> Vec<u64> {
            g.xx().iter().chain(g.yy().iter()).map(|v| v.to_bits()).collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn non_positive_step_is_invalid() {
        for step in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = build_grid(&[0.0], &[0.0], step).unwrap_err();
            assert!(
                matches!(err.current_context(), PlotError::InvalidInput(_)),
                "step {step}"
            );
        }
    }

    #[test]
    fn empty_or_non_finite_axes_are_invalid() {
        let err = build_grid(&[], &[1.0], 0.1).unwrap_err();
        assert!(matches!(err.current_context(), PlotError::InvalidInput(m) if m.contains("`x`")));

        let err = build_grid(&[1.0], &[], 0.1).unwrap_err();
        assert!(matches!(err.current_context(), PlotError::InvalidInput(m) if m.contains("`y`")));

        let err = build_grid(&[1.0, f64::NAN], &[1.0], 0.1).unwrap_err();
        assert!(matches!(err.current_context(), PlotError::InvalidInput(_)));
    }

    #[test]
    fn oversized_grid_is_refused() {
        let err = build_grid(&[0.0], &[0.0], 1e-6).unwrap_err();
        assert!(matches!(err.current_context(), PlotError::InvalidInput(_)));
    }

    #[test]
    fn points_flatten_row_major() {
        let grid = build_grid(&[0.0], &[0.0], 1.0).unwrap();
        // samples -1.0 and 0.0 on both axes
        assert_eq!(
            grid.points(),
            vec![[-1.0, -1.0], [0.0, -1.0], [-1.0, 0.0], [0.0, 0.0]]
        );
    }

    #[test]
    fn mismatched_arrays_are_rejected() {
        let err = Meshgrid::from_arrays(Array2::zeros((2, 3)), Array2::zeros((3, 2))).unwrap_err();
        assert!(matches!(
            err.current_context(),
            PlotError::ShapeMismatch { expected: 6, actual: 6 }
        ));
    }

    #[test]
    fn arange_excludes_stop() {
        assert_eq!(arange(0.0, 1.0, 0.25), vec![0.0, 0.25, 0.5, 0.75]);
        assert!(arange(1.0, 1.0, 0.1).is_empty());
        assert!(arange(2.0, 1.0, 0.1).is_empty());
    }
}
