//! Plot configuration
//!
//! A [`PlotConfig`] is held by the [`crate::plot::Plotter`]; its [`Theme`] is
//! copied into every figure it composes.

use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::boundary::ContourStyle;
use crate::core::{Color, DEEP_PALETTE, FigureSize, Marker};
use crate::grid::DEFAULT_STEP;
use crate::{PlotError, Result};

/// Number formatting for tick labels and numeric category names.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatFormat {
    /// Digits after the decimal point
    pub precision: usize,
    /// Group the integer part in thousands with `,`
    pub thousands_separator: bool,
}

impl Default for FloatFormat {
    fn default() -> Self {
        Self {
            precision: 2,
            thousands_separator: true,
        }
    }
}

impl FloatFormat {
    pub fn format(&self, v: f64) -> String {
        if v.is_nan() {
            return "nan".to_owned();
        }
        if v.is_infinite() {
            return if v > 0.0 { "inf" } else { "-inf" }.to_owned();
        }

        let digits = format!("{:.*}", self.precision, v.abs());
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };

        let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
        if v.is_sign_negative() {
            out.push('-');
        }
        if self.thousands_separator {
            for (i, ch) in int_part.chars().enumerate() {
                if i > 0 && (int_part.len() - i) % 3 == 0 {
                    out.push(',');
                }
                out.push(ch);
            }
        } else {
            out.push_str(int_part);
        }
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Multiplier applied to every font size
    pub font_scale: f32,
    pub background: Color,
    pub foreground: Color,
    /// Tick marks and frame
    pub axis_color: Color,
    pub float_format: FloatFormat,
}

impl Default for Theme {
    // Large fonts on a plain white canvas
    fn default() -> Self {
        Self {
            font_scale: 2.0,
            background: Color::WHITE,
            foreground: Color::rgb(0.15, 0.15, 0.15),
            axis_color: Color::rgb(0.2, 0.2, 0.2),
            float_format: FloatFormat::default(),
        }
    }
}

impl Theme {
    #[inline]
    pub fn font_size(&self, base: f32) -> f32 {
        base * self.font_scale
    }
}

/// Stacking of the decision boundary relative to the scatter points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerOrder {
    /// Scatter first, boundary drawn over it.
    #[default]
    AsCalled,
    /// Boundary first, points drawn on top.
    BoundaryBeneath,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub size: FigureSize,
    /// Scatter marker area in pt^2
    pub point_area: f32,
    pub grid_step: f64,
    pub boundary: ContourStyle,
    pub layer_order: LayerOrder,
    pub palette: Vec<Color>,
    pub markers: Vec<Marker>,
    pub theme: Theme,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            size: FigureSize::default(),
            point_area: 150.0,
            grid_step: DEFAULT_STEP,
            boundary: ContourStyle::default(),
            layer_order: LayerOrder::default(),
            palette: DEEP_PALETTE.to_vec(),
            markers: Marker::CYCLE.to_vec(),
            theme: Theme::default(),
        }
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).change_context(PlotError::Config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Report::new(e)
                .change_context(PlotError::Config)
                .attach(format!("reading {}", path.display()))
        })?;
        Self::from_json(&json).map_err(|e| e.attach(format!("in {}", path.display())))
    }

    pub fn validate(&self) -> Result<()> {
        let problem = if !(self.point_area > 0.0) {
            Some(format!("point_area must be positive, got {}", self.point_area))
        } else if !(self.grid_step > 0.0 && self.grid_step.is_finite()) {
            Some(format!("grid_step must be positive, got {}", self.grid_step))
        } else if !(0.0..=1.0).contains(&self.boundary.alpha) {
            Some(format!("boundary alpha must be in [0, 1], got {}", self.boundary.alpha))
        } else if self.palette.is_empty() {
            Some("palette is empty".to_owned())
        } else if self.markers.is_empty() {
            Some("marker cycle is empty".to_owned())
        } else if !(self.size.width_in > 0.0 && self.size.height_in > 0.0 && self.size.dpi > 0.0) {
            Some(format!("figure size must be positive, got {:?}", self.size))
        } else {
            None
        };

        match problem {
            Some(msg) => Err(Report::new(PlotError::Config).attach(msg)),
            None => Ok(()),
        }
    }

    pub fn size(mut self, width_in: f32, height_in: f32) -> Self {
        self.size.width_in = width_in;
        self.size.height_in = height_in;
        self
    }

    pub fn dpi(mut self, dpi: f32) -> Self {
        self.size.dpi = dpi;
        self
    }

    pub fn point_area(mut self, area: f32) -> Self {
        self.point_area = area;
        self
    }

    pub fn grid_step(mut self, step: f64) -> Self {
        self.grid_step = step;
        self
    }

    pub fn boundary(mut self, style: ContourStyle) -> Self {
        self.boundary = style;
        self
    }

    pub fn layer_order(mut self, order: LayerOrder) -> Self {
        self.layer_order = order;
        self
    }

    pub fn palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    pub fn markers(mut self, markers: Vec<Marker>) -> Self {
        self.markers = markers;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Colormap;

    #[test]
    fn float_format_groups_thousands() {
        let f = FloatFormat::default();
        assert_eq!(f.format(1234.5), "1,234.50");
        assert_eq!(f.format(-1234567.891), "-1,234,567.89");
        assert_eq!(f.format(12.0), "12.00");
        assert_eq!(f.format(999.999), "1,000.00");
        assert_eq!(f.format(f64::NAN), "nan");
        assert_eq!(f.format(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn float_format_without_grouping() {
        let f = FloatFormat {
            precision: 0,
            thousands_separator: false,
        };
        assert_eq!(f.format(1234.4), "1234");
    }

    #[test]
    fn defaults_match_the_house_style() {
        let cfg = PlotConfig::default();
        assert_eq!(cfg.size.width_in, 11.7);
        assert_eq!(cfg.size.height_in, 8.27);
        assert_eq!(cfg.point_area, 150.0);
        assert_eq!(cfg.grid_step, 0.1);
        assert_eq!(cfg.boundary.colormap, Colormap::Coolwarm);
        assert_eq!(cfg.boundary.alpha, 0.2);
        assert_eq!(cfg.layer_order, LayerOrder::AsCalled);
        assert_eq!(cfg.theme.font_scale, 2.0);
        assert_eq!(cfg.theme.font_size(10.0), 20.0);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = PlotConfig::from_json(
            r#"{ "grid_step": 0.25, "layer_order": "BoundaryBeneath", "theme": { "font_scale": 1.0 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.grid_step, 0.25);
        assert_eq!(cfg.layer_order, LayerOrder::BoundaryBeneath);
        assert_eq!(cfg.theme.font_scale, 1.0);
        assert_eq!(cfg.theme.background, Color::WHITE);
        assert_eq!(cfg.point_area, 150.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = PlotConfig::from_json(r#"{ "point_area": -1.0 }"#).unwrap_err();
        assert!(matches!(err.current_context(), PlotError::Config));

        let err = PlotConfig::from_json(r#"{ "palette": [] }"#).unwrap_err();
        assert!(matches!(err.current_context(), PlotError::Config));

        let err = PlotConfig::from_json("[1, 2").unwrap_err();
        assert!(matches!(err.current_context(), PlotError::Config));
    }

    #[test]
    fn load_reads_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.json");
        std::fs::write(&path, r#"{ "point_area": 60.0 }"#).unwrap();
        assert_eq!(PlotConfig::load(&path).unwrap().point_area, 60.0);

        let err = PlotConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err.current_context(), PlotError::Config));
    }
}
