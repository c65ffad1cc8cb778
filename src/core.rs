use crate::config::Theme;
use crate::data::Value;
use crate::{PlotError, Result};
use bevy_math::{UVec2, Vec2};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlotId(pub u64);

impl Default for PlotId {
    fn default() -> Self {
        static CTR: AtomicU64 = AtomicU64::new(1);
        Self(CTR.fetch_add(1, Ordering::Relaxed))
    }
}

impl PlotId {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Title and description shown above the plot area
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// `0xRRGGBB`, fully opaque.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
}

impl From<Color> for bevy::prelude::Color {
    #[inline]
    fn from(c: Color) -> Self {
        bevy::prelude::Color::srgba(c.r, c.g, c.b, c.a)
    }
}

/// Categorical palette used for scatter groups ("deep").
pub const DEEP_PALETTE: [Color; 10] = [
    Color::hex(0x4C72B0),
    Color::hex(0xDD8452),
    Color::hex(0x55A868),
    Color::hex(0xC44E52),
    Color::hex(0x8172B3),
    Color::hex(0x937860),
    Color::hex(0xDA8BC3),
    Color::hex(0x8C8C8C),
    Color::hex(0xCCB974),
    Color::hex(0x64B5CD),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    Circle,
    Cross,
    Square,
    Plus,
    Diamond,
    TriangleUp,
    TriangleDown,
    Pentagon,
}

impl Marker {
    /// Cycle order for categorical styling
    pub const CYCLE: [Marker; 8] = [
        Marker::Circle,
        Marker::Cross,
        Marker::Square,
        Marker::Plus,
        Marker::Diamond,
        Marker::TriangleUp,
        Marker::TriangleDown,
        Marker::Pentagon,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Colormap {
    #[default]
    Coolwarm, // diverging: blue-grey-red
    RdBu,     // diverging: red-white-blue
    Viridis,
    Greys,
}

impl Colormap {
    /// Map value in [0, 1] to an opaque color
    pub fn sample(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let stops: &[Color] = match self {
            Colormap::Coolwarm => &[
                Color::rgb(0.230, 0.299, 0.754),
                Color::rgb(0.865, 0.865, 0.865),
                Color::rgb(0.706, 0.016, 0.150),
            ],
            Colormap::RdBu => &[
                Color::rgb(0.404, 0.0, 0.122),
                Color::rgb(0.969, 0.969, 0.969),
                Color::rgb(0.020, 0.188, 0.380),
            ],
            Colormap::Viridis => &[
                Color::rgb(0.267, 0.005, 0.329),
                Color::rgb(0.128, 0.567, 0.551),
                Color::rgb(0.993, 0.906, 0.144),
            ],
            Colormap::Greys => &[Color::rgb(1.0, 1.0, 1.0), Color::rgb(0.0, 0.0, 0.0)],
        };

        let segments = (stops.len() - 1) as f32;
        let pos = t * segments;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        stops[i].lerp(stops[i + 1], pos - i as f32)
    }
}

/// Physical figure size; the renderer works in `inches * dpi` pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: f32,
}

impl Default for FigureSize {
    // A4 landscape
    fn default() -> Self {
        Self {
            width_in: 11.7,
            height_in: 8.27,
            dpi: 100.0,
        }
    }
}

impl FigureSize {
    pub fn pixels(&self) -> Vec2 {
        Vec2::new(self.width_in * self.dpi, self.height_in * self.dpi)
    }
}

/// Points sharing one category: same color, same marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterGroup {
    pub label: String,
    pub color: Color,
    pub marker: Marker,
    pub points: Vec<Vec2>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterLayer {
    /// Marker area in pt^2
    pub point_area: f32,
    pub groups: Vec<ScatterGroup>,
}

impl ScatterLayer {
    pub fn point_count(&self) -> usize {
        self.groups.iter().map(|g| g.points.len()).sum()
    }
}

/// Filled-contour layer over a rectilinear grid of predictions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContourLayer {
    pub dims: UVec2,          // (cols, rows)
    pub positions: Vec<Vec2>, // cell centers, row-major
    pub values: Vec<Value>,   // row-major: values[row * cols + col]
    /// Distinct values in ascending order; colors are assigned by level index
    pub levels: Vec<Value>,
    pub colormap: Colormap,
    pub alpha: f32,
}

impl ContourLayer {
    pub fn cols(&self) -> usize {
        self.dims.x as usize
    }

    pub fn rows(&self) -> usize {
        self.dims.y as usize
    }

    pub fn level_of(&self, value: &Value) -> Option<usize> {
        self.levels.binary_search_by(|l| l.total_cmp(value)).ok()
    }

    /// Colormap position of a level, spread evenly over [0, 1].
    pub fn level_t(&self, level: usize) -> f32 {
        if self.levels.len() < 2 {
            return 0.0;
        }
        level as f32 / (self.levels.len() - 1) as f32
    }

    /// Spacing between neighbouring cell centers along x and y.
    pub fn cell_size(&self) -> Vec2 {
        let cols = self.cols();
        let origin = self.positions.first().copied().unwrap_or(Vec2::ZERO);
        let dx = match self.positions.get(1) {
            Some(p) if cols > 1 => p.x - origin.x,
            _ => 1.0,
        };
        let dy = match self.positions.get(cols) {
            Some(p) if self.rows() > 1 => p.y - origin.y,
            _ => 1.0,
        };
        Vec2::new(dx.abs(), dy.abs())
    }

    /// Check that cells, positions and levels agree with `dims`.
    pub fn validate(&self) -> Result<()> {
        let cells = self.cols() * self.rows();
        for (what, len) in [("positions", self.positions.len()), ("values", self.values.len())] {
            if len != cells {
                return Err(Report::new(PlotError::ShapeMismatch {
                    expected: cells,
                    actual: len,
                })
                .attach(format!(
                    "contour {what} do not fill a {}x{} grid",
                    self.cols(),
                    self.rows()
                )));
            }
        }
        if !self.levels.windows(2).all(|w| w[0].total_cmp(&w[1]).is_lt()) {
            return Err(Report::new(PlotError::InvalidInput(
                "contour levels must be strictly ascending".to_owned(),
            )));
        }
        if let Some(v) = self.values.iter().find(|v| self.level_of(v).is_none()) {
            return Err(Report::new(PlotError::InvalidInput(format!(
                "contour value {v} is not one of its levels"
            ))));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Layer {
    Scatter(ScatterLayer),
    Contour(ContourLayer),
}

/// The drawing surface: an ordered stack of layers plus axis decoration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub id: PlotId,
    pub meta: PlotMeta,
    pub size: FigureSize,
    pub theme: Theme,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub legend_title: Option<String>,
    /// Draw order: later layers are drawn on top
    pub layers: Vec<Layer>,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(FigureSize::default(), Theme::default())
    }
}

impl Figure {
    pub fn new(size: FigureSize, theme: Theme) -> Self {
        Self {
            id: PlotId::new(),
            meta: PlotMeta::default(),
            size,
            theme,
            x_label: None,
            y_label: None,
            legend_title: None,
            layers: vec![],
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn scatter_layers(&self) -> impl Iterator<Item = &ScatterLayer> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Scatter(s) => Some(s),
            _ => None,
        })
    }

    pub fn contour_layers(&self) -> impl Iterator<Item = &ContourLayer> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Contour(c) => Some(c),
            _ => None,
        })
    }

    /// Data-space bounds covering every point and every contour cell.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        let mut any = false;

        let mut include = |p: Vec2| {
            if p.is_finite() {
                min = min.min(p);
                max = max.max(p);
                any = true;
            }
        };

        for layer in &self.layers {
            match layer {
                Layer::Scatter(s) => {
                    for p in s.groups.iter().flat_map(|g| &g.points) {
                        include(*p);
                    }
                }
                Layer::Contour(c) => {
                    // Cells extend half a step past their centers
                    let half = c.cell_size() * 0.5;
                    for p in &c.positions {
                        include(*p - half);
                        include(*p + half);
                    }
                }
            }
        }
        any.then_some((min, max))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).change_context(PlotError::Serialization)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let figure: Self = serde_json::from_str(json).change_context(PlotError::Serialization)?;
        for (i, contour) in figure.contour_layers().enumerate() {
            contour
                .validate()
                .change_context(PlotError::Serialization)
                .attach(format!("contour layer {i}"))?;
        }
        Ok(figure)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            Report::new(e)
                .change_context(PlotError::Serialization)
                .attach(format!("writing {}", path.display()))
        })
    }

    /// Open the figure in a native window (blocks until it is closed)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn show(self) {
        crate::runtime::run_figure(self);
    }
}
