//! Decision-boundary charts for two-feature classifiers.
//!
//! Build a padded sampling grid over a dataset ([`grid::build_grid`]), evaluate a
//! [`boundary::Classifier`] over it ([`boundary::render_boundary`]) and compose the
//! result with a categorical scatter plot ([`plot::plot`]). The returned
//! [`core::Figure`] is plain data: inspect it, save it as JSON or open it in a
//! Bevy window with [`core::Figure::show`].

pub mod boundary;
pub mod config;
pub mod core;
pub mod data;
pub mod grid;
pub mod plot;
pub mod render;
pub mod runtime;
pub mod wasm_api;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("classifier prediction failed")]
    Prediction,

    #[error("invalid plot configuration")]
    Config,

    #[error("figure serialization failed")]
    Serialization,
}

/// Context a [`boundary::Classifier`] reports its own failures with.
#[derive(Debug, Error)]
#[error("prediction error")]
pub struct PredictError;

pub type Result<T> = std::result::Result<T, error_stack::Report<PlotError>>;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::boundary::*;
    pub use crate::config::*;
    pub use crate::core::*;
    pub use crate::data::*;
    pub use crate::grid::*;
    pub use crate::plot::*;
    pub use crate::runtime::*;
    pub use crate::{PlotError, PredictError, Result};
}
