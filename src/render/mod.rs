pub mod draw;
pub mod layout;
pub mod resources;

use draw::*;
pub use resources::*;

use bevy::prelude::*;

/// Draws the [`FigureRes`] figure once at startup and keeps it fitted to the
/// window.
#[derive(Default)]
pub struct FigureRenderPlugin;

impl Plugin for FigureRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, draw_figure))
            .add_systems(Update, fit_figure_to_window);
    }
}
