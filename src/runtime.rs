use bevy::prelude::*;

use crate::core::Figure;
use crate::render::{FigureRenderPlugin, FigureRes};

fn window_title(figure: &Figure) -> String {
    figure
        .meta
        .title
        .clone()
        .unwrap_or_else(|| "Decision boundary".to_owned())
}

/// Open a window showing the figure. Blocks until the window is closed.
///
/// Bevy's log plugin is left out so the caller's tracing subscriber stays in
/// charge.
#[cfg(not(target_arch = "wasm32"))]
pub fn run_figure(figure: Figure) {
    let bg = figure.theme.background;
    let title = window_title(&figure);
    tracing::info!(%title, layers = figure.layers.len(), "opening figure window");

    App::new()
        .insert_resource(ClearColor(Color::from(bg)))
        .insert_resource(FigureRes::new(figure))
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title,
                    ..default()
                }),
                ..default()
            })
            .disable::<bevy::log::LogPlugin>(),
            FigureRenderPlugin,
        ))
        .run();
}

#[cfg(target_arch = "wasm32")]
pub fn run_figure(figure: Figure, canvas_id: &str) {
    let bg = figure.theme.background;
    let title = window_title(&figure);

    App::new()
        .insert_resource(ClearColor(Color::from(bg)))
        .insert_resource(FigureRes::new(figure))
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title,
                    canvas: Some(format!("#{}", canvas_id)),
                    fit_canvas_to_parent: true,
                    ..default()
                }),
                ..default()
            }),
            FigureRenderPlugin,
        ))
        .run();
}
