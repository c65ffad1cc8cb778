//! Spawns the entities for a figure: background, boundary cells, markers,
//! axes, legend.

#![allow(clippy::too_many_arguments)]

use bevy::prelude::*;

use super::layout::{PlotArea, contour_runs, format_tick, ticks};
use super::resources::{FigureRes, FigureRoot, UnitMeshes};
use crate::core::{ContourLayer, Figure, Layer, ScatterLayer};

/// Points per inch, for marker areas given in pt^2
const POINTS_PER_INCH: f32 = 72.0;

/// z offset between stacked figure layers
const LAYER_Z_STEP: f32 = 10.0;
const FRAME_Z: f32 = 500.0;
const TEXT_Z: f32 = 510.0;

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d::default());
}

pub fn draw_figure(
    mut commands: Commands,
    figure: Res<FigureRes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let figure = &figure.0;
    let unit = UnitMeshes::new(&mut meshes);
    let area = PlotArea::for_figure(figure);

    let root = commands
        .spawn((FigureRoot, Transform::default(), Visibility::default()))
        .id();

    // Figure background
    let bg_mat = materials.add(ColorMaterial::from(Color::from(figure.theme.background)));
    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Mesh2d(unit.quad.clone()),
            MeshMaterial2d(bg_mat),
            Transform {
                translation: Vec3::new(0.0, 0.0, -1.0),
                scale: area.figure_size.extend(1.0),
                ..default()
            },
        ));
    });

    for (i, layer) in figure.layers.iter().enumerate() {
        let z = i as f32 * LAYER_Z_STEP;
        match layer {
            Layer::Contour(contour) => {
                draw_contour(&mut commands, root, contour, &area, &unit, &mut materials, z);
            }
            Layer::Scatter(scatter) => {
                let diameter = marker_diameter(scatter, figure);
                draw_scatter(&mut commands, root, scatter, &area, &unit, &mut materials, diameter, z);
            }
        }
    }

    draw_axes(&mut commands, root, figure, &area, &unit, &mut materials);
    draw_legend(&mut commands, root, figure, &area, &unit, &mut materials);
}

/// Keep the whole figure visible when the window is resized.
pub fn fit_figure_to_window(
    windows: Query<&Window>,
    figure: Res<FigureRes>,
    mut roots: Query<&mut Transform, With<FigureRoot>>,
) {
    let Some(window) = windows.iter().next() else {
        return;
    };
    let size = figure.0.size.pixels();
    let fit = (window.width() / size.x).min(window.height() / size.y);
    if !fit.is_finite() || fit <= 0.0 {
        return;
    }
    for mut transform in &mut roots {
        if transform.scale.x != fit {
            transform.scale = Vec3::new(fit, fit, 1.0);
        }
    }
}

fn marker_diameter(scatter: &ScatterLayer, figure: &Figure) -> f32 {
    scatter.point_area.max(0.0).sqrt() * figure.size.dpi / POINTS_PER_INCH
}

fn draw_contour(
    commands: &mut Commands,
    root: Entity,
    contour: &ContourLayer,
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    z: f32,
) {
    if contour.positions.len() != contour.values.len() || contour.cols() == 0 {
        return;
    }

    let level_mats: Vec<Handle<ColorMaterial>> = (0..contour.levels.len())
        .map(|level| {
            let c = contour
                .colormap
                .sample(contour.level_t(level))
                .with_a(contour.alpha);
            materials.add(ColorMaterial::from(Color::from(c)))
        })
        .collect();

    let half = contour.cell_size() * 0.5;
    let cols = contour.cols();

    commands.entity(root).with_children(|parent| {
        for run in contour_runs(contour) {
            let first = contour.positions[run.row * cols + run.first_col];
            let last = contour.positions[run.row * cols + run.last_col];
            let lo = area.data_to_world(first - half);
            let hi = area.data_to_world(last + half);

            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(level_mats[run.level].clone()),
                Transform {
                    translation: ((lo + hi) * 0.5).extend(z),
                    scale: (hi - lo).abs().extend(1.0),
                    ..default()
                },
            ));
        }
    });
}

fn draw_scatter(
    commands: &mut Commands,
    root: Entity,
    scatter: &ScatterLayer,
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    diameter: f32,
    z: f32,
) {
    let (lo, hi) = (area.min_corner(), area.max_corner());

    for group in &scatter.groups {
        let mat = materials.add(ColorMaterial::from(Color::from(group.color)));
        let parts = unit.marker_parts(group.marker);

        commands.entity(root).with_children(|parent| {
            for &pt in &group.points {
                let pos = area.data_to_world(pt);
                if pos.x < lo.x || pos.x > hi.x || pos.y < lo.y || pos.y > hi.y {
                    continue;
                }
                for (mesh, angle) in &parts {
                    parent.spawn((
                        Mesh2d(mesh.clone()),
                        MeshMaterial2d(mat.clone()),
                        Transform {
                            translation: pos.extend(z + 1.0),
                            rotation: Quat::from_rotation_z(*angle),
                            scale: Vec3::new(diameter, diameter, 1.0),
                        },
                    ));
                }
            }
        });
    }
}

fn draw_axes(
    commands: &mut Commands,
    root: Entity,
    figure: &Figure,
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
) {
    let theme = &figure.theme;
    let axis_mat = materials.add(ColorMaterial::from(Color::from(theme.axis_color)));
    let text_color = TextColor(Color::from(theme.foreground));
    let tick_font = theme.font_size(10.0);
    let label_font = theme.font_size(12.0);
    let (lo, hi) = (area.min_corner(), area.max_corner());
    let tick_length = 6.0;

    commands.entity(root).with_children(|parent| {
        // Frame
        for (center, size) in [
            (Vec2::new(area.world_center.x, lo.y), Vec2::new(area.world_size.x, 1.5)),
            (Vec2::new(area.world_center.x, hi.y), Vec2::new(area.world_size.x, 1.5)),
            (Vec2::new(lo.x, area.world_center.y), Vec2::new(1.5, area.world_size.y)),
            (Vec2::new(hi.x, area.world_center.y), Vec2::new(1.5, area.world_size.y)),
        ] {
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(axis_mat.clone()),
                Transform {
                    translation: center.extend(FRAME_Z),
                    scale: size.extend(1.0),
                    ..default()
                },
            ));
        }

        for x in ticks(area.data_min.x, area.data_max.x, 8) {
            let wx = area.data_to_world(Vec2::new(x, 0.0)).x;
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(axis_mat.clone()),
                Transform {
                    translation: Vec3::new(wx, lo.y - tick_length * 0.5, FRAME_Z),
                    scale: Vec3::new(1.5, tick_length, 1.0),
                    ..default()
                },
            ));
            parent.spawn((
                Text2d::new(format_tick(x)),
                TextFont {
                    font_size: tick_font,
                    ..default()
                },
                text_color,
                Transform::from_translation(Vec3::new(
                    wx,
                    lo.y - tick_length - tick_font * 0.8,
                    TEXT_Z,
                )),
            ));
        }

        for y in ticks(area.data_min.y, area.data_max.y, 6) {
            let wy = area.data_to_world(Vec2::new(0.0, y)).y;
            let label = format_tick(y);
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(axis_mat.clone()),
                Transform {
                    translation: Vec3::new(lo.x - tick_length * 0.5, wy, FRAME_Z),
                    scale: Vec3::new(tick_length, 1.5, 1.0),
                    ..default()
                },
            ));
            let half_width = label.chars().count() as f32 * tick_font * 0.3;
            parent.spawn((
                Text2d::new(label),
                TextFont {
                    font_size: tick_font,
                    ..default()
                },
                text_color,
                Transform::from_translation(Vec3::new(
                    lo.x - tick_length - 6.0 - half_width,
                    wy,
                    TEXT_Z,
                )),
            ));
        }

        if let Some(ref x_label) = figure.x_label {
            parent.spawn((
                Text2d::new(x_label.clone()),
                TextFont {
                    font_size: label_font,
                    ..default()
                },
                text_color,
                Transform::from_translation(Vec3::new(
                    area.world_center.x,
                    lo.y - tick_length - tick_font * 1.6 - label_font,
                    TEXT_Z,
                )),
            ));
        }

        if let Some(ref y_label) = figure.y_label {
            parent.spawn((
                Text2d::new(y_label.clone()),
                TextFont {
                    font_size: label_font,
                    ..default()
                },
                text_color,
                Transform {
                    translation: Vec3::new(
                        -area.figure_size.x * 0.5 + label_font,
                        area.world_center.y,
                        TEXT_Z,
                    ),
                    rotation: Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
                    ..default()
                },
            ));
        }

        if let Some(ref title) = figure.meta.title {
            parent.spawn((
                Text2d::new(title.clone()),
                TextFont {
                    font_size: theme.font_size(14.0),
                    ..default()
                },
                text_color,
                Transform::from_translation(Vec3::new(
                    area.world_center.x,
                    hi.y + theme.font_size(14.0),
                    TEXT_Z,
                )),
            ));
        }
    });
}

fn draw_legend(
    commands: &mut Commands,
    root: Entity,
    figure: &Figure,
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
) {
    let theme = &figure.theme;
    let font = theme.font_size(10.0);
    let row_height = font * 1.6;
    let text_color = TextColor(Color::from(theme.foreground));
    let left = area.max_corner().x + 24.0;
    let mut y = area.max_corner().y - font;

    if let Some(ref title) = figure.legend_title {
        let half_width = title.chars().count() as f32 * font * 0.3;
        commands.entity(root).with_children(|parent| {
            parent.spawn((
                Text2d::new(title.clone()),
                TextFont {
                    font_size: font,
                    ..default()
                },
                text_color,
                Transform::from_translation(Vec3::new(left + half_width, y, TEXT_Z)),
            ));
        });
        y -= row_height;
    }

    for scatter in figure.scatter_layers() {
        let diameter = marker_diameter(scatter, figure).min(row_height * 0.8);
        for group in &scatter.groups {
            let mat = materials.add(ColorMaterial::from(Color::from(group.color)));
            let half_width = group.label.chars().count() as f32 * font * 0.3;
            let parts = unit.marker_parts(group.marker);

            commands.entity(root).with_children(|parent| {
                for (mesh, angle) in parts {
                    parent.spawn((
                        Mesh2d(mesh),
                        MeshMaterial2d(mat.clone()),
                        Transform {
                            translation: Vec3::new(left + diameter * 0.5, y, TEXT_Z),
                            rotation: Quat::from_rotation_z(angle),
                            scale: Vec3::new(diameter, diameter, 1.0),
                        },
                    ));
                }
                parent.spawn((
                    Text2d::new(group.label.clone()),
                    TextFont {
                        font_size: font,
                        ..default()
                    },
                    text_color,
                    Transform::from_translation(Vec3::new(
                        left + diameter + 10.0 + half_width,
                        y,
                        TEXT_Z,
                    )),
                ));
            });
            y -= row_height;
        }
    }
}
