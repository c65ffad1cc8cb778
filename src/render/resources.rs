use bevy::prelude::*;

use crate::core::{Figure, Marker};

#[derive(Resource, Clone)]
pub struct FigureRes(pub Figure);

impl FigureRes {
    pub fn new(figure: Figure) -> Self {
        Self(figure)
    }
}

/// Root entity every drawn element of the figure hangs off
#[derive(Component)]
pub struct FigureRoot;

/// Unit-sized meshes shared by every marker, cell and tick
pub struct UnitMeshes {
    pub quad: Handle<Mesh>,
    pub circle: Handle<Mesh>,
    pub triangle: Handle<Mesh>,
    pub diamond: Handle<Mesh>,
    pub pentagon: Handle<Mesh>,
    /// Thin bar for `+` and `x` markers
    pub bar: Handle<Mesh>,
}

impl UnitMeshes {
    pub fn new(meshes: &mut Assets<Mesh>) -> Self {
        Self {
            quad: meshes.add(Mesh::from(Rectangle::new(1.0, 1.0))),
            circle: meshes.add(Mesh::from(Circle::new(0.5))),
            triangle: meshes.add(Mesh::from(RegularPolygon::new(0.5, 3))),
            diamond: meshes.add(Mesh::from(RegularPolygon::new(0.5, 4))),
            pentagon: meshes.add(Mesh::from(RegularPolygon::new(0.5, 5))),
            bar: meshes.add(Mesh::from(Rectangle::new(1.0, 0.28))),
        }
    }

    /// Mesh pieces for a marker as (mesh, rotation) pairs.
    pub fn marker_parts(&self, marker: Marker) -> Vec<(Handle<Mesh>, f32)> {
        use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

        match marker {
            Marker::Circle => vec![(self.circle.clone(), 0.0)],
            Marker::Square => vec![(self.quad.clone(), 0.0)],
            Marker::Diamond => vec![(self.diamond.clone(), 0.0)],
            Marker::Pentagon => vec![(self.pentagon.clone(), 0.0)],
            Marker::TriangleUp => vec![(self.triangle.clone(), 0.0)],
            Marker::TriangleDown => vec![(self.triangle.clone(), PI)],
            Marker::Plus => vec![(self.bar.clone(), 0.0), (self.bar.clone(), FRAC_PI_2)],
            Marker::Cross => vec![(self.bar.clone(), FRAC_PI_4), (self.bar.clone(), -FRAC_PI_4)],
        }
    }
}
