//! World plugin: spawns the terraced ground the flyers hover over.
//!
//! The ground is a grid of static boxes on [`Layer::Ground`], each with its top at
//! [`terrace_height`]. Ground probes and laser line-of-sight both ray cast against it.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState};

/// Edge length of one ground tile, in world units.
pub const TILE: f32 = 8.0;
/// Tiles per side, counted from the origin tile outwards.
pub const HALF_TILES: i32 = 5;
const TILE_DEPTH: f32 = 1.0;

/// Marks a ground tile; visuals hang a mesh off it.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundTile {
    pub size: Vec3,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_ground);
}

/// Top surface height of the tile at grid cell `(x, z)`. Three steps, half a unit apart.
pub fn terrace_height(x: i32, z: i32) -> f32 {
    (x + 2 * z).rem_euclid(3) as f32 * 0.5
}

fn spawn_ground(mut commands: Commands) {
    let ground_layers = CollisionLayers::new(
        Layer::Ground,
        [Layer::Player, Layer::Enemy, Layer::Illusion],
    );
    let size = Vec3::new(TILE, TILE_DEPTH, TILE);

    (-HALF_TILES..=HALF_TILES)
        .flat_map(|z| (-HALF_TILES..=HALF_TILES).map(move |x| (x, z)))
        .for_each(|(x, z)| {
            let top = terrace_height(x, z);
            let center = Vec3::new(x as f32 * TILE, top - TILE_DEPTH * 0.5, z as f32 * TILE);

            commands.spawn((
                Name::new(format!("Ground {x},{z}")),
                GroundTile { size },
                Transform::from_translation(center),
                RigidBody::Static,
                Collider::cuboid(size.x, size.y, size.z),
                ground_layers,
                DespawnOnExit(GameState::InGame),
            ));
        });
}
