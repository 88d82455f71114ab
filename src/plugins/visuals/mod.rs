//! Visuals plugin (render-only).
//!
//! Gameplay entities are spawned without any render components so they work in a
//! headless app. This plugin dresses them up as they appear and draws laser beams
//! with gizmos.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::flyer::{FlyingEnemy, laser};
use crate::plugins::illusions::Illusion;
use crate::plugins::player::Player;
use crate::plugins::world::GroundTile;

/// Shared handles so every flyer or illusion reuses one mesh and material.
#[derive(Resource)]
struct Palette {
    body: Handle<Mesh>,
    player: Handle<Mesh>,
    illusion: Handle<Mesh>,
    player_mat: Handle<StandardMaterial>,
    flyer_mat: Handle<StandardMaterial>,
    illusion_mat: Handle<StandardMaterial>,
    ground_mat: Handle<StandardMaterial>,
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, build_palette)
        .add_systems(
            Update,
            (dress_player, dress_flyers, dress_illusions, dress_ground)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            laser::draw_laser_beams.run_if(in_state(GameState::InGame)),
        );
}

fn build_palette(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut flat = |color: Color| {
        materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: 0.8,
            ..default()
        })
    };

    let palette = Palette {
        body: meshes.add(Sphere::new(0.75)),
        player: meshes.add(Capsule3d::new(0.4, 1.0)),
        illusion: meshes.add(Sphere::new(0.5)),
        player_mat: flat(Color::srgb(0.2, 0.75, 0.9)),
        flyer_mat: flat(Color::srgb(0.85, 0.2, 0.25)),
        // Same hue as the flyer, washed out.
        illusion_mat: flat(Color::srgba(0.95, 0.55, 0.6, 0.6)),
        ground_mat: flat(Color::srgb(0.3, 0.45, 0.25)),
    };
    commands.insert_resource(palette);
}

fn dress_player(mut commands: Commands, palette: Res<Palette>, q: Query<Entity, Added<Player>>) {
    for e in &q {
        commands
            .entity(e)
            .insert((Mesh3d(palette.player.clone()), MeshMaterial3d(palette.player_mat.clone())));
    }
}

fn dress_flyers(mut commands: Commands, palette: Res<Palette>, q: Query<Entity, Added<FlyingEnemy>>) {
    for e in &q {
        commands
            .entity(e)
            .insert((Mesh3d(palette.body.clone()), MeshMaterial3d(palette.flyer_mat.clone())));
    }
}

fn dress_illusions(mut commands: Commands, palette: Res<Palette>, q: Query<Entity, Added<Illusion>>) {
    for e in &q {
        // Illusions can hit the player and despawn in the same frame they appear.
        commands.entity(e).try_insert((
            Mesh3d(palette.illusion.clone()),
            MeshMaterial3d(palette.illusion_mat.clone()),
        ));
    }
}

fn dress_ground(
    mut commands: Commands,
    palette: Res<Palette>,
    mut meshes: ResMut<Assets<Mesh>>,
    q: Query<(Entity, &GroundTile), Added<GroundTile>>,
) {
    for (e, tile) in &q {
        commands.entity(e).insert((
            Mesh3d(meshes.add(Cuboid::from_size(tile.size))),
            MeshMaterial3d(palette.ground_mat.clone()),
        ));
    }
}
