//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input, write PlayerInput resource
//! - FixedUpdate: apply velocity to kinematic rigid body
//!
//! The player only walks on the XZ plane; its height never changes. Flyers and
//! illusions find it through [`TrackedTarget`](crate::plugins::targeting::TrackedTarget).

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::health::Health;

/// Where the player appears on entering the game.
pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 1.0, 0.0);

#[derive(Component)]
pub struct Player;

#[derive(Resource, Default, Debug)]
struct PlayerInput {
    /// x = strafe (D positive), y = forward (W positive).
    move_axis: Vec2,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, gather_input)
        .add_systems(FixedUpdate, apply_movement);
}

pub fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::Ground, Layer::Enemy, Layer::Illusion],
    );

    commands.spawn((
        Name::new("Player"),
        Player,
        Health::full(tunables.player_max_health),
        Transform::from_translation(PLAYER_SPAWN),
        RigidBody::Kinematic,
        Collider::capsule(0.4, 1.0),
        layers,
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::InGame),
    ));
}

fn gather_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = axis.normalize_or_zero();
}

/// Forward is -Z, matching the camera's view direction.
fn planar_velocity(axis: Vec2, speed: f32) -> Vec3 {
    Vec3::new(axis.x, 0.0, -axis.y) * speed
}

fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<&mut LinearVelocity, With<Player>>,
) {
    let Ok(mut vel) = q_player.single_mut() else {
        return;
    };
    vel.0 = planar_velocity(input.move_axis, tunables.player_speed);
}
