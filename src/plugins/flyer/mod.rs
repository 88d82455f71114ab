//! Flying enemy: hovers above uneven ground, keeps its distance from the player,
//! fires a periodic hitscan laser and owns a roster of illusions.
//!
//! ---------------------------
//! SCHEDULING
//! ---------------------------
//! Everything runs in the fixed step, one chain per concern:
//!
//! ```text
//!   FixedUpdate
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ probe_ground -> steer_flyers                                 │
//!   │ hide_expired_beams -> tick_laser_cooldowns -> resolve_laser  │
//!   │ (illusions) tick_respawn -> summon -> chase                  │
//!   └──────────────────────────────────────────────────────────────┘
//!   FixedPostUpdate
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ physics step -> process_illusion_contacts -> apply_damage    │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timers are plain `Timer` values in components and are ticked by these systems,
//! so tests can drive time forward one `Time<Fixed>` delta at a time.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::illusions::IllusionRoster;
use crate::plugins::player::{self, Player};
use crate::plugins::targeting::TrackedTarget;

pub mod laser;
pub mod motion;

pub use laser::{LaserAttack, LaserBeam, LaserFired, LaserMuzzle};
pub use motion::{GroundProbe, Standoff};

/// Where the first flyer appears, relative to the world origin.
pub const FLYER_SPAWN: Vec3 = Vec3::new(0.0, 6.0, -20.0);

#[derive(Component, Debug, Clone, PartialEq)]
pub struct FlyingEnemy {
    pub speed: f32,
    pub hover_height: f32,
    pub standoff: Standoff,
    /// Laser damage; illusions derive theirs from it.
    pub damage: f32,
}

impl FlyingEnemy {
    pub fn from_tunables(t: &Tunables) -> Self {
        Self {
            speed: t.flyer_speed,
            hover_height: t.hover_height,
            standoff: Standoff {
                min: t.min_distance,
                max: t.max_distance,
            },
            damage: t.enemy_damage,
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<LaserFired>();

    app.add_systems(
        OnEnter(GameState::InGame),
        spawn_flyers.after(player::spawn),
    );

    app.add_systems(
        FixedUpdate,
        (motion::probe_ground, motion::steer_flyers)
            .chain()
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedUpdate,
        (
            laser::hide_expired_beams,
            laser::tick_laser_cooldowns,
            laser::resolve_laser_shots,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
}

/// Bundle for one flyer hunting `target`.
pub fn flyer_bundle(t: &Tunables, target: Entity, at: Vec3) -> impl Bundle {
    (
        Name::new("FlyingEnemy"),
        FlyingEnemy::from_tunables(t),
        TrackedTarget(target),
        GroundProbe::default(),
        LaserAttack::new(t.laser_cooldown, t.laser_duration),
        LaserMuzzle(t.laser_muzzle_offset()),
        LaserBeam::default(),
        IllusionRoster::from_tunables(t),
        Transform::from_translation(at),
        RigidBody::Kinematic,
        Collider::sphere(0.75),
        CollisionLayers::new(Layer::Enemy, [Layer::Player]),
        DespawnOnExit(GameState::InGame),
    )
}

/// Spawn one flyer per player, with the player injected as its target.
pub fn spawn_flyers(
    mut commands: Commands,
    tunables: Res<Tunables>,
    q_players: Query<Entity, With<Player>>,
) {
    for player in &q_players {
        commands.spawn(flyer_bundle(&tunables, player, FLYER_SPAWN));
    }
}

#[cfg(test)]
mod tests;
