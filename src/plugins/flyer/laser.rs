//! Hitscan laser.
//!
//! ```text
//!   Idle ──(cooldown elapses)──> Fire ──(beam duration elapses)──> Idle ...
//! ```
//!
//! The cycle is split the same way as the damage pipeline:
//! - `tick_laser_cooldowns` owns the cadence and the beam visual, and writes a
//!   [`LaserFired`] message per shot,
//! - `resolve_laser_shots` owns the ray cast and turns a shot into at most one
//!   `DamageRequest`,
//! - `hide_expired_beams` switches the visual off once `laser_duration` has passed,
//!   whether or not the shot connected.
//!
//! A cycle whose target cannot be resolved fires nothing and shows nothing, but the
//! repeating cooldown keeps running so the next cycle is not delayed.

use avian3d::prelude::*;
use bevy::prelude::*;

use super::FlyingEnemy;
use crate::common::layers::Layer;
use crate::plugins::health::{DamageRequest, DamageSource};
use crate::plugins::player::Player;
use crate::plugins::targeting::{TargetLocator, TrackedTarget};

/// Maximum laser reach.
pub const LASER_RANGE: f32 = 1_000.0;

#[derive(Component, Debug, Clone)]
pub struct LaserAttack {
    /// Repeating; every wrap is one firing cycle.
    pub cooldown: Timer,
    /// Once; restarted on every shot, only ticked while the beam is visible.
    pub beam: Timer,
}

impl LaserAttack {
    pub fn new(cooldown_secs: f32, beam_secs: f32) -> Self {
        Self {
            cooldown: Timer::from_seconds(cooldown_secs, TimerMode::Repeating),
            beam: Timer::from_seconds(beam_secs, TimerMode::Once),
        }
    }
}

/// Emission point, in the flyer's local space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LaserMuzzle(pub Vec3);

/// Beam visual state. Presentation reads it; only the laser systems write it.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct LaserBeam {
    enabled: bool,
    start: Vec3,
    end: Vec3,
}

impl LaserBeam {
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    pub fn set_endpoints(&mut self, start: Vec3, end: Vec3) {
        self.start = start;
        self.end = end;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn endpoints(&self) -> (Vec3, Vec3) {
        (self.start, self.end)
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct LaserFired {
    pub shooter: Entity,
    pub origin: Vec3,
    /// Target position at the moment of firing.
    pub aim: Vec3,
    pub damage: f32,
}

/// The beam only tests against players: terrain and other agents never block it.
#[inline]
pub fn line_of_sight_filter() -> SpatialQueryFilter {
    SpatialQueryFilter::from_mask(Layer::Player)
}

/// Damage for a shot whose ray struck `struck` (if anything).
///
/// Only target-tagged entities are hurt; a ray that misses does nothing.
pub fn laser_damage(
    shot: &LaserFired,
    struck: Option<Entity>,
    is_target: impl Fn(Entity) -> bool,
) -> Option<DamageRequest> {
    let struck = struck.filter(|e| is_target(*e))?;
    Some(DamageRequest {
        target: struck,
        amount: shot.damage,
        source: DamageSource::Laser,
    })
}

pub fn hide_expired_beams(
    time: Res<Time<Fixed>>,
    mut q: Query<(&mut LaserAttack, &mut LaserBeam)>,
) {
    for (mut attack, mut beam) in &mut q {
        if !beam.is_enabled() {
            continue;
        }
        attack.beam.tick(time.delta());
        if attack.beam.is_finished() {
            beam.set_enabled(false);
        }
    }
}

pub fn tick_laser_cooldowns(
    time: Res<Time<Fixed>>,
    locator: TargetLocator,
    mut q: Query<(
        Entity,
        &FlyingEnemy,
        &TrackedTarget,
        &Transform,
        &LaserMuzzle,
        &mut LaserAttack,
        &mut LaserBeam,
    )>,
    mut fired: MessageWriter<LaserFired>,
) {
    for (shooter, flyer, target, tf, muzzle, mut attack, mut beam) in &mut q {
        attack.cooldown.tick(time.delta());

        // A long tick can wrap the timer more than once; it still fires a single shot.
        if !attack.cooldown.just_finished() {
            continue;
        }

        let Some(aim) = locator.current_position(*target) else {
            debug!("{shooter:?} laser cycle skipped: target unresolved");
            continue;
        };

        let origin = tf.transform_point(muzzle.0);

        beam.set_endpoints(origin, aim);
        beam.set_enabled(true);
        attack.beam.reset();

        fired.write(LaserFired {
            shooter,
            origin,
            aim,
            damage: flyer.damage,
        });
    }
}

pub fn resolve_laser_shots(
    spatial: SpatialQuery,
    mut shots: MessageReader<LaserFired>,
    q_targets: Query<(), With<Player>>,
    mut damage: MessageWriter<DamageRequest>,
) {
    let filter = line_of_sight_filter();

    for shot in shots.read() {
        let Ok(dir) = Dir3::new(shot.aim - shot.origin) else {
            continue;
        };

        let struck = spatial
            .cast_ray(shot.origin, dir, LASER_RANGE, true, &filter)
            .map(|hit| hit.entity);

        if let Some(req) = laser_damage(shot, struck, |e| q_targets.contains(e)) {
            info!("Laser hit {:?}, damage: {}", req.target, req.amount);
            damage.write(req);
        }
    }
}

/// Render-only: draw enabled beams as gizmo lines.
pub fn draw_laser_beams(mut gizmos: Gizmos, q: Query<&LaserBeam>) {
    for beam in &q {
        if !beam.is_enabled() {
            continue;
        }
        let (start, end) = beam.endpoints();
        gizmos.line(start, end, Color::srgb(1.0, 0.15, 0.1));
    }
}
