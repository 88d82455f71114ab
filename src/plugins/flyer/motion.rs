//! Hover / standoff motion.
//!
//! Three independent corrections run every fixed tick, in this order:
//! 1. standoff: push away inside `min`, pull in beyond `max`, do nothing in between,
//! 2. hover: ease the height toward `ground + hover_height`,
//! 3. facing: yaw toward the target, never pitch.
//!
//! The steps are plain functions so the maths can be tested without a `World`.
//! `probe_ground` is the only part that needs the physics pipeline; it caches its
//! answer in [`GroundProbe`] so the steering system stays query-free.

use avian3d::prelude::*;
use bevy::prelude::*;

use super::FlyingEnemy;
use crate::common::layers::Layer;
use crate::plugins::targeting::{TargetLocator, TrackedTarget};

/// How far below itself a flyer looks for ground.
pub const GROUND_PROBE_RANGE: f32 = 1_000.0;

/// Acceptable distance band to the target.
///
/// Distances inside `[min, max]` are a dead zone: no correction, so the flyer
/// does not jitter around a single preferred radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standoff {
    pub min: f32,
    pub max: f32,
}

impl Standoff {
    #[inline]
    pub fn contains(self, distance: f32) -> bool {
        (self.min..=self.max).contains(&distance)
    }
}

/// Ground point directly below the flyer, refreshed every fixed tick.
///
/// `None` when the downward ray found nothing; hover correction is then skipped and
/// the flyer keeps its current height.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundProbe(pub Option<Vec3>);

/// One standoff correction of length `step` (`speed * dt`).
///
/// Uses the full 3D offset from the target, including height.
pub fn standoff_step(agent: Vec3, target: Vec3, standoff: Standoff, step: f32) -> Vec3 {
    let away = agent - target;
    let distance = away.length();

    if distance < standoff.min {
        agent + away.normalize_or_zero() * step
    } else if distance > standoff.max {
        agent - away.normalize_or_zero() * step
    } else {
        agent
    }
}

/// Exponential approach toward `ground.y + hover_height`.
///
/// `t` is `speed * dt`, clamped to 1 so a long frame lands on the target height
/// rather than overshooting it.
pub fn hover_step(agent: Vec3, ground: Option<Vec3>, hover_height: f32, t: f32) -> Vec3 {
    let Some(ground) = ground else {
        return agent;
    };
    let desired_y = ground.y + hover_height;
    let t = t.clamp(0.0, 1.0);
    Vec3::new(agent.x, agent.y + (desired_y - agent.y) * t, agent.z)
}

/// Slerp `rotation` toward facing `target` on the horizontal plane.
///
/// A target straight above or below (no horizontal component) leaves the rotation as is.
pub fn facing_step(rotation: Quat, agent: Vec3, target: Vec3, t: f32) -> Quat {
    let flat = Vec3::new(target.x - agent.x, 0.0, target.z - agent.z);
    let Ok(dir) = Dir3::new(flat) else {
        return rotation;
    };
    let look = Transform::IDENTITY.looking_to(dir, Dir3::Y).rotation;
    rotation.slerp(look, t.clamp(0.0, 1.0))
}

pub fn probe_ground(
    spatial: SpatialQuery,
    mut q: Query<(&Transform, &mut GroundProbe), With<FlyingEnemy>>,
) {
    let filter = SpatialQueryFilter::from_mask(Layer::Ground);

    for (tf, mut probe) in &mut q {
        let origin = tf.translation;
        probe.0 = spatial
            .cast_ray(origin, Dir3::NEG_Y, GROUND_PROBE_RANGE, true, &filter)
            .map(|hit| origin + Vec3::NEG_Y * hit.distance);
    }
}

/// Apply standoff, hover and facing to every flyer.
///
/// An unresolved target skips standoff and facing; hover still runs because it
/// only depends on the ground.
pub fn steer_flyers(
    time: Res<Time<Fixed>>,
    locator: TargetLocator,
    mut q: Query<(&FlyingEnemy, &TrackedTarget, &GroundProbe, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (flyer, target, probe, mut tf) in &mut q {
        let rate = flyer.speed * dt;
        let target_pos = locator.current_position(*target);

        let mut pos = tf.translation;
        if let Some(target_pos) = target_pos {
            pos = standoff_step(pos, target_pos, flyer.standoff, rate);
        }
        pos = hover_step(pos, probe.0, flyer.hover_height, rate);
        tf.translation = pos;

        if let Some(target_pos) = target_pos {
            tf.rotation = facing_step(tf.rotation, pos, target_pos, rate);
        }
    }
}
