//! Damage sink: health bookkeeping for anything that can be hurt.
//!
//! Producers (laser resolution, illusion contacts) never touch `Health` directly.
//! They write a [`DamageRequest`] and [`apply_damage`] is the single writer:
//!
//! ```text
//!   FixedUpdate                      FixedPostUpdate
//!   resolve_laser_shots ──┐
//!                         ├─> DamageRequest ─> apply_damage ─> TargetDied (once)
//!   process_illusion_contacts ┘
//! ```
//!
//! A request aimed at an entity without `Health` (or one that no longer exists) is
//! dropped silently: "this thing can't be hurt" is a valid answer, not a fault.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::illusions::process_illusion_contacts;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// What a single damage application did to a [`Health`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Wounded,
    /// Health crossed to zero or below with this hit.
    Died,
    /// Health was already at or below zero before this hit.
    AlreadyDead,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let was_dead = self.is_dead();
        self.current -= amount;
        match (was_dead, self.is_dead()) {
            (true, _) => DamageOutcome::AlreadyDead,
            (false, true) => DamageOutcome::Died,
            (false, false) => DamageOutcome::Wounded,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageSource {
    Laser,
    Illusion,
}

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
    pub source: DamageSource,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetDied {
    pub entity: Entity,
}

pub fn plugin(app: &mut App) {
    app.add_message::<DamageRequest>()
        .add_message::<TargetDied>()
        .add_systems(
            FixedPostUpdate,
            apply_damage
                .after(process_illusion_contacts)
                .run_if(in_state(GameState::InGame)),
        );
}

pub fn apply_damage(
    mut requests: MessageReader<DamageRequest>,
    mut q_health: Query<&mut Health>,
    mut died: MessageWriter<TargetDied>,
) {
    for req in requests.read() {
        let Ok(mut health) = q_health.get_mut(req.target) else {
            continue;
        };

        match health.take_damage(req.amount) {
            DamageOutcome::Wounded => {
                info!("{:?} took {} damage from {:?}, health {}", req.target, req.amount, req.source, health.current);
            }
            DamageOutcome::Died => {
                info!("{:?} died ({:?}, health {})", req.target, req.source, health.current);
                died.write(TargetDied { entity: req.target });
            }
            DamageOutcome::AlreadyDead => {}
        }
    }
}
