//! Target locator.
//!
//! Agents never look their target up by tag. The spawner hands each agent a
//! [`TrackedTarget`] handle, and systems resolve it through [`TargetLocator`].
//! A handle whose entity is gone (or is no longer a `Player`) resolves to `None`,
//! which every consumer treats as "skip this tick", never as an error.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::plugins::flyer::FlyingEnemy;
use crate::plugins::illusions::Illusion;
use crate::plugins::player::Player;

/// Non-owning handle to the entity an agent is chasing or shooting at.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedTarget(pub Entity);

/// Resolves [`TrackedTarget`] handles to world positions.
///
/// The query is disjoint from flyers and illusions so systems can hold this next to
/// `Query<&mut Transform, With<FlyingEnemy>>` without a B0001 conflict.
#[derive(SystemParam)]
pub struct TargetLocator<'w, 's> {
    targets: Query<
        'w,
        's,
        &'static Transform,
        (With<Player>, Without<FlyingEnemy>, Without<Illusion>),
    >,
}

impl TargetLocator<'_, '_> {
    #[inline]
    pub fn current_position(&self, target: TrackedTarget) -> Option<Vec3> {
        self.targets.get(target.0).ok().map(|tf| tf.translation)
    }
}
