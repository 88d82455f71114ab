//! Illusions: disposable decoys a flyer summons to chase and ram the player.
//!
//! ---------------------------
//! OWNERSHIP
//! ---------------------------
//! The flyer owns the bookkeeping ([`IllusionRoster`]); each illusion only carries a
//! plain `Entity` back to its owner. Neither keeps the other alive.
//!
//! ---------------------------
//! DESTRUCTION NOTIFICATION
//! ---------------------------
//! The owner must hear about every illusion that disappears, or its roster keeps a
//! phantom "alive" slot forever and the group never respawns. So the notification
//! is an `on_remove` hook on [`Illusion`] itself: contact, state exit and any other
//! despawn path all run it, synchronously, while the component is still readable.
//! Nothing else can observe the roster half-updated.
//!
//! If the owner is already gone the hook finds no roster and returns.

use std::time::Duration;

use avian3d::prelude::*;
use bevy::ecs::lifecycle::HookContext;
use bevy::ecs::world::DeferredWorld;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState};
use crate::plugins::flyer::{self, FlyingEnemy};
use crate::plugins::health::{DamageRequest, DamageSource};
use crate::plugins::player::Player;
use crate::plugins::targeting::{TargetLocator, TrackedTarget};

pub mod roster;

pub use roster::{IllusionRoster, Release, SummonPhase};

#[derive(Component, Debug, Clone, PartialEq)]
#[component(on_remove = notify_owner)]
pub struct Illusion {
    /// Non-owning back-reference to the flyer that summoned this illusion.
    pub owner: Entity,
    pub damage: f32,
    pub speed: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        (tick_respawn_cooldowns, summon_illusions, chase_target)
            .chain()
            .after(flyer::motion::steer_flyers)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        process_illusion_contacts
            .after(avian3d::collision::narrow_phase::CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );
}

fn notify_owner(mut world: DeferredWorld, ctx: HookContext) {
    let Some(owner) = world.get::<Illusion>(ctx.entity).map(|i| i.owner) else {
        return;
    };
    let Some(mut roster) = world.get_mut::<IllusionRoster>(owner) else {
        return;
    };

    match roster.release(ctx.entity) {
        Release::Cleared => {}
        Release::Depleted => debug!("{owner:?} lost its last illusion; respawn cooldown armed"),
        Release::Unknown => warn!("{:?} was not in the roster of its owner {owner:?}", ctx.entity),
    }
}

pub fn illusion_bundle(owner: Entity, target: Entity, damage: f32, speed: f32, at: Vec3) -> impl Bundle {
    (
        Name::new("Illusion"),
        Illusion { owner, damage, speed },
        TrackedTarget(target),
        Transform::from_translation(at),
        RigidBody::Dynamic,
        LockedAxes::ROTATION_LOCKED,
        Collider::sphere(0.5),
        CollisionLayers::new(Layer::Illusion, [Layer::Player]),
        LinearVelocity::ZERO,
        // Avian only emits CollisionStart if one of the colliders opts in.
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    )
}

/// Summon the full group for every flyer whose roster is ready.
pub fn summon_illusions(
    mut commands: Commands,
    mut q: Query<(Entity, &FlyingEnemy, &TrackedTarget, &Transform, &mut IllusionRoster)>,
) {
    for (owner, flyer, target, tf, mut roster) in &mut q {
        if roster.decoys_active() || !roster.can_summon() || roster.is_empty() {
            continue;
        }

        let damage = flyer.damage * roster.damage_fraction;
        let speed = roster.illusion_speed;

        let spawned: Vec<Entity> = roster
            .spawn_offsets()
            .iter()
            .map(|offset| {
                let at = tf.transform_point(*offset);
                commands.spawn(illusion_bundle(owner, target.0, damage, speed, at)).id()
            })
            .collect();

        debug!("{owner:?} summoned {} illusions", spawned.len());
        roster.fill(spawned);
    }
}

pub fn tick_respawn_cooldowns(time: Res<Time<Fixed>>, mut q: Query<(Entity, &mut IllusionRoster)>) {
    let delta: Duration = time.delta();
    for (owner, mut roster) in &mut q {
        if roster.tick_cooldown(delta) {
            debug!("{owner:?} can summon illusions again");
        }
    }
}

/// Head straight for the target at constant speed, yawing to face it.
///
/// An unresolved target parks the illusion.
pub fn chase_target(
    locator: TargetLocator,
    mut q: Query<(&Illusion, &TrackedTarget, &mut Transform, &mut LinearVelocity)>,
) {
    for (illusion, target, mut tf, mut vel) in &mut q {
        let Some(target_pos) = locator.current_position(*target) else {
            vel.0 = Vec3::ZERO;
            continue;
        };

        vel.0 = (target_pos - tf.translation).normalize_or_zero() * illusion.speed;

        let level_target = Vec3::new(target_pos.x, tf.translation.y, target_pos.z);
        if level_target.distance_squared(tf.translation) > 1e-6 {
            tf.look_at(level_target, Dir3::Y);
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

/// Illusion touching a player: one `DamageRequest`, then the illusion despawns
/// (which notifies its owner through the hook).
pub fn process_illusion_contacts(
    mut commands: Commands,
    mut started: MessageReader<CollisionStart>,
    q_illusions: Query<&Illusion>,
    q_targets: Query<(), With<Player>>,
    mut damage: MessageWriter<DamageRequest>,
    // Per-run dedupe: an illusion touching several colliders hits once.
    mut spent: Local<HashSet<Entity>>,
) {
    spent.clear();

    for ev in started.read() {
        let a = CollisionTarget { collider: ev.collider1, body: ev.body1 };
        let b = CollisionTarget { collider: ev.collider2, body: ev.body2 };

        let (illusion_side, other_side) = if q_illusions.contains(a.gameplay_owner()) {
            (a, b)
        } else if q_illusions.contains(b.gameplay_owner()) {
            (b, a)
        } else {
            continue;
        };

        let illusion_e = illusion_side.gameplay_owner();
        let target_e = other_side.gameplay_owner();

        if !q_targets.contains(target_e) || !spent.insert(illusion_e) {
            continue;
        }

        let Ok(illusion) = q_illusions.get(illusion_e) else {
            continue;
        };

        info!("Illusion hit {target_e:?}, damage: {}", illusion.damage);
        damage.write(DamageRequest {
            target: target_e,
            amount: illusion.damage,
            source: DamageSource::Illusion,
        });
        commands.entity(illusion_e).despawn();
    }
}
