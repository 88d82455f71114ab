//! Illusion roster: the owner-side bookkeeping for one flyer's group of illusions.
//!
//! The roster has one slot per spawn offset, fixed for its whole lifetime. A slot
//! holds `Some(entity)` exactly while that illusion is alive.
//!
//! The two gameplay flags ("illusions active", "can summon") are folded into a
//! single [`SummonPhase`] so they can never contradict each other:
//!
//! ```text
//!   Ready ──fill──> Active ──last release──> Cooling{timer} ──timer done──> Ready
//! ```

use std::time::Duration;

use bevy::ecs::lifecycle::HookContext;
use bevy::ecs::world::DeferredWorld;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummonPhase {
    /// No illusions alive and summoning is allowed.
    Ready,
    /// At least one illusion alive.
    Active,
    /// Whole group destroyed; summoning re-enabled when the timer finishes.
    Cooling { timer: Timer },
}

/// Result of releasing one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The entity is not (or no longer) in the roster.
    Unknown,
    /// Slot cleared; other illusions are still alive.
    Cleared,
    /// Slot cleared and it was the last one: the respawn cooldown is now running.
    Depleted,
}

#[derive(Component, Debug, Clone)]
#[component(on_remove = despawn_orphaned_illusions)]
pub struct IllusionRoster {
    slots: Vec<Option<Entity>>,
    spawn_offsets: Vec<Vec3>,
    phase: SummonPhase,
    respawn_cooldown: Duration,
    /// Illusion damage is the owner's damage times this.
    pub damage_fraction: f32,
    pub illusion_speed: f32,
}

impl IllusionRoster {
    /// Damage fraction and chase speed start at the [`Tunables`] defaults.
    pub fn new(spawn_offsets: Vec<Vec3>, respawn_cooldown: Duration) -> Self {
        let defaults = Tunables::default();
        Self {
            slots: vec![None; spawn_offsets.len()],
            spawn_offsets,
            phase: SummonPhase::Ready,
            respawn_cooldown,
            damage_fraction: defaults.illusion_damage_fraction,
            illusion_speed: defaults.illusion_speed,
        }
    }

    pub fn from_tunables(t: &Tunables) -> Self {
        Self {
            damage_fraction: t.illusion_damage_fraction,
            illusion_speed: t.illusion_speed,
            ..Self::new(
                t.illusion_spawn_offsets(),
                Duration::from_secs_f32(t.illusion_respawn_cooldown),
            )
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn slots(&self) -> &[Option<Entity>] {
        &self.slots
    }

    #[inline]
    pub fn spawn_offsets(&self) -> &[Vec3] {
        &self.spawn_offsets
    }

    #[inline]
    pub fn phase(&self) -> &SummonPhase {
        &self.phase
    }

    #[inline]
    pub fn decoys_active(&self) -> bool {
        matches!(self.phase, SummonPhase::Active)
    }

    #[inline]
    pub fn can_summon(&self) -> bool {
        matches!(self.phase, SummonPhase::Ready)
    }

    pub fn live(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Record a freshly summoned group, one entity per slot in slot order.
    ///
    /// Only valid while [`can_summon`](Self::can_summon) holds; the summon system
    /// checks that before spawning anything.
    pub fn fill(&mut self, spawned: impl IntoIterator<Item = Entity>) {
        debug_assert!(self.can_summon(), "fill while phase is {:?}", self.phase);

        for (slot, e) in self.slots.iter_mut().zip(spawned) {
            *slot = Some(e);
        }
        if self.live().next().is_some() {
            self.phase = SummonPhase::Active;
        }
    }

    /// Clear the slot holding `illusion` and arm the respawn cooldown if the group
    /// is now gone. Releasing an entity that is not in the roster changes nothing,
    /// so a duplicate notification is harmless.
    pub fn release(&mut self, illusion: Entity) -> Release {
        let Some(slot) = self.slots.iter_mut().find(|s| **s == Some(illusion)) else {
            return Release::Unknown;
        };
        *slot = None;

        if self.live().next().is_some() || !self.decoys_active() {
            return Release::Cleared;
        }

        self.phase = SummonPhase::Cooling {
            timer: Timer::new(self.respawn_cooldown, TimerMode::Once),
        };
        Release::Depleted
    }

    /// Advance the respawn cooldown. Returns `true` on the tick summoning is re-enabled.
    pub fn tick_cooldown(&mut self, delta: Duration) -> bool {
        let SummonPhase::Cooling { timer } = &mut self.phase else {
            return false;
        };
        timer.tick(delta);
        if !timer.is_finished() {
            return false;
        }
        self.phase = SummonPhase::Ready;
        true
    }
}

/// Owner teardown: illusions still tracked by a removed roster are despawned too.
/// Their own notifications then find no roster and do nothing.
fn despawn_orphaned_illusions(mut world: DeferredWorld, ctx: HookContext) {
    let Some(roster) = world.get::<IllusionRoster>(ctx.entity) else {
        return;
    };
    let live: Vec<Entity> = roster.live().collect();

    let mut commands = world.commands();
    for e in live {
        commands.entity(e).try_despawn();
    }
}
