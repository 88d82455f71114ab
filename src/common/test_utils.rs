//! Test helpers.
//!
//! `World::run_system_once` (via the `RunSystemOnce` trait) executes a single system
//! without building a schedule. Systems that use `Commands` only enqueue structural
//! changes, so we flush afterwards to make them visible to assertions.

use std::time::Duration;

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Create a `Time<Fixed>` whose last delta is `dt` seconds.
pub fn fixed_time_with_delta(dt: f32) -> Time<Fixed> {
    let mut t = Time::<Fixed>::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

/// Replace the world's `Time<Fixed>` so the next system run sees a tick of `dt` seconds.
pub fn set_fixed_delta(world: &mut World, dt: f32) {
    world.insert_resource(fixed_time_with_delta(dt));
}

/// Tiny deterministic PRNG for property-style tests (xorshift64*).
///
/// This avoids pulling in an external property-testing dependency, while still
/// allowing us to run many randomized cases deterministically.
#[derive(Clone, Copy)]
pub struct TestRng(u64);

impl TestRng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        // 24 random bits -> float in [0,1)
        let v = (self.next_u64() >> 40) as u32;
        (v as f32) / ((1u32 << 24) as f32)
    }

    #[inline]
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        debug_assert!(hi >= lo);
        lo + (hi - lo) * self.next_f32()
    }

    /// Random point on a sphere shell of the given radius around `center`.
    pub fn point_at_distance(&mut self, center: Vec3, radius: f32) -> Vec3 {
        loop {
            let v = Vec3::new(
                self.range_f32(-1.0, 1.0),
                self.range_f32(-1.0, 1.0),
                self.range_f32(-1.0, 1.0),
            );
            let len = v.length();
            if len > 0.05 && len <= 1.0 {
                return center + v / len * radius;
            }
        }
    }
}
