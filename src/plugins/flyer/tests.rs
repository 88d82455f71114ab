//! Flyer tests: motion maths as plain functions, laser cadence on a bare `World`.
//!
//! The ray casts themselves need the physics pipeline, so laser tests stop at the
//! `LaserFired` message and check `laser_damage` separately.

use avian3d::prelude::LayerMask;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::laser::{self, laser_damage};
use super::motion::{self, facing_step, hover_step, standoff_step};
use super::*;
use crate::common::test_utils::{TestRng, run_system_once, set_fixed_delta};
use crate::plugins::health::DamageSource;

const EPS: f32 = 1e-4;

fn band() -> Standoff {
    Standoff { min: 5.0, max: 15.0 }
}

fn forward(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Z
}

// -----------------------------------------------------------------------------
// Standoff
// -----------------------------------------------------------------------------

#[test]
fn too_close_backs_off_by_one_step() {
    // min=5, max=15, distance 3, speed 5, dt 0.1 -> 0.5 units away.
    let target = Vec3::ZERO;
    let agent = Vec3::new(3.0, 0.0, 0.0);

    let next = standoff_step(agent, target, band(), 5.0 * 0.1);

    assert!((next - Vec3::new(3.5, 0.0, 0.0)).length() < EPS);
    assert!((next.distance(target) - 3.5).abs() < EPS);
}

#[test]
fn too_far_closes_in_by_one_step() {
    let target = Vec3::new(1.0, 0.0, 1.0);
    let agent = target + Vec3::new(0.0, 0.0, 20.0);

    let next = standoff_step(agent, target, band(), 0.5);

    assert!((next.distance(target) - 19.5).abs() < EPS);
}

#[test]
fn dead_zone_is_left_alone() {
    for d in [5.0, 7.5, 15.0] {
        let agent = Vec3::new(0.0, 0.0, d);
        assert_eq!(standoff_step(agent, Vec3::ZERO, band(), 0.5), agent);
    }
}

#[test]
fn standing_on_the_target_does_not_produce_nan() {
    let next = standoff_step(Vec3::ONE, Vec3::ONE, band(), 0.5);
    assert_eq!(next, Vec3::ONE);
}

#[test]
fn standoff_converges_and_never_leaves_the_band() {
    let mut rng = TestRng::new(0xF1_7E55_0FF5);

    for _case in 0..5_000 {
        let target = Vec3::new(
            rng.range_f32(-50.0, 50.0),
            rng.range_f32(-5.0, 5.0),
            rng.range_f32(-50.0, 50.0),
        );
        let start = rng.range_f32(0.5, 40.0);
        let step = rng.range_f32(0.01, 0.4);
        let mut agent = rng.point_at_distance(target, start);

        let gap = |d: f32| (band().min - d).max(d - band().max).max(0.0);

        for _tick in 0..400 {
            let before = agent.distance(target);
            agent = standoff_step(agent, target, band(), step);
            let after = agent.distance(target);

            if band().contains(before) {
                // Dead zone: idempotent.
                assert!((after - before).abs() < EPS);
            } else {
                // Outside: the gap to the band shrinks (or the band is reached).
                assert!(gap(after) <= gap(before) + EPS);
            }
        }

        assert!(gap(agent.distance(target)) < step + EPS);
    }
}

// -----------------------------------------------------------------------------
// Hover
// -----------------------------------------------------------------------------

#[test]
fn hover_without_ground_keeps_height() {
    let agent = Vec3::new(1.0, 42.0, -3.0);
    assert_eq!(hover_step(agent, None, 3.0, 0.5), agent);
}

#[test]
fn hover_eases_toward_ground_plus_height() {
    let ground = Some(Vec3::new(0.0, 2.0, 0.0));
    let mut agent = Vec3::new(0.0, 10.0, 0.0);
    let mut prev_gap = (agent.y - 5.0).abs();

    for _ in 0..50 {
        agent = hover_step(agent, ground, 3.0, 0.25);
        let gap = (agent.y - 5.0).abs();
        assert!(gap < prev_gap, "hover must approach monotonically");
        assert!(agent.y >= 5.0, "exponential approach never overshoots");
        prev_gap = gap;
    }
    assert!(prev_gap < 0.01);
}

#[test]
fn hover_rate_is_clamped_to_a_snap() {
    let next = hover_step(Vec3::new(4.0, 0.0, 4.0), Some(Vec3::new(4.0, 1.0, 4.0)), 3.0, 7.0);
    assert_eq!(next, Vec3::new(4.0, 4.0, 4.0));
}

// -----------------------------------------------------------------------------
// Facing
// -----------------------------------------------------------------------------

#[test]
fn facing_is_yaw_only() {
    let agent = Vec3::new(0.0, 10.0, 0.0);
    let target = Vec3::new(5.0, 0.0, 5.0);

    let rot = facing_step(Quat::IDENTITY, agent, target, 1.0);
    let f = forward(rot);

    assert!(f.y.abs() < EPS);
    assert!((f - Vec3::new(1.0, 0.0, 1.0).normalize()).length() < EPS);
}

#[test]
fn facing_turns_partially_with_small_rate() {
    let target = Vec3::new(10.0, 0.0, 0.0);
    let rot = facing_step(Quat::IDENTITY, Vec3::ZERO, target, 0.25);

    let angle_before = forward(Quat::IDENTITY).angle_between(Vec3::X);
    let angle_after = forward(rot).angle_between(Vec3::X);
    assert!(angle_after < angle_before);
    assert!(angle_after > EPS);
}

#[test]
fn target_straight_below_keeps_rotation() {
    let rot = Quat::from_rotation_y(0.3);
    assert_eq!(facing_step(rot, Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, 1.0), rot);
}

// -----------------------------------------------------------------------------
// steer_flyers (system)
// -----------------------------------------------------------------------------

fn test_flyer() -> FlyingEnemy {
    FlyingEnemy { speed: 5.0, hover_height: 3.0, standoff: band(), damage: 10.0 }
}

#[test]
fn steer_applies_standoff_hover_and_facing() {
    let mut world = World::new();
    set_fixed_delta(&mut world, 0.1);

    let player = world.spawn((Player, Transform::from_xyz(0.0, 3.0, 0.0))).id();
    let flyer = world
        .spawn((
            test_flyer(),
            TrackedTarget(player),
            GroundProbe(Some(Vec3::new(3.0, 1.0, 0.0))),
            Transform::from_xyz(3.0, 3.0, 0.0),
        ))
        .id();

    run_system_once(&mut world, motion::steer_flyers);

    let tf = world.get::<Transform>(flyer).unwrap();
    // Standoff: 3 -> 3.5 along +X. Hover: y from 3 halfway (rate 0.5) toward 4.
    assert!((tf.translation.x - 3.5).abs() < EPS);
    assert!((tf.translation.y - 3.5).abs() < EPS);
    assert!(tf.rotation != Quat::IDENTITY);
    assert!(forward(tf.rotation).y.abs() < EPS);
}

#[test]
fn steer_with_unresolved_target_only_hovers() {
    let mut world = World::new();
    set_fixed_delta(&mut world, 0.1);

    let player = world.spawn((Player, Transform::default())).id();
    world.despawn(player);

    let flyer = world
        .spawn((
            test_flyer(),
            TrackedTarget(player),
            GroundProbe(Some(Vec3::ZERO)),
            Transform::from_xyz(1.0, 0.0, 0.0),
        ))
        .id();

    run_system_once(&mut world, motion::steer_flyers);

    let tf = world.get::<Transform>(flyer).unwrap();
    assert_eq!(tf.translation.x, 1.0);
    assert!((tf.translation.y - 1.5).abs() < EPS);
    assert_eq!(tf.rotation, Quat::IDENTITY);
}

// -----------------------------------------------------------------------------
// Laser cadence
// -----------------------------------------------------------------------------

fn laser_world() -> (World, Entity, Entity) {
    let mut world = World::new();
    world.init_resource::<Messages<LaserFired>>();

    let player = world.spawn((Player, Transform::from_xyz(0.0, 0.0, 10.0))).id();
    let flyer = world
        .spawn((
            test_flyer(),
            TrackedTarget(player),
            Transform::from_xyz(0.0, 5.0, 0.0),
            LaserAttack::new(6.0, 0.5),
            LaserMuzzle(Vec3::new(0.0, -0.5, 0.0)),
            LaserBeam::default(),
        ))
        .id();
    (world, player, flyer)
}

fn tick_laser(world: &mut World, dt: f32) -> Vec<LaserFired> {
    set_fixed_delta(world, dt);
    run_system_once(world, laser::hide_expired_beams);
    run_system_once(world, laser::tick_laser_cooldowns);
    world.resource_mut::<Messages<LaserFired>>().drain().collect()
}

#[test]
fn laser_waits_for_the_full_cooldown() {
    let (mut world, _player, flyer) = laser_world();

    for _ in 0..59 {
        assert!(tick_laser(&mut world, 0.1).is_empty());
    }
    assert!(!world.get::<LaserBeam>(flyer).unwrap().is_enabled());

    let shots = tick_laser(&mut world, 0.1);
    assert_eq!(shots.len(), 1);

    let shot = shots[0];
    assert_eq!(shot.shooter, flyer);
    assert_eq!(shot.origin, Vec3::new(0.0, 4.5, 0.0));
    assert_eq!(shot.aim, Vec3::new(0.0, 0.0, 10.0));
    assert_eq!(shot.damage, 10.0);

    let beam = world.get::<LaserBeam>(flyer).unwrap();
    assert!(beam.is_enabled());
    assert_eq!(beam.endpoints(), (shot.origin, shot.aim));
}

#[test]
fn beam_hides_after_its_duration() {
    let (mut world, _player, flyer) = laser_world();

    assert_eq!(tick_laser(&mut world, 6.0).len(), 1);
    assert!(tick_laser(&mut world, 0.3).is_empty());
    assert!(world.get::<LaserBeam>(flyer).unwrap().is_enabled());

    assert!(tick_laser(&mut world, 0.3).is_empty());
    assert!(!world.get::<LaserBeam>(flyer).unwrap().is_enabled());
}

#[test]
fn unresolved_target_skips_the_cycle_but_keeps_cadence() {
    let (mut world, player, flyer) = laser_world();
    let saved = *world.get::<Transform>(player).unwrap();
    world.despawn(player);

    assert!(tick_laser(&mut world, 6.0).is_empty());
    assert!(!world.get::<LaserBeam>(flyer).unwrap().is_enabled());

    // The timer wrapped: nothing is pending for the next few seconds.
    let attack = world.get::<LaserAttack>(flyer).unwrap();
    assert!(attack.cooldown.elapsed_secs() < 0.01);

    // Target comes back under a new handle; retarget and the next cycle fires on time.
    let returned = world.spawn((Player, saved)).id();
    world.get_mut::<TrackedTarget>(flyer).unwrap().0 = returned;

    assert!(tick_laser(&mut world, 5.9).is_empty());
    assert_eq!(tick_laser(&mut world, 0.1).len(), 1);
}

#[test]
fn one_shot_per_tick_even_when_the_tick_spans_several_cycles() {
    let (mut world, _player, _flyer) = laser_world();
    assert_eq!(tick_laser(&mut world, 20.0).len(), 1);
}

#[test]
fn line_of_sight_only_tests_players() {
    let filter = laser::line_of_sight_filter();
    assert_eq!(filter.mask, LayerMask::from(Layer::Player));
}

#[test]
fn laser_damage_only_hurts_targets() {
    let mut world = World::new();
    let player = world.spawn(Player).id();
    let wall = world.spawn_empty().id();

    let shot = LaserFired { shooter: wall, origin: Vec3::ZERO, aim: Vec3::X, damage: 10.0 };
    let is_target = |e: Entity| e == player;

    let hit = laser_damage(&shot, Some(player), is_target).expect("player hit");
    assert_eq!(hit.target, player);
    assert_eq!(hit.amount, 10.0);
    assert_eq!(hit.source, DamageSource::Laser);

    assert!(laser_damage(&shot, Some(wall), is_target).is_none());
    assert!(laser_damage(&shot, None, is_target).is_none());
}

// -----------------------------------------------------------------------------
// Spawn
// -----------------------------------------------------------------------------

#[test]
fn spawn_flyers_injects_the_player_as_target() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    let player = world.spawn((Player, Transform::default())).id();

    run_system_once(&mut world, spawn_flyers);

    let mut q = world.query::<(&FlyingEnemy, &TrackedTarget, &IllusionRoster, &Transform)>();
    let (flyer, target, roster, tf) = q.single(&world).expect("exactly one flyer");
    assert_eq!(target.0, player);
    assert_eq!(flyer.standoff, Standoff { min: 5.0, max: 15.0 });
    assert_eq!(roster.len(), 3);
    assert!(roster.can_summon());
    assert_eq!(tf.translation, FLYER_SPAWN);
}
