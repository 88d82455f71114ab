//! Camera plugin (render-only).
//!
//! A single 3D camera trails the player from behind and above, easing towards its
//! goal with a frame-rate independent exponential blend.
//!
//! The key subtlety: **B0001**.
//! A system cannot have `Query<&Transform>` and `Query<&mut Transform>` at the same time
//! unless Bevy can prove those queries are disjoint, so both queries carry `Without<...>`.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::player::{PLAYER_SPAWN, Player};

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
    /// Camera position relative to the player.
    pub offset: Vec3,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    let offset = Vec3::new(0.0, 9.0, 16.0);
    commands.spawn((
        Name::new("MainCamera"),
        Camera3d::default(),
        MainCamera { responsiveness: 5.0, offset },
        Transform::from_translation(PLAYER_SPAWN + offset).looking_at(PLAYER_SPAWN, Vec3::Y),
        DespawnOnExit(GameState::InGame),
    ));
}

/// Fraction of the remaining gap to close this frame.
fn follow_alpha(responsiveness: f32, dt: f32) -> f32 {
    1.0 - (-responsiveness * dt).exp()
}

fn follow_player(
    time: Res<Time>,
    // Disjointness proof: Player entities are not MainCamera entities.
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    // Disjointness proof: MainCamera entities are not Player entities.
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok((mut tf_cam, main_cam)) = q_cam.single_mut() else {
        return;
    };

    let alpha = follow_alpha(main_cam.responsiveness, time.delta_secs());
    let goal = tf_player.translation + main_cam.offset;

    tf_cam.translation = tf_cam.translation.lerp(goal, alpha);
    tf_cam.look_at(tf_player.translation, Vec3::Y);
}
