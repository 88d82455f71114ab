//! Feature plugins.

use bevy::prelude::*;

pub mod core;
pub mod flyer;
pub mod health;
pub mod illusions;
pub mod physics;
pub mod player;
pub mod targeting;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;
pub mod visuals;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    player::plugin(app);
    health::plugin(app);
    flyer::plugin(app);
    illusions::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    visuals::plugin(app);
}

