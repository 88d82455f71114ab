//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: includes DefaultPlugins (window/render) + game plugins.
//! - `configure_headless`: minimal configuration for integration tests.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins;

/// Optional tuning overrides, relative to the working directory.
pub const TUNABLES_PATH: &str = "assets/tunables.toml";

pub fn run() {
    let mut app = App::new();
    app.add_plugins(configure_full);

    // After configure_full so the log subscriber is installed.
    match Tunables::load(TUNABLES_PATH) {
        Ok(tunables) => {
            info!("Loaded tunables from {TUNABLES_PATH}");
            app.insert_resource(tunables);
        }
        Err(err) => warn!("Using default tunables: {err}"),
    }

    app.run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Bevy Flyer".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    }));

    configure_game(app);
    plugins::register_render(app);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add render-only plugins (camera/lighting/visuals).
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}
