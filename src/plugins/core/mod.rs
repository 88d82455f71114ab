//! Core plugin: shared resources and global settings.

use crate::common::tunables::Tunables;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    // Keep tunables loaded by the launcher; fall back to defaults otherwise.
    app.init_resource::<Tunables>();
    app.insert_resource(ClearColor(Color::srgb(0.52, 0.68, 0.86)));
}
