use avian3d::prelude::*;
use bevy::prelude::*;

/// Avian physics with gravity off: flyers set their own height, illusions fly
/// straight at the player and the player walks on a fixed plane.
pub fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default());
    app.insert_resource(Gravity(Vec3::ZERO));
}
