//! Feature plugins.

use bevy::prelude::*;

pub mod core;
pub mod debris;
pub mod enemies;
pub mod feedback;
pub mod invulnerability;
pub mod physics;
pub mod player;
pub mod pool;
pub mod score;
pub mod track;
pub mod world;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
///
/// Order matters at build time: `core` provides `Tunables` and `pool` provides
/// `SpawnPools`, which the debris and enemy plugins register their templates in.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    pool::plugin(app);
    physics::plugin(app);
    score::plugin(app);
    invulnerability::plugin(app);
    track::plugin(app);
    player::plugin(app);
    debris::plugin(app);
    enemies::plugin(app);
    world::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
