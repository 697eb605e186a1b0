//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `lane_runner::game::configure_headless` to install gameplay plugins.

use bevy::asset::AssetPlugin;
use bevy::mesh::MeshPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    // MeshPlugin registers `Assets<Mesh>`, which avian's collider cache reads.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
        MeshPlugin,
    ));

    lane_runner::game::configure_headless(&mut app);
    // `App::run` normally does this; plugins like avian insert resources in `finish`.
    app.finish();
    app.cleanup();
    app
}

/// Active pooled enemies with the given name.
#[allow(dead_code)]
pub fn active_enemies(app: &mut App, name: &str) -> Vec<Entity> {
    use lane_runner::plugins::enemies::{Enemy, EnemyStatus};

    app.world_mut()
        .query_filtered::<(Entity, &Name, &EnemyStatus), With<Enemy>>()
        .iter(app.world())
        .filter(|(_, n, s)| n.as_str() == name && s.is_active_in_pool())
        .map(|(e, _, _)| e)
        .collect()
}
