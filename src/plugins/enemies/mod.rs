//! Enemies plugin: pooled destructible enemies on the track.
//!
//! An enemy is built once by the pool and then lives through many activations:
//!
//! ```text
//! PoolNotice::Spawned   -> activate: subscribe to invulnerability, paint normal
//! EnemyDamage / contact -> take damage, hit flash or explode
//! explode               -> score, debris + blast, sink below the track
//! PoolNotice::Despawned -> reset, unsubscribe, stop blinking
//! ```
//!
//! Schedules:
//! - PreUpdate: initialize new instances, then react to pool notices. Notices are
//!   broadcast in between, so a freshly built enemy is initialized before it
//!   hears its first `Spawned`.
//! - FixedPostUpdate: damage, then player contacts (after avian's collision events).
//! - Update: invulnerability relay, then blink ticks.
//!
//! Enemies never leave the world. Gameplay only ever mutates values on them, the
//! pool owns visibility and parenting.

use avian3d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::player::tick_invulnerability;
use crate::plugins::pool::{
    BuildFn, EntityTemplate, SPAWNS_POOL, SpawnPools, broadcast_pool_notices, register_template,
};

pub mod blink;
pub mod collision;
pub mod components;
pub mod damage;
pub mod explosion;
pub mod lifecycle;
pub mod prefab;

pub use components::*;
pub use damage::EnemyDamage;
pub use explosion::{ExplodeOutcome, Exploder, awarded_points};

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemySystems {
    Lifecycle,
    Combat,
    Presentation,
}

pub fn plugin(app: &mut App) {
    let prewarm = app.world().resource::<Tunables>().enemy_prewarm;
    {
        let mut pools = app.world_mut().resource_mut::<SpawnPools>();
        for (name, build) in [
            (prefab::DRONE_TEMPLATE, prefab::build_drone as BuildFn),
            (prefab::BARRIER_TEMPLATE, prefab::build_barrier),
        ] {
            register_template(&mut pools, SPAWNS_POOL, EntityTemplate { name, build, prewarm });
        }
    }

    app.add_message::<EnemyDamage>();

    app.add_systems(
        PreUpdate,
        (
            lifecycle::initialize_enemies.before(broadcast_pool_notices),
            lifecycle::handle_pool_notices.after(broadcast_pool_notices),
        )
            .in_set(EnemySystems::Lifecycle),
    );

    app.add_systems(
        FixedPostUpdate,
        (
            damage::apply_enemy_damage,
            collision::handle_player_contacts.after(CollisionEventSystems),
        )
            .chain()
            .in_set(EnemySystems::Combat),
    );

    app.add_systems(
        Update,
        (
            blink::relay_invulnerability.after(tick_invulnerability),
            blink::tick_blink,
            prefab::spin_parts,
        )
            .chain()
            .in_set(EnemySystems::Presentation),
    );
}
