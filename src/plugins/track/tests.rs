use bevy::{ecs::world::CommandQueue, prelude::*};

use super::*;
use crate::common::test_utils::{collect_messages, ensure_messages, run_system_once};
use crate::plugins::pool::{
    EntityTemplate, PoolNotice, SPAWNS_POOL, SpawnParent, broadcast_pool_notices, register_template,
};

fn build_marker(commands: &mut Commands) -> Entity {
    commands
        .spawn((Transform::default(), Visibility::Hidden))
        .with_children(|parent| {
            // Unpooled part inside a pooled instance; must not be visited.
            parent.spawn(Transform::default());
        })
        .id()
}

#[test]
fn track_reset_message_drives_the_global_gate() {
    let mut world = World::new();
    world.init_resource::<GlobalFlags>();
    ensure_messages::<TrackResetChanged>(&mut world);

    world.write_message(TrackResetChanged { active: true });
    run_system_once(&mut world, apply_track_reset);
    assert!(world.resource::<GlobalFlags>().track_reset_active());

    world.write_message(TrackResetChanged { active: false });
    run_system_once(&mut world, apply_track_reset);
    assert!(!world.resource::<GlobalFlags>().track_reset_active());
}

#[test]
fn recycle_returns_each_pooled_instance_under_the_segment() {
    let mut world = World::new();
    let mut pools = SpawnPools::default();
    let template = register_template(
        &mut pools,
        SPAWNS_POOL,
        EntityTemplate { name: "Marker", build: build_marker, prewarm: 0 },
    );
    let handle = pools.lookup_by_name(SPAWNS_POOL).unwrap();
    ensure_messages::<RecycleSegment>(&mut world);
    ensure_messages::<PoolNotice>(&mut world);

    let segment = world.spawn((TrackSegment, Transform::default())).id();
    let elsewhere = world.spawn((TrackSegment, Transform::default())).id();

    let mut queue = CommandQueue::default();
    let (a, b, c) = {
        let mut commands = Commands::new(&mut queue, &world);
        let pool = pools.pool_mut(handle);
        let parent = |entity| Some(SpawnParent { entity, frame: GlobalTransform::IDENTITY });
        let a = pool.spawn(&mut commands, template, Vec3::ZERO, Quat::IDENTITY, parent(segment));
        let b = pool.spawn(&mut commands, template, Vec3::X, Quat::IDENTITY, parent(segment));
        let c = pool.spawn(&mut commands, template, Vec3::Y, Quat::IDENTITY, parent(elsewhere));
        (a, b, c)
    };
    queue.apply(&mut world);
    world.insert_resource(pools);
    run_system_once(&mut world, broadcast_pool_notices);

    world.write_message(RecycleSegment { segment });
    run_system_once(&mut world, recycle_segments);
    run_system_once(&mut world, broadcast_pool_notices);

    let despawned: Vec<Entity> = collect_messages::<PoolNotice>(&mut world)
        .into_iter()
        .filter_map(|n| match n {
            PoolNotice::Despawned(e) => Some(e),
            PoolNotice::Spawned(_) => None,
        })
        .collect();
    assert_eq!(despawned.len(), 2);
    assert!(despawned.contains(&a) && despawned.contains(&b));

    assert_eq!(*world.get::<Visibility>(a).unwrap(), Visibility::Hidden);
    assert_eq!(*world.get::<Visibility>(c).unwrap(), Visibility::Visible);
    assert_eq!(world.resource::<SpawnPools>().pool(handle).free_count(template), 2);
}
