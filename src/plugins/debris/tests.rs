use avian3d::prelude::*;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{ensure_messages, run_system_once};

fn blast_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.init_resource::<BlastRng>();
    ensure_messages::<DebrisBlast>(&mut world);
    world
}

fn body_at(world: &mut World, rb: RigidBody, pos: Vec3) -> Entity {
    world
        .spawn((rb, Collider::sphere(0.5), GlobalTransform::from_translation(pos), LinearVelocity::ZERO))
        .id()
}

#[test]
fn falloff_is_linear_and_zero_at_the_radius() {
    let full = blast_delta_v(Vec3::X * 0.0001, Vec3::ZERO, 300.0, 100.0, 1.0, 1.0);
    assert!((full.length() - 300.0).abs() < 0.1);

    let half = blast_delta_v(Vec3::X * 50.0, Vec3::ZERO, 300.0, 100.0, 1.0, 1.0);
    assert!((half - Vec3::X * 150.0).length() < 1e-3);

    let heavy = blast_delta_v(Vec3::X * 50.0, Vec3::ZERO, 300.0, 100.0, 1.0, 0.5);
    assert!((heavy - Vec3::X * 75.0).length() < 1e-3);

    assert_eq!(blast_delta_v(Vec3::X * 100.0, Vec3::ZERO, 300.0, 100.0, 1.0, 1.0), Vec3::ZERO);
}

#[test]
fn body_sitting_on_the_origin_is_pushed_up() {
    let dv = blast_delta_v(Vec3::ZERO, Vec3::ZERO, 240.0, 100.0, 1.0, 1.0);
    assert_eq!(dv, Vec3::Y * 240.0);
}

#[test]
fn blast_kicks_only_dynamic_bodies_inside_the_query_radius() {
    let mut world = blast_world();
    let near = body_at(&mut world, RigidBody::Dynamic, Vec3::new(5.0, 0.0, 0.0));
    let far = body_at(&mut world, RigidBody::Dynamic, Vec3::new(30.0, 0.0, 0.0));
    let wall = body_at(&mut world, RigidBody::Static, Vec3::new(3.0, 0.0, 0.0));
    let player = body_at(&mut world, RigidBody::Kinematic, Vec3::new(-3.0, 0.0, 0.0));

    world.write_message(DebrisBlast { instance: None, center: Vec3::ZERO, origin: Vec3::new(0.0, 0.0, 10.0) });
    run_system_once(&mut world, apply_debris_blasts);

    let v = |world: &World, e| world.get::<LinearVelocity>(e).unwrap().0;
    let kicked = v(&world, near);
    assert_ne!(kicked, Vec3::ZERO);
    // Pushed away from the origin, which sits behind the blast center.
    assert!(kicked.z < 0.0 && kicked.x > 0.0);

    let speed = kicked.length();
    let distance = Vec3::new(5.0, 0.0, -10.0).length();
    let scale = 1.0 - distance / 100.0;
    assert!(speed >= 240.0 * scale - 0.01 && speed <= 360.0 * scale + 0.01);

    assert_eq!(v(&world, far), Vec3::ZERO);
    assert_eq!(v(&world, wall), Vec3::ZERO);
    assert_eq!(v(&world, player), Vec3::ZERO);
}

#[test]
fn blast_arms_the_fragments_of_its_burst() {
    let mut world = blast_world();
    let burst = run_system_once(&mut world, |mut commands: Commands| build_debris_burst(&mut commands));
    let pieces: Vec<Entity> = world.get::<Children>(burst).unwrap().to_vec();
    assert_eq!(pieces.len(), PIECE_OFFSETS.len());
    assert!(pieces.iter().all(|&p| *world.get::<CollisionLayers>(p).unwrap() == parked_layers()));

    // Left over from an earlier use of the same instance.
    world.entity_mut(pieces[0]).insert(Transform::from_xyz(-7.0, 4.0, 2.0));

    world.write_message(DebrisBlast { instance: Some(burst), center: Vec3::ZERO, origin: Vec3::Z * 10.0 });
    run_system_once(&mut world, apply_debris_blasts);

    for (&piece, offset) in pieces.iter().zip(PIECE_OFFSETS) {
        assert!(world.get::<DebrisPiece>(piece).unwrap().armed);
        assert_eq!(*world.get::<CollisionLayers>(piece).unwrap(), armed_layers());
        assert_eq!(world.get::<GravityScale>(piece).unwrap().0, 1.0);
        assert_eq!(world.get::<Transform>(piece).unwrap().translation, offset);
    }
}

#[test]
fn blast_leaves_parked_bursts_alone() {
    let mut world = blast_world();
    let parked = run_system_once(&mut world, |mut commands: Commands| build_debris_burst(&mut commands));
    let pieces: Vec<Entity> = world.get::<Children>(parked).unwrap().to_vec();
    for &piece in &pieces {
        world.entity_mut(piece).insert(GlobalTransform::from_translation(Vec3::X));
    }
    let bystander = body_at(&mut world, RigidBody::Dynamic, Vec3::X);

    world.write_message(DebrisBlast { instance: None, center: Vec3::ZERO, origin: Vec3::Z * 10.0 });
    run_system_once(&mut world, apply_debris_blasts);

    for &piece in &pieces {
        assert_eq!(world.get::<LinearVelocity>(piece).unwrap().0, Vec3::ZERO);
        assert!(!world.get::<DebrisPiece>(piece).unwrap().armed);
    }
    assert_ne!(world.get::<LinearVelocity>(bystander).unwrap().0, Vec3::ZERO);
}

#[test]
fn returned_burst_is_parked_again() {
    let mut world = blast_world();
    ensure_messages::<PoolNotice>(&mut world);
    let burst = run_system_once(&mut world, |mut commands: Commands| build_debris_burst(&mut commands));
    let piece = world.get::<Children>(burst).unwrap()[0];

    {
        let mut entity = world.entity_mut(piece);
        entity.insert((
            DebrisPiece { armed: true },
            armed_layers(),
            GravityScale(1.0),
            LinearVelocity(Vec3::splat(40.0)),
            Transform::from_xyz(12.0, -3.0, 8.0),
        ));
    }

    world.write_message(PoolNotice::Despawned(burst));
    run_system_once(&mut world, park_returned_debris);

    assert_eq!(*world.get::<CollisionLayers>(piece).unwrap(), parked_layers());
    assert_eq!(world.get::<GravityScale>(piece).unwrap().0, 0.0);
    assert_eq!(world.get::<LinearVelocity>(piece).unwrap().0, Vec3::ZERO);
    assert_eq!(world.get::<Transform>(piece).unwrap().translation, PIECE_OFFSETS[0]);
    assert!(!world.get::<DebrisPiece>(piece).unwrap().armed);
}
