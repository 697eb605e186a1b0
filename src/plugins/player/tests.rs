use std::time::Duration;

use bevy::prelude::*;
use avian3d::prelude::*;

use super::*;
use crate::common::test_utils::{collect_messages, ensure_messages, run_system_once};

fn window_world() -> World {
    let mut world = World::new();
    world.init_resource::<GlobalFlags>();
    world.init_resource::<InvulnerabilityWindow>();
    world.insert_resource(Time::<()>::default());
    ensure_messages::<GrantInvulnerability>(&mut world);
    ensure_messages::<InvulnerabilityChanged>(&mut world);
    world
}

fn advance(world: &mut World, secs: f32) {
    world.resource_mut::<Time>().advance_by(Duration::from_secs_f32(secs));
}

#[test]
fn spawn_creates_player() {
    let mut world = World::new();
    run_system_once(&mut world, super::spawn);
    assert!(world.query::<(&Player, &PlayerHealth)>().iter(&world).next().is_some());
}

#[test]
fn run_forward_sets_velocity() {
    let mut world = World::new();
    world.insert_resource(Tunables { player_speed: 10.0, ..default() });
    world.spawn((Player, LinearVelocity::ZERO));

    run_system_once(&mut world, super::run_forward);

    let v = world.query::<&LinearVelocity>().iter(&world).next().unwrap();
    assert_eq!(v.0, Vec3::new(0.0, 0.0, -10.0));
}

#[test]
fn grant_sets_the_flag_and_broadcasts_once() {
    let mut world = window_world();

    world.write_message(GrantInvulnerability { secs: 3.0 });
    world.write_message(GrantInvulnerability { secs: 1.0 });
    run_system_once(&mut world, grant_invulnerability);

    assert!(world.resource::<GlobalFlags>().player_invulnerable());
    assert_eq!(
        collect_messages::<InvulnerabilityChanged>(&mut world),
        vec![InvulnerabilityChanged { invulnerable: true }]
    );
    // The shorter second grant does not cut the window.
    assert!((world.resource::<InvulnerabilityWindow>().remaining_secs() - 3.0).abs() < 1e-4);
}

#[test]
fn window_expiry_clears_the_flag_and_broadcasts() {
    let mut world = window_world();
    world.write_message(GrantInvulnerability { secs: 1.0 });
    run_system_once(&mut world, grant_invulnerability);

    advance(&mut world, 0.5);
    run_system_once(&mut world, tick_invulnerability);
    assert!(world.resource::<GlobalFlags>().player_invulnerable());

    advance(&mut world, 0.6);
    run_system_once(&mut world, tick_invulnerability);
    assert!(!world.resource::<GlobalFlags>().player_invulnerable());

    assert_eq!(
        collect_messages::<InvulnerabilityChanged>(&mut world),
        vec![
            InvulnerabilityChanged { invulnerable: true },
            InvulnerabilityChanged { invulnerable: false },
        ]
    );
}

#[test]
fn collision_damage_is_best_effort() {
    let mut world = World::new();
    world.init_resource::<GlobalFlags>();
    ensure_messages::<PlayerCollision>(&mut world);
    let player = world.spawn((Player, PlayerHealth { hp: 300 })).id();
    let ghost = world.spawn(Player).id();

    world.write_message(PlayerCollision { player, damage: 100 });
    world.write_message(PlayerCollision { player: ghost, damage: 100 });
    run_system_once(&mut world, apply_collision_damage);

    assert_eq!(world.get::<PlayerHealth>(player).unwrap().hp, 200);
}

#[test]
fn invulnerable_player_takes_no_collision_damage() {
    let mut world = World::new();
    let mut flags = GlobalFlags::default();
    flags.set_player_invulnerable(true);
    world.insert_resource(flags);
    ensure_messages::<PlayerCollision>(&mut world);
    let player = world.spawn((Player, PlayerHealth { hp: 300 })).id();

    world.write_message(PlayerCollision { player, damage: 100 });
    run_system_once(&mut world, apply_collision_damage);

    assert_eq!(world.get::<PlayerHealth>(player).unwrap().hp, 300);
}
