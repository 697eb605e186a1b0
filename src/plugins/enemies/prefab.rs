//! Enemy templates registered in the `Spawns` pool.
//!
//! Builders spawn a complete, hidden hierarchy: the gameplay root plus visual parts
//! carrying `VisualFeedback`. Moving parts also carry `RestorableTransform` so a
//! recycled enemy comes back looking like it was authored.

use avian3d::prelude::*;
use bevy::prelude::*;

use super::components::*;
use crate::common::{layers::Layer, restore::RestorableTransform};
use crate::plugins::debris::DEBRIS_TEMPLATE;
use crate::plugins::feedback::{ENEMY_COLOR_CHANNEL, VisualFeedback};

pub const DRONE_TEMPLATE: &str = "Drone";
pub const BARRIER_TEMPLATE: &str = "EnergyBarrier";

/// Enemies are sensors: they report contacts but never push anything.
#[inline]
pub fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::Player])
}

fn spawn_enemy_root(
    commands: &mut Commands,
    name: &'static str,
    profile: EnemyProfile,
    colors: ColorScheme,
    half_extents: Vec3,
) -> Entity {
    let status = EnemyStatus::new(profile.max_health);
    commands
        .spawn((
            Name::new(name),
            Enemy,
            profile,
            colors,
            status,
            EnemyLinks::default(),
            Blink::default(),
            Transform::default(),
            Visibility::Hidden,
            (
                RigidBody::Static,
                Collider::cuboid(half_extents.x * 2.0, half_extents.y * 2.0, half_extents.z * 2.0),
                Sensor,
                enemy_layers(),
                CollisionEventsEnabled,
            ),
        ))
        .id()
}

/// A hovering drone: a hull and a spinning rotor. Leaves debris.
pub fn build_drone(commands: &mut Commands) -> Entity {
    let colors = ColorScheme::default();
    let profile = EnemyProfile {
        max_health: 2,
        score_points: 8,
        explode_template: Some(DEBRIS_TEMPLATE.to_owned()),
        ..default()
    };
    let root = spawn_enemy_root(commands, "Drone", profile, colors, Vec3::new(1.5, 0.75, 1.5));

    let rotor = Transform::from_xyz(0.0, 0.9, 0.0);
    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Name::new("Hull"),
            VisualFeedback::new(ENEMY_COLOR_CHANNEL, colors.normal),
            Transform::default(),
        ));
        parent.spawn((
            Name::new("Rotor"),
            VisualFeedback::new(ENEMY_COLOR_CHANNEL, colors.normal),
            RestorableTransform::capture(rotor),
            Spin { radians_per_sec: 9.0 },
            rotor,
        ));
    });
    root
}

/// A static energy barrier. Dies without a visible replacement.
pub fn build_barrier(commands: &mut Commands) -> Entity {
    let colors = ColorScheme {
        normal: Color::srgb(0.3, 0.9, 0.6),
        ..default()
    };
    let profile = EnemyProfile {
        max_health: 1,
        score_points: 4,
        explode_template: None,
        ..default()
    };
    let root = spawn_enemy_root(commands, "EnergyBarrier", profile, colors, Vec3::new(3.0, 1.0, 0.25));

    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Name::new("Field"),
            VisualFeedback::new(ENEMY_COLOR_CHANNEL, colors.normal),
            Transform::default(),
        ));
    });
    root
}

/// Continuous rotation about the local Y axis.
#[derive(Component, Debug, Clone, Copy)]
pub struct Spin {
    pub radians_per_sec: f32,
}

pub fn spin_parts(time: Res<Time>, mut q: Query<(&Spin, &mut Transform, &InheritedVisibility)>) {
    let dt = time.delta_secs();
    for (spin, mut tf, vis) in &mut q {
        if vis.get() {
            tf.rotate_local_y(spin.radians_per_sec * dt);
        }
    }
}
