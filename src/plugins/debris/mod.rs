//! Explosion debris.
//!
//! A debris burst is a pooled root with a handful of dynamic fragments below it.
//! Parked fragments float with gravity off and empty collision filters, so a
//! burst sitting in the pool costs the solver nothing, and the blast sweep passes
//! over them. An explosion snaps its own burst's fragments back to their authored
//! pose, arms them, and kicks every other live dynamic body near the blast outwards.
//!
//! The kick runs in `Last` so the fresh burst already has propagated global
//! transforms; the next physics step sees the new velocities.

use avian3d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::common::{layers::Layer, restore::RestorableTransform, tunables::Tunables};
use crate::plugins::feedback::{ENEMY_COLOR_CHANNEL, VisualFeedback};
use crate::plugins::pool::{
    EntityTemplate, PoolNotice, SPAWNS_POOL, SpawnPools, broadcast_pool_notices, register_template,
};

pub const DEBRIS_TEMPLATE: &str = "DebrisBurst";

const PIECE_SIZE: f32 = 0.6;
const PIECE_OFFSETS: [Vec3; 6] = [
    Vec3::new(0.6, 0.3, 0.0),
    Vec3::new(-0.6, 0.3, 0.0),
    Vec3::new(0.0, 0.3, 0.6),
    Vec3::new(0.0, 0.3, -0.6),
    Vec3::new(0.3, 0.9, 0.3),
    Vec3::new(-0.3, 0.9, -0.3),
];

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct DebrisBurst;

/// One fragment of a burst. `armed` is false while the burst sits in its pool.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DebrisPiece {
    pub armed: bool,
}

/// An explosion at `center`, pushing outwards from `origin`.
///
/// `instance` is the burst spawned for it, if any; its fragments are armed before
/// the sweep.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct DebrisBlast {
    pub instance: Option<Entity>,
    pub center: Vec3,
    pub origin: Vec3,
}

/// Source of per-body blast magnitudes.
#[derive(Resource, Debug)]
pub struct BlastRng(pub StdRng);

impl Default for BlastRng {
    fn default() -> Self {
        Self(StdRng::seed_from_u64(0xB1A5_7000))
    }
}

#[inline]
pub fn parked_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Debris, [] as [Layer; 0])
}

#[inline]
pub fn armed_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Debris, [Layer::Default, Layer::Track, Layer::Debris])
}

pub fn plugin(app: &mut App) {
    let prewarm = app.world().resource::<Tunables>().debris_prewarm;
    register_template(
        &mut app.world_mut().resource_mut::<SpawnPools>(),
        SPAWNS_POOL,
        EntityTemplate { name: DEBRIS_TEMPLATE, build: build_debris_burst, prewarm },
    );

    app.add_message::<DebrisBlast>()
        .init_resource::<BlastRng>()
        .add_systems(PreUpdate, park_returned_debris.after(broadcast_pool_notices))
        .add_systems(Last, apply_debris_blasts);
}

pub fn build_debris_burst(commands: &mut Commands) -> Entity {
    let color = Color::srgb(0.55, 0.5, 0.45);
    commands
        .spawn((Name::new("DebrisBurst"), DebrisBurst, Transform::default(), Visibility::Hidden))
        .with_children(|parent| {
            for (i, offset) in PIECE_OFFSETS.into_iter().enumerate() {
                let tf = Transform::from_translation(offset);
                parent.spawn((
                    Name::new(format!("DebrisPiece{i}")),
                    DebrisPiece::default(),
                    VisualFeedback::new(ENEMY_COLOR_CHANNEL, color),
                    RestorableTransform::capture(tf),
                    tf,
                    (
                        RigidBody::Dynamic,
                        Collider::cuboid(PIECE_SIZE, PIECE_SIZE, PIECE_SIZE),
                        parked_layers(),
                        GravityScale(0.0),
                        LinearVelocity::ZERO,
                        AngularVelocity::ZERO,
                    ),
                ));
            }
        })
        .id()
}

/// Velocity change for one body of an impulse explosion.
///
/// Linear falloff over `radius` raised to `falloff`; zero outside the radius.
pub fn blast_delta_v(
    body_pos: Vec3,
    origin: Vec3,
    magnitude: f32,
    radius: f32,
    falloff: f32,
    inverse_mass: f32,
) -> Vec3 {
    let offset = body_pos - origin;
    let distance = offset.length();
    if distance >= radius {
        return Vec3::ZERO;
    }
    let dir = offset.try_normalize().unwrap_or(Vec3::Y);
    let scale = (1.0 - distance / radius).powf(falloff);
    dir * magnitude * scale * inverse_mass
}

/// Mutable fragment state, present only on colliders that belong to a burst.
type FragmentState = (
    &'static mut DebrisPiece,
    &'static RestorableTransform,
    &'static mut Transform,
    &'static mut CollisionLayers,
    &'static mut GravityScale,
    &'static mut AngularVelocity,
);

/// Snap a fragment back to its authored pose, parked or armed.
fn reset_fragment(
    (mut piece, restorable, mut tf, mut layers, mut gravity, mut ang): (
        Mut<DebrisPiece>,
        &RestorableTransform,
        Mut<Transform>,
        Mut<CollisionLayers>,
        Mut<GravityScale>,
        Mut<AngularVelocity>,
    ),
    linear: &mut LinearVelocity,
    armed: bool,
) {
    piece.armed = armed;
    restorable.restore(&mut tf);
    *layers = if armed { armed_layers() } else { parked_layers() };
    gravity.0 = if armed { 1.0 } else { 0.0 };
    *ang = AngularVelocity::ZERO;
    *linear = LinearVelocity::ZERO;
}

pub fn apply_debris_blasts(
    mut reader: MessageReader<DebrisBlast>,
    tunables: Res<Tunables>,
    mut rng: ResMut<BlastRng>,
    q_children: Query<&Children>,
    mut q_colliders: Query<(Entity, &GlobalTransform, Option<&ColliderOf>, Option<FragmentState>), With<Collider>>,
    q_body_pos: Query<&GlobalTransform, With<RigidBody>>,
    mut q_bodies: Query<(&RigidBody, &mut LinearVelocity, Option<&ComputedMass>)>,
    mut kicked: Local<HashSet<Entity>>,
) {
    for blast in reader.read() {
        if let Some(instance) = blast.instance
            && let Ok(children) = q_children.get(instance)
        {
            let kids: &[Entity] = children;
            for &piece in kids {
                let Ok((_, _, _, Some(fragment))) = q_colliders.get_mut(piece) else {
                    continue;
                };
                let Ok((_, mut linear, _)) = q_bodies.get_mut(piece) else {
                    continue;
                };
                // A reused burst starts from its authored pose, whatever it went through before.
                reset_fragment(fragment, &mut linear, true);
            }
        }

        kicked.clear();
        for (collider, global, collider_of, fragment) in &q_colliders {
            if fragment.is_some_and(|(piece, ..)| !piece.armed) {
                continue;
            }
            if global.translation().distance(blast.center) > tunables.blast_query_radius {
                continue;
            }
            let body = collider_of.map_or(collider, |c| c.body);
            if !kicked.insert(body) {
                continue;
            }
            let Ok((rb, mut velocity, mass)) = q_bodies.get_mut(body) else {
                continue;
            };
            if !rb.is_dynamic() {
                continue;
            }

            let body_pos = q_body_pos.get(body).map_or(global.translation(), |g| g.translation());
            let magnitude = rng.0.gen_range(tunables.blast_impulse_min..=tunables.blast_impulse_max);
            // Unit mass until the solver has computed one.
            let inverse_mass = mass
                .map(|m| m.inverse())
                .filter(|inv| inv.is_finite() && *inv > 0.0)
                .unwrap_or(1.0);
            velocity.0 += blast_delta_v(
                body_pos,
                blast.origin,
                magnitude,
                tunables.blast_impulse_radius,
                tunables.blast_falloff,
                inverse_mass,
            );
        }
        debug!("debris blast at {:?} kicked {} bodies", blast.center, kicked.len());
    }
}

/// Snap a returned burst back to its parked state.
pub fn park_returned_debris(
    mut reader: MessageReader<PoolNotice>,
    q_bursts: Query<&Children, With<DebrisBurst>>,
    mut q_pieces: Query<(FragmentState, &mut LinearVelocity)>,
) {
    for notice in reader.read() {
        let PoolNotice::Despawned(e) = *notice else {
            continue;
        };
        let Ok(children) = q_bursts.get(e) else {
            continue;
        };
        let kids: &[Entity] = children;
        for &piece in kids {
            let Ok((fragment, mut linear)) = q_pieces.get_mut(piece) else {
                continue;
            };
            reset_fragment(fragment, &mut linear, false);
        }
    }
}

#[cfg(test)]
mod tests;
