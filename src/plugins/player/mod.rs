//! Player plugin.
//!
//! Pipeline:
//! - FixedUpdate: run forward along the track
//! - Update: take collision damage, run the invulnerability window
//!
//! The player owns `GlobalFlags::player_invulnerable`. Granting or expiring the
//! window flips the flag and broadcasts `InvulnerabilityChanged`, but only on an
//! actual change: re-granting while invulnerable just extends the window.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{flags::GlobalFlags, layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::invulnerability::InvulnerabilityChanged;

#[derive(Component)]
pub struct Player;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHealth {
    pub hp: i32,
}

/// Something hit the player.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerCollision {
    pub player: Entity,
    pub damage: i32,
}

/// Make the player invulnerable for `secs` (power-ups, respawn grace).
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct GrantInvulnerability {
    pub secs: f32,
}

#[derive(Resource, Default, Debug)]
pub struct InvulnerabilityWindow {
    timer: Option<Timer>,
}

impl InvulnerabilityWindow {
    pub fn remaining_secs(&self) -> f32 {
        self.timer.as_ref().map_or(0.0, |t| t.remaining_secs())
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<PlayerCollision>()
        .add_message::<GrantInvulnerability>()
        .init_resource::<InvulnerabilityWindow>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(FixedUpdate, run_forward)
        .add_systems(
            Update,
            (grant_invulnerability, tick_invulnerability, apply_collision_damage).chain(),
        );
}

fn spawn(mut commands: Commands) {
    let layers = CollisionLayers::new(Layer::Player, [Layer::Track, Layer::Enemy]);

    commands.spawn((
        Name::new("Player"),
        Player,
        PlayerHealth { hp: 300 },
        Transform::from_xyz(0.0, 1.0, 30.0),
        Visibility::Visible,
        RigidBody::Dynamic,
        Collider::capsule(0.6, 1.2),
        LockedAxes::ROTATION_LOCKED,
        GravityScale(0.0),
        layers,
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::InGame),
    ));
}

fn run_forward(tunables: Res<Tunables>, mut q_player: Query<&mut LinearVelocity, With<Player>>) {
    let Ok(mut vel) = q_player.single_mut() else {
        return;
    };
    vel.0 = Vec3::NEG_Z * tunables.player_speed;
}

pub fn grant_invulnerability(
    mut grants: MessageReader<GrantInvulnerability>,
    mut window: ResMut<InvulnerabilityWindow>,
    mut flags: ResMut<GlobalFlags>,
    mut changed: MessageWriter<InvulnerabilityChanged>,
) {
    for grant in grants.read() {
        let secs = grant.secs.max(window.remaining_secs());
        window.timer = Some(Timer::from_seconds(secs, TimerMode::Once));
        if flags.set_player_invulnerable(true) {
            info!("player invulnerable for {secs:.1}s");
            changed.write(InvulnerabilityChanged { invulnerable: true });
        }
    }
}

pub fn tick_invulnerability(
    time: Res<Time>,
    mut window: ResMut<InvulnerabilityWindow>,
    mut flags: ResMut<GlobalFlags>,
    mut changed: MessageWriter<InvulnerabilityChanged>,
) {
    let Some(timer) = window.timer.as_mut() else {
        return;
    };
    if !timer.tick(time.delta()).is_finished() {
        return;
    }
    window.timer = None;
    if flags.set_player_invulnerable(false) {
        info!("player invulnerability expired");
        changed.write(InvulnerabilityChanged { invulnerable: false });
    }
}

/// Best-effort: a collision with something that has no health is dropped.
pub fn apply_collision_damage(
    mut hits: MessageReader<PlayerCollision>,
    flags: Res<GlobalFlags>,
    mut q_health: Query<&mut PlayerHealth, With<Player>>,
) {
    for hit in hits.read() {
        let Ok(mut health) = q_health.get_mut(hit.player) else {
            debug!("collision for {:?} which has no player health", hit.player);
            continue;
        };
        if flags.player_invulnerable() {
            continue;
        }
        health.hp -= hit.damage;
        info!("player took {} damage ({} left)", hit.damage, health.hp);
    }
}

#[cfg(test)]
mod tests;
