//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    /// Seconds between blink and normal colour while the player is invulnerable.
    pub blink_interval_secs: f32,
    /// Radius of the collider sweep around a fresh explosion.
    pub blast_query_radius: f32,
    /// Uniform impulse magnitude range, drawn per debris body.
    pub blast_impulse_min: f32,
    pub blast_impulse_max: f32,
    pub blast_impulse_radius: f32,
    pub blast_falloff: f32,
    /// Distance behind the enemy (along its forward axis) where the blast originates.
    pub blast_setback: f32,
    /// How far an exploded enemy is dropped below the track.
    pub sink_depth: f32,
    /// Damage sent to the player on contact.
    pub player_collision_damage: i32,
    pub player_invulnerable_secs: f32,
    /// Forward running speed of the demo player.
    pub player_speed: f32,
    pub enemy_prewarm: usize,
    pub debris_prewarm: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            blink_interval_secs: 0.5,
            blast_query_radius: 20.0,
            blast_impulse_min: 240.0,
            blast_impulse_max: 360.0,
            blast_impulse_radius: 100.0,
            blast_falloff: 1.0,
            blast_setback: 10.0,
            sink_depth: 2000.0,
            player_collision_damage: 100,
            player_invulnerable_secs: 3.0,
            player_speed: 12.0,
            enemy_prewarm: 12,
            debris_prewarm: 6,
        }
    }
}
