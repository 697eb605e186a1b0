use bevy::prelude::*;

use super::explosion::{ExplodableQuery, Exploder};
use crate::plugins::feedback::{VisualFeedback, paint};

/// Damage dealt to one enemy (bullets, hazards, scripted kills).
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyDamage {
    pub enemy: Entity,
    pub amount: i32,
}

/// Subtract damage; explode on depletion, flash the hit colour otherwise.
///
/// Enemies sitting in their pool ignore damage until the next activation.
///
/// The hit colour stays until something else repaints the enemy.
pub fn apply_enemy_damage(
    mut reader: MessageReader<EnemyDamage>,
    mut exploder: Exploder,
    mut q_enemies: ExplodableQuery,
    mut q_feedback: Query<&mut VisualFeedback>,
) {
    for ev in reader.read() {
        let Ok((profile, colors, mut links, mut status, mut tf, global)) = q_enemies.get_mut(ev.enemy) else {
            debug!("damage for {:?} which is not an enemy", ev.enemy);
            continue;
        };
        if !status.is_active_in_pool() {
            debug!("damage for {:?} which is parked in its pool; ignored", ev.enemy);
            continue;
        }

        if status.take_damage(ev.amount) {
            exploder.explode(ev.enemy, profile, &mut links, &mut status, &mut tf, global);
        } else {
            paint(&links.feedback, &mut q_feedback, colors.hit);
        }
    }
}
