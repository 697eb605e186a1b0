//! Blink while the player is invulnerable.
//!
//! Each subscription in `InvulnerabilityBus` is one handler run per broadcast.
//! Starting always replaces the running task, so an enemy never has two cycles
//! fighting over its colour.

use bevy::prelude::*;

use super::components::*;
use crate::common::tunables::Tunables;
use crate::plugins::feedback::{VisualFeedback, paint};
use crate::plugins::invulnerability::{InvulnerabilityBus, InvulnerabilityChanged};

pub fn relay_invulnerability(
    mut reader: MessageReader<InvulnerabilityChanged>,
    bus: Res<InvulnerabilityBus>,
    tunables: Res<Tunables>,
    mut q_enemies: Query<(&Visibility, &ColorScheme, &EnemyLinks, &mut Blink), With<Enemy>>,
    mut q_feedback: Query<&mut VisualFeedback>,
) {
    for ev in reader.read() {
        for &e in bus.subscriptions() {
            let Ok((vis, colors, links, mut blink)) = q_enemies.get_mut(e) else {
                debug!("invulnerability subscriber {e:?} is not an enemy");
                continue;
            };

            if ev.invulnerable && *vis != Visibility::Hidden {
                let phase = blink.start(tunables.blink_interval_secs);
                paint(&links.feedback, &mut q_feedback, phase.color(colors));
            } else {
                blink.cancel();
            }
        }
    }
}

pub fn tick_blink(
    time: Res<Time>,
    mut q_enemies: Query<(&ColorScheme, &EnemyLinks, &mut Blink), With<Enemy>>,
    mut q_feedback: Query<&mut VisualFeedback>,
) {
    for (colors, links, mut blink) in &mut q_enemies {
        if !blink.is_running() {
            continue;
        }
        for phase in blink.tick(time.delta()) {
            paint(&links.feedback, &mut q_feedback, phase.color(colors));
        }
    }
}
