//! Enemy lifecycle: one-time initialization, then activation and deactivation
//! driven by pool notices.
//!
//! # Invariants
//! - `reset_default_values` is the only writer of a "fresh" enemy. It runs at load
//!   and on every return to the pool, so health is full before the next activation.
//! - Activation side effects (subscription, colour reset) run once per physical
//!   activation. `EnemyStatus::activate` is the guard; duplicate `Spawned` notices
//!   for the same activation fall through it silently.
//! - Deactivation never assumes a prior activation: every step is a no-op when
//!   there is nothing to undo.

use bevy::prelude::*;

use super::components::*;
use crate::common::restore::RestorableTransform;
use crate::plugins::feedback::{VisualFeedback, paint};
use crate::plugins::invulnerability::InvulnerabilityBus;
use crate::plugins::pool::{PoolNotice, SpawnPools};

/// Restorable children query used by resets. Disjoint from the enemy roots.
pub type RestorableQuery<'w, 's> =
    Query<'w, 's, (&'static RestorableTransform, &'static mut Transform), Without<Enemy>>;

/// Restore everything an activation may have changed.
pub fn reset_default_values(
    tf: &mut Transform,
    home: &HomePosition,
    profile: &EnemyProfile,
    status: &mut EnemyStatus,
    restorables: &[Entity],
    q_restorables: &mut RestorableQuery,
) {
    tf.translation = home.0;
    status.reset(profile.max_health);

    for &child in restorables {
        // A part can be detached by gameplay; skip it rather than fail a recycle.
        let Ok((restorable, mut child_tf)) = q_restorables.get_mut(child) else {
            debug!("restorable part {child:?} is gone");
            continue;
        };
        restorable.restore(&mut child_tf);
    }
}

/// Walk the hierarchy below `root` once.
fn descendants(root: Entity, q_children: &Query<&Children>) -> Vec<Entity> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(e) = stack.pop() {
        if let Ok(children) = q_children.get(e) {
            let kids: &[Entity] = children;
            out.extend_from_slice(kids);
            stack.extend_from_slice(kids);
        }
    }
    out
}

/// Initialize enemies the first time they appear (pool pre-warm or growth).
///
/// Caches feedback targets and restorable parts, records the home position and
/// resets. An enemy without any feedback target is a broken prefab.
pub fn initialize_enemies(
    mut commands: Commands,
    mut q_new: Query<
        (Entity, &mut Transform, &EnemyProfile, &mut EnemyStatus, &mut EnemyLinks),
        (With<Enemy>, Added<Enemy>),
    >,
    q_children: Query<&Children>,
    q_is_feedback: Query<(), With<VisualFeedback>>,
    mut q_restorables: RestorableQuery,
) {
    for (e, mut tf, profile, mut status, mut links) in &mut q_new {
        let below = descendants(e, &q_children);
        links.feedback = below.iter().copied().filter(|&c| q_is_feedback.contains(c)).collect();
        links.restorables = below.iter().copied().filter(|&c| q_restorables.contains(c)).collect();

        assert!(
            !links.feedback.is_empty(),
            "enemy {e:?} has no VisualFeedback targets below it"
        );

        let home = HomePosition(tf.translation);
        reset_default_values(&mut tf, &home, profile, &mut status, &links.restorables, &mut q_restorables);
        commands.entity(e).insert(home);

        debug!(
            "enemy {e:?} initialized ({} feedback targets, {} restorable parts)",
            links.feedback.len(),
            links.restorables.len()
        );
    }
}

/// Apply pool notices to enemies: `Spawned` activates, `Despawned` deactivates.
pub fn handle_pool_notices(
    mut reader: MessageReader<PoolNotice>,
    pools: Res<SpawnPools>,
    mut bus: ResMut<InvulnerabilityBus>,
    mut q_enemies: Query<
        (
            &mut Transform,
            &HomePosition,
            &EnemyProfile,
            &ColorScheme,
            &mut EnemyStatus,
            &mut EnemyLinks,
            &mut Blink,
        ),
        With<Enemy>,
    >,
    mut q_feedback: Query<&mut VisualFeedback>,
    mut q_restorables: RestorableQuery,
) {
    for notice in reader.read() {
        match *notice {
            PoolNotice::Spawned(e) => {
                let Ok((_, _, profile, colors, mut status, mut links, _)) = q_enemies.get_mut(e) else {
                    continue;
                };
                if !status.activate() {
                    debug!("enemy {e:?}: duplicate activation ignored");
                    continue;
                }
                links.debris = Some(DebrisSource::resolve(&pools, profile));
                bus.subscribe(e);
                paint(&links.feedback, &mut q_feedback, colors.normal);
            }
            PoolNotice::Despawned(e) => {
                let Ok((mut tf, home, profile, _, mut status, links, mut blink)) = q_enemies.get_mut(e) else {
                    continue;
                };
                reset_default_values(&mut tf, home, profile, &mut status, &links.restorables, &mut q_restorables);
                bus.unsubscribe(e);
                blink.cancel();
            }
        }
    }
}
