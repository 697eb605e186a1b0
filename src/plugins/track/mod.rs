//! Track segments (the "tiles" the lanes are made of).
//!
//! Track generation is someone else's job. This module owns only what the
//! gameplay entities depend on:
//! - `TrackSegment`, the enclosing parent that explosion debris is attached to.
//! - the track-reset gate in `GlobalFlags` (written here, read everywhere else).
//! - recycling: returning every pooled instance under a segment to its pool.
//!   This is the only place enemies and debris go back to the pool, which keeps
//!   despawn timing in step with the segment's own lifecycle.

use bevy::prelude::*;

use crate::common::flags::GlobalFlags;
use crate::plugins::pool::{Pooled, SpawnPools};

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct TrackSegment;

/// Start or finish a track reset.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackResetChanged {
    pub active: bool,
}

/// Return everything pooled under `segment` to its pool.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecycleSegment {
    pub segment: Entity,
}

pub fn plugin(app: &mut App) {
    app.add_message::<TrackResetChanged>()
        .add_message::<RecycleSegment>()
        .add_systems(PreUpdate, apply_track_reset)
        .add_systems(Update, recycle_segments);
}

pub fn apply_track_reset(mut reader: MessageReader<TrackResetChanged>, mut flags: ResMut<GlobalFlags>) {
    for ev in reader.read() {
        if flags.set_track_reset_active(ev.active) {
            info!("track reset {}", if ev.active { "started" } else { "finished" });
        }
    }
}

/// Collect pooled instances below `root`, without descending into them.
fn pooled_descendants(
    root: Entity,
    q_children: &Query<&Children>,
    q_pooled: &Query<&Pooled>,
) -> Vec<(Entity, Pooled)> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(e) = stack.pop() {
        let Ok(children) = q_children.get(e) else {
            continue;
        };
        let kids: &[Entity] = children;
        for &child in kids {
            match q_pooled.get(child) {
                Ok(pooled) => out.push((child, *pooled)),
                Err(_) => stack.push(child),
            }
        }
    }
    out
}

pub fn recycle_segments(
    mut commands: Commands,
    mut reader: MessageReader<RecycleSegment>,
    mut pools: ResMut<SpawnPools>,
    q_children: Query<&Children>,
    q_pooled: Query<&Pooled>,
) {
    for ev in reader.read() {
        let instances = pooled_descendants(ev.segment, &q_children, &q_pooled);
        let returned = instances
            .into_iter()
            .filter(|&(e, pooled)| pools.despawn(&mut commands, e, pooled))
            .count();
        debug!("segment {:?} returned {returned} pooled instances", ev.segment);
    }
}

#[cfg(test)]
mod tests;
