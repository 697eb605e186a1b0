//! Explosion: scoring, debris spawn, and taking the enemy out of play.
//!
//! Everything that can blow an enemy up (damage, player contact) goes through
//! `Exploder::explode`, so the ordering below holds for every caller:
//!
//! 1. Award points (doubled while the player is invulnerable). This happens on
//!    *every* call, including calls on an enemy that already exploded.
//! 2. If already exploded, stop.
//! 3. Spawn the debris template (if any) at the enemy, under its track segment, and
//!    queue a `DebrisBlast` so the debris sweep can scatter it.
//! 4. Mark exploded.
//! 5. Sink the enemy below the track. It is *not* returned to the pool here; the
//!    segment that owns it does that on its own schedule.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::components::*;
use crate::common::{flags::GlobalFlags, tunables::Tunables};
use crate::plugins::debris::DebrisBlast;
use crate::plugins::pool::{SpawnParent, SpawnPools};
use crate::plugins::score::PointsScored;
use crate::plugins::track::TrackSegment;

/// Enemy roots with everything `Exploder::explode` needs.
pub type ExplodableQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static EnemyProfile,
        &'static ColorScheme,
        &'static mut EnemyLinks,
        &'static mut EnemyStatus,
        &'static mut Transform,
        &'static GlobalTransform,
    ),
    With<Enemy>,
>;

/// Base points, doubled while the player is invulnerable.
#[inline]
pub fn awarded_points(base: u32, player_invulnerable: bool) -> u32 {
    if player_invulnerable { base.saturating_mul(2) } else { base }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplodeOutcome {
    /// Points were awarded again but nothing else happened.
    AlreadyExploded,
    Exploded { debris: Option<Entity> },
}

/// Everything an explosion touches outside the enemy itself.
#[derive(SystemParam)]
pub struct Exploder<'w, 's> {
    commands: Commands<'w, 's>,
    flags: Res<'w, GlobalFlags>,
    tunables: Res<'w, Tunables>,
    pools: ResMut<'w, SpawnPools>,
    score: MessageWriter<'w, PointsScored>,
    blasts: MessageWriter<'w, DebrisBlast>,
    parents: Query<'w, 's, &'static ChildOf>,
    segments: Query<'w, 's, &'static GlobalTransform, With<TrackSegment>>,
}

impl Exploder<'_, '_> {
    pub fn flags(&self) -> &GlobalFlags {
        &self.flags
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// Nearest `TrackSegment` ancestor.
    fn enclosing_segment(&self, entity: Entity) -> Option<SpawnParent> {
        let mut cursor = entity;
        while let Ok(child_of) = self.parents.get(cursor) {
            let parent = child_of.parent();
            if let Ok(frame) = self.segments.get(parent) {
                return Some(SpawnParent { entity: parent, frame: *frame });
            }
            cursor = parent;
        }
        None
    }

    pub fn explode(
        &mut self,
        entity: Entity,
        profile: &EnemyProfile,
        links: &mut EnemyLinks,
        status: &mut EnemyStatus,
        tf: &mut Transform,
        global: &GlobalTransform,
    ) -> ExplodeOutcome {
        let (_, rotation, position) = global.to_scale_rotation_translation();

        let points = awarded_points(profile.score_points, self.flags.player_invulnerable());
        self.score.write(PointsScored { points, position, rotation });

        if status.has_exploded() {
            debug!("enemy {entity:?} exploded again; points awarded, nothing spawned");
            return ExplodeOutcome::AlreadyExploded;
        }

        let source = *links
            .debris
            .get_or_insert_with(|| DebrisSource::resolve(&self.pools, profile));

        let mut debris = None;
        if let Some(template) = source.template {
            let segment = self.enclosing_segment(entity).unwrap_or_else(|| {
                panic!("enemy {entity:?} has an explosion template but no enclosing TrackSegment")
            });
            let instance = self.pools.pool_mut(source.pool).spawn(
                &mut self.commands,
                template,
                position,
                Quat::IDENTITY,
                Some(segment),
            );

            let forward = rotation * Vec3::NEG_Z;
            self.blasts.write(DebrisBlast {
                instance: Some(instance),
                center: position,
                origin: position - forward * self.tunables.blast_setback,
            });
            debris = Some(instance);
        }

        status.mark_exploded();
        tf.translation += Vec3::NEG_Y * self.tunables.sink_depth;

        debug!("enemy {entity:?} exploded for {points} points (debris: {debris:?})");
        ExplodeOutcome::Exploded { debris }
    }
}
