//! World plugin: one demo track segment, populated from the spawn pool.
//!
//! The segment runs a simple lap: populate, let the player run through it,
//! recycle everything back into the pool, then populate again. Refilling waits a
//! beat after the recycle so the enemies hear their `Despawned` notice (and reset)
//! before they are placed again.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::enemies::prefab::{BARRIER_TEMPLATE, DRONE_TEMPLATE};
use crate::plugins::player::{GrantInvulnerability, Player};
use crate::plugins::pool::{SPAWNS_POOL, SpawnParent, SpawnPools};
use crate::plugins::track::{RecycleSegment, TrackSegment, recycle_segments};

const SEGMENT_AT: Vec3 = Vec3::new(0.0, 0.0, -40.0);
const SEGMENT_SIZE: Vec3 = Vec3::new(12.0, 0.5, 80.0);
const PLAYER_START: Vec3 = Vec3::new(0.0, 1.0, 5.0);
const LAP_SECS: f32 = 9.0;
const REFILL_DELAY_SECS: f32 = 0.5;

/// Local enemy placements on the segment, three lanes wide.
const SLOTS: [(&str, Vec3); 5] = [
    (DRONE_TEMPLATE, Vec3::new(-3.0, 1.0, 30.0)),
    (BARRIER_TEMPLATE, Vec3::new(0.0, 1.0, 15.0)),
    (DRONE_TEMPLATE, Vec3::new(3.0, 1.0, 0.0)),
    (DRONE_TEMPLATE, Vec3::new(0.0, 1.0, -15.0)),
    (BARRIER_TEMPLATE, Vec3::new(-3.0, 1.0, -30.0)),
];

#[derive(Component, Debug, Clone, Copy)]
pub struct DemoSegment;

#[derive(Resource, Debug)]
pub struct DemoLap {
    timer: Timer,
    refill_pending: bool,
    laps: u32,
}

impl Default for DemoLap {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(LAP_SECS, TimerMode::Once),
            refill_pending: false,
            laps: 0,
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<DemoLap>();
    app.add_systems(OnEnter(GameState::InGame), spawn_demo_segment);
    app.add_systems(
        Update,
        run_demo_lap
            .before(recycle_segments)
            .run_if(in_state(GameState::InGame)),
    );
}

fn populate(commands: &mut Commands, pools: &mut SpawnPools, segment: SpawnParent) {
    let handle = pools
        .lookup_by_name(SPAWNS_POOL)
        .expect("spawn pool must be registered before the world");
    let pool = pools.pool_mut(handle);

    for (name, local) in SLOTS {
        let template = pool
            .template_by_name(name)
            .unwrap_or_else(|| panic!("pool {SPAWNS_POOL} has no template {name:?}"));
        let at = segment.frame.transform_point(local);
        pool.spawn(commands, template, at, Quat::IDENTITY, Some(segment));
    }
}

fn spawn_demo_segment(mut commands: Commands, mut pools: ResMut<SpawnPools>) {
    let frame = Transform::from_translation(SEGMENT_AT);
    let segment = commands
        .spawn((
            Name::new("TrackSegment"),
            TrackSegment,
            DemoSegment,
            frame,
            Visibility::Visible,
            DespawnOnExit(GameState::InGame),
        ))
        .with_children(|parent| {
            parent.spawn((
                Name::new("Floor"),
                Transform::from_xyz(0.0, -SEGMENT_SIZE.y * 0.5, 0.0),
                RigidBody::Static,
                Collider::cuboid(SEGMENT_SIZE.x, SEGMENT_SIZE.y, SEGMENT_SIZE.z),
                CollisionLayers::new(Layer::Track, [Layer::Player, Layer::Debris]),
            ));
        })
        .id();

    populate(
        &mut commands,
        &mut pools,
        SpawnParent { entity: segment, frame: GlobalTransform::from(frame) },
    );
    info!("demo segment {segment:?} populated with {} enemies", SLOTS.len());
}

fn run_demo_lap(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut lap: ResMut<DemoLap>,
    mut commands: Commands,
    mut pools: ResMut<SpawnPools>,
    q_segment: Query<(Entity, &GlobalTransform), With<DemoSegment>>,
    mut q_player: Query<&mut Transform, With<Player>>,
    mut recycle: MessageWriter<RecycleSegment>,
    mut grant: MessageWriter<GrantInvulnerability>,
) {
    if !lap.timer.tick(time.delta()).just_finished() {
        return;
    }
    let Ok((segment, frame)) = q_segment.single() else {
        return;
    };

    if lap.refill_pending {
        populate(&mut commands, &mut pools, SpawnParent { entity: segment, frame: *frame });
        if let Ok(mut tf) = q_player.single_mut() {
            tf.translation = PLAYER_START;
        }
        lap.laps += 1;
        // Every other lap is an invulnerable run: enemies blink and pay double.
        if lap.laps % 2 == 1 {
            grant.write(GrantInvulnerability { secs: tunables.player_invulnerable_secs });
        }
        lap.refill_pending = false;
        lap.timer = Timer::from_seconds(LAP_SECS, TimerMode::Once);
    } else {
        recycle.write(RecycleSegment { segment });
        lap.refill_pending = true;
        lap.timer = Timer::from_seconds(REFILL_DELAY_SECS, TimerMode::Once);
    }
}
