//! Camera plugin (render-only).
//!
//! A chase camera behind the player plus gizmo presentation: every visible
//! `VisualFeedback` target is drawn as a box in its current channel colour.
//! This is the only reader of `VisualFeedback` colours.
//!
//! A system cannot have `Query<&Transform>` and `Query<&mut Transform>` at the same
//! time unless Bevy can prove those queries are disjoint, so the player and camera
//! queries carry `Without<...>` filters.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::feedback::{ENEMY_COLOR_CHANNEL, VisualFeedback};
use crate::plugins::player::Player;
use crate::plugins::track::TrackSegment;

const CHASE_OFFSET: Vec3 = Vec3::new(0.0, 9.0, 16.0);
const PART_SIZE: f32 = 0.9;

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(Update, draw_feedback.run_if(in_state(GameState::InGame)));
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera3d::default(),
        MainCamera { responsiveness: 5.0 },
        Transform::from_translation(CHASE_OFFSET).looking_at(Vec3::new(0.0, 0.0, -20.0), Vec3::Y),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player(
    time: Res<Time>,
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let (Ok(tf_player), Ok((mut tf_cam, cam))) = (q_player.single(), q_cam.single_mut()) else {
        return;
    };

    let dt = time.delta_secs();
    let alpha = 1.0 - (-cam.responsiveness * dt).exp();
    let target = tf_player.translation + CHASE_OFFSET;
    tf_cam.translation = tf_cam.translation.lerp(target, alpha);
}

fn draw_feedback(
    mut gizmos: Gizmos,
    q_parts: Query<(&GlobalTransform, &VisualFeedback, &InheritedVisibility)>,
    q_segments: Query<&GlobalTransform, With<TrackSegment>>,
    q_player: Query<&GlobalTransform, With<Player>>,
) {
    for segment in &q_segments {
        let floor = Transform::from_translation(segment.translation())
            .with_scale(Vec3::new(12.0, 0.1, 80.0));
        gizmos.cube(floor, Color::srgb(0.25, 0.27, 0.33));
    }

    for (global, feedback, visible) in &q_parts {
        if !visible.get() {
            continue;
        }
        let Some(color) = feedback.color(ENEMY_COLOR_CHANNEL) else {
            continue;
        };
        let part = Transform::from(*global).with_scale(Vec3::splat(PART_SIZE));
        gizmos.cube(part, color);
    }

    for player in &q_player {
        gizmos.sphere(Isometry3d::from_translation(player.translation()), 0.8, Color::srgb(0.2, 0.75, 0.9));
    }
}
