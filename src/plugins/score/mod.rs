//! Score bus: gameplay publishes `PointsScored`, the board aggregates it.

use bevy::prelude::*;

use crate::common::state::GameState;

/// Points awarded at a world pose (where the popup would appear).
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct PointsScored {
    pub points: u32,
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    pub total: u64,
    pub awards: u32,
}

pub fn plugin(app: &mut App) {
    app.add_message::<PointsScored>();
    app.init_resource::<ScoreBoard>();
    app.add_systems(OnEnter(GameState::InGame), reset_score);
    app.add_systems(Last, tally_points);
}

fn reset_score(mut board: ResMut<ScoreBoard>) {
    *board = ScoreBoard::default();
}

pub fn tally_points(mut reader: MessageReader<PointsScored>, mut board: ResMut<ScoreBoard>) {
    for ev in reader.read() {
        board.total += u64::from(ev.points);
        board.awards += 1;
        debug!("+{} points at {:?} (total {})", ev.points, ev.position, board.total);
    }
}
