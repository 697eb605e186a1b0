use avian3d::prelude::*;
use bevy::prelude::*;

use super::explosion::{ExplodableQuery, Exploder};
use crate::plugins::player::{Player, PlayerCollision};

/// One participant of a contact: the collider that touched and the body it
/// belongs to, if any.
#[derive(Clone, Copy, Debug)]
struct ContactSide {
    collider: Entity,
    body: Option<Entity>,
}

impl ContactSide {
    fn pair(ev: &CollisionStart) -> [Self; 2] {
        [
            Self { collider: ev.collider1, body: ev.body1 },
            Self { collider: ev.collider2, body: ev.body2 },
        ]
    }

    /// The entity gameplay state lives on: the body if there is one.
    #[inline]
    fn owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }

    fn is_player(self, q_players: &Query<(), With<Player>>) -> bool {
        q_players.contains(self.collider) || self.body.is_some_and(|b| q_players.contains(b))
    }
}

/// Enemy touched by the player: explode and hurt the player.
///
/// Contacts while the track is resetting, or with an enemy parked in its pool,
/// are ignored entirely.
pub fn handle_player_contacts(
    mut started: MessageReader<CollisionStart>,
    mut exploder: Exploder,
    mut q_enemies: ExplodableQuery,
    q_players: Query<(), With<Player>>,
    mut hits: MessageWriter<PlayerCollision>,
) {
    for ev in started.read() {
        let [s1, s2] = ContactSide::pair(ev);
        let (enemy_side, player_side) = match (s1.is_player(&q_players), s2.is_player(&q_players)) {
            (false, true) => (s1, s2),
            (true, false) => (s2, s1),
            _ => continue,
        };

        let enemy = enemy_side.owner();
        let Ok((profile, _, mut links, mut status, mut tf, global)) = q_enemies.get_mut(enemy) else {
            continue;
        };
        if !status.is_active_in_pool() {
            debug!("enemy {enemy:?} touched the player while parked in its pool; ignored");
            continue;
        }

        if exploder.flags().track_reset_active() {
            debug!("enemy {enemy:?} touched the player during a track reset; ignored");
            continue;
        }

        exploder.explode(enemy, profile, &mut links, &mut status, &mut tf, global);
        hits.write(PlayerCollision {
            player: player_side.owner(),
            damage: exploder.tunables().player_collision_damage,
        });
    }
}
