//! Process-wide gameplay flags.
//!
//! Everything that reacts to these flags reads them through the accessors.
//! The writers are their owners: the player plugin owns invulnerability,
//! the track plugin owns the reset gate.

use bevy::prelude::*;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GlobalFlags {
    player_invulnerable: bool,
    track_reset_active: bool,
}

impl GlobalFlags {
    #[inline]
    pub fn player_invulnerable(&self) -> bool {
        self.player_invulnerable
    }

    #[inline]
    pub fn track_reset_active(&self) -> bool {
        self.track_reset_active
    }

    /// Returns `true` if the value changed.
    pub fn set_player_invulnerable(&mut self, on: bool) -> bool {
        let changed = self.player_invulnerable != on;
        self.player_invulnerable = on;
        changed
    }

    /// Returns `true` if the value changed.
    pub fn set_track_reset_active(&mut self, on: bool) -> bool {
        let changed = self.track_reset_active != on;
        self.track_reset_active = on;
        changed
    }
}
