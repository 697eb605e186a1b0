//! Visual feedback targets.
//!
//! A `VisualFeedback` sits on every visible part of an entity. Gameplay code only
//! ever asks it to show a colour on a named channel; how that colour reaches the
//! screen (vertex colours, materials, gizmos) is up to the presentation layer.

use bevy::ecs::query::QueryFilter;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

/// Channel shared by all enemy body parts.
pub const ENEMY_COLOR_CHANNEL: &str = "EnemyColor";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelColor {
    pub color: Color,
    pub transition_secs: f32,
}

#[derive(Component, Debug, Clone, Default)]
pub struct VisualFeedback {
    channels: HashMap<String, ChannelColor>,
    changes: u32,
}

impl VisualFeedback {
    pub fn new(channel: &str, color: Color) -> Self {
        let mut fb = Self::default();
        fb.channels.insert(
            channel.to_owned(),
            ChannelColor { color, transition_secs: 0.0 },
        );
        fb
    }

    pub fn set_color(&mut self, channel: &str, color: Color, transition_secs: f32) {
        let entry = ChannelColor { color, transition_secs: transition_secs.max(0.0) };
        match self.channels.get_mut(channel) {
            Some(slot) => *slot = entry,
            None => {
                self.channels.insert(channel.to_owned(), entry);
            }
        }
        self.changes = self.changes.wrapping_add(1);
    }

    pub fn color(&self, channel: &str) -> Option<Color> {
        self.channels.get(channel).map(|c| c.color)
    }

    pub fn channel(&self, channel: &str) -> Option<ChannelColor> {
        self.channels.get(channel).copied()
    }

    /// Number of `set_color` calls since creation.
    #[inline]
    pub fn changes(&self) -> u32 {
        self.changes
    }
}

/// Paint every cached target on the enemy channel, instantly.
///
/// Targets are cached once at initialization; a target that lost its
/// `VisualFeedback` is a broken prefab, not a runtime condition.
pub fn paint<F: QueryFilter>(
    targets: &[Entity],
    q_feedback: &mut Query<&mut VisualFeedback, F>,
    color: Color,
) {
    for &target in targets {
        let mut fb = q_feedback
            .get_mut(target)
            .expect("cached feedback target is missing VisualFeedback");
        fb.set_color(ENEMY_COLOR_CHANNEL, color, 0.0);
    }
}

#[cfg(test)]
mod tests;
