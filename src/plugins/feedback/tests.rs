use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;

#[test]
fn set_color_overwrites_channel_and_counts_changes() {
    let mut fb = VisualFeedback::new(ENEMY_COLOR_CHANNEL, Color::WHITE);
    assert_eq!(fb.changes(), 0);

    fb.set_color(ENEMY_COLOR_CHANNEL, Color::BLACK, 0.25);
    fb.set_color("Glow", Color::WHITE, -1.0);

    assert_eq!(fb.color(ENEMY_COLOR_CHANNEL), Some(Color::BLACK));
    assert_eq!(fb.channel(ENEMY_COLOR_CHANNEL).unwrap().transition_secs, 0.25);
    // Negative transitions clamp to instant.
    assert_eq!(fb.channel("Glow").unwrap().transition_secs, 0.0);
    assert_eq!(fb.changes(), 2);
}

#[test]
fn paint_touches_every_target() {
    let mut world = World::new();
    let a = world.spawn(VisualFeedback::new(ENEMY_COLOR_CHANNEL, Color::WHITE)).id();
    let b = world.spawn(VisualFeedback::new(ENEMY_COLOR_CHANNEL, Color::WHITE)).id();
    let untouched = world.spawn(VisualFeedback::new(ENEMY_COLOR_CHANNEL, Color::WHITE)).id();

    let red = Color::srgb(1.0, 0.0, 0.0);
    run_system_once(&mut world, move |mut q: Query<&mut VisualFeedback>| {
        paint(&[a, b], &mut q, red);
    });

    for e in [a, b] {
        let fb = world.get::<VisualFeedback>(e).unwrap();
        assert_eq!(fb.color(ENEMY_COLOR_CHANNEL), Some(red));
        assert_eq!(fb.changes(), 1);
    }
    assert_eq!(world.get::<VisualFeedback>(untouched).unwrap().changes(), 0);
}
