//! Test helpers.
//!
//! `World::run_system_once` (via the `RunSystemOnce` trait) runs a system without
//! building a full schedule. Systems that use `Commands` only enqueue structural
//! changes, so we call `world.flush()` afterwards to apply them before assertions.

use bevy::ecs::message::{Message, MessageReader, Messages};
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Make sure the backing storage for a message type exists.
pub fn ensure_messages<M: Message>(world: &mut World) {
    if world.get_resource::<Messages<M>>().is_none() {
        world.init_resource::<Messages<M>>();
    }
}

/// Collect every message of type `M` currently buffered in the world.
///
/// A fresh reader starts at the oldest buffered message, so this sees everything
/// written since the last two buffer updates.
pub fn collect_messages<M: Message + Clone>(world: &mut World) -> Vec<M> {
    ensure_messages::<M>(world);
    run_system_once(world, |mut reader: MessageReader<M>| {
        reader.read().cloned().collect::<Vec<M>>()
    })
}

/// Drop everything buffered for `M`.
///
/// Every `run_system_once` call builds a fresh reader that replays the whole
/// buffer, so tests clear inputs between steps.
pub fn clear_messages<M: Message>(world: &mut World) {
    ensure_messages::<M>(world);
    world.resource_mut::<Messages<M>>().clear();
}

/// Replace whatever is buffered for `M` with `messages`.
pub fn send_only<M: Message>(world: &mut World, messages: impl IntoIterator<Item = M>) {
    clear_messages::<M>(world);
    for message in messages {
        world.write_message(message);
    }
}
