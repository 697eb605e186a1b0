//! Global "player invulnerability changed" broadcast.
//!
//! This is a multicast bus with explicit subscriptions: an entity only hears the
//! broadcast while it holds a subscription, and every subscription it holds is one
//! handler invocation per broadcast. The bus itself does not deduplicate, that is
//! the subscriber's job (see the enemy activation guard).
//!
//! The broadcast itself is a plain message, `InvulnerabilityChanged`. Handlers read
//! the message and walk `InvulnerabilityBus::subscriptions`.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvulnerabilityChanged {
    pub invulnerable: bool,
}

#[derive(Resource, Debug, Default)]
pub struct InvulnerabilityBus {
    subscriptions: Vec<Entity>,
}

impl InvulnerabilityBus {
    pub fn subscribe(&mut self, subscriber: Entity) {
        self.subscriptions.push(subscriber);
    }

    /// Drop one subscription. Returns `false` if `subscriber` held none.
    pub fn unsubscribe(&mut self, subscriber: Entity) -> bool {
        match self.subscriptions.iter().position(|&e| e == subscriber) {
            Some(i) => {
                self.subscriptions.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn subscriptions(&self) -> &[Entity] {
        &self.subscriptions
    }

    pub fn subscription_count(&self, subscriber: Entity) -> usize {
        self.subscriptions.iter().filter(|&&e| e == subscriber).count()
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<InvulnerabilityChanged>();
    app.init_resource::<InvulnerabilityBus>();
}
