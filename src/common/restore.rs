//! Authored transforms for pooled sub-objects.
//!
//! Moving parts of an enemy and the fragments of a debris burst drift away from
//! where they were authored. They carry the authored local transform so whoever
//! recycles them can snap them back.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy)]
pub struct RestorableTransform {
    pub authored: Transform,
}

impl RestorableTransform {
    pub fn capture(authored: Transform) -> Self {
        Self { authored }
    }

    #[inline]
    pub fn restore(&self, tf: &mut Transform) {
        *tf = self.authored;
    }
}
