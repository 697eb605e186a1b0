//! Common, shared types.

pub mod flags;
pub mod layers;
pub mod restore;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
