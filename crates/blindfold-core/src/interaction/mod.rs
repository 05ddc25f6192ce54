//! Interaction controller: pointer and keyboard input to sprite mutations.
//!
//! # States
//!
//! - **Idle**: waiting for a pointer-down on a sprite
//! - **Dragging**: a sprite follows the pointer, keeping the offset captured
//!   at grab time; ends on pointer-up anywhere
//!
//! Pointer-move/up listeners are registered only while dragging, keyboard
//! listeners for the controller's lifetime. Both are held as `Subscription`
//! guards, so teardown on any path releases them exactly once.

mod controller;
mod events;
mod subscription;

pub use controller::{Drag, InteractionController, InteractionState};
pub use events::{Command, ControlAction, Key, PointerTarget, Propagation};
pub use subscription::{DetachedHost, ListenerHost, ListenerKind, Subscription};

#[cfg(test)]
pub(crate) use subscription::testing;
