//! Driver state machines
//!
//! Two levels: the handle's [`Lifecycle`], visible to callers, and the
//! [`InitState`] machine that `initialize` walks through. Both are pure;
//! the driver performs the side effects and feeds back [`InitEvent`]s.

pub mod events;
pub mod machine;

pub use events::InitEvent;
pub use machine::{InitState, Lifecycle};
