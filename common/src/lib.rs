//! Data shared between the animation engine, the client and the session
//! wire: the action catalog, phase scheduling, root components, the tick
//! clock and messages.

pub mod action;
pub mod clock;
pub mod comp;
pub mod msg;
pub mod phase;
pub mod resources;

pub use action::{ActionDescriptor, ActionKind, Category};
pub use phase::{current_phase, ease, Easing, Phase, PhaseInfo, PhaseTemplate};
