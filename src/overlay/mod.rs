//! Transparent measurement overlay windows.

pub mod events;
pub mod lifecycle;
pub mod render;
pub mod window;
#[cfg(windows)]
pub(crate) mod wndproc;

pub use events::{EventResponse, OverlayEvent};
pub use lifecycle::OverlayUi;
pub use render::{visibility_transition, FrameDecision};
pub use window::{OverlayClassRegistry, WindowContext};
