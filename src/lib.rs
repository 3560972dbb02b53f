//! Transparent on-screen measurement overlays for Windows.
//!
//! The crate renders click-through-feeling, topmost, per-monitor overlay
//! windows for two tools: a crosshair measure tool and a drag-to-select
//! bounds tool. Each overlay runs on its own thread with a Direct2D render
//! loop; shared session state carries the cursor position, the label text
//! and the session-completed callback. Everything touching Win32 or
//! Direct2D is gated on `cfg(windows)`; the tool state machines, frame
//! decisions and geometry are portable and unit tested everywhere.

pub mod clipboard;
pub mod colors;
pub mod geometry;
pub mod logging;
pub mod monitor;
pub mod overlay;
pub mod settings;
pub mod state;
