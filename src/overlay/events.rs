//! Typed window events and the per-tool message handlers.
//!
//! The raw window procedures translate Win32 messages into [`OverlayEvent`]s
//! and dispatch them here, so the two tool state machines stay pure and
//! testable without a window. Handlers receive the clipboard sink as a
//! closure for the same reason.

use crate::geometry::{PointF, PointI};
use crate::state::{BoundsToolState, CommonState};

const WM_APP: u32 = 0x8000;

/// Custom window message posted by the render loop when the cursor crosses
/// the monitor boundary, so in-progress tool state can be reset.
pub const WM_MONITOR_CHANGED: u32 = WM_APP + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayEvent {
    CloseRequested,
    EscapeReleased,
    LeftButtonDown {
        /// Cursor position already converted to window-client coordinates.
        cursor_client: PointF,
    },
    LeftButtonUp,
    RightButtonUp,
    MonitorChanged,
    EraseBackground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Fall through to the default window procedure.
    Unhandled,
    /// Consumed; default processing may still run.
    Handled,
    /// Return the non-zero "handled, nothing to erase" sentinel. The render
    /// loop owns all painting, so background erasure would only flicker.
    SuppressErase,
    /// Post a close request to the window.
    RequestClose,
    /// Destroy the window now.
    Destroy,
}

/// Builds the bounds press event from the shared cursor position, the same
/// position the render ticks draw from; the OS cursor is never consulted.
/// `to_client` maps that screen-space point into window-client coordinates
/// and may fail, in which case the press is dropped.
pub fn press_event(
    common: &CommonState,
    to_client: impl FnOnce(PointI) -> Option<PointF>,
) -> Option<OverlayEvent> {
    to_client(common.cursor_pos()).map(|cursor_client| OverlayEvent::LeftButtonDown { cursor_client })
}

/// Measure-tool window state machine. Left-button release publishes the
/// current overlay label to the clipboard; Escape and right-click close.
pub fn handle_measure_event(
    common: &CommonState,
    event: OverlayEvent,
    copy_text: &mut dyn FnMut(&str),
) -> EventResponse {
    match event {
        OverlayEvent::CloseRequested => EventResponse::Destroy,
        OverlayEvent::EscapeReleased | OverlayEvent::RightButtonUp => EventResponse::RequestClose,
        OverlayEvent::LeftButtonUp => {
            common.overlay_box_text.read(|text| copy_text(text));
            EventResponse::Handled
        }
        OverlayEvent::EraseBackground => EventResponse::SuppressErase,
        OverlayEvent::LeftButtonDown { .. } | OverlayEvent::MonitorChanged => {
            EventResponse::Unhandled
        }
    }
}

/// Bounds-tool window state machine. Press records the candidate rectangle
/// start; release finalizes it (the rectangle's geometry and drawing are the
/// tick callback's concern) and publishes the label. A monitor change wipes
/// the in-progress start so stale selections don't leak across monitors.
pub fn handle_bounds_event(
    state: &BoundsToolState,
    event: OverlayEvent,
    copy_text: &mut dyn FnMut(&str),
) -> EventResponse {
    match event {
        OverlayEvent::CloseRequested => EventResponse::Destroy,
        OverlayEvent::EscapeReleased | OverlayEvent::RightButtonUp => EventResponse::RequestClose,
        OverlayEvent::LeftButtonDown { cursor_client } => {
            state.set_region_start(cursor_client);
            EventResponse::Handled
        }
        OverlayEvent::MonitorChanged => {
            state.clear_region_start();
            EventResponse::Handled
        }
        OverlayEvent::LeftButtonUp => {
            if state.take_region_start().is_some() {
                state.common.overlay_box_text.read(|text| copy_text(text));
            }
            EventResponse::Handled
        }
        OverlayEvent::EraseBackground => EventResponse::SuppressErase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::OverlayColor;
    use crate::geometry::RectI;
    use std::sync::Arc;

    fn common() -> Arc<CommonState> {
        Arc::new(CommonState::new(
            RectI::default(),
            OverlayColor::opaque(1.0, 0.4, 0.0),
            false,
            Box::new(|| {}),
        ))
    }

    #[test]
    fn both_tools_suppress_background_erasure() {
        let common = common();
        let bounds = BoundsToolState::new(Arc::clone(&common));
        let mut sink = |_: &str| {};
        assert_eq!(
            handle_measure_event(&common, OverlayEvent::EraseBackground, &mut sink),
            EventResponse::SuppressErase
        );
        assert_eq!(
            handle_bounds_event(&bounds, OverlayEvent::EraseBackground, &mut sink),
            EventResponse::SuppressErase
        );
    }

    #[test]
    fn escape_and_right_click_request_close_for_both_tools() {
        let common = common();
        let bounds = BoundsToolState::new(Arc::clone(&common));
        let mut sink = |_: &str| {};
        for event in [OverlayEvent::EscapeReleased, OverlayEvent::RightButtonUp] {
            assert_eq!(
                handle_measure_event(&common, event, &mut sink),
                EventResponse::RequestClose
            );
            assert_eq!(
                handle_bounds_event(&bounds, event, &mut sink),
                EventResponse::RequestClose
            );
        }
    }

    #[test]
    fn measure_left_release_copies_the_current_label() {
        let common = common();
        common.overlay_box_text.set("120 × 48");
        let mut copied = Vec::new();
        let mut sink = |text: &str| copied.push(text.to_owned());
        handle_measure_event(&common, OverlayEvent::LeftButtonUp, &mut sink);
        assert_eq!(copied, vec!["120 × 48".to_owned()]);
    }
}
