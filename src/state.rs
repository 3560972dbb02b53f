//! Shared session state read and written across the overlay threads.
//!
//! One [`CommonState`] instance is shared by every overlay window of a
//! session (one window per monitor). The cursor position is written by a
//! driver thread outside this crate and only read here; the overlay text is
//! written by the tick callbacks and read back for clipboard copies. Locks
//! are scoped to single-field reads and copies, never held across a render
//! pass.

use crate::colors::OverlayColor;
use crate::geometry::{PointF, PointI, RectI};
use std::sync::{Arc, Mutex, Once, PoisonError};

/// Synchronized buffer holding the label currently shown in the overlay box.
#[derive(Default)]
pub struct OverlayBoxText {
    text: Mutex<String>,
}

impl OverlayBoxText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: &str) {
        let mut text = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        text.clear();
        text.push_str(value);
    }

    pub fn read<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        let text = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        f(&text)
    }
}

pub type SessionCompletedCallback = Box<dyn Fn() + Send + Sync>;

/// Cross-window session state: cursor, toolbar exclusion zone, color, label
/// text and the completion callback.
pub struct CommonState {
    cursor_pos: Mutex<PointI>,
    pub toolbar_bounding_box: RectI,
    pub line_color: OverlayColor,
    pub overlay_box_text: OverlayBoxText,
    /// Keeps the system cursor visible and skips topmost pinning so the
    /// overlay can be inspected with other tooling on top.
    pub debug_overlay: bool,
    session_completed: SessionCompletedCallback,
    session_completed_once: Once,
}

impl CommonState {
    pub fn new(
        toolbar_bounding_box: RectI,
        line_color: OverlayColor,
        debug_overlay: bool,
        session_completed: SessionCompletedCallback,
    ) -> Self {
        Self {
            cursor_pos: Mutex::new(PointI::default()),
            toolbar_bounding_box,
            line_color,
            overlay_box_text: OverlayBoxText::new(),
            debug_overlay,
            session_completed,
            session_completed_once: Once::new(),
        }
    }

    pub fn cursor_pos(&self) -> PointI {
        *self.cursor_pos.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called by the external driver thread; the overlay side never writes
    /// the cursor position.
    pub fn set_cursor_pos(&self, pos: PointI) {
        *self.cursor_pos.lock().unwrap_or_else(PoisonError::into_inner) = pos;
    }

    /// Fires the session-completed callback. At most one invocation per
    /// session, no matter how many overlay threads exit.
    pub fn signal_session_completed(&self) {
        self.session_completed_once
            .call_once(|| (self.session_completed)());
    }
}

/// One finished point-to-point measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub start: PointF,
    pub end: PointF,
}

/// Accumulated measurement results, guarded for cross-thread access.
#[derive(Default)]
pub struct MeasureToolState {
    measurements: Mutex<Vec<Measurement>>,
}

impl MeasureToolState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, measurement: Measurement) {
        self.measurements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(measurement);
    }

    pub fn read<R>(&self, f: impl FnOnce(&[Measurement]) -> R) -> R {
        let measurements = self
            .measurements
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&measurements)
    }

    pub fn clear(&self) {
        self.measurements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Bounds-selection tool state: the in-progress rectangle start, if any,
/// plus the shared session state it reads the cursor from.
pub struct BoundsToolState {
    region_start: Mutex<Option<PointF>>,
    pub common: Arc<CommonState>,
}

impl BoundsToolState {
    pub fn new(common: Arc<CommonState>) -> Self {
        Self {
            region_start: Mutex::new(None),
            common,
        }
    }

    pub fn set_region_start(&self, point: PointF) {
        *self
            .region_start
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(point);
    }

    pub fn region_start(&self) -> Option<PointF> {
        *self
            .region_start
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn take_region_start(&self) -> Option<PointF> {
        self.region_start
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn clear_region_start(&self) {
        *self
            .region_start
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn common_with_counter() -> (Arc<CommonState>, Arc<AtomicUsize>) {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_in_callback = Arc::clone(&counter);
        let common = Arc::new(CommonState::new(
            RectI::default(),
            OverlayColor::opaque(1.0, 0.4, 0.0),
            false,
            Box::new(move || {
                counter_in_callback.fetch_add(1, Ordering::SeqCst);
            }),
        ));
        (common, counter)
    }

    #[test]
    fn overlay_text_read_sees_latest_set() {
        let text = OverlayBoxText::new();
        text.set("12 × 34");
        assert_eq!(text.read(str::to_owned), "12 × 34");
        text.set("1 × 1");
        assert_eq!(text.read(str::to_owned), "1 × 1");
    }

    #[test]
    fn cursor_position_roundtrips_through_the_shared_state() {
        let (common, _) = common_with_counter();
        assert_eq!(common.cursor_pos(), PointI::default());
        common.set_cursor_pos(PointI::new(-40, 900));
        assert_eq!(common.cursor_pos(), PointI::new(-40, 900));
    }

    #[test]
    fn session_completion_fires_once_across_threads() {
        let (common, counter) = common_with_counter();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let common = Arc::clone(&common);
                std::thread::spawn(move || common.signal_session_completed())
            })
            .collect();
        for handle in handles {
            handle.join().expect("signalling thread");
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn region_start_take_clears_the_stored_point() {
        let (common, _) = common_with_counter();
        let bounds = BoundsToolState::new(common);
        assert_eq!(bounds.take_region_start(), None);
        bounds.set_region_start(PointF::new(10.0, 20.0));
        assert_eq!(bounds.region_start(), Some(PointF::new(10.0, 20.0)));
        assert_eq!(bounds.take_region_start(), Some(PointF::new(10.0, 20.0)));
        assert_eq!(bounds.region_start(), None);
    }
}
