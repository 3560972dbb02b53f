//! Overlay session lifecycle: one dedicated thread per overlay window.
//!
//! Each window's thread registers the classes, creates the window, builds
//! the Direct2D state and runs the render loop to completion. Creation is
//! synchronized so the caller observes either a live window or the creation
//! error; teardown posts a close request and joins the thread.

use anyhow::Context;
use std::sync::mpsc;
use std::thread::JoinHandle;

#[cfg(windows)]
pub use platform::{BoundsTick, MeasureTick, OverlayUi};
#[cfg(not(windows))]
pub use stub::OverlayUi;

/// Spawns a named worker thread that must report its startup result before
/// doing anything else. The call blocks until that report arrives, so a
/// successful return means the worker's setup ran to completion
/// (happens-before via the channel). Worker failures are joined away and
/// returned as the constructor's error.
fn spawn_reporting<T, F>(name: &str, worker: F) -> anyhow::Result<(T, JoinHandle<()>)>
where
    T: Send + 'static,
    F: FnOnce(mpsc::Sender<anyhow::Result<T>>) + Send + 'static,
{
    let (report_tx, report_rx) = mpsc::channel::<anyhow::Result<T>>();
    let thread = std::thread::Builder::new()
        .name(name.to_string())
        .spawn(move || worker(report_tx))
        .context("spawning overlay thread")?;

    match report_rx.recv() {
        Ok(Ok(value)) => Ok((value, thread)),
        Ok(Err(err)) => {
            let _ = thread.join();
            Err(err)
        }
        Err(_) => {
            let _ = thread.join();
            Err(anyhow::anyhow!("overlay thread exited before reporting"))
        }
    }
}

/// Joins the overlay thread during teardown. Joining an already-exited
/// worker is a no-op; a panicked worker is logged, never rethrown.
fn join_overlay_thread(thread: Option<JoinHandle<()>>) {
    if let Some(thread) = thread {
        if thread.join().is_err() {
            tracing::error!("overlay thread panicked during teardown");
        }
    }
}

#[cfg(windows)]
mod platform {
    use crate::colors::{overlay_palette, system_dark_mode};
    use crate::monitor::MonitorInfo;
    use crate::overlay::render::{D2dState, OverlayLoop};
    use crate::overlay::window::{create_overlay_window, OverlayClassRegistry, WindowContext};
    use crate::state::{BoundsToolState, CommonState, MeasureToolState};
    use std::sync::Arc;
    use std::thread::JoinHandle;
    use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
    use windows::Win32::UI::WindowsAndMessaging::{DestroyWindow, IsWindow, PostMessageW, WM_CLOSE};

    /// Per-frame draw callback for a measure overlay. Runs on the window's
    /// thread, only on frames the render loop decides to draw.
    pub type MeasureTick =
        Box<dyn FnMut(&CommonState, &MeasureToolState, HWND, &D2dState) + Send>;

    /// Per-frame draw callback for a bounds overlay.
    pub type BoundsTick = Box<dyn FnMut(&BoundsToolState, HWND, &D2dState) + Send>;

    /// Handle to one live overlay window and the thread driving it.
    ///
    /// Dropping the handle requests the window to close and joins the
    /// thread, so teardown is deterministic from the owner's side.
    pub struct OverlayUi {
        hwnd: isize,
        thread: Option<JoinHandle<()>>,
    }

    impl OverlayUi {
        pub fn create_measure(
            common: Arc<CommonState>,
            tool: Arc<MeasureToolState>,
            monitor: MonitorInfo,
            registry: Arc<OverlayClassRegistry>,
            mut tick: MeasureTick,
        ) -> anyhow::Result<Self> {
            let tick_common = Arc::clone(&common);
            Self::create_with(
                "measure-overlay",
                Arc::clone(&common),
                monitor,
                registry,
                WindowContext::Measure(common),
                Box::new(move |hwnd, d2d| tick(&tick_common, &tool, hwnd, d2d)),
            )
        }

        pub fn create_bounds(
            tool: Arc<BoundsToolState>,
            monitor: MonitorInfo,
            registry: Arc<OverlayClassRegistry>,
            mut tick: BoundsTick,
        ) -> anyhow::Result<Self> {
            let common = Arc::clone(&tool.common);
            let tick_tool = Arc::clone(&tool);
            Self::create_with(
                "bounds-overlay",
                common,
                monitor,
                registry,
                WindowContext::Bounds(tool),
                Box::new(move |hwnd, d2d| tick(&tick_tool, hwnd, d2d)),
            )
        }

        fn create_with(
            thread_name: &str,
            common: Arc<CommonState>,
            monitor: MonitorInfo,
            registry: Arc<OverlayClassRegistry>,
            context: WindowContext,
            tick: Box<dyn FnMut(HWND, &D2dState) + Send>,
        ) -> anyhow::Result<Self> {
            let (hwnd, thread) = super::spawn_reporting(thread_name, move |report| {
                registry.ensure_registered();

                let hwnd = match create_overlay_window(&monitor, context) {
                    Ok(hwnd) => hwnd,
                    Err(err) => {
                        let _ = report.send(Err(err));
                        return;
                    }
                };

                let palette = overlay_palette(common.line_color, system_dark_mode());
                let d2d = match D2dState::new(hwnd, palette) {
                    Ok(d2d) => d2d,
                    Err(err) => {
                        unsafe {
                            let _ = DestroyWindow(hwnd);
                        }
                        let _ = report.send(Err(err));
                        return;
                    }
                };

                let _ = report.send(Ok(hwnd.0 as isize));

                OverlayLoop::new(hwnd, d2d, Arc::clone(&common), monitor.work, tick).run();

                tracing::debug!(thread = %std::thread::current().name().unwrap_or(""), "overlay window closed");
                common.signal_session_completed();
            })?;

            Ok(Self {
                hwnd,
                thread: Some(thread),
            })
        }

        pub fn hwnd(&self) -> isize {
            self.hwnd
        }

        pub fn is_window_alive(&self) -> bool {
            unsafe { IsWindow(HWND(self.hwnd as *mut _)) }.as_bool()
        }
    }

    impl Drop for OverlayUi {
        fn drop(&mut self) {
            unsafe {
                let _ = PostMessageW(HWND(self.hwnd as *mut _), WM_CLOSE, WPARAM(0), LPARAM(0));
            }
            super::join_overlay_thread(self.thread.take());
        }
    }
}

#[cfg(not(windows))]
mod stub {
    use crate::monitor::MonitorInfo;
    use crate::overlay::window::OverlayClassRegistry;
    use crate::state::{BoundsToolState, CommonState, MeasureToolState};
    use std::sync::Arc;
    use std::thread::JoinHandle;

    /// Inert stand-in so callers compile on non-Windows targets. Keeps the
    /// synchronized-create and join-on-drop contract, just without a window.
    pub struct OverlayUi {
        thread: Option<JoinHandle<()>>,
    }

    impl OverlayUi {
        pub fn create_measure(
            common: Arc<CommonState>,
            _tool: Arc<MeasureToolState>,
            _monitor: MonitorInfo,
            registry: Arc<OverlayClassRegistry>,
        ) -> anyhow::Result<Self> {
            Self::create_with("measure-overlay", common, registry)
        }

        pub fn create_bounds(
            tool: Arc<BoundsToolState>,
            _monitor: MonitorInfo,
            registry: Arc<OverlayClassRegistry>,
        ) -> anyhow::Result<Self> {
            Self::create_with("bounds-overlay", Arc::clone(&tool.common), registry)
        }

        fn create_with(
            thread_name: &str,
            common: Arc<CommonState>,
            registry: Arc<OverlayClassRegistry>,
        ) -> anyhow::Result<Self> {
            let ((), thread) = super::spawn_reporting(thread_name, move |report| {
                registry.ensure_registered();
                let _ = report.send(Ok(()));
                common.signal_session_completed();
            })?;
            Ok(Self {
                thread: Some(thread),
            })
        }
    }

    impl Drop for OverlayUi {
        fn drop(&mut self) {
            super::join_overlay_thread(self.thread.take());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{join_overlay_thread, spawn_reporting};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn creation_blocks_until_the_worker_reports() {
        let setup_done = Arc::new(AtomicBool::new(false));
        let setup_flag = Arc::clone(&setup_done);

        let (value, thread) = spawn_reporting("reporting-worker", move |report| {
            std::thread::sleep(Duration::from_millis(30));
            setup_flag.store(true, Ordering::SeqCst);
            let _ = report.send(Ok(7_i32));
        })
        .expect("worker reported success");

        // The constructor returned, so the worker's setup already ran.
        assert!(setup_done.load(Ordering::SeqCst));
        assert_eq!(value, 7);
        join_overlay_thread(Some(thread));
    }

    #[test]
    fn worker_errors_surface_from_the_constructor() {
        let err = spawn_reporting::<i32, _>("failing-worker", |report| {
            let _ = report.send(Err(anyhow::anyhow!("window creation failed")));
        })
        .expect_err("worker reported failure");
        assert!(err.to_string().contains("window creation failed"));
    }

    #[test]
    fn a_worker_dying_before_reporting_is_an_error() {
        let err = spawn_reporting::<i32, _>("silent-worker", |_report| {})
            .expect_err("worker never reported");
        assert!(err.to_string().contains("before reporting"));
    }

    #[test]
    fn teardown_join_tolerates_exited_and_panicked_workers() {
        let finished = std::thread::spawn(|| {});
        while !finished.is_finished() {
            std::thread::yield_now();
        }
        join_overlay_thread(Some(finished));

        let panicking = std::thread::spawn(|| panic!("worker crash"));
        join_overlay_thread(Some(panicking));

        join_overlay_thread(None);
    }
}
