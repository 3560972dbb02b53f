//! Window-class registration and the overlay window factory.

use crate::state::{BoundsToolState, CommonState};
use std::sync::{Arc, Once};

/// Strongly typed per-window context. The variant selects the window class
/// (and with it the window procedure) the window is created with.
pub enum WindowContext {
    Measure(Arc<CommonState>),
    Bounds(Arc<BoundsToolState>),
}

impl WindowContext {
    pub fn common(&self) -> &Arc<CommonState> {
        match self {
            WindowContext::Measure(common) => common,
            WindowContext::Bounds(tool) => &tool.common,
        }
    }
}

/// One-time, process-wide registration of the two overlay window classes.
///
/// Owned by the caller and shared with every overlay session instead of
/// living in ambient global state. Registration failure is not reported
/// here; it surfaces as the subsequent window creation failing.
pub struct OverlayClassRegistry {
    once: Once,
}

impl Default for OverlayClassRegistry {
    fn default() -> Self {
        Self { once: Once::new() }
    }
}

impl OverlayClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent and thread-safe: concurrent first calls still register
    /// each class exactly once.
    pub fn ensure_registered(&self) {
        #[cfg(windows)]
        self.ensure_registered_with(platform::register_overlay_classes);
        #[cfg(not(windows))]
        self.ensure_registered_with(|| {});
    }

    fn ensure_registered_with(&self, register: impl FnOnce()) {
        self.once.call_once(register);
    }
}

#[cfg(windows)]
pub use platform::create_overlay_window;

#[cfg(windows)]
mod platform {
    use super::WindowContext;
    use crate::geometry::RectI;
    use crate::monitor::MonitorInfo;
    use crate::overlay::wndproc;
    use anyhow::Context;
    use windows::core::w;
    use windows::Win32::Foundation::{HWND, RECT};
    use windows::Win32::Graphics::Dwm::{
        DwmEnableBlurBehindWindow, DWM_BB_BLURREGION, DWM_BB_ENABLE, DWM_BLURBEHIND,
    };
    use windows::Win32::Graphics::Gdi::{CombineRgn, CreateRectRgn, DeleteObject, RGN_DIFF, RGN_ERROR};
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::UI::WindowsAndMessaging::{
        CreateWindowExW, GetSystemMetrics, GetWindowRect, LoadCursorW, RegisterClassW,
        SetWindowPos, SetWindowRgn, ShowWindow, HWND_TOPMOST, IDC_CROSS, SM_CXVIRTUALSCREEN,
        SWP_NOMOVE, SWP_NOSIZE, SW_SHOWNORMAL, WNDCLASSW, WS_EX_TOOLWINDOW, WS_POPUP,
    };

    pub(super) const MEASURE_CLASS: windows::core::PCWSTR = w!("ScreenRuler.MeasureOverlay");
    pub(super) const BOUNDS_CLASS: windows::core::PCWSTR = w!("ScreenRuler.BoundsOverlay");

    pub(super) fn register_overlay_classes() {
        unsafe {
            let hinstance = match GetModuleHandleW(None) {
                Ok(hinstance) => hinstance,
                Err(err) => {
                    tracing::error!(?err, "module handle unavailable for class registration");
                    return;
                }
            };

            let mut class = WNDCLASSW {
                hInstance: hinstance.into(),
                lpszClassName: MEASURE_CLASS,
                lpfnWndProc: Some(wndproc::measure_wnd_proc),
                ..Default::default()
            };
            if RegisterClassW(&class) == 0 {
                tracing::error!("failed to register measure overlay window class");
            }

            class.lpszClassName = BOUNDS_CLASS;
            class.lpfnWndProc = Some(wndproc::bounds_wnd_proc);
            class.hCursor = LoadCursorW(None, IDC_CROSS).unwrap_or_default();
            if RegisterClassW(&class) == 0 {
                tracing::error!("failed to register bounds overlay window class");
            }
        }
    }

    /// Creates the borderless topmost overlay window covering the monitor's
    /// full screen rectangle and applies its transparency and hit-region
    /// side effects. Creation failure is unrecoverable for the session.
    pub fn create_overlay_window(
        monitor: &MonitorInfo,
        context: WindowContext,
    ) -> anyhow::Result<HWND> {
        let common = std::sync::Arc::clone(context.common());
        let class_name = match &context {
            WindowContext::Measure(_) => MEASURE_CLASS,
            WindowContext::Bounds(_) => BOUNDS_CLASS,
        };
        let screen = monitor.screen;

        unsafe {
            let hinstance =
                GetModuleHandleW(None).context("module handle for overlay window")?;
            // Ownership passes to the window; the procedure reclaims it on
            // WM_NCDESTROY.
            let param = Box::into_raw(Box::new(context)) as *const core::ffi::c_void;
            let hwnd = CreateWindowExW(
                WS_EX_TOOLWINDOW,
                class_name,
                w!("ScreenRuler.Overlay"),
                WS_POPUP,
                screen.left,
                screen.top,
                screen.width(),
                screen.height(),
                None,
                None,
                hinstance,
                Some(param),
            )
            .context("overlay window creation failed")?;

            let _ = ShowWindow(hwnd, SW_SHOWNORMAL);
            if !common.debug_overlay {
                let _ = SetWindowPos(hwnd, HWND_TOPMOST, 0, 0, 0, 0, SWP_NOMOVE | SWP_NOSIZE);
            }

            enable_offscreen_blur(hwnd);

            if monitor.is_primary {
                exclude_toolbar_region(hwnd, common.toolbar_bounding_box);
            }

            Ok(hwnd)
        }
    }

    /// Blur-behind scoped to a 1px region parked off-screen: enables the
    /// compositor transparency path without any visible blur.
    unsafe fn enable_offscreen_blur(hwnd: HWND) {
        let pos = -GetSystemMetrics(SM_CXVIRTUALSCREEN) - 8;
        let region = CreateRectRgn(pos, 0, pos + 1, 1);
        if region.0.is_null() {
            return;
        }
        let blur = DWM_BLURBEHIND {
            dwFlags: DWM_BB_ENABLE | DWM_BB_BLURREGION,
            fEnable: true.into(),
            hRgnBlur: region,
            fTransitionOnMaximized: false.into(),
        };
        if let Err(err) = DwmEnableBlurBehindWindow(hwnd, &blur) {
            tracing::warn!(?err, "blur-behind setup failed");
        }
        let _ = DeleteObject(region);
    }

    /// Subtracts the host toolbar rectangle from the window region so the
    /// toolbar window stays clickable while the overlay is active.
    unsafe fn exclude_toolbar_region(hwnd: HWND, toolbar: RectI) {
        let mut window_rect = RECT::default();
        if GetWindowRect(hwnd, &mut window_rect).is_err() {
            return;
        }
        let window_region = CreateRectRgn(
            window_rect.left,
            window_rect.top,
            window_rect.right,
            window_rect.bottom,
        );
        let toolbar_region =
            CreateRectRgn(toolbar.left, toolbar.top, toolbar.right, toolbar.bottom);
        if CombineRgn(window_region, window_region, toolbar_region, RGN_DIFF) != RGN_ERROR {
            // SetWindowRgn takes ownership of the combined region.
            let _ = SetWindowRgn(hwnd, window_region, true);
        } else {
            let _ = DeleteObject(window_region);
        }
        let _ = DeleteObject(toolbar_region);
    }
}
