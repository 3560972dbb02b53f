//! Per-frame draw decision and the Direct2D render loop.

use crate::geometry::{PointI, RectI};

/// The two named causes that can suppress drawing for one iteration,
/// evaluated from the shared cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDecision {
    pub cursor_on_screen: bool,
    pub cursor_over_toolbar: bool,
}

impl FrameDecision {
    pub fn evaluate(cursor: PointI, monitor_area: RectI, toolbar: RectI) -> Self {
        Self {
            cursor_on_screen: monitor_area.contains(cursor),
            cursor_over_toolbar: toolbar.contains(cursor),
        }
    }

    /// Drawing happens only when the cursor is on this monitor and not over
    /// the host toolbar; the toolbar stays visually on top without z-order
    /// fighting.
    pub fn should_draw(self) -> bool {
        self.cursor_on_screen && !self.cursor_over_toolbar
    }
}

/// Single cached last-state comparison for the show/hide edge. Returns the
/// new visibility when it changed, `None` otherwise.
pub fn visibility_transition(previous_on_screen: bool, on_screen_now: bool) -> Option<bool> {
    (previous_on_screen != on_screen_now).then_some(on_screen_now)
}

#[cfg(windows)]
pub use platform::{D2dState, OverlayLoop, PaletteBrushes};

#[cfg(windows)]
mod platform {
    use super::{visibility_transition, FrameDecision};
    use crate::colors::{OverlayColor, OverlayPalette};
    use crate::geometry::RectI;
    use crate::overlay::events::WM_MONITOR_CHANGED;
    use crate::state::CommonState;
    use anyhow::Context;
    use std::sync::Arc;
    use std::time::Duration;
    use windows::Win32::Foundation::{LPARAM, WPARAM};
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Direct2D::Common::{
        D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_PIXEL_FORMAT, D2D_SIZE_U,
    };
    use windows::Win32::Graphics::Direct2D::{
        D2D1CreateFactory, ID2D1Factory, ID2D1HwndRenderTarget, ID2D1SolidColorBrush,
        D2D1_FACTORY_TYPE_SINGLE_THREADED, D2D1_HWND_RENDER_TARGET_PROPERTIES,
        D2D1_PRESENT_OPTIONS_NONE, D2D1_RENDER_TARGET_PROPERTIES,
    };
    use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_B8G8R8A8_UNORM;
    use windows::Win32::Graphics::Gdi::InvalidateRect;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetClientRect, IsWindow, MsgWaitForMultipleObjects, PeekMessageW,
        PostMessageW, ShowWindow, TranslateMessage, MSG, PM_REMOVE, QS_ALLINPUT, SW_HIDE, SW_SHOW,
    };

    fn color_f(color: OverlayColor) -> D2D1_COLOR_F {
        D2D1_COLOR_F {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }

    /// Solid brushes pre-created for the session palette.
    pub struct PaletteBrushes {
        pub line: ID2D1SolidColorBrush,
        pub foreground: ID2D1SolidColorBrush,
        pub background: ID2D1SolidColorBrush,
        pub border: ID2D1SolidColorBrush,
    }

    /// Per-window Direct2D device state: the HWND render target plus the
    /// palette brushes the tick callbacks draw with.
    pub struct D2dState {
        pub rt: ID2D1HwndRenderTarget,
        pub brushes: PaletteBrushes,
        _factory: ID2D1Factory,
    }

    impl D2dState {
        pub fn new(hwnd: HWND, palette: OverlayPalette) -> anyhow::Result<Self> {
            unsafe {
                let factory: ID2D1Factory =
                    D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None)
                        .context("creating Direct2D factory")?;

                let mut client = windows::Win32::Foundation::RECT::default();
                GetClientRect(hwnd, &mut client).context("querying overlay client area")?;
                let hwnd_properties = D2D1_HWND_RENDER_TARGET_PROPERTIES {
                    hwnd,
                    pixelSize: D2D_SIZE_U {
                        width: (client.right - client.left) as u32,
                        height: (client.bottom - client.top) as u32,
                    },
                    presentOptions: D2D1_PRESENT_OPTIONS_NONE,
                };
                let properties = D2D1_RENDER_TARGET_PROPERTIES {
                    pixelFormat: D2D1_PIXEL_FORMAT {
                        format: DXGI_FORMAT_B8G8R8A8_UNORM,
                        alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
                    },
                    ..Default::default()
                };
                let rt = factory
                    .CreateHwndRenderTarget(&properties, &hwnd_properties)
                    .context("creating overlay render target")?;

                let brushes = PaletteBrushes {
                    line: rt.CreateSolidColorBrush(&color_f(palette.line), None)?,
                    foreground: rt.CreateSolidColorBrush(&color_f(palette.foreground), None)?,
                    background: rt.CreateSolidColorBrush(&color_f(palette.background), None)?,
                    border: rt.CreateSolidColorBrush(&color_f(palette.border), None)?,
                };

                Ok(Self {
                    rt,
                    brushes,
                    _factory: factory,
                })
            }
        }
    }

    /// Owns the render target for one overlay window and drives its frame
    /// loop on the dedicated UI thread.
    pub struct OverlayLoop {
        hwnd: HWND,
        d2d: D2dState,
        common: Arc<CommonState>,
        monitor_area: RectI,
        toolbar: RectI,
        cursor_on_screen: bool,
        tick: Box<dyn FnMut(HWND, &D2dState)>,
    }

    impl OverlayLoop {
        pub fn new(
            hwnd: HWND,
            d2d: D2dState,
            common: Arc<CommonState>,
            monitor_area: RectI,
            tick: Box<dyn FnMut(HWND, &D2dState)>,
        ) -> Self {
            let toolbar = common.toolbar_bounding_box;
            Self {
                hwnd,
                d2d,
                common,
                monitor_area,
                toolbar,
                cursor_on_screen: true,
                tick,
            }
        }

        /// Runs until the window is destroyed; that window-validity poll is
        /// the loop's sole termination condition.
        pub fn run(&mut self) {
            const TRANSPARENT: D2D1_COLOR_F = D2D1_COLOR_F {
                r: 1.0,
                g: 1.0,
                b: 1.0,
                a: 0.0,
            };

            while unsafe { IsWindow(self.hwnd) }.as_bool() {
                unsafe {
                    self.d2d.rt.BeginDraw();
                    self.d2d.rt.Clear(Some(&TRANSPARENT));
                }

                let cursor = self.common.cursor_pos();
                let decision = FrameDecision::evaluate(cursor, self.monitor_area, self.toolbar);
                if decision.should_draw() {
                    let tick = &mut self.tick;
                    tick(self.hwnd, &self.d2d);
                }

                // End the pass even on no-draw iterations; the compositor
                // pacing relies on the begin/end pair every frame.
                if let Err(err) = unsafe { self.d2d.rt.EndDraw(None, None) } {
                    tracing::debug!(?err, "overlay end-draw failed; continuing");
                }

                if decision.should_draw() {
                    unsafe {
                        let _ = InvalidateRect(self.hwnd, None, true);
                    }
                }

                if let Some(on_screen) =
                    visibility_transition(self.cursor_on_screen, decision.cursor_on_screen)
                {
                    self.cursor_on_screen = on_screen;
                    unsafe {
                        let _ =
                            PostMessageW(self.hwnd, WM_MONITOR_CHANGED, WPARAM(0), LPARAM(0));
                        let _ = ShowWindow(self.hwnd, if on_screen { SW_SHOW } else { SW_HIDE });
                    }
                }

                // Bounded wait doubles as the frame governor: with no input
                // the loop still re-polls the cursor at this cadence.
                pump_messages(Duration::from_millis(1));
            }
        }
    }

    fn pump_messages(timeout: Duration) {
        unsafe {
            let _ = MsgWaitForMultipleObjects(None, false, timeout.as_millis() as u32, QS_ALLINPUT);
            let mut msg = MSG::default();
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{visibility_transition, FrameDecision};
    use crate::geometry::{PointI, RectI};

    const MONITOR: RectI = RectI::new(0, 0, 1920, 1080);
    const TOOLBAR: RectI = RectI::new(760, 0, 1160, 48);

    #[test]
    fn off_screen_cursor_suppresses_drawing() {
        let decision = FrameDecision::evaluate(PointI::new(-5, 200), MONITOR, TOOLBAR);
        assert!(!decision.cursor_on_screen);
        assert!(!decision.cursor_over_toolbar);
        assert!(!decision.should_draw());
    }

    #[test]
    fn toolbar_hover_suppresses_drawing_even_on_screen() {
        let decision = FrameDecision::evaluate(PointI::new(800, 20), MONITOR, TOOLBAR);
        assert!(decision.cursor_on_screen);
        assert!(decision.cursor_over_toolbar);
        assert!(!decision.should_draw());
    }

    #[test]
    fn plain_on_screen_cursor_draws() {
        let decision = FrameDecision::evaluate(PointI::new(300, 600), MONITOR, TOOLBAR);
        assert!(decision.should_draw());
    }

    #[test]
    fn visibility_transitions_only_on_edges() {
        assert_eq!(visibility_transition(true, true), None);
        assert_eq!(visibility_transition(false, false), None);
        assert_eq!(visibility_transition(true, false), Some(false));
        assert_eq!(visibility_transition(false, true), Some(true));
    }
}
