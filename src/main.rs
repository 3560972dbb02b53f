//! Demo driver: spawns one overlay per monitor and feeds it the cursor.
//!
//! Run with `measure` (default) for the crosshair tool or `bounds` for the
//! drag-to-select tool. Escape or right-click closes the session.

use screen_ruler::logging;
use screen_ruler::settings::Settings;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("screen-ruler.json")?;
    logging::init(settings.debug_logging);
    run(settings)
}

#[cfg(windows)]
fn run(settings: Settings) -> anyhow::Result<()> {
    use anyhow::bail;
    use screen_ruler::geometry::RectI;
    use screen_ruler::monitor::{self, MonitorInfo};
    use screen_ruler::overlay::lifecycle::OverlayUi;
    use screen_ruler::overlay::render::D2dState;
    use screen_ruler::overlay::window::OverlayClassRegistry;
    use screen_ruler::state::{BoundsToolState, CommonState, MeasureToolState};
    use std::sync::{mpsc, Arc};
    use std::time::Duration;
    use windows::Win32::Graphics::Direct2D::Common::{D2D_POINT_2F, D2D_RECT_F};

    let monitors = monitor::enumerate();
    if monitors.is_empty() {
        bail!("no monitors found");
    }

    let (done_tx, done_rx) = mpsc::channel::<()>();
    let common = Arc::new(CommonState::new(
        RectI::default(),
        settings.line_color(),
        settings.debug_overlay,
        Box::new(move || {
            let _ = done_tx.send(());
        }),
    ));
    let registry = Arc::new(OverlayClassRegistry::new());

    let bounds_mode = std::env::args().nth(1).as_deref() == Some("bounds");
    tracing::info!(
        monitors = monitors.len(),
        tool = if bounds_mode { "bounds" } else { "measure" },
        "starting overlay session"
    );

    let mut overlays = Vec::with_capacity(monitors.len());
    if bounds_mode {
        let tool = Arc::new(BoundsToolState::new(Arc::clone(&common)));
        for monitor in &monitors {
            let origin = monitor.screen;
            overlays.push(OverlayUi::create_bounds(
                Arc::clone(&tool),
                *monitor,
                Arc::clone(&registry),
                Box::new(move |tool: &BoundsToolState, _hwnd, d2d: &D2dState| {
                    let Some(start) = tool.region_start() else {
                        return;
                    };
                    let cursor = tool.common.cursor_pos();
                    let end_x = (cursor.x - origin.left) as f32;
                    let end_y = (cursor.y - origin.top) as f32;
                    let rect = D2D_RECT_F {
                        left: start.x.min(end_x),
                        top: start.y.min(end_y),
                        right: start.x.max(end_x),
                        bottom: start.y.max(end_y),
                    };
                    unsafe {
                        d2d.rt.DrawRectangle(&rect, &d2d.brushes.line, 1.0, None);
                    }
                    tool.common.overlay_box_text.set(&format!(
                        "{} × {}",
                        (rect.right - rect.left).round() as i32,
                        (rect.bottom - rect.top).round() as i32,
                    ));
                }),
            )?);
        }
    } else {
        let tool = Arc::new(MeasureToolState::new());
        for monitor in &monitors {
            let area: MonitorInfo = *monitor;
            overlays.push(OverlayUi::create_measure(
                Arc::clone(&common),
                Arc::clone(&tool),
                *monitor,
                Arc::clone(&registry),
                Box::new(move |common: &CommonState, _tool, _hwnd, d2d: &D2dState| {
                    let cursor = common.cursor_pos();
                    let x = (cursor.x - area.screen.left) as f32;
                    let y = (cursor.y - area.screen.top) as f32;
                    let width = area.screen.width() as f32;
                    let height = area.screen.height() as f32;
                    unsafe {
                        d2d.rt.DrawLine(
                            D2D_POINT_2F { x: 0.0, y },
                            D2D_POINT_2F { x: width, y },
                            &d2d.brushes.line,
                            1.0,
                            None,
                        );
                        d2d.rt.DrawLine(
                            D2D_POINT_2F { x, y: 0.0 },
                            D2D_POINT_2F { x, y: height },
                            &d2d.brushes.line,
                            1.0,
                            None,
                        );
                    }
                    common
                        .overlay_box_text
                        .set(&format!("{} × {}", cursor.x, cursor.y));
                }),
            )?);
        }
    }

    for overlay in &overlays {
        tracing::debug!(hwnd = overlay.hwnd(), "overlay window ready");
    }

    // Single writer for the shared cursor position; the overlay threads
    // only read it.
    loop {
        match done_rx.try_recv() {
            Ok(()) | Err(mpsc::TryRecvError::Disconnected) => break,
            Err(mpsc::TryRecvError::Empty) => {}
        }
        if overlays.iter().all(|overlay| !overlay.is_window_alive()) {
            tracing::warn!("all overlay windows gone without a completion signal");
            break;
        }
        if let Some(pos) = monitor::cursor_position() {
            common.set_cursor_pos(pos);
        }
        std::thread::sleep(Duration::from_millis(4));
    }

    drop(overlays);
    tracing::info!("overlay session finished");
    Ok(())
}

#[cfg(not(windows))]
fn run(_settings: Settings) -> anyhow::Result<()> {
    anyhow::bail!("the overlay demo only runs on Windows")
}
