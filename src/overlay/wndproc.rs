//! Raw window procedures for the two overlay classes.
//!
//! Each procedure owns the Win32 plumbing only: context storage on the
//! window, message-to-event translation and response application. Tool
//! behavior lives in [`crate::overlay::events`].

use crate::clipboard;
use crate::geometry::{PointF, PointI};
use crate::overlay::events::{
    self, EventResponse, OverlayEvent, WM_MONITOR_CHANGED,
};
use crate::overlay::window::WindowContext;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::Graphics::Gdi::ScreenToClient;
use windows::Win32::UI::Input::KeyboardAndMouse::VK_ESCAPE;
use windows::Win32::UI::WindowsAndMessaging::{
    DefWindowProcW, DestroyWindow, GetWindowLongPtrW, PostMessageW, SetWindowLongPtrW, ShowCursor,
    CREATESTRUCTW, GWLP_USERDATA, WM_CLOSE, WM_CREATE, WM_ERASEBKGND, WM_KEYUP, WM_LBUTTONDOWN,
    WM_LBUTTONUP, WM_NCDESTROY, WM_RBUTTONUP,
};

pub(crate) extern "system" fn measure_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_CREATE => {
            let context = unsafe { store_context(hwnd, lparam) };
            if let Some(WindowContext::Measure(common)) = context {
                if !common.debug_overlay {
                    // The tool draws its own crosshair; drive the display
                    // count below zero so re-entry cannot flash the cursor.
                    while unsafe { ShowCursor(false) } > 0 {}
                }
            }
            LRESULT(0)
        }
        WM_NCDESTROY => {
            unsafe { release_context(hwnd) };
            unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
        }
        _ => {
            let Some(WindowContext::Measure(common)) = (unsafe { context(hwnd) }) else {
                return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
            };
            let Some(event) = translate_event(msg, wparam) else {
                return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
            };
            let response =
                events::handle_measure_event(common, event, &mut |text| clipboard::set_text(text));
            apply_response(hwnd, msg, wparam, lparam, response)
        }
    }
}

pub(crate) extern "system" fn bounds_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_CREATE => {
            unsafe { store_context(hwnd, lparam) };
            LRESULT(0)
        }
        WM_NCDESTROY => {
            unsafe { release_context(hwnd) };
            unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
        }
        _ => {
            let Some(WindowContext::Bounds(tool)) = (unsafe { context(hwnd) }) else {
                return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
            };
            // The press must come from the shared cursor position, which an
            // external driver feeds; the OS cursor may lag or differ.
            let event = match msg {
                WM_LBUTTONDOWN => {
                    events::press_event(&tool.common, |screen| screen_to_client(hwnd, screen))
                }
                _ => translate_event(msg, wparam),
            };
            let Some(event) = event else {
                return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
            };
            let response =
                events::handle_bounds_event(tool, event, &mut |text| clipboard::set_text(text));
            apply_response(hwnd, msg, wparam, lparam, response)
        }
    }
}

/// Moves the boxed [`WindowContext`] out of `lpCreateParams` into the
/// window's user data and returns a borrow of it for creation-time setup.
unsafe fn store_context<'a>(hwnd: HWND, lparam: LPARAM) -> Option<&'a WindowContext> {
    let create = lparam.0 as *const CREATESTRUCTW;
    if create.is_null() {
        return None;
    }
    let context = (*create).lpCreateParams as *mut WindowContext;
    if context.is_null() {
        return None;
    }
    SetWindowLongPtrW(hwnd, GWLP_USERDATA, context as isize);
    Some(&*context)
}

unsafe fn context<'a>(hwnd: HWND) -> Option<&'a WindowContext> {
    let context = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowContext;
    if context.is_null() {
        None
    } else {
        Some(&*context)
    }
}

/// Reclaims and drops the boxed context stored at creation. Runs on
/// WM_NCDESTROY so no further messages can observe the dangling pointer.
unsafe fn release_context(hwnd: HWND) {
    let context = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut WindowContext;
    if !context.is_null() {
        drop(Box::from_raw(context));
    }
}

fn translate_event(msg: u32, wparam: WPARAM) -> Option<OverlayEvent> {
    match msg {
        WM_CLOSE => Some(OverlayEvent::CloseRequested),
        WM_KEYUP if wparam.0 as u16 == VK_ESCAPE.0 => Some(OverlayEvent::EscapeReleased),
        WM_LBUTTONUP => Some(OverlayEvent::LeftButtonUp),
        WM_RBUTTONUP => Some(OverlayEvent::RightButtonUp),
        WM_MONITOR_CHANGED => Some(OverlayEvent::MonitorChanged),
        WM_ERASEBKGND => Some(OverlayEvent::EraseBackground),
        _ => None,
    }
}

fn screen_to_client(hwnd: HWND, screen: PointI) -> Option<PointF> {
    let mut point = POINT {
        x: screen.x,
        y: screen.y,
    };
    if !unsafe { ScreenToClient(hwnd, &mut point) }.as_bool() {
        return None;
    }
    Some(PointF::new(point.x as f32, point.y as f32))
}

fn apply_response(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    response: EventResponse,
) -> LRESULT {
    match response {
        EventResponse::Unhandled | EventResponse::Handled => unsafe {
            DefWindowProcW(hwnd, msg, wparam, lparam)
        },
        EventResponse::SuppressErase => LRESULT(1),
        EventResponse::RequestClose => unsafe {
            if let Err(err) = PostMessageW(hwnd, WM_CLOSE, WPARAM(0), LPARAM(0)) {
                tracing::warn!(?err, "failed to post overlay close request");
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        },
        EventResponse::Destroy => unsafe {
            if let Err(err) = DestroyWindow(hwnd) {
                tracing::warn!(?err, "failed to destroy overlay window");
            }
            LRESULT(0)
        },
    }
}
