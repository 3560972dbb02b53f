//! Physical display descriptors and their Windows enumeration.

use crate::geometry::{PointI, RectI};

/// Immutable descriptor of one physical display, queried once at overlay
/// creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Full monitor rectangle in virtual-screen coordinates.
    pub screen: RectI,
    /// Work area, excluding the taskbar and other appbars.
    pub work: RectI,
    pub is_primary: bool,
}

pub fn primary(monitors: &[MonitorInfo]) -> Option<MonitorInfo> {
    monitors
        .iter()
        .copied()
        .find(|monitor| monitor.is_primary)
        .or_else(|| monitors.first().copied())
}

#[cfg(windows)]
pub fn enumerate() -> Vec<MonitorInfo> {
    use std::mem;
    use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
    use windows::Win32::Graphics::Gdi::{
        EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW, MONITORINFOF_PRIMARY,
    };

    extern "system" fn monitor_enum_proc(
        monitor: HMONITOR,
        _hdc: HDC,
        _rc_clip: *mut RECT,
        data: LPARAM,
    ) -> BOOL {
        let monitors = unsafe { &mut *(data.0 as *mut Vec<MonitorInfo>) };
        let mut info = MONITORINFOEXW::default();
        info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
        if unsafe { GetMonitorInfoW(monitor, &mut info.monitorInfo as *mut _ as *mut _) }.as_bool()
        {
            let screen = info.monitorInfo.rcMonitor;
            let work = info.monitorInfo.rcWork;
            monitors.push(MonitorInfo {
                screen: RectI::new(screen.left, screen.top, screen.right, screen.bottom),
                work: RectI::new(work.left, work.top, work.right, work.bottom),
                is_primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
            });
        }
        BOOL(1)
    }

    let mut monitors = Vec::new();
    unsafe {
        let _ = EnumDisplayMonitors(
            HDC::default(),
            None,
            Some(monitor_enum_proc),
            LPARAM(&mut monitors as *mut Vec<MonitorInfo> as isize),
        );
    }
    monitors
}

#[cfg(not(windows))]
pub fn enumerate() -> Vec<MonitorInfo> {
    Vec::new()
}

#[cfg(windows)]
pub fn cursor_position() -> Option<PointI> {
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

    let mut point = POINT::default();
    if unsafe { GetCursorPos(&mut point) }.is_ok() {
        Some(PointI::new(point.x, point.y))
    } else {
        None
    }
}

#[cfg(not(windows))]
pub fn cursor_position() -> Option<PointI> {
    None
}

#[cfg(test)]
mod tests {
    use super::{primary, MonitorInfo};
    use crate::geometry::RectI;

    fn two_monitors() -> [MonitorInfo; 2] {
        [
            MonitorInfo {
                screen: RectI::from_xywh(-1920, 0, 1920, 1080),
                work: RectI::from_xywh(-1920, 0, 1920, 1040),
                is_primary: false,
            },
            MonitorInfo {
                screen: RectI::from_xywh(0, 0, 2560, 1440),
                work: RectI::from_xywh(0, 0, 2560, 1400),
                is_primary: true,
            },
        ]
    }

    #[test]
    fn primary_prefers_the_flagged_monitor_then_falls_back() {
        let monitors = two_monitors();
        assert_eq!(primary(&monitors), Some(monitors[1]));

        let unflagged = [MonitorInfo {
            is_primary: false,
            ..monitors[0]
        }];
        assert_eq!(primary(&unflagged), Some(unflagged[0]));
        assert_eq!(primary(&[]), None);
    }
}
