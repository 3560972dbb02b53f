//! Overlay palette derived from the configured line color and system theme.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl OverlayColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Colors the render loop pre-allocates brushes for, in draw-priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPalette {
    pub line: OverlayColor,
    pub foreground: OverlayColor,
    pub background: OverlayColor,
    pub border: OverlayColor,
}

pub fn overlay_palette(line: OverlayColor, dark_mode: bool) -> OverlayPalette {
    if dark_mode {
        OverlayPalette {
            line,
            foreground: OverlayColor::opaque(1.0, 1.0, 1.0),
            background: OverlayColor::opaque(0.17, 0.17, 0.17),
            border: OverlayColor::new(0.44, 0.44, 0.44, 0.4),
        }
    } else {
        OverlayPalette {
            line,
            foreground: OverlayColor::opaque(0.0, 0.0, 0.0),
            background: OverlayColor::opaque(0.96, 0.96, 0.96),
            border: OverlayColor::new(0.44, 0.44, 0.44, 0.4),
        }
    }
}

/// Best-effort system theme probe; an unreadable theme counts as light.
pub fn system_dark_mode() -> bool {
    matches!(dark_light::detect(), Ok(dark_light::Mode::Dark))
}
