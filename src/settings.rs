use crate::colors::OverlayColor;
use serde::{Deserialize, Serialize};

fn default_line_color() -> [f32; 4] {
    // Matches the stock measurement accent color.
    [1.0, 0.4, 0.0, 1.0]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Keep the system cursor visible and skip topmost pinning so the
    /// overlay windows can be inspected with other tooling on top.
    #[serde(default)]
    pub debug_overlay: bool,
    /// Measurement line color as RGBA components in `0.0..=1.0`.
    #[serde(default = "default_line_color")]
    pub line_color: [f32; 4],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            debug_overlay: false,
            line_color: default_line_color(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn line_color(&self) -> OverlayColor {
        let [r, g, b, a] = self.line_color;
        OverlayColor::new(r, g, b, a)
    }
}
