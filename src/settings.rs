use crate::draw::model::{Color, PenState, DEFAULT_PEN_WIDTH};
use crate::draw::render::DEFAULT_BACKING_SCALE;
use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};

const MAX_BACKING_SCALE: u32 = 4;
const MAX_PEN_WIDTH: f32 = 64.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub label: String,
    pub color: Color,
}

impl PaletteEntry {
    pub fn new(label: &str, color: Color) -> Self {
        Self {
            label: label.to_string(),
            color,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PaletteEntryWire {
    label: String,
    color: String,
}

/// Entries whose color does not parse are dropped instead of failing the
/// whole settings file.
fn deserialize_palette<'de, D>(deserializer: D) -> Result<Vec<PaletteEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Vec::<PaletteEntryWire>::deserialize(deserializer)?;
    Ok(wire
        .into_iter()
        .filter_map(|entry| match Color::from_hex(&entry.color) {
            Ok(color) => Some(PaletteEntry {
                label: entry.label,
                color,
            }),
            Err(err) => {
                tracing::warn!(label = %entry.label, "palette entry skipped: {err:#}");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving a copy of the log output.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Show the welcome dialog on startup.
    #[serde(default = "default_show_intro")]
    pub show_intro: bool,
    /// Pen width in logical units.
    #[serde(default = "default_pen_width")]
    pub pen_width: f32,
    /// Backing-store pixels per logical unit.
    #[serde(default = "default_backing_scale")]
    pub backing_scale: u32,
    #[serde(default)]
    pub default_color: Color,
    #[serde(default = "default_palette", deserialize_with = "deserialize_palette")]
    pub palette: Vec<PaletteEntry>,
}

fn default_show_intro() -> bool {
    true
}

fn default_pen_width() -> f32 {
    DEFAULT_PEN_WIDTH
}

fn default_backing_scale() -> u32 {
    DEFAULT_BACKING_SCALE
}

fn default_palette() -> Vec<PaletteEntry> {
    vec![
        PaletteEntry::new("Red", Color::RED),
        PaletteEntry::new("Black", Color::BLACK),
        PaletteEntry::new("Blue", Color::BLUE),
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            show_intro: default_show_intro(),
            pen_width: default_pen_width(),
            backing_scale: default_backing_scale(),
            default_color: Color::BLACK,
            palette: default_palette(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`. A missing or empty file yields defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("deserialize settings file {path}"))?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(path, json).with_context(|| format!("write settings file {path}"))?;
        Ok(())
    }

    pub fn sanitize(&mut self) {
        if !self.pen_width.is_finite() || self.pen_width < 1.0 {
            tracing::warn!(
                "pen width {} is invalid; using {}",
                self.pen_width,
                DEFAULT_PEN_WIDTH
            );
            self.pen_width = DEFAULT_PEN_WIDTH;
        } else if self.pen_width > MAX_PEN_WIDTH {
            tracing::warn!(
                "pen width {} is too large; using {MAX_PEN_WIDTH}",
                self.pen_width
            );
            self.pen_width = MAX_PEN_WIDTH;
        }
        let clamped = self.backing_scale.clamp(1, MAX_BACKING_SCALE);
        if clamped != self.backing_scale {
            tracing::warn!(
                "backing scale {} is out of range; using {clamped}",
                self.backing_scale
            );
            self.backing_scale = clamped;
        }
        if self.palette.is_empty() {
            self.palette = default_palette();
        }
        let mut seen = Vec::with_capacity(self.palette.len());
        self.palette.retain(|entry| {
            if seen.contains(&entry.color) {
                tracing::warn!(label = %entry.label, color = %entry.color, "duplicate palette color skipped");
                return false;
            }
            seen.push(entry.color);
            true
        });
    }

    pub fn pen(&self) -> PenState {
        PenState {
            color: self.default_color,
            width: self.pen_width,
        }
    }
}
