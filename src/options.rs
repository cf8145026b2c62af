use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::model::{DialoguePosition, FillMode, PageGeometry};

pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<f32> = 8.0..=24.0;
pub const BORDER_RANGE: std::ops::RangeInclusive<f32> = 1.0..=8.0;

/// Style parameters for one render. Every field has a default, so a JSON
/// parameter file only needs the fields it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Layout template size; `None` takes one panel per image.
    pub panel_count: Option<usize>,
    pub layout_style: String,
    pub custom_layout: Option<String>,
    pub font_size: f32,
    pub border_thickness: f32,
    pub dialogue_position: DialoguePosition,
    pub frame_color: String,
    pub full_fill: bool,
    /// Per-panel bubble text; missing or blank entries get "Dialogue for image N".
    pub dialogue: Vec<String>,
    pub page: PageGeometry,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            panel_count: None,
            layout_style: "default".to_string(),
            custom_layout: None,
            font_size: 12.0,
            border_thickness: 3.0,
            dialogue_position: DialoguePosition::InsideBottom,
            frame_color: "#4A4A4A".to_string(),
            full_fill: false,
            dialogue: Vec::new(),
            page: PageGeometry::a4(),
        }
    }
}

impl RenderOptions {
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
                std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
            ),
            _ => Error::Io(e),
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reject parameters the renderer cannot honour. Returns the parsed frame color.
    pub fn validate(&self) -> Result<[u8; 3], Error> {
        if !FONT_SIZE_RANGE.contains(&self.font_size) {
            return Err(Error::Config(format!(
                "font size {} outside {}..={}",
                self.font_size,
                FONT_SIZE_RANGE.start(),
                FONT_SIZE_RANGE.end()
            )));
        }
        if !BORDER_RANGE.contains(&self.border_thickness) {
            return Err(Error::Config(format!(
                "border thickness {} outside {}..={}",
                self.border_thickness,
                BORDER_RANGE.start(),
                BORDER_RANGE.end()
            )));
        }
        let page = &self.page;
        if !(page.page_width > 0.0
            && page.page_height > 0.0
            && page.margin >= 0.0
            && page.content_width() > 0.0
            && page.content_height() > 0.0)
        {
            return Err(Error::Config(format!(
                "page {}x{} with margin {} leaves no content area",
                page.page_width, page.page_height, page.margin
            )));
        }
        parse_hex_color(&self.frame_color).ok_or_else(|| {
            Error::Config(format!(
                "frame color '{}' is not a #RRGGBB hex color",
                self.frame_color
            ))
        })
    }

    pub fn fill_mode(&self) -> FillMode {
        if self.full_fill {
            FillMode::Fill
        } else {
            FillMode::Letterbox
        }
    }

    /// Bubble text for a 1-based panel index.
    pub fn dialogue_for(&self, index: usize) -> String {
        self.dialogue
            .get(index.wrapping_sub(1))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Dialogue for image {index}"))
    }
}

/// Individual parameters given on top of a parameter file, e.g. from the
/// command line. Unset fields leave the underlying value alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionOverrides {
    pub panel_count: Option<usize>,
    pub layout_style: Option<String>,
    pub custom_layout: Option<String>,
    pub font_size: Option<f32>,
    pub border_thickness: Option<f32>,
    pub dialogue_position: Option<DialoguePosition>,
    pub frame_color: Option<String>,
    /// Only switches full fill on; a parameter file that enables it stays enabled.
    pub full_fill: bool,
    /// Replaces the whole list when non-empty.
    pub dialogue: Vec<String>,
}

impl RenderOptions {
    pub fn apply(&mut self, overrides: OptionOverrides) {
        if let Some(n) = overrides.panel_count {
            self.panel_count = Some(n);
        }
        if let Some(style) = overrides.layout_style {
            self.layout_style = style;
        }
        if overrides.custom_layout.is_some() {
            self.custom_layout = overrides.custom_layout;
        }
        if let Some(size) = overrides.font_size {
            self.font_size = size;
        }
        if let Some(border) = overrides.border_thickness {
            self.border_thickness = border;
        }
        if let Some(position) = overrides.dialogue_position {
            self.dialogue_position = position;
        }
        if let Some(color) = overrides.frame_color {
            self.frame_color = color;
        }
        if overrides.full_fill {
            self.full_fill = true;
        }
        if !overrides.dialogue.is_empty() {
            self.dialogue = overrides.dialogue;
        }
    }
}

/// `#RRGGBB` or `RRGGBB`.
pub fn parse_hex_color(val: &str) -> Option<[u8; 3]> {
    let val = val.trim();
    let hex = val.strip_prefix('#').unwrap_or(val);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}
