use serde::Deserialize;

use crate::images::DecodedImage;

/// Panel geometry as fractions of the images region, top-down origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl NormalizedRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Zero, negative or NaN extents cannot be framed.
    pub fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }
}

/// Rectangle in page units (points), origin bottom-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbsoluteRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl AbsoluteRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn inset(&self, by: f32) -> Self {
        Self {
            x: self.x + by,
            y: self.y + by,
            w: self.w - 2.0 * by,
            h: self.h - 2.0 * by,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.w > 0.0 && self.h > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
}

/// A4 in points.
pub const A4_WIDTH: f32 = 595.2756;
pub const A4_HEIGHT: f32 = 841.8898;
pub const INCH: f32 = 72.0;

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    pub const fn a4() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: 0.5 * INCH,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }

    /// Top content boundary; text flow starts here on every page.
    pub fn content_top(&self) -> f32 {
        self.page_height - self.margin
    }
}

/// Vertical slice of the content area that panels are mapped into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub margin: f32,
    pub origin_y: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePosition {
    #[serde(alias = "insideTop")]
    InsideTop,
    #[default]
    #[serde(alias = "insideBottom")]
    InsideBottom,
    #[serde(alias = "outsideBottom")]
    OutsideBottom,
}

impl std::str::FromStr for DialoguePosition {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inside_top" | "insideTop" => Ok(Self::InsideTop),
            "inside_bottom" | "insideBottom" => Ok(Self::InsideBottom),
            "outside_bottom" | "outsideBottom" => Ok(Self::OutsideBottom),
            other => Err(crate::Error::Config(format!(
                "unknown dialogue position '{other}' (expected inside_top, inside_bottom or outside_bottom)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
    /// Stretch to the inset frame, ignoring aspect ratio.
    Fill,
    /// Uniform scale to fit, centred.
    Letterbox,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub rect: AbsoluteRect,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub baseline: f32,
    pub font_size: f32,
    pub color: [u8; 3],
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text(TextLine),
    Frame {
        rect: AbsoluteRect,
        color: [u8; 3],
        line_width: f32,
    },
    /// `image` indexes `Document::images`.
    Image {
        image: usize,
        rect: AbsoluteRect,
    },
    Bubble {
        bubble: Bubble,
        stroke: [u8; 3],
        line_width: f32,
        corner_radius: f32,
        label: TextLine,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn text_lines(&self) -> impl Iterator<Item = &TextLine> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(line) => Some(line),
            _ => None,
        })
    }

    pub fn frames(&self) -> impl Iterator<Item = &AbsoluteRect> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Frame { rect, .. } => Some(rect),
            _ => None,
        })
    }

    pub fn image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    }

    pub fn bubbles(&self) -> impl Iterator<Item = &Bubble> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Bubble { bubble, .. } => Some(bubble),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PanelErrorKind {
    Image(String),
    DegenerateRect(NormalizedRect),
}

/// A panel that was skipped; the rest of the page still renders.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelError {
    /// 1-based panel index.
    pub index: usize,
    pub kind: PanelErrorKind,
}

impl std::fmt::Display for PanelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            PanelErrorKind::Image(msg) => write!(f, "panel {}: {msg}", self.index),
            PanelErrorKind::DegenerateRect(r) => write!(
                f,
                "panel {}: degenerate layout rectangle ({}, {}, {}, {})",
                self.index, r.x, r.y, r.w, r.h
            ),
        }
    }
}

pub struct Document {
    pub title: String,
    pub geometry: PageGeometry,
    /// Never empty: the comic page comes first, story pages follow.
    pub pages: Vec<Page>,
    pub images: Vec<DecodedImage>,
    pub panel_errors: Vec<PanelError>,
}

impl Document {
    /// Panels that made it onto the comic page.
    pub fn panel_count(&self) -> usize {
        self.pages.first().map_or(0, |p| p.frames().count())
    }
}
