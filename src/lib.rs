mod catalog;
mod compose;
mod error;
mod fonts;
mod images;
mod model;
mod options;
mod pdf;

pub use catalog::{
    COVERAGE_EPSILON, FALLBACK_PANEL_COUNT, LayoutCatalog, LayoutParseError, LayoutStyle,
    parse_custom_layout,
};
pub use compose::{
    BUBBLE_CORNER_RADIUS, BUBBLE_MARGIN, ComicRequest, IMAGE_AREA_FRACTION, LINE_HEIGHT_FACTOR,
    PanelPlacement, TEXT_COLOR, TITLE_HEIGHT, TextRun, compose, images_region, paginate,
    place_bubble, render_panel, to_absolute, wrap_paragraph,
};
pub use error::Error;
pub use fonts::{FontFace, FontRegistry, TextMeasure};
pub use images::{DecodedImage, ImageHandle};
pub use model::{
    AbsoluteRect, Bubble, DialoguePosition, Document, DrawOp, FillMode, NormalizedRect, Page,
    PageGeometry, PanelError, PanelErrorKind, Region, TextLine,
};
pub use options::{OptionOverrides, RenderOptions, parse_hex_color};

use std::path::Path;
use std::time::Instant;

/// What a finished render produced, for callers that only need the outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSummary {
    pub pages: usize,
    pub panels: usize,
    pub panel_errors: Vec<PanelError>,
    pub bytes: usize,
}

pub fn render_comic_bytes(
    request: &ComicRequest,
    font: &FontFace,
) -> Result<(Vec<u8>, RenderSummary), Error> {
    let t0 = Instant::now();

    let doc = compose(request, font)?;
    let t_compose = t0.elapsed();

    let bytes = pdf::render(&doc, font)?;
    let t_render = t0.elapsed();

    log::info!(
        "Timing: compose={:.1}ms, render={:.1}ms (output {} bytes)",
        t_compose.as_secs_f64() * 1000.0,
        (t_render - t_compose).as_secs_f64() * 1000.0,
        bytes.len(),
    );

    let summary = RenderSummary {
        pages: doc.pages.len(),
        panels: doc.panel_count(),
        panel_errors: doc.panel_errors,
        bytes: bytes.len(),
    };
    Ok((bytes, summary))
}

pub fn render_comic_to_pdf(
    request: &ComicRequest,
    font: &FontFace,
    output: &Path,
) -> Result<RenderSummary, Error> {
    let t0 = Instant::now();

    let (bytes, summary) = render_comic_bytes(request, font)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms ({} pages → {})",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        summary.pages,
        output.display(),
    );

    Ok(summary)
}
