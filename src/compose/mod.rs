mod bubble;
mod flow;
mod geometry;
mod panel;

pub use bubble::{BUBBLE_CORNER_RADIUS, BUBBLE_MARGIN, place_bubble};
pub use flow::{LINE_HEIGHT_FACTOR, TEXT_COLOR, TextRun, paginate, wrap_paragraph};
pub use geometry::{IMAGE_AREA_FRACTION, TITLE_HEIGHT, images_region, to_absolute};
pub use panel::{PanelPlacement, render_panel};

use crate::catalog::LayoutCatalog;
use crate::error::Error;
use crate::fonts::TextMeasure;
use crate::images::ImageHandle;
use crate::model::{Document, DrawOp, Page, PanelError, PanelErrorKind, TextLine};
use crate::options::RenderOptions;

/// Title size relative to the body font size.
const TITLE_SIZE_BOOST: f32 = 8.0;

/// Everything one render needs from upstream.
pub struct ComicRequest {
    pub title: String,
    pub story: String,
    pub images: Vec<ImageHandle>,
    pub options: RenderOptions,
}

/// Lay out the comic page and the story pages.
///
/// Configuration errors abort before anything is placed. A panel whose
/// rectangle is degenerate or whose image cannot be decoded is skipped and
/// recorded in `Document::panel_errors`. Images beyond the layout's slot
/// count, and slots beyond the image count, are dropped.
pub fn compose(request: &ComicRequest, measure: &dyn TextMeasure) -> Result<Document, Error> {
    let t0 = std::time::Instant::now();
    let opts = &request.options;
    let frame_color = opts.validate()?;

    let story = TextRun::from_story(&request.story);
    if story.is_blank() && request.images.is_empty() {
        return Err(Error::EmptyInput("no story text and no images".into()));
    }

    let panel_count = opts.panel_count.unwrap_or(request.images.len());
    let layout = LayoutCatalog::builtin().resolve(
        panel_count,
        &opts.layout_style,
        opts.custom_layout.as_deref(),
    )?;

    let geometry = opts.page;
    let region = images_region(&geometry);
    let content_width = geometry.content_width();
    let fill = opts.fill_mode();

    let mut comic = Page::default();
    let title_size = opts.font_size + TITLE_SIZE_BOOST;
    let title_width = measure.text_width(&request.title, title_size);
    comic.ops.push(DrawOp::Text(TextLine {
        x: geometry.page_width / 2.0 - title_width / 2.0,
        baseline: geometry.page_height - geometry.margin,
        font_size: title_size,
        color: TEXT_COLOR,
        text: request.title.clone(),
    }));

    let mut images = Vec::new();
    let mut panel_errors = Vec::new();

    if request.images.len() != layout.len() {
        log::debug!(
            "{} images for {} layout slots; rendering {}",
            request.images.len(),
            layout.len(),
            request.images.len().min(layout.len())
        );
    }

    for (i, (handle, rect)) in request.images.iter().zip(layout.iter()).enumerate() {
        let index = i + 1;
        if rect.is_degenerate() {
            log::warn!("Skipping panel {index}: degenerate rectangle {rect:?}");
            panel_errors.push(PanelError {
                index,
                kind: PanelErrorKind::DegenerateRect(*rect),
            });
            continue;
        }
        let decoded = match handle.decode() {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Skipping panel {index}: {e}");
                panel_errors.push(PanelError {
                    index,
                    kind: PanelErrorKind::Image(e.to_string()),
                });
                continue;
            }
        };

        let abs = to_absolute(rect, &region, content_width);
        let placement = render_panel(
            abs,
            (decoded.pixel_width, decoded.pixel_height),
            opts.border_thickness,
            fill,
        );
        log::debug!("Panel {index}: frame {:?}, image {:?}", placement.frame, placement.image_rect);

        comic.ops.push(DrawOp::Frame {
            rect: placement.frame,
            color: frame_color,
            line_width: opts.border_thickness,
        });
        if placement.image_rect.is_drawable() {
            comic.ops.push(DrawOp::Image {
                image: images.len(),
                rect: placement.image_rect,
            });
            images.push(decoded);
        } else {
            log::warn!("Panel {index} is too small for its border; drawing the frame only");
        }

        let text = opts.dialogue_for(index);
        let bubble = place_bubble(
            &placement.frame,
            &text,
            opts.font_size,
            opts.dialogue_position,
            opts.border_thickness,
            measure,
        );
        let text_width = measure.text_width(&text, opts.font_size);
        let label = TextLine {
            x: bubble.rect.x + bubble.rect.w / 2.0 - text_width / 2.0,
            baseline: bubble.rect.y + BUBBLE_MARGIN,
            font_size: opts.font_size,
            color: TEXT_COLOR,
            text,
        };
        comic.ops.push(DrawOp::Bubble {
            bubble,
            stroke: frame_color,
            line_width: opts.border_thickness,
            corner_radius: BUBBLE_CORNER_RADIUS,
            label,
        });
    }

    let rendered = comic.frames().count();
    if rendered == 0 && story.is_blank() {
        return Err(Error::EmptyInput(format!(
            "story is empty and none of the {} panels could be rendered",
            panel_errors.len()
        )));
    }

    let mut pages = vec![comic];
    pages.extend(paginate(&story, &geometry, opts.font_size, measure));

    log::info!(
        "Composed {} pages: {} panels, {} skipped, {:.1}ms",
        pages.len(),
        rendered,
        panel_errors.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Document {
        title: request.title.clone(),
        geometry,
        pages,
        images,
        panel_errors,
    })
}
