use pdf_writer::{Content, Name, Str};

use crate::fonts::EmbeddedFont;
use crate::model::{AbsoluteRect, Bubble, TextLine};

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

fn rgb(color: [u8; 3]) -> (f32, f32, f32) {
    (
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    )
}

pub(super) fn draw_frame(
    content: &mut Content,
    rect: &AbsoluteRect,
    color: [u8; 3],
    line_width: f32,
) {
    let (r, g, b) = rgb(color);
    content.save_state();
    content.set_stroke_rgb(r, g, b);
    content.set_line_width(line_width);
    content.rect(rect.x, rect.y, rect.w, rect.h);
    content.stroke();
    content.restore_state();
}

pub(super) fn draw_image(content: &mut Content, rect: &AbsoluteRect, pdf_name: &str) {
    content.save_state();
    content.transform([rect.w, 0.0, 0.0, rect.h, rect.x, rect.y]);
    content.x_object(Name(pdf_name.as_bytes()));
    content.restore_state();
}

pub(super) fn draw_text(content: &mut Content, line: &TextLine, font: &EmbeddedFont) {
    let (r, g, b) = rgb(line.color);
    content.set_fill_rgb(r, g, b);
    content.begin_text();
    content.set_font(Name(font.pdf_name.as_bytes()), line.font_size);
    content.next_line(line.x, line.baseline);
    content.show(Str(&font.encode(&line.text)));
    content.end_text();
}

fn round_rect_path(content: &mut Content, rect: &AbsoluteRect, radius: f32) {
    let rad = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
    let k = rad * KAPPA;
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.x + rect.w, rect.y + rect.h);

    content.move_to(x0 + rad, y0);
    content.line_to(x1 - rad, y0);
    content.cubic_to(x1 - rad + k, y0, x1, y0 + rad - k, x1, y0 + rad);
    content.line_to(x1, y1 - rad);
    content.cubic_to(x1, y1 - rad + k, x1 - rad + k, y1, x1 - rad, y1);
    content.line_to(x0 + rad, y1);
    content.cubic_to(x0 + rad - k, y1, x0, y1 - rad + k, x0, y1 - rad);
    content.line_to(x0, y0 + rad);
    content.cubic_to(x0, y0 + rad - k, x0 + rad - k, y0, x0 + rad, y0);
    content.close_path();
}

/// White rounded box stroked in the frame color, with its label clipped to the box.
pub(super) fn draw_bubble(
    content: &mut Content,
    bubble: &Bubble,
    stroke: [u8; 3],
    line_width: f32,
    corner_radius: f32,
    label: &TextLine,
    font: &EmbeddedFont,
) {
    if !bubble.rect.is_drawable() {
        return;
    }
    let (r, g, b) = rgb(stroke);
    content.save_state();
    content.set_fill_rgb(1.0, 1.0, 1.0);
    content.set_stroke_rgb(r, g, b);
    content.set_line_width(line_width);
    round_rect_path(content, &bubble.rect, corner_radius);
    content.fill_nonzero_and_stroke();

    let rect = &bubble.rect;
    content.rect(rect.x, rect.y, rect.w, rect.h);
    content.clip_nonzero();
    content.end_path();
    draw_text(content, label, font);
    content.restore_state();
}
