use crate::fonts::TextMeasure;
use crate::model::{AbsoluteRect, Bubble, DialoguePosition};

/// Padding between bubble edge and text, and between bubble and panel sides.
pub const BUBBLE_MARGIN: f32 = 10.0;

pub const BUBBLE_CORNER_RADIUS: f32 = 5.0;

/// Size a speech bubble for `text` and place it relative to `panel_frame`.
///
/// Width is capped at the panel width minus margins; text longer than that
/// is clipped when drawn, not wrapped. `OutsideBottom` may overlap a panel
/// placed directly below.
pub fn place_bubble(
    panel_frame: &AbsoluteRect,
    text: &str,
    font_size: f32,
    position: DialoguePosition,
    border_thickness: f32,
    measure: &dyn TextMeasure,
) -> Bubble {
    let text_width = measure.text_width(text, font_size);
    let w = f32::min(
        text_width + 2.0 * BUBBLE_MARGIN,
        panel_frame.w - 2.0 * BUBBLE_MARGIN,
    );
    let h = font_size + 2.0 * BUBBLE_MARGIN;
    let x = panel_frame.x + panel_frame.w / 2.0 - w / 2.0;
    let y = match position {
        DialoguePosition::InsideBottom => panel_frame.y + h + border_thickness,
        DialoguePosition::OutsideBottom => panel_frame.y - h,
        DialoguePosition::InsideTop => panel_frame.y + panel_frame.h - h - border_thickness,
    };
    Bubble {
        rect: AbsoluteRect::new(x, y, w, h),
        text: text.to_string(),
    }
}
