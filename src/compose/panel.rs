use crate::model::{AbsoluteRect, FillMode};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelPlacement {
    pub frame: AbsoluteRect,
    pub image_rect: AbsoluteRect,
}

/// Frame and image placement for one panel.
///
/// The image is inset by half the stroke so the border's centreline sits on
/// the panel edge. In letterbox mode the image keeps its aspect ratio and is
/// centred in the inset area.
pub fn render_panel(
    abs_rect: AbsoluteRect,
    pixel_size: (u32, u32),
    border_thickness: f32,
    fill: FillMode,
) -> PanelPlacement {
    let inner = abs_rect.inset(border_thickness / 2.0);
    let image_rect = match fill {
        FillMode::Fill => inner,
        FillMode::Letterbox => letterbox(inner, pixel_size),
    };
    PanelPlacement {
        frame: abs_rect,
        image_rect,
    }
}

fn letterbox(area: AbsoluteRect, (pw, ph): (u32, u32)) -> AbsoluteRect {
    if !area.is_drawable() || pw == 0 || ph == 0 {
        return area;
    }
    let scale = f32::min(area.w / pw as f32, area.h / ph as f32);
    let w = pw as f32 * scale;
    let h = ph as f32 * scale;
    AbsoluteRect {
        x: area.x + (area.w - w) / 2.0,
        y: area.y + (area.h - h) / 2.0,
        w,
        h,
    }
}
