use crate::model::{AbsoluteRect, NormalizedRect, PageGeometry, Region};

/// Reserved above the panels for the title.
pub const TITLE_HEIGHT: f32 = 72.0;

/// Share of the content height given to panels.
pub const IMAGE_AREA_FRACTION: f32 = 0.6;

/// Map a top-down normalized rectangle into bottom-up page coordinates.
pub fn to_absolute(rect: &NormalizedRect, region: &Region, content_width: f32) -> AbsoluteRect {
    AbsoluteRect {
        x: region.margin + rect.x * content_width,
        y: region.origin_y + (1.0 - rect.y - rect.h) * region.height,
        w: rect.w * content_width,
        h: rect.h * region.height,
    }
}

/// The panel band of the comic page, directly under the title.
pub fn images_region(geometry: &PageGeometry) -> Region {
    let height = geometry.content_height() * IMAGE_AREA_FRACTION;
    Region {
        margin: geometry.margin,
        origin_y: geometry.page_height - geometry.margin - TITLE_HEIGHT - height,
        height,
    }
}
