mod common;

use common::{FixedWidth, approx_eq};
use comicpage_pdf::{
    AbsoluteRect, BUBBLE_MARGIN, DialoguePosition, FillMode, IMAGE_AREA_FRACTION, NormalizedRect,
    PageGeometry, Region, TITLE_HEIGHT, images_region, place_bubble, render_panel, to_absolute,
};

const M: f32 = 36.0;
const W: f32 = 500.0;
const H: f32 = 400.0;

fn region(origin_y: f32) -> Region {
    Region {
        margin: M,
        origin_y,
        height: H,
    }
}

#[test]
fn full_bleed_rect_maps_to_whole_region() {
    let abs = to_absolute(&NormalizedRect::new(0.0, 0.0, 1.0, 1.0), &region(0.0), W);
    assert_eq!(abs, AbsoluteRect::new(M, 0.0, W, H));
}

#[test]
fn top_half_lands_in_upper_half() {
    let origin = 120.0;
    let abs = to_absolute(&NormalizedRect::new(0.0, 0.0, 1.0, 0.5), &region(origin), W);
    assert_eq!(abs.y, origin + 0.5 * H);
    assert_eq!(abs.h, 0.5 * H);

    let bottom = to_absolute(&NormalizedRect::new(0.0, 0.5, 1.0, 0.5), &region(origin), W);
    assert_eq!(bottom.y, origin);
}

#[test]
fn transform_scales_x_by_content_width() {
    let abs = to_absolute(&NormalizedRect::new(0.25, 0.1, 0.5, 0.2), &region(10.0), W);
    assert_eq!(abs.x, M + 0.25 * W);
    assert_eq!(abs.w, 0.5 * W);
    assert!(approx_eq(abs.y, 10.0 + 0.7 * H));
}

#[test]
fn images_region_sits_under_the_title() {
    let page = PageGeometry::a4();
    let r = images_region(&page);
    assert!(approx_eq(r.height, page.content_height() * IMAGE_AREA_FRACTION));
    assert!(approx_eq(r.origin_y + r.height, page.page_height - page.margin - TITLE_HEIGHT));
    assert_eq!(r.margin, page.margin);
}

#[test]
fn fill_mode_insets_by_half_the_border() {
    let frame = AbsoluteRect::new(100.0, 200.0, 300.0, 150.0);
    let p = render_panel(frame, (1024, 1024), 4.0, FillMode::Fill);
    assert_eq!(p.frame, frame);
    assert_eq!(p.image_rect, AbsoluteRect::new(102.0, 202.0, 296.0, 146.0));
}

#[test]
fn letterbox_preserves_aspect_and_centres() {
    let frame = AbsoluteRect::new(0.0, 0.0, 202.0, 102.0);
    // square image in a 200x100 inner box: 100x100, centred horizontally
    let p = render_panel(frame, (512, 512), 2.0, FillMode::Letterbox);
    let img = p.image_rect;
    assert!(approx_eq(img.w, 100.0));
    assert!(approx_eq(img.h, 100.0));
    assert!(approx_eq(img.x, 1.0 + 50.0));
    assert!(approx_eq(img.y, 1.0));

    // wide image in the same box is limited by width
    let wide = render_panel(frame, (400, 100), 2.0, FillMode::Letterbox).image_rect;
    assert!(approx_eq(wide.w, 200.0));
    assert!(approx_eq(wide.h, 50.0));
    assert!(approx_eq(wide.y, 1.0 + 25.0));
    assert!(approx_eq(wide.w / wide.h, 4.0));
}

#[test]
fn bubble_width_is_clamped_to_panel() {
    let measure = FixedWidth { char_width: 10.0 };
    let frame = AbsoluteRect::new(50.0, 50.0, 120.0, 200.0);
    let text = "a line of dialogue far too long for the panel";
    let bubble = place_bubble(&frame, text, 12.0, DialoguePosition::InsideTop, 3.0, &measure);
    assert_eq!(bubble.rect.w, frame.w - 2.0 * BUBBLE_MARGIN);
    assert_eq!(bubble.text, text);
}

#[test]
fn short_bubble_hugs_its_text_and_is_centred() {
    let measure = FixedWidth { char_width: 5.0 };
    let frame = AbsoluteRect::new(50.0, 50.0, 300.0, 200.0);
    let bubble = place_bubble(&frame, "Hi!", 12.0, DialoguePosition::InsideBottom, 3.0, &measure);
    assert_eq!(bubble.rect.w, 15.0 + 2.0 * BUBBLE_MARGIN);
    assert_eq!(bubble.rect.h, 12.0 + 2.0 * BUBBLE_MARGIN);
    assert!(approx_eq(bubble.rect.x + bubble.rect.w / 2.0, frame.x + frame.w / 2.0));
}

#[test]
fn bubble_vertical_positions() {
    let measure = FixedWidth { char_width: 5.0 };
    let frame = AbsoluteRect::new(0.0, 100.0, 300.0, 200.0);
    let (fs, border) = (10.0, 2.0);
    let h = fs + 2.0 * BUBBLE_MARGIN;

    let inside_bottom =
        place_bubble(&frame, "x", fs, DialoguePosition::InsideBottom, border, &measure);
    assert_eq!(inside_bottom.rect.y, frame.y + h + border);

    let outside = place_bubble(&frame, "x", fs, DialoguePosition::OutsideBottom, border, &measure);
    assert_eq!(outside.rect.y, frame.y - h);
    assert!(outside.rect.y + outside.rect.h <= frame.y);

    let top = place_bubble(&frame, "x", fs, DialoguePosition::InsideTop, border, &measure);
    assert_eq!(top.rect.y, frame.y + frame.h - h - border);
    assert!(top.rect.y + top.rect.h <= frame.y + frame.h);
}

#[test]
fn dialogue_positions_parse_in_both_spellings() {
    assert_eq!("inside_top".parse::<DialoguePosition>().unwrap(), DialoguePosition::InsideTop);
    assert_eq!(
        "outsideBottom".parse::<DialoguePosition>().unwrap(),
        DialoguePosition::OutsideBottom
    );
    assert!("middle".parse::<DialoguePosition>().is_err());
}
