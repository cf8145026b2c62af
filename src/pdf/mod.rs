mod draw;

use std::collections::HashSet;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::error::Error;
use crate::fonts::FontFace;
use crate::images::{DecodedImage, PixelData};
use crate::model::{Document, DrawOp};

use draw::{draw_bubble, draw_frame, draw_image, draw_text};

fn embed_image(pdf: &mut Pdf, img: &DecodedImage, alloc: &mut impl FnMut() -> Ref) -> Ref {
    let xobj_ref = alloc();
    let (w, h) = (img.pixel_width as i32, img.pixel_height as i32);
    match &img.pixels {
        PixelData::Jpeg { data, grayscale } => {
            let mut xobj = pdf.image_xobject(xobj_ref, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(w);
            xobj.height(h);
            if *grayscale {
                xobj.color_space().device_gray();
            } else {
                xobj.color_space().device_rgb();
            }
            xobj.bits_per_component(8);
        }
        PixelData::Raw { rgb, alpha } => {
            let smask_ref = alpha.as_ref().map(|alpha_data| {
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, alpha_data);
                mask.filter(Filter::FlateDecode);
                mask.width(w);
                mask.height(h);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                mask_ref
            });

            let mut xobj = pdf.image_xobject(xobj_ref, rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w);
            xobj.height(h);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
    xobj_ref
}

fn used_chars(doc: &Document) -> HashSet<char> {
    let mut chars: HashSet<char> = HashSet::new();
    for op in doc.pages.iter().flat_map(|p| p.ops.iter()) {
        match op {
            DrawOp::Text(line) => chars.extend(line.text.chars()),
            DrawOp::Bubble { label, .. } => chars.extend(label.text.chars()),
            DrawOp::Frame { .. } | DrawOp::Image { .. } => {}
        }
    }
    chars.insert(' ');
    chars
}

/// Serialize a composed document to PDF bytes.
pub fn render(doc: &Document, font: &FontFace) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    if doc.pages.is_empty() {
        return Err(Error::Pdf("document has no pages".into()));
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: font and images
    let used = used_chars(doc);
    let embedded = font.embed(&mut pdf, "F1".to_string(), &used, &mut alloc);
    let t_fonts = t0.elapsed();

    let image_xobjects: Vec<(String, Ref)> = doc
        .images
        .iter()
        .enumerate()
        .map(|(i, img)| (format!("Im{}", i + 1), embed_image(&mut pdf, img, &mut alloc)))
        .collect();
    let t_images = t0.elapsed();

    // Phase 2: content streams
    let mut all_contents: Vec<Content> = Vec::with_capacity(doc.pages.len());
    for page in &doc.pages {
        let mut content = Content::new();
        for op in &page.ops {
            match op {
                DrawOp::Text(line) => draw_text(&mut content, line, &embedded),
                DrawOp::Frame {
                    rect,
                    color,
                    line_width,
                } => draw_frame(&mut content, rect, *color, *line_width),
                DrawOp::Image { image, rect } => {
                    let (name, _) = image_xobjects.get(*image).ok_or_else(|| {
                        Error::Pdf(format!("draw op references missing image {image}"))
                    })?;
                    draw_image(&mut content, rect, name);
                }
                DrawOp::Bubble {
                    bubble,
                    stroke,
                    line_width,
                    corner_radius,
                    label,
                } => draw_bubble(
                    &mut content,
                    bubble,
                    *stroke,
                    *line_width,
                    *corner_radius,
                    label,
                    &embedded,
                ),
            }
        }
        all_contents.push(content);
    }
    let t_layout = t0.elapsed();

    // Phase 3: page tree
    let n = all_contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in all_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);
    pdf.document_info(info_id)
        .title(TextStr(&doc.title))
        .producer(TextStr(concat!("comicpage-pdf ", env!("CARGO_PKG_VERSION"))));

    let geo = &doc.geometry;
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geo.page_width, geo.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        resources
            .fonts()
            .pair(Name(embedded.pdf_name.as_bytes()), embedded.font_ref);
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: font_embed={:.1}ms, images={:.1}ms, content={:.1}ms, assembly={:.1}ms",
        t_fonts.as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        (t_layout - t_images).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}
