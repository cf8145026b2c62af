mod common;

use common::{init_logging, options_with, png_handles, request};
use comicpage_pdf::{FontFace, FontRegistry, TextMeasure, render_comic_bytes};

const PANGRAM: &str = "The quick brown fox jumps over the lazy dog";

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// First installed family that embeds and covers accented Latin.
fn installed_font() -> Option<FontFace> {
    let registry = FontRegistry::system();
    registry
        .families()
        .into_iter()
        .map(|family| registry.load(family))
        .find(|face| face.is_embedded() && face.text_width("éç", 12.0) > 0.0)
}

#[test]
fn system_font_embeds_as_cid_subset() {
    init_logging();
    let Some(font) = installed_font() else {
        eprintln!("no usable system font installed; skipping");
        return;
    };
    eprintln!("using {}", font.name());
    assert!(font.is_embedded());

    let helvetica = FontFace::helvetica();
    assert!(
        (font.text_width(PANGRAM, 12.0) - helvetica.text_width(PANGRAM, 12.0)).abs() > 1e-3,
        "{} measured exactly like the Helvetica fallback",
        font.name()
    );

    let mut req = request(
        png_handles(2),
        "Naïve façade, déjà vu.\n\nŒuvre « complète » — fin.",
        options_with(2, "default"),
    );
    req.title = "Café crème".to_string();
    req.options.dialogue = vec!["Où suis-je ?".to_string()];

    let (bytes, summary) = render_comic_bytes(&req, &font).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(summary.pages, 2);
    assert!(contains(&bytes, b"/Type0"));
    assert!(contains(&bytes, b"/Identity-H"));
    assert!(contains(&bytes, b"/FontFile2"));
}

#[test]
fn helvetica_render_uses_the_standard_font() {
    let req = request(png_handles(1), "Plain story.", options_with(1, "default"));
    let (bytes, _) = render_comic_bytes(&req, &FontFace::helvetica()).unwrap();
    assert!(contains(&bytes, b"/Helvetica"));
    assert!(!contains(&bytes, b"/Type0"));
}
