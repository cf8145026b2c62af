mod common;

use comicpage_pdf::{
    COVERAGE_EPSILON, Error, LayoutCatalog, LayoutStyle, NormalizedRect, parse_custom_layout,
};

const STYLES: [LayoutStyle; 3] = [LayoutStyle::Default, LayoutStyle::Option1, LayoutStyle::Option2];

#[test]
fn builtin_table_validates() {
    LayoutCatalog::builtin().validate().expect("built-in table is valid");
}

#[test]
fn every_template_covers_the_unit_square() {
    let catalog = LayoutCatalog::builtin();
    for count in 1..=6 {
        for style in STYLES {
            let template = catalog.template(count, style).expect("template exists");
            assert_eq!(template.len(), count, "{count}/{style:?}");
            for rect in template {
                assert!(rect.x >= 0.0 && rect.y >= 0.0, "{count}/{style:?}: {rect:?}");
                assert!(rect.x + rect.w <= 1.0 + COVERAGE_EPSILON, "{count}/{style:?}: {rect:?}");
                assert!(rect.y + rect.h <= 1.0 + COVERAGE_EPSILON, "{count}/{style:?}: {rect:?}");
                assert!(!rect.is_degenerate());
            }
        }
    }
}

#[test]
fn resolves_requested_count_and_style() {
    let catalog = LayoutCatalog::builtin();
    let rects = catalog.resolve(3, "option1", None).unwrap();
    assert_eq!(
        rects,
        vec![
            NormalizedRect::new(0.0, 0.0, 1.0, 0.4),
            NormalizedRect::new(0.0, 0.4, 0.5, 0.6),
            NormalizedRect::new(0.5, 0.4, 0.5, 0.6),
        ]
    );
}

#[test]
fn out_of_range_counts_use_the_four_panel_table() {
    let catalog = LayoutCatalog::builtin();
    let four = catalog.resolve(4, "option2", None).unwrap();
    assert_eq!(catalog.resolve(0, "option2", None).unwrap(), four);
    assert_eq!(catalog.resolve(7, "option2", None).unwrap(), four);
    assert_eq!(catalog.resolve(100, "option2", None).unwrap(), four);
}

#[test]
fn unknown_style_is_a_configuration_error() {
    let err = LayoutCatalog::builtin()
        .resolve(3, "zigzag", None)
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{err}");
    assert!(err.to_string().contains("zigzag"));
}

#[test]
fn custom_layout_is_returned_verbatim_whatever_its_length() {
    let custom = "[[0, 0, 1, 0.25], [0, 0.25, 1, 0.25], [0, 0.5, 1, 0.25], [0, 0.75, 1, 0.25], [0.1, 0.1, 0.2, 0.2]]";
    let rects = LayoutCatalog::builtin()
        .resolve(2, "default", Some(custom))
        .unwrap();
    assert_eq!(rects.len(), 5);
    assert_eq!(rects[4], NormalizedRect::new(0.1, 0.1, 0.2, 0.2));
}

#[test]
fn custom_layout_bypasses_style_lookup() {
    let rects = LayoutCatalog::builtin()
        .resolve(1, "not-a-style", Some("[[0, 0, 1, 1]]"))
        .unwrap();
    assert_eq!(rects, vec![NormalizedRect::new(0.0, 0.0, 1.0, 1.0)]);
}

#[test]
fn unparseable_custom_layout_falls_back_to_catalog() {
    common::init_logging();
    let catalog = LayoutCatalog::builtin();
    let expected = catalog.resolve(3, "default", None).unwrap();
    for bad in ["not json", "[[0, 0, 1]]", "{\"x\": 1}", "[[0, 0, 1, \"a\"]]"] {
        assert_eq!(catalog.resolve(3, "default", Some(bad)).unwrap(), expected, "{bad}");
    }
}

#[test]
fn blank_custom_layout_is_ignored() {
    let catalog = LayoutCatalog::builtin();
    let expected = catalog.resolve(2, "option1", None).unwrap();
    assert_eq!(catalog.resolve(2, "option1", Some("   ")).unwrap(), expected);
}

#[test]
fn parse_error_is_typed() {
    let err = parse_custom_layout("not json").unwrap_err();
    assert!(err.to_string().contains("custom layout"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn custom_layout_keeps_degenerate_rects_for_the_composer() {
    let rects = parse_custom_layout("[[0, 0, 0, 1], [0, 0, 1, 1]]").unwrap();
    assert!(rects[0].is_degenerate());
    assert!(!rects[1].is_degenerate());
}

#[test]
fn style_names_parse() {
    assert_eq!("default".parse::<LayoutStyle>().unwrap(), LayoutStyle::Default);
    assert_eq!("option1".parse::<LayoutStyle>().unwrap(), LayoutStyle::Option1);
    assert_eq!("option2".parse::<LayoutStyle>().unwrap(), LayoutStyle::Option2);
    assert!("Option1".parse::<LayoutStyle>().is_err());
}
