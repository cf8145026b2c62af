use comicpage_pdf::{DialoguePosition, OptionOverrides, RenderOptions, parse_hex_color};

fn from_params() -> RenderOptions {
    serde_json::from_str(
        r##"{
            "panel_count": 3,
            "layout_style": "option1",
            "font_size": 14,
            "frame_color": "#000000",
            "full_fill": true,
            "dialogue": ["from file"]
        }"##,
    )
    .unwrap()
}

#[test]
fn empty_overrides_keep_the_parameter_file() {
    let mut options = from_params();
    options.apply(OptionOverrides::default());
    assert_eq!(options, from_params());
}

#[test]
fn set_overrides_replace_file_values() {
    let mut options = from_params();
    options.apply(OptionOverrides {
        panel_count: Some(5),
        font_size: Some(18.0),
        dialogue_position: Some(DialoguePosition::OutsideBottom),
        dialogue: vec!["one".into(), "two".into()],
        ..OptionOverrides::default()
    });
    assert_eq!(options.panel_count, Some(5));
    assert_eq!(options.font_size, 18.0);
    assert_eq!(options.dialogue_position, DialoguePosition::OutsideBottom);
    assert_eq!(options.dialogue, vec!["one", "two"]);
    // untouched fields come from the file
    assert_eq!(options.layout_style, "option1");
    assert_eq!(options.frame_color, "#000000");
}

#[test]
fn full_fill_flag_cannot_switch_fill_off() {
    let mut options = from_params();
    options.apply(OptionOverrides {
        full_fill: false,
        ..OptionOverrides::default()
    });
    assert!(options.full_fill);

    let mut defaults = RenderOptions::default();
    defaults.apply(OptionOverrides {
        full_fill: true,
        ..OptionOverrides::default()
    });
    assert!(defaults.full_fill);
}

#[test]
fn overrides_apply_over_defaults() {
    let mut options = RenderOptions::default();
    assert_eq!(options.panel_count, None);
    options.apply(OptionOverrides {
        layout_style: Some("option2".into()),
        custom_layout: Some("[[0, 0, 1, 1]]".into()),
        border_thickness: Some(6.0),
        frame_color: Some("#ff8800".into()),
        ..OptionOverrides::default()
    });
    assert_eq!(options.layout_style, "option2");
    assert_eq!(options.custom_layout.as_deref(), Some("[[0, 0, 1, 1]]"));
    assert_eq!(options.border_thickness, 6.0);
    assert_eq!(options.validate().unwrap(), [0xff, 0x88, 0x00]);
}

#[test]
fn hex_colors() {
    assert_eq!(parse_hex_color("#4A4A4A"), Some([0x4a, 0x4a, 0x4a]));
    assert_eq!(parse_hex_color("4a4a4a"), Some([0x4a, 0x4a, 0x4a]));
    assert_eq!(parse_hex_color("#+1+1+1"), None);
    assert_eq!(parse_hex_color("#12345"), None);
    assert_eq!(parse_hex_color("red"), None);
}
