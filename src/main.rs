use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use comicpage_pdf::{
    ComicRequest, DialoguePosition, Error, FontFace, FontRegistry, ImageHandle, OptionOverrides,
    RenderOptions,
};

/// Lay out story images as a framed comic page and write it, with the story text, to PDF.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Panel images, in reading order
    images: Vec<PathBuf>,

    /// Output PDF path
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long, default_value = "My Comic Story")]
    title: String,

    /// Story text (paragraphs separated by newlines)
    #[arg(long, conflicts_with = "story_file")]
    story: Option<String>,

    /// Read the story from a UTF-8 text file
    #[arg(long)]
    story_file: Option<PathBuf>,

    /// JSON file with render parameters; flags below override it
    #[arg(long)]
    params: Option<PathBuf>,

    /// Number of panels (default: one per image; outside 1-6 uses the 4-panel layout)
    #[arg(long)]
    panels: Option<usize>,

    /// Layout style: default, option1 or option2
    #[arg(long)]
    layout: Option<String>,

    /// Custom layout as a JSON array of [x, y, w, h] fractions
    #[arg(long)]
    custom_layout: Option<String>,

    #[arg(long)]
    font_size: Option<f32>,

    /// Panel border thickness in points
    #[arg(long)]
    border: Option<f32>,

    /// inside_top, inside_bottom or outside_bottom
    #[arg(long)]
    dialogue_position: Option<DialoguePosition>,

    /// Panel frame color as #RRGGBB
    #[arg(long)]
    frame_color: Option<String>,

    /// Stretch images to fill their panels instead of letterboxing
    #[arg(long)]
    full_fill: bool,

    /// Bubble text for each panel, in order (repeatable)
    #[arg(long = "dialogue")]
    dialogue: Vec<String>,

    /// TrueType/OpenType file for all text
    #[arg(long, conflicts_with = "font_family")]
    font: Option<PathBuf>,

    /// Installed font family for all text
    #[arg(long, default_value = "Comic Sans MS")]
    font_family: String,
}

fn build_request(args: Args) -> Result<(ComicRequest, FontFace), Error> {
    let mut options = match &args.params {
        Some(path) => RenderOptions::from_json_file(path)?,
        None => RenderOptions::default(),
    };
    options.apply(OptionOverrides {
        panel_count: args.panels,
        layout_style: args.layout,
        custom_layout: args.custom_layout,
        font_size: args.font_size,
        border_thickness: args.border,
        dialogue_position: args.dialogue_position,
        frame_color: args.frame_color,
        full_fill: args.full_fill,
        dialogue: args.dialogue,
    });

    let story = match (&args.story, &args.story_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?,
        (None, None) => String::new(),
    };

    let font = match &args.font {
        Some(path) => FontFace::from_file(path)?,
        None => FontRegistry::system().load(&args.font_family),
    };

    let request = ComicRequest {
        title: args.title,
        story,
        images: args.images.into_iter().map(ImageHandle::from_path).collect(),
        options,
    };
    Ok((request, font))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let output = args.output.clone();

    let result = build_request(args).and_then(|(request, font)| {
        comicpage_pdf::render_comic_to_pdf(&request, &font, &output)
    });

    match result {
        Ok(summary) => {
            for err in &summary.panel_errors {
                eprintln!("skipped {err}");
            }
            println!(
                "Wrote {} ({} pages, {} panels)",
                output.display(),
                summary.pages,
                summary.panels
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
