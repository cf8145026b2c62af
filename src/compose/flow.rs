use crate::fonts::TextMeasure;
use crate::model::{DrawOp, Page, PageGeometry, TextLine};

/// Leading as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Dark grey (0.1) used for title, bubble and story text.
pub const TEXT_COLOR: [u8; 3] = [26, 26, 26];

/// Story text split into paragraphs (one per input line) of words.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextRun {
    paragraphs: Vec<Vec<String>>,
}

impl TextRun {
    pub fn from_story(story: &str) -> Self {
        let paragraphs = story
            .lines()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect();
        Self { paragraphs }
    }

    pub fn from_paragraphs(paragraphs: Vec<Vec<String>>) -> Self {
        Self { paragraphs }
    }

    pub fn paragraphs(&self) -> &[Vec<String>] {
        &self.paragraphs
    }

    pub fn is_blank(&self) -> bool {
        self.paragraphs.iter().all(Vec::is_empty)
    }
}

/// Greedy word wrap. A word that alone exceeds `max_width` still gets its own
/// line; words are never split. An empty paragraph yields no lines.
pub fn wrap_paragraph(
    words: &[String],
    max_width: f32,
    font_size: f32,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut candidate = String::new();

    for word in words {
        if candidate.is_empty() {
            candidate.push_str(word);
            continue;
        }
        let proposed = format!("{candidate} {word}");
        if measure.text_width(&proposed, font_size) > max_width {
            lines.push(std::mem::replace(&mut candidate, word.clone()));
        } else {
            candidate = proposed;
        }
    }

    if !candidate.is_empty() {
        lines.push(candidate);
    }
    lines
}

/// Flow `text` down pages of `geometry`, breaking to a new page whenever the
/// next line would dip below the bottom margin.
///
/// Single pass, no backtracking. Always returns at least one page, even for
/// blank text.
pub fn paginate(
    text: &TextRun,
    geometry: &PageGeometry,
    font_size: f32,
    measure: &dyn TextMeasure,
) -> Vec<Page> {
    let line_height = font_size * LINE_HEIGHT_FACTOR;
    let max_width = geometry.content_width();
    let top = geometry.content_top();

    let mut pages: Vec<Page> = Vec::new();
    let mut current = Page::default();
    let mut cursor_y = top;

    for paragraph in text.paragraphs() {
        let mut lines = wrap_paragraph(paragraph, max_width, font_size, measure);
        if lines.is_empty() {
            // paragraph break: one blank line
            lines.push(String::new());
        }

        for line in lines {
            // A page too short for a single line still takes one, rather than
            // emitting empty pages forever.
            if cursor_y - line_height < geometry.margin && cursor_y < top {
                pages.push(std::mem::take(&mut current));
                cursor_y = top;
            }
            if !line.is_empty() {
                current.ops.push(DrawOp::Text(TextLine {
                    x: geometry.margin,
                    baseline: cursor_y - font_size,
                    font_size,
                    color: TEXT_COLOR,
                    text: line,
                }));
            }
            cursor_y -= line_height;
        }
    }

    pages.push(current);
    log::debug!(
        "Paginated {} paragraphs into {} pages",
        text.paragraphs().len(),
        pages.len()
    );
    pages
}
