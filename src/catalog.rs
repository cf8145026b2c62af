use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::Error;
use crate::model::NormalizedRect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStyle {
    Default,
    Option1,
    Option2,
}

impl LayoutStyle {
    fn slot(self) -> usize {
        match self {
            LayoutStyle::Default => 0,
            LayoutStyle::Option1 => 1,
            LayoutStyle::Option2 => 2,
        }
    }
}

impl FromStr for LayoutStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(LayoutStyle::Default),
            "option1" => Ok(LayoutStyle::Option1),
            "option2" => Ok(LayoutStyle::Option2),
            other => Err(Error::Config(format!(
                "unknown layout style '{other}' (expected default, option1 or option2)"
            ))),
        }
    }
}

const fn r(x: f32, y: f32, w: f32, h: f32) -> NormalizedRect {
    NormalizedRect::new(x, y, w, h)
}

/// Slack for the hand-authored 0.33/0.34 splits.
pub const COVERAGE_EPSILON: f32 = 1e-3;

/// Panel count used when the requested count has no template.
pub const FALLBACK_PANEL_COUNT: usize = 4;

type Template = &'static [NormalizedRect];

// Indexed by [panel_count - 1][style slot].
static TEMPLATES: [[Template; 3]; 6] = [
    [
        // single full frame
        &[r(0.0, 0.0, 1.0, 1.0)],
        // centred with margin
        &[r(0.1, 0.1, 0.8, 0.8)],
        // centred vertical strip
        &[r(0.2, 0.0, 0.6, 1.0)],
    ],
    [
        &[r(0.0, 0.0, 0.5, 1.0), r(0.5, 0.0, 0.5, 1.0)],
        &[r(0.0, 0.0, 1.0, 0.5), r(0.0, 0.5, 1.0, 0.5)],
        &[r(0.1, 0.0, 0.4, 1.0), r(0.5, 0.0, 0.4, 1.0)],
    ],
    [
        // two top, one bottom
        &[r(0.0, 0.0, 0.5, 0.5), r(0.5, 0.0, 0.5, 0.5), r(0.0, 0.5, 1.0, 0.5)],
        // one top, two bottom
        &[r(0.0, 0.0, 1.0, 0.4), r(0.0, 0.4, 0.5, 0.6), r(0.5, 0.4, 0.5, 0.6)],
        // three vertical strips
        &[r(0.0, 0.0, 0.33, 1.0), r(0.33, 0.0, 0.34, 1.0), r(0.67, 0.0, 0.33, 1.0)],
    ],
    [
        &[
            r(0.0, 0.0, 0.5, 0.5),
            r(0.5, 0.0, 0.5, 0.5),
            r(0.0, 0.5, 0.5, 0.5),
            r(0.5, 0.5, 0.5, 0.5),
        ],
        &[
            r(0.0, 0.0, 1.0, 0.4),
            r(0.0, 0.4, 0.33, 0.6),
            r(0.33, 0.4, 0.34, 0.6),
            r(0.67, 0.4, 0.33, 0.6),
        ],
        &[
            r(0.0, 0.0, 0.25, 1.0),
            r(0.25, 0.0, 0.25, 1.0),
            r(0.5, 0.0, 0.25, 1.0),
            r(0.75, 0.0, 0.25, 1.0),
        ],
    ],
    [
        &[
            r(0.0, 0.0, 0.33, 0.5),
            r(0.33, 0.0, 0.33, 0.5),
            r(0.66, 0.0, 0.34, 0.5),
            r(0.0, 0.5, 0.5, 0.5),
            r(0.5, 0.5, 0.5, 0.5),
        ],
        &[
            r(0.0, 0.0, 1.0, 0.4),
            r(0.0, 0.4, 0.25, 0.6),
            r(0.25, 0.4, 0.25, 0.6),
            r(0.5, 0.4, 0.25, 0.6),
            r(0.75, 0.4, 0.25, 0.6),
        ],
        &[
            r(0.0, 0.0, 0.2, 1.0),
            r(0.2, 0.0, 0.2, 1.0),
            r(0.4, 0.0, 0.2, 1.0),
            r(0.6, 0.0, 0.2, 1.0),
            r(0.8, 0.0, 0.2, 1.0),
        ],
    ],
    [
        // 3x2 grid
        &[
            r(0.0, 0.0, 0.33, 0.5),
            r(0.33, 0.0, 0.33, 0.5),
            r(0.66, 0.0, 0.34, 0.5),
            r(0.0, 0.5, 0.33, 0.5),
            r(0.33, 0.5, 0.33, 0.5),
            r(0.66, 0.5, 0.34, 0.5),
        ],
        // one top, two middle, three bottom
        &[
            r(0.0, 0.0, 1.0, 0.33),
            r(0.0, 0.33, 0.5, 0.34),
            r(0.5, 0.33, 0.5, 0.34),
            r(0.0, 0.67, 0.33, 0.33),
            r(0.33, 0.67, 0.33, 0.33),
            r(0.66, 0.67, 0.34, 0.33),
        ],
        &[
            r(0.0, 0.0, 0.167, 1.0),
            r(0.167, 0.0, 0.167, 1.0),
            r(0.334, 0.0, 0.167, 1.0),
            r(0.501, 0.0, 0.167, 1.0),
            r(0.668, 0.0, 0.167, 1.0),
            r(0.835, 0.0, 0.165, 1.0),
        ],
    ],
];

/// A custom layout string that could not be read as an array of 4-tuples.
#[derive(Debug)]
pub struct LayoutParseError(serde_json::Error);

impl fmt::Display for LayoutParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "custom layout is not a JSON array of [x, y, w, h]: {}", self.0)
    }
}

impl std::error::Error for LayoutParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Parse `[[x, y, w, h], ...]`. Length and rectangle sanity are not checked here;
/// the composer truncates to the image count and skips degenerate slots.
pub fn parse_custom_layout(text: &str) -> Result<Vec<NormalizedRect>, LayoutParseError> {
    let tuples: Vec<[f32; 4]> = serde_json::from_str(text).map_err(LayoutParseError)?;
    Ok(tuples
        .into_iter()
        .map(|[x, y, w, h]| NormalizedRect::new(x, y, w, h))
        .collect())
}

pub struct LayoutCatalog {
    templates: &'static [[Template; 3]; 6],
}

static BUILTIN: OnceLock<LayoutCatalog> = OnceLock::new();

impl LayoutCatalog {
    /// The built-in 6 × 3 table, validated on first use.
    pub fn builtin() -> &'static LayoutCatalog {
        BUILTIN.get_or_init(|| {
            let catalog = LayoutCatalog {
                templates: &TEMPLATES,
            };
            if let Err(e) = catalog.validate() {
                panic!("built-in layout table is invalid: {e}");
            }
            catalog
        })
    }

    /// Every template has exactly `count` non-degenerate rectangles inside the unit square.
    pub fn validate(&self) -> Result<(), Error> {
        for (ci, styles) in self.templates.iter().enumerate() {
            let count = ci + 1;
            for (si, template) in styles.iter().enumerate() {
                if template.len() != count {
                    return Err(Error::Config(format!(
                        "template {count}/{si} has {} rectangles",
                        template.len()
                    )));
                }
                for rect in template.iter() {
                    let inside = rect.x >= 0.0
                        && rect.y >= 0.0
                        && rect.x + rect.w <= 1.0 + COVERAGE_EPSILON
                        && rect.y + rect.h <= 1.0 + COVERAGE_EPSILON;
                    if rect.is_degenerate() || !inside {
                        return Err(Error::Config(format!(
                            "template {count}/{si} has bad rectangle {rect:?}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn template(
        &self,
        panel_count: usize,
        style: LayoutStyle,
    ) -> Option<&'static [NormalizedRect]> {
        let styles = self.templates.get(panel_count.checked_sub(1)?)?;
        Some(styles[style.slot()])
    }

    /// Resolve the panel rectangles for a request.
    ///
    /// A parseable `custom` layout wins outright, whatever its length. An
    /// unparseable one is logged and ignored. Counts without a template use the
    /// 4-panel table.
    pub fn resolve(
        &self,
        panel_count: usize,
        style: &str,
        custom: Option<&str>,
    ) -> Result<Vec<NormalizedRect>, Error> {
        if let Some(text) = custom.map(str::trim).filter(|t| !t.is_empty()) {
            match parse_custom_layout(text) {
                Ok(rects) => {
                    log::debug!("Using custom layout with {} rectangles", rects.len());
                    return Ok(rects);
                }
                Err(e) => log::warn!("{e}; using the built-in layout"),
            }
        }

        let style: LayoutStyle = style.parse()?;
        let count = if (1..=self.templates.len()).contains(&panel_count) {
            panel_count
        } else {
            log::debug!(
                "No layout template for {panel_count} panels, using the {FALLBACK_PANEL_COUNT}-panel table"
            );
            FALLBACK_PANEL_COUNT
        };
        self.template(count, style)
            .map(<[NormalizedRect]>::to_vec)
            .ok_or_else(|| Error::Config(format!("no template for {count} panels")))
    }
}
