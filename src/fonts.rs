use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;

/// Width of a string at a given size, in page units.
///
/// Everything that needs text metrics (bubble sizing, centring, word wrap)
/// goes through this trait.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

struct FontProgram {
    data: Vec<u8>,
    face_index: u32,
}

/// A loaded font: either an embeddable TrueType/OpenType program or the
/// standard Helvetica with approximate metrics.
pub struct FontFace {
    name: String,
    program: Option<FontProgram>,
    widths_1000: Vec<f32>,
    char_widths_1000: HashMap<char, f32>,
}

impl FontFace {
    pub fn helvetica() -> Self {
        Self {
            name: "Helvetica".to_string(),
            program: None,
            widths_1000: helvetica_widths(),
            char_widths_1000: HashMap::new(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read(path)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        let fallback_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Font")
            .to_string();
        Self::from_bytes(data, 0, fallback_name)
    }

    pub fn from_bytes(
        data: Vec<u8>,
        face_index: u32,
        fallback_name: String,
    ) -> Result<Self, Error> {
        let face = Face::parse(&data, face_index)
            .map_err(|e| Error::Font(format!("{fallback_name}: {e}")))?;
        let units = face.units_per_em() as f32;
        let name = font_family_name(&face).unwrap_or(fallback_name);

        let widths_1000: Vec<f32> = (32u8..=255u8)
            .map(|byte| {
                face.glyph_index(winansi_to_char(byte))
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 / units * 1000.0)
                    .unwrap_or(0.0)
            })
            .collect();

        let mut char_widths_1000 = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    let Some(ch) = char::from_u32(cp) else {
                        return;
                    };
                    if let Some(adv) = subtable
                        .glyph_index(cp)
                        .and_then(|gid| face.glyph_hor_advance(gid))
                    {
                        char_widths_1000
                            .entry(ch)
                            .or_insert(adv as f32 / units * 1000.0);
                    }
                });
            }
        }

        Ok(Self {
            name,
            program: Some(FontProgram { data, face_index }),
            widths_1000,
            char_widths_1000,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_embedded(&self) -> bool {
        self.program.is_some()
    }

    /// Width of a single character in 1000-units. Falls back to the WinAnsi
    /// table for characters outside the face's cmap.
    fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(&w) = self.char_widths_1000.get(&ch) {
            return w;
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }
}

impl TextMeasure for FontFace {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }
}

/// lowercase family name -> (file path, face index within TTC)
type FontLookup = HashMap<String, (PathBuf, u32)>;

/// Index of installed fonts, built explicitly and passed to whoever needs a face.
pub struct FontRegistry {
    index: FontLookup,
}

impl FontRegistry {
    pub fn empty() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Scan `COMICPAGE_FONTS` and the platform font directories.
    pub fn system() -> Self {
        Self::scan(&font_directories())
    }

    pub fn scan(dirs: &[PathBuf]) -> Self {
        let t0 = std::time::Instant::now();
        let mut index: FontLookup = HashMap::new();
        let mut regular: HashSet<String> = HashSet::new();
        let mut files_scanned = 0usize;

        let mut stack: Vec<PathBuf> = dirs.to_vec();
        while let Some(dir) = stack.pop() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                    continue;
                }
                if !is_font_file(&path) {
                    continue;
                }
                let Ok(file) = std::fs::File::open(&path) else {
                    continue;
                };
                let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                    continue;
                };
                files_scanned += 1;
                let face_count = if is_font_collection(&path) {
                    ttf_parser::fonts_in_collection(&data).unwrap_or(1)
                } else {
                    1
                };
                for face_idx in 0..face_count {
                    let Ok(face) = Face::parse(&data, face_idx) else {
                        continue;
                    };
                    let Some(family) = font_family_name(&face) else {
                        continue;
                    };
                    let key = family.to_lowercase();
                    let is_regular = !face.is_bold() && !face.is_italic();
                    // Regular faces replace any styled face seen first.
                    if is_regular && regular.insert(key.clone()) {
                        index.insert(key, (path.clone(), face_idx));
                    } else {
                        index.entry(key).or_insert((path.clone(), face_idx));
                    }
                }
            }
        }

        log::info!(
            "Font scan: {:.1}ms, {} files parsed → {} families",
            t0.elapsed().as_secs_f64() * 1000.0,
            files_scanned,
            index.len(),
        );

        Self { index }
    }

    pub fn contains(&self, family: &str) -> bool {
        self.index.contains_key(&family.to_lowercase())
    }

    /// Indexed family names, lowercased and sorted.
    pub fn families(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.index.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Load a family by name, falling back to Helvetica when it is not installed
    /// or cannot be parsed.
    pub fn load(&self, family: &str) -> FontFace {
        let found = self.index.get(&family.to_lowercase()).and_then(|(path, face_index)| {
            let data = std::fs::read(path).ok()?;
            match FontFace::from_bytes(data, *face_index, family.to_string()) {
                Ok(face) => Some(face),
                Err(e) => {
                    log::warn!("{e}");
                    None
                }
            }
        });
        match found {
            Some(face) => {
                log::debug!("Font {family} → {}", face.name);
                face
            }
            None => {
                log::warn!("Font not found: {family} — using Helvetica");
                FontFace::helvetica()
            }
        }
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if let Ok(val) = std::env::var("COMICPAGE_FONTS") {
        let sep = if cfg!(windows) { ';' } else { ':' };
        for part in val.split(sep) {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                dirs.push(PathBuf::from(trimmed));
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc" | "otc"))
}

fn is_font_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttc" | "otc"))
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => 667.0,                     // uppercase A-Z (average)
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 | 119 => 833.0,                   // m w (wide)
            97..=122 => 556.0,                    // lowercase a-z (average)
            _ => 556.0,
        })
        .collect()
}

/// A face written into a PDF, ready to encode text for its content streams.
pub(crate) struct EmbeddedFont {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    char_to_gid: Option<HashMap<char, u16>>,
}

impl EmbeddedFont {
    /// Big-endian glyph IDs for a CIDFont, WinAnsi bytes for Helvetica.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let gid = map.get(&ch).copied().unwrap_or(0);
                    out.push((gid >> 8) as u8);
                    out.push((gid & 0xFF) as u8);
                }
                out
            }
            None => text
                .chars()
                .map(char_to_winansi)
                .filter(|&b| b != 0)
                .collect(),
        }
    }
}

impl FontFace {
    /// Write the face into `pdf`. TrueType programs are subset to `used_chars`;
    /// anything that fails to embed degrades to Helvetica.
    pub(crate) fn embed(
        &self,
        pdf: &mut Pdf,
        pdf_name: String,
        used_chars: &HashSet<char>,
        alloc: &mut impl FnMut() -> Ref,
    ) -> EmbeddedFont {
        let t0 = std::time::Instant::now();
        let font_ref = alloc();

        let char_to_gid = self.program.as_ref().and_then(|program| {
            embed_truetype(pdf, font_ref, &self.name, program, used_chars, alloc)
        });

        if char_to_gid.is_none() {
            if self.program.is_some() {
                log::warn!("Embedding {} failed — using Helvetica", self.name);
            }
            pdf.type1_font(font_ref)
                .base_font(Name(b"Helvetica"))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        log::debug!(
            "embed font: {} ({} chars) → {:.1}ms",
            self.name,
            used_chars.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );

        EmbeddedFont {
            pdf_name,
            font_ref,
            char_to_gid,
        }
    }
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    program: &FontProgram,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = Face::parse(&program.data, program.face_index).ok()?;

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0);
            gid_widths.push((new_gid, w));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let subset_data = subsetter::subset(&program.data, program.face_index, &remapper)
        .unwrap_or_else(|e| {
            log::warn!("Font subsetting failed for {font_name}: {e} — embedding full font");
            program.data.clone()
        });

    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name: String = font_name.chars().filter(|c| !c.is_whitespace()).collect();

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(char_to_gid)
}
