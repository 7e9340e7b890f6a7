//! Unicode font discovery and metrics.
//!
//! Drawn text uses the first candidate TTF that exists and parses as a
//! valid face; when none does, the built-in Helvetica is used and a
//! diagnostic is logged (Romanian diacritics in the static labels may
//! then render incorrectly). Form fields always use Helvetica through
//! the AcroForm default appearance: the interactive-field subsystem is
//! limited to the standard 14 fonts, independent of this choice.

use crate::error::FormPressError;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum FontChoice {
    Embedded(EmbeddedFont),
    /// Built-in Helvetica fallback; no font program is embedded.
    Builtin,
}

impl FontChoice {
    pub fn describe(&self) -> String {
        match self {
            FontChoice::Embedded(font) => {
                format!("{} ({})", font.postscript_name, font.source.display())
            }
            FontChoice::Builtin => "Helvetica (built-in)".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct EmbeddedFont {
    pub postscript_name: String,
    pub source: PathBuf,
    pub data: Vec<u8>,
    pub metrics: FaceMetrics,
}

/// Face-wide metrics scaled to a 1000-unit em, as required by the PDF
/// font descriptor.
#[derive(Debug, Clone, Copy)]
pub struct FaceMetrics {
    pub ascent: i16,
    pub descent: i16,
    pub cap_height: i16,
    pub italic_angle: i16,
    pub bbox: (i16, i16, i16, i16),
    pub stem_v: i16,
    pub is_fixed_pitch: bool,
}

impl EmbeddedFont {
    pub fn from_file(path: &Path) -> Result<Self, FormPressError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data, path)
    }

    fn from_bytes(data: Vec<u8>, source: &Path) -> Result<Self, FormPressError> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|err| FormPressError::Font(format!("{}: {err}", source.display())))?;
        if face.tables().glyf.is_none() {
            // CFF-flavored OpenType needs a different embedding path;
            // treat it like any other unusable candidate.
            return Err(FormPressError::Font(format!(
                "{}: no TrueType outlines",
                source.display()
            )));
        }
        let postscript_name = postscript_name(&face, source);
        let metrics = FaceMetrics::from_face(&face);
        Ok(Self {
            postscript_name,
            source: source.to_path_buf(),
            data,
            metrics,
        })
    }

    /// Direct codepoint-to-glyph mapping; the static Latin labels need
    /// no shaping. Unmapped characters fall back to glyph 0 (notdef).
    pub fn glyph_id(&self, ch: char) -> u16 {
        let Ok(face) = ttf_parser::Face::parse(&self.data, 0) else {
            return 0;
        };
        face.glyph_index(ch).map(|id| id.0).unwrap_or(0)
    }

    /// Glyph advance scaled to a 1000-unit em.
    pub fn glyph_advance(&self, gid: u16) -> u16 {
        let Ok(face) = ttf_parser::Face::parse(&self.data, 0) else {
            return 0;
        };
        let advance = face
            .glyph_hor_advance(ttf_parser::GlyphId(gid))
            .unwrap_or(0);
        let units = face.units_per_em().max(1) as i64;
        let scaled = ((advance as i64) * 1000 + (units / 2)) / units;
        scaled.clamp(0, u16::MAX as i64) as u16
    }

    pub fn encode(&self, text: &str) -> Vec<u16> {
        text.chars().map(|ch| self.glyph_id(ch)).collect()
    }

    /// Glyph-to-text map for the characters of `texts`, for the
    /// ToUnicode CMap and the /W widths array.
    pub fn glyph_usage(&self, texts: impl Iterator<Item = char>) -> BTreeMap<u16, char> {
        let mut map = BTreeMap::new();
        for ch in texts {
            map.entry(self.glyph_id(ch)).or_insert(ch);
        }
        map
    }
}

impl FaceMetrics {
    fn from_face(face: &ttf_parser::Face<'_>) -> Self {
        let scale = 1000.0 / face.units_per_em().max(1) as f32;
        let scaled = |value: i16| {
            ((value as f32 * scale).round() as i32).clamp(i16::MIN as i32, i16::MAX as i32) as i16
        };
        let ascent = scaled(face.ascender());
        let bbox = face.global_bounding_box();
        Self {
            ascent,
            descent: scaled(face.descender()),
            cap_height: face.capital_height().map(scaled).unwrap_or(ascent),
            italic_angle: face
                .italic_angle()
                .map(|value| value.round() as i16)
                .unwrap_or(0),
            bbox: (
                scaled(bbox.x_min),
                scaled(bbox.y_min),
                scaled(bbox.x_max),
                scaled(bbox.y_max),
            ),
            stem_v: 80,
            is_fixed_pitch: face.is_monospaced(),
        }
    }
}

fn postscript_name(face: &ttf_parser::Face<'_>, source: &Path) -> String {
    use ttf_parser::name::name_id;

    let mut post = None;
    let mut family = None;
    for entry in face.names() {
        let Some(name) = entry.to_string() else {
            continue;
        };
        match entry.name_id {
            name_id::POST_SCRIPT_NAME if post.is_none() => post = Some(name),
            name_id::FAMILY | name_id::TYPOGRAPHIC_FAMILY if family.is_none() => {
                family = Some(name)
            }
            _ => {}
        }
    }
    let raw = post
        .or(family)
        .or_else(|| {
            source
                .file_stem()
                .and_then(|v| v.to_str())
                .map(|v| v.to_string())
        })
        .unwrap_or_else(|| "EmbeddedFont".to_string());
    // PDF names may not contain whitespace or delimiters.
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '+' | '.'))
        .collect()
}

/// Ordered candidate paths for a Unicode-capable face, most specific
/// first. Mirrors the lookup the tool has always done: DejaVu beside the
/// executable or in the working directory, then the usual system spots.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join("DejaVuSans.ttf"));
        }
    }
    candidates.push(PathBuf::from("DejaVuSans.ttf"));
    candidates.push(PathBuf::from(
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ));
    candidates.push(PathBuf::from(r"C:\Windows\Fonts\DejaVuSans.ttf"));
    candidates.push(PathBuf::from(r"C:\Windows\Fonts\dejavusans.ttf"));
    candidates.push(PathBuf::from(r"C:\Windows\Fonts\arial.ttf"));
    candidates
}

/// First candidate that exists and validates wins; everything else is
/// skipped silently. Exhausting the list is not an error, only a
/// degraded mode worth a diagnostic.
pub fn resolve(candidates: &[PathBuf]) -> FontChoice {
    for path in candidates {
        if !path.is_file() {
            continue;
        }
        match EmbeddedFont::from_file(path) {
            Ok(font) => {
                let choice = FontChoice::Embedded(font);
                info!("using font {}", choice.describe());
                return choice;
            }
            Err(err) => {
                debug!("skipping font candidate {}: {err}", path.display());
            }
        }
    }
    warn!(
        "no usable Unicode font found; falling back to built-in Helvetica \
         (accented characters may render incorrectly)"
    );
    FontChoice::Builtin
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                CAPTURED
                    .lock()
                    .expect("logger lock")
                    .push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    #[test]
    fn fallback_emits_a_warning_diagnostic() {
        static LOGGER: CaptureLogger = CaptureLogger;
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Warn);

        assert!(matches!(resolve(&[]), FontChoice::Builtin));
        let captured = CAPTURED.lock().expect("logger lock");
        assert!(
            captured
                .iter()
                .any(|msg| msg.contains("falling back to built-in Helvetica")),
            "no fallback diagnostic captured: {captured:?}"
        );
    }

    #[test]
    fn empty_candidate_list_falls_back_to_builtin() {
        let choice = resolve(&[]);
        assert!(matches!(choice, FontChoice::Builtin));
        assert_eq!(choice.describe(), "Helvetica (built-in)");
    }

    #[test]
    fn resolve_describes_its_choice() {
        let candidates = vec![PathBuf::from(
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        )];
        let choice = resolve(&candidates);
        match &choice {
            FontChoice::Embedded(font) => {
                let described = choice.describe();
                assert!(described.contains(&font.postscript_name));
                assert!(described.contains("DejaVuSans.ttf"));
            }
            FontChoice::Builtin => assert_eq!(choice.describe(), "Helvetica (built-in)"),
        }
    }

    #[test]
    fn missing_candidates_fall_back_to_builtin() {
        let bogus = vec![
            PathBuf::from("/nonexistent/DejaVuSans.ttf"),
            PathBuf::from("also-missing.ttf"),
        ];
        assert!(matches!(resolve(&bogus), FontChoice::Builtin));
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let dir = std::env::temp_dir().join(format!(
            "formpress_fonts_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let bad = dir.join("bad.ttf");
        std::fs::write(&bad, b"not a font").expect("write");
        assert!(EmbeddedFont::from_file(&bad).is_err());
        assert!(matches!(resolve(&[bad]), FontChoice::Builtin));
    }

    #[test]
    fn candidate_list_prefers_local_dejavu() {
        let candidates = candidate_paths();
        assert!(!candidates.is_empty());
        let first_local = candidates
            .iter()
            .position(|p| p == Path::new("DejaVuSans.ttf"))
            .expect("local candidate present");
        let arial = candidates
            .iter()
            .position(|p| p.to_string_lossy().contains("arial"))
            .expect("arial fallback present");
        assert!(first_local < arial);
    }
}
