//! formpress generates a fillable email-report template: one A4 page per
//! real-estate platform (Imobiliare.ro, OLX, Storia), each carrying two
//! multiline AcroForm text fields an automation fills in later.
//!
//! The pipeline records drawing commands on a [`canvas::Canvas`], then
//! emits them as a PDF through [`pdf::write_document`]. Text drawn on
//! the pages uses an embedded Unicode font when one can be found on the
//! host, so the Romanian labels keep their diacritics; form fields
//! always use Helvetica, as required for fillable text widgets.

pub mod canvas;
pub mod error;
pub mod fonts;
pub mod inspect;
pub mod layout;
pub mod logo;
pub mod pdf;
pub mod platform;
pub mod render;
pub mod style;
pub mod types;

pub use error::FormPressError;
pub use platform::PLATFORM_LABELS;
pub use style::StyleSheet;

use crate::canvas::Canvas;
use crate::layout::PageLayout;
use crate::types::Size;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "email_template.pdf";
pub const DEFAULT_LOGO: &str = "logo.png";
const DOCUMENT_TITLE: &str = "Email Template (Imobiliare / OLX / Storia)";

/// One full generation run: resolve assets, lay out and render the
/// platform pages, emit the PDF.
pub struct TemplateJob {
    output: PathBuf,
    /// Explicit logo override; `None` searches the default locations.
    logo: Option<PathBuf>,
    style: StyleSheet,
    page_size: Size,
}

/// What a completed run produced, for reporting.
#[derive(Debug)]
pub struct RunReport {
    pub output: PathBuf,
    pub font: String,
    pub page_count: usize,
    pub field_count: usize,
}

impl Default for TemplateJob {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            logo: None,
            style: StyleSheet::default(),
            page_size: Size::a4(),
        }
    }
}

impl TemplateJob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    pub fn logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo = Some(path.into());
        self
    }

    pub fn style(mut self, style: StyleSheet) -> Self {
        self.style = style;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn run(&self) -> Result<RunReport, FormPressError> {
        self.style.validate(self.page_size)?;
        let layout = PageLayout::compute(self.page_size, &self.style)?;

        let font = fonts::resolve(&fonts::candidate_paths());
        let logo = match &self.logo {
            Some(path) => logo::load(path),
            None => logo::resolve(&logo::candidate_paths(DEFAULT_LOGO)),
        };
        if logo.is_none() {
            log::info!("no usable logo found, drawing placeholder");
        }

        let mut canvas = Canvas::new(self.page_size);
        for label in &PLATFORM_LABELS {
            render::render_platform_page(&mut canvas, label, &layout, &self.style, logo.as_ref());
        }
        let document = canvas.finish();

        pdf::write_document(&document, &font, logo.as_ref(), DOCUMENT_TITLE, &self.output)?;

        let report = inspect::inspect_path(&self.output)?;
        Ok(RunReport {
            output: self.output.clone(),
            font: font.describe(),
            page_count: report.page_count,
            field_count: report.fields.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_output(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .subsec_nanos();
        std::env::temp_dir().join(format!(
            "formpress_{}_{}_{}.pdf",
            tag,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn generates_three_pages_with_six_fields() {
        let out = temp_output("full");
        let report = TemplateJob::new()
            .output(&out)
            .logo("definitely_missing_logo.png")
            .run()
            .expect("run");
        assert_eq!(report.page_count, 3);
        assert_eq!(report.field_count, 6);

        let inspected = inspect::inspect_path(&out).expect("inspect");
        let names: Vec<&str> = inspected.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "imobiliare_ai_summary",
                "imobiliare_listings_links",
                "olx_ai_summary",
                "olx_listings_links",
                "storia_ai_summary",
                "storia_listings_links",
            ]
        );
        for field in &inspected.fields {
            assert!(field.multiline, "{} must be multiline", field.name);
            assert!(field.value.is_empty(), "{} must start empty", field.name);
        }
        // Two widgets per page, in platform order.
        let pages: Vec<u32> = inspected.fields.iter().map(|f| f.page).collect();
        assert_eq!(pages, [1, 1, 2, 2, 3, 3]);

        std::fs::remove_file(&out).ok();
    }

    #[test]
    fn fields_sit_inside_the_page() {
        let out = temp_output("bounds");
        TemplateJob::new()
            .output(&out)
            .logo("definitely_missing_logo.png")
            .run()
            .expect("run");

        let page = Size::a4();
        let inspected = inspect::inspect_path(&out).expect("inspect");
        for field in &inspected.fields {
            let [x1, y1, x2, y2] = field.rect;
            assert!(x1 < x2 && y1 < y2, "{} has a degenerate rect", field.name);
            assert!(x1 >= 0.0 && y1 >= 0.0, "{} leaks off the page", field.name);
            assert!(
                x2 <= page.width + 0.01 && y2 <= page.height + 0.01,
                "{} leaks off the page",
                field.name
            );
        }
        std::fs::remove_file(&out).ok();
    }

    #[test]
    fn rejects_unworkable_style() {
        let out = temp_output("badstyle");
        let mut style = StyleSheet::default();
        style.summary_ratio = 1.5;
        let result = TemplateJob::new().output(&out).style(style).run();
        assert!(matches!(
            result,
            Err(FormPressError::InvalidConfiguration(_))
        ));
        assert!(!out.exists());
    }
}
