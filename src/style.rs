//! Visual constants for the generated template, grouped into one
//! immutable sheet that is passed explicitly to layout and rendering.

use crate::error::FormPressError;
use crate::types::{Color, MM, Size};

#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub accent: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub field_border: Color,
    pub field_bg: Color,
    pub header_bg: Color,

    /// Inset of the outer border from the page edges.
    pub outer_margin: f32,
    /// Inset of the header band and content area from the page edges.
    pub header_margin: f32,
    pub header_height: f32,
    /// Vertical space between the header band and the content area.
    pub header_gap: f32,
    /// Horizontal padding between the header margin and the content.
    pub content_padding: f32,
    /// Space between the outer margin and the bottom of the content area.
    pub bottom_inset: f32,
    /// Vertical gap between the two form fields.
    pub field_gap: f32,
    /// Share of the field area given to the summary field.
    pub summary_ratio: f32,

    pub logo_width: f32,
    pub logo_height: f32,
    /// Gap between the logo slot and the right edge of the header band.
    pub logo_inset: f32,

    pub title_size: f32,
    pub subtitle_size: f32,
    pub label_size: f32,
    pub footer_size: f32,
    pub field_font_size: f32,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            accent: Color::hex("#F2B6B6"),
            border: Color::hex("#D9D9D9"),
            text: Color::hex("#1A1A1A"),
            muted: Color::hex("#666666"),
            field_border: Color::hex("#CFCFCF"),
            field_bg: Color::hex("#FFFFFF"),
            header_bg: Color::hex("#FAFAFA"),

            outer_margin: 14.0 * MM,
            header_margin: 18.0 * MM,
            header_height: 22.0 * MM,
            header_gap: 8.0 * MM,
            content_padding: 10.0,
            bottom_inset: 10.0,
            field_gap: 8.0 * MM,
            summary_ratio: 0.35,

            logo_width: 30.0 * MM,
            logo_height: 14.0 * MM,
            logo_inset: 10.0,

            title_size: 16.0,
            subtitle_size: 9.5,
            label_size: 11.5,
            footer_size: 8.5,
            field_font_size: 10.0,
        }
    }
}

impl StyleSheet {
    /// Rejects sheets that cannot produce positive-size geometry on the
    /// given page. Layout re-checks the derived rectangles; this catches
    /// the obviously impossible combinations up front.
    pub fn validate(&self, page: Size) -> Result<(), FormPressError> {
        if !(0.0..1.0).contains(&self.summary_ratio) || self.summary_ratio == 0.0 {
            return Err(FormPressError::InvalidConfiguration(format!(
                "summary ratio must be in (0, 1): {}",
                self.summary_ratio
            )));
        }
        if self.outer_margin * 2.0 >= page.width || self.outer_margin * 2.0 >= page.height {
            return Err(FormPressError::InvalidConfiguration(format!(
                "outer margin {:.1}pt exceeds page size",
                self.outer_margin
            )));
        }
        if (self.header_margin + self.content_padding) * 2.0 >= page.width {
            return Err(FormPressError::InvalidConfiguration(format!(
                "header margin {:.1}pt leaves no content width",
                self.header_margin
            )));
        }
        Ok(())
    }
}
