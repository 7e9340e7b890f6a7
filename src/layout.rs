//! Page geometry. Everything here is derived from the page size and the
//! style sheet; nothing depends on which platform the page is for.

use crate::error::FormPressError;
use crate::style::StyleSheet;
use crate::types::{Rect, Size};

/// Distance from the top of a label's reserved line to its baseline.
const LABEL_DROP: f32 = 12.0;
/// Distance from a label's baseline to the top of the field below it.
const LABEL_FIELD_GAP: f32 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page: Size,
    pub outer_border: Rect,
    /// The accent line runs along the top edge of the outer border.
    pub accent_y: f32,
    pub header_band: Rect,
    pub logo_slot: Rect,
    pub title_baseline: (f32, f32),
    pub subtitle_baseline: (f32, f32),
    /// Printable area below the header band; both fields and their
    /// labels must stay inside it.
    pub content: Rect,
    pub summary_label_baseline: (f32, f32),
    pub summary_field: Rect,
    pub listings_label_baseline: (f32, f32),
    pub listings_field: Rect,
    pub footer_baseline: (f32, f32),
}

impl PageLayout {
    pub fn compute(page: Size, style: &StyleSheet) -> Result<Self, FormPressError> {
        style.validate(page)?;

        let m = style.outer_margin;
        let hm = style.header_margin;
        let outer_border = Rect::new(m, m, page.width - 2.0 * m, page.height - 2.0 * m);
        let accent_y = page.height - m;

        let header_top = page.height - hm;
        let header_band = Rect::new(
            hm,
            header_top - style.header_height,
            page.width - 2.0 * hm,
            style.header_height,
        );
        let logo_slot = Rect::new(
            page.width - hm - style.logo_width - style.logo_inset,
            header_band.y + (style.header_height - style.logo_height) / 2.0,
            style.logo_width,
            style.logo_height,
        );
        let title_baseline = (hm + style.content_padding, header_top - 15.0);
        let subtitle_baseline = (hm + style.content_padding, header_top - 30.0);

        let content_left = hm + style.content_padding;
        let content_right = page.width - hm - style.content_padding;
        let content_top = header_band.y - style.header_gap;
        let content_bottom = m + style.bottom_inset;
        let content = Rect::new(
            content_left,
            content_bottom,
            content_right - content_left,
            content_top - content_bottom,
        );

        // Each field gets a reserved label line above it; the remainder
        // splits into summary / gap / listings.
        let fields_height = content.height - 2.0 * (LABEL_DROP + LABEL_FIELD_GAP);
        let summary_height = fields_height * style.summary_ratio;
        let listings_height = fields_height - summary_height - style.field_gap;

        if content.width <= 0.0 || fields_height <= 0.0 || listings_height <= 0.0 {
            return Err(FormPressError::InvalidConfiguration(format!(
                "degenerate content geometry: width {:.1}pt, fields height {:.1}pt, listings height {:.1}pt",
                content.width, fields_height, listings_height
            )));
        }

        let summary_label_baseline = (content_left, content_top - LABEL_DROP);
        let summary_field = Rect::new(
            content_left,
            summary_label_baseline.1 - LABEL_FIELD_GAP - summary_height,
            content.width,
            summary_height,
        );
        let listings_label_baseline =
            (content_left, summary_field.y - style.field_gap - LABEL_DROP);
        let listings_field = Rect::new(
            content_left,
            listings_label_baseline.1 - LABEL_FIELD_GAP - listings_height,
            content.width,
            listings_height,
        );
        let footer_baseline = (content_left, m + 2.0);

        Ok(Self {
            page,
            outer_border,
            accent_y,
            header_band,
            logo_slot,
            title_baseline,
            subtitle_baseline,
            content,
            summary_label_baseline,
            summary_field,
            listings_label_baseline,
            listings_field,
            footer_baseline,
        })
    }
}

/// Scales `(width, height)` to fit inside `slot` preserving aspect
/// ratio, centered both ways. Used for the logo image.
pub fn fit_rect(slot: Rect, width: u32, height: u32) -> Rect {
    if width == 0 || height == 0 {
        return slot;
    }
    let scale = (slot.width / width as f32).min(slot.height / height as f32);
    let w = width as f32 * scale;
    let h = height as f32 * scale;
    Rect::new(
        slot.x + (slot.width - w) / 2.0,
        slot.y + (slot.height - h) / 2.0,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleSheet;

    fn layout() -> PageLayout {
        PageLayout::compute(Size::a4(), &StyleSheet::default()).expect("layout")
    }

    #[test]
    fn fields_lie_within_the_content_rect() {
        let l = layout();
        assert!(l.content.contains(&l.summary_field));
        assert!(l.content.contains(&l.listings_field));
    }

    #[test]
    fn fields_do_not_reach_into_the_header_band() {
        let l = layout();
        assert!(l.summary_field.top() < l.header_band.y);
        assert!(l.content.top() <= l.header_band.y);
    }

    #[test]
    fn summary_ratio_holds_within_tolerance() {
        let l = layout();
        let style = StyleSheet::default();
        let total = l.summary_field.height + l.listings_field.height + style.field_gap;
        let ratio = l.summary_field.height / total;
        assert!((ratio - style.summary_ratio).abs() < 0.001, "ratio {ratio}");
    }

    #[test]
    fn listings_field_sits_flush_with_the_content_bottom() {
        let l = layout();
        assert!((l.listings_field.y - l.content.y).abs() < 0.01);
    }

    #[test]
    fn logo_slot_is_right_aligned_inside_the_header_band() {
        let l = layout();
        assert!(l.header_band.contains(&l.logo_slot));
        assert!(l.logo_slot.right() < l.header_band.right());
        assert!(l.logo_slot.x > l.header_band.x + l.header_band.width / 2.0);
    }

    #[test]
    fn degenerate_geometry_fails_fast() {
        // A4 minus margins leaves ~720pt; a 700pt header pushes the
        // reserved label lines past the content bottom.
        let style = StyleSheet {
            header_height: 700.0,
            ..StyleSheet::default()
        };
        let err = PageLayout::compute(Size::a4(), &style).expect_err("degenerate");
        assert!(err.to_string().contains("degenerate content geometry"));
    }

    #[test]
    fn tall_header_with_positive_field_space_still_lays_out() {
        let style = StyleSheet {
            header_height: 600.0,
            ..StyleSheet::default()
        };
        let l = PageLayout::compute(Size::a4(), &style).expect("layout");
        assert!(l.summary_field.height > 0.0);
        assert!(l.listings_field.height > 0.0);
    }

    #[test]
    fn fit_rect_preserves_aspect_and_centers() {
        let slot = Rect::new(10.0, 10.0, 100.0, 40.0);
        let fitted = fit_rect(slot, 200, 200);
        assert!((fitted.width - 40.0).abs() < 0.01);
        assert!((fitted.height - 40.0).abs() < 0.01);
        assert!((fitted.x - 40.0).abs() < 0.01);
        assert!((fitted.y - 10.0).abs() < 0.01);
        assert!(slot.contains(&fitted));
    }
}
