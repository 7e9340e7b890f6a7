//! Renders one template page per platform onto the canvas. Draw order
//! matters: later commands occlude earlier ones.

use crate::canvas::{Canvas, FieldSpec};
use crate::layout::{PageLayout, fit_rect};
use crate::logo::LogoImage;
use crate::platform::PlatformLabel;
use crate::style::StyleSheet;
use crate::types::{Color, Rect};

/// Canvas resource id under which the logo image is registered.
pub const LOGO_RESOURCE: &str = "logo";

pub fn render_platform_page(
    canvas: &mut Canvas,
    label: &PlatformLabel,
    layout: &PageLayout,
    style: &StyleSheet,
    logo: Option<&LogoImage>,
) {
    let page = layout.page;

    // Background, outer border, accent line.
    canvas.set_fill_color(Color::WHITE);
    canvas.fill_rect(Rect::new(0.0, 0.0, page.width, page.height));
    canvas.set_stroke_color(style.border);
    canvas.set_line_width(1.2);
    canvas.stroke_rect(layout.outer_border);
    canvas.set_stroke_color(style.accent);
    canvas.set_line_width(3.0);
    canvas.line(
        layout.outer_border.x,
        layout.accent_y,
        layout.outer_border.right(),
        layout.accent_y,
    );

    // Header band with title, subtitle and the logo slot.
    canvas.set_fill_color(style.header_bg);
    canvas.fill_rect(layout.header_band);
    canvas.set_fill_color(style.text);
    canvas.set_font_size(style.title_size);
    canvas.draw_string(
        layout.title_baseline.0,
        layout.title_baseline.1,
        format!("Raport platformă: {}", label.display),
    );
    canvas.set_fill_color(style.muted);
    canvas.set_font_size(style.subtitle_size);
    canvas.draw_string(
        layout.subtitle_baseline.0,
        layout.subtitle_baseline.1,
        "Template PDF (fillable) pentru email — completare din UiPath",
    );
    match logo {
        Some(logo) => {
            let rect = fit_rect(layout.logo_slot, logo.width, logo.height);
            canvas.draw_image(rect, LOGO_RESOURCE);
        }
        None => draw_logo_placeholder(canvas, layout.logo_slot, style),
    }

    // Summary label and field.
    canvas.set_fill_color(style.text);
    canvas.set_font_size(style.label_size);
    canvas.draw_string(
        layout.summary_label_baseline.0,
        layout.summary_label_baseline.1,
        "AI summary (text generat de AI)",
    );
    canvas.text_field(field_spec(
        label.summary_field_name(),
        layout.summary_field,
        style,
    ));

    // Listings label and field.
    canvas.set_fill_color(style.text);
    canvas.set_font_size(style.label_size);
    canvas.draw_string(
        layout.listings_label_baseline.0,
        layout.listings_label_baseline.1,
        "Anunțuri + link-uri (ex: titlu + preț + URL)",
    );
    canvas.text_field(field_spec(
        label.listings_field_name(),
        layout.listings_field,
        style,
    ));

    // Footer naming this page's fields.
    canvas.set_fill_color(style.muted);
    canvas.set_font_size(style.footer_size);
    canvas.draw_string(
        layout.footer_baseline.0,
        layout.footer_baseline.1,
        format!(
            "Fields: {}, {}",
            label.summary_field_name(),
            label.listings_field_name()
        ),
    );

    canvas.show_page();
}

fn draw_logo_placeholder(canvas: &mut Canvas, slot: Rect, style: &StyleSheet) {
    canvas.set_stroke_color(style.field_border);
    canvas.set_line_width(1.0);
    canvas.stroke_rect(slot);
    canvas.set_fill_color(style.muted);
    canvas.set_font_size(style.footer_size);
    canvas.draw_string(slot.x + 4.0, slot.y + 4.0, "LOGO");
}

fn field_spec(name: String, rect: Rect, style: &StyleSheet) -> FieldSpec {
    FieldSpec {
        tooltip: name.clone(),
        name,
        rect,
        multiline: true,
        border_color: style.field_border,
        background: style.field_bg,
        text_color: style.text,
        font_size: style.field_font_size,
    }
}
