//! Translates a recorded canvas document plus resolved resources into a
//! PDF file: content streams, font objects, the logo XObject, widget
//! annotations and the document-level AcroForm entry.

use crate::canvas::{Command, Document, FieldSpec, Page};
use crate::error::FormPressError;
use crate::fonts::{EmbeddedFont, FontChoice};
use crate::logo::{LogoEncoding, LogoImage};
use crate::types::Color;
use lopdf::{
    Dictionary as LoDictionary, Document as LoDocument, Object as LoObject, ObjectId as LoObjectId,
    Stream as LoStream, dictionary,
};
use std::collections::BTreeMap;
use std::path::Path;

/// Resource names inside each page's resource dictionary.
const TEXT_FONT: &str = "F1";
const ACROFORM_FONT: &str = "Helv";
const LOGO_XOBJECT: &str = "Im1";

pub fn write_document(
    document: &Document,
    font: &FontChoice,
    logo: Option<&LogoImage>,
    title: &str,
    out_path: &Path,
) -> Result<(), FormPressError> {
    let mut doc = LoDocument::with_version("1.7");
    let pages_id = doc.new_object_id();

    // Form fields are restricted to the standard 14 fonts; /Helv backs
    // both the AcroForm default appearance and, in the fallback mode,
    // all drawn text.
    let helv_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let text_font_id = match font {
        FontChoice::Embedded(embedded) => add_embedded_font(&mut doc, embedded, document),
        FontChoice::Builtin => helv_id,
    };

    let logo_id = match logo {
        Some(logo) if references_logo(document) => Some(add_logo_xobject(&mut doc, logo)),
        _ => None,
    };

    let mut resources = dictionary! {
        "Font" => dictionary! {
            TEXT_FONT => text_font_id,
            ACROFORM_FONT => helv_id,
        },
    };
    if let Some(logo_id) = logo_id {
        resources.set(
            "XObject",
            LoObject::Dictionary(dictionary! { LOGO_XOBJECT => logo_id }),
        );
    }
    let resources_id = doc.add_object(resources);

    let page_ids: Vec<LoObjectId> = document.pages.iter().map(|_| doc.new_object_id()).collect();
    let mut all_field_ids: Vec<LoObject> = Vec::new();

    for (page, page_id) in document.pages.iter().zip(&page_ids) {
        let content = page_content(page, font);
        let content_id = doc.add_object(LoStream::new(dictionary! {}, content.into_bytes()));

        let mut annots: Vec<LoObject> = Vec::new();
        for field in page.fields() {
            let field_id = doc.add_object(field_dictionary(field, *page_id));
            annots.push(LoObject::Reference(field_id));
            all_field_ids.push(LoObject::Reference(field_id));
        }

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                document.page_size.width.into(),
                document.page_size.height.into(),
            ],
        };
        if !annots.is_empty() {
            page_dict.set("Annots", LoObject::Array(annots));
        }
        doc.objects.insert(*page_id, LoObject::Dictionary(page_dict));
    }

    doc.objects.insert(
        pages_id,
        LoObject::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| LoObject::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );

    // NeedAppearances makes viewers regenerate field appearances, so
    // empty fields render with the MK border/background styling.
    let acroform_id = doc.add_object(dictionary! {
        "Fields" => LoObject::Array(all_field_ids),
        "NeedAppearances" => true,
        "DA" => LoObject::string_literal(format!("/{ACROFORM_FONT} 0 Tf 0 g")),
        "DR" => dictionary! {
            "Font" => dictionary! { ACROFORM_FONT => helv_id },
        },
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => acroform_id,
    });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Title" => LoObject::string_literal(title),
        "Producer" => LoObject::string_literal("formpress"),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();
    persist(&mut doc, out_path)
}

/// Writes next to the target and renames into place, so an aborted run
/// never leaves a complete-looking artifact at the output path.
fn persist(doc: &mut LoDocument, out_path: &Path) -> Result<(), FormPressError> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    let tmp = out_path.with_extension("pdf.tmp");
    std::fs::write(&tmp, &bytes)?;
    std::fs::rename(&tmp, out_path)?;
    Ok(())
}

fn references_logo(document: &Document) -> bool {
    document
        .pages
        .iter()
        .flat_map(|page| page.commands.iter())
        .any(|cmd| matches!(cmd, Command::DrawImage { .. }))
}

// --- content streams -----------------------------------------------------

fn page_content(page: &Page, font: &FontChoice) -> String {
    let mut out = String::new();
    let mut font_size = 12.0f32;
    for cmd in &page.commands {
        match cmd {
            Command::SetFillColor(color) => {
                out.push_str(&format!(
                    "{} {} {} rg\n",
                    fmt(color.r),
                    fmt(color.g),
                    fmt(color.b)
                ));
            }
            Command::SetStrokeColor(color) => {
                out.push_str(&format!(
                    "{} {} {} RG\n",
                    fmt(color.r),
                    fmt(color.g),
                    fmt(color.b)
                ));
            }
            Command::SetLineWidth(width) => {
                out.push_str(&format!("{} w\n", fmt(*width)));
            }
            Command::FillRect(rect) => {
                out.push_str(&format!(
                    "{} {} {} {} re f\n",
                    fmt(rect.x),
                    fmt(rect.y),
                    fmt(rect.width),
                    fmt(rect.height)
                ));
            }
            Command::StrokeRect(rect) => {
                out.push_str(&format!(
                    "{} {} {} {} re S\n",
                    fmt(rect.x),
                    fmt(rect.y),
                    fmt(rect.width),
                    fmt(rect.height)
                ));
            }
            Command::Line { x1, y1, x2, y2 } => {
                out.push_str(&format!(
                    "{} {} m {} {} l S\n",
                    fmt(*x1),
                    fmt(*y1),
                    fmt(*x2),
                    fmt(*y2)
                ));
            }
            Command::SetFontSize(size) => {
                font_size = *size;
            }
            Command::DrawString { x, y, text } => {
                out.push_str(&format!(
                    "BT /{} {} Tf {} {} Td <{}> Tj ET\n",
                    TEXT_FONT,
                    fmt(font_size),
                    fmt(*x),
                    fmt(*y),
                    encode_text(font, text)
                ));
            }
            Command::DrawImage { rect, .. } => {
                out.push_str(&format!(
                    "q {} 0 0 {} {} {} cm /{} Do Q\n",
                    fmt(rect.width),
                    fmt(rect.height),
                    fmt(rect.x),
                    fmt(rect.y),
                    LOGO_XOBJECT
                ));
            }
            // Emitted as a widget annotation, not as page content.
            Command::TextField(_) => {}
        }
    }
    out
}

fn fmt(value: f32) -> String {
    let mut s = format!("{value:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Hex string body for a Tj operand: glyph ids for an embedded face,
/// WinAnsi bytes for built-in Helvetica.
fn encode_text(font: &FontChoice, text: &str) -> String {
    match font {
        FontChoice::Embedded(embedded) => embedded
            .encode(text)
            .iter()
            .map(|gid| format!("{gid:04X}"))
            .collect(),
        FontChoice::Builtin => text
            .chars()
            .map(|ch| format!("{:02X}", winansi_byte(ch)))
            .collect(),
    }
}

/// Lossy WinAnsi (CP1252) mapping; characters the encoding cannot
/// express become '?'. This is the degraded mode the font-fallback
/// diagnostic warns about.
fn winansi_byte(ch: char) -> u8 {
    match ch {
        ..='\u{7E}' => ch as u8,
        '\u{A0}'..='\u{FF}' => ch as u8,
        '€' => 0x80,
        '…' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

// --- form fields ---------------------------------------------------------

fn color_array(color: Color) -> LoObject {
    LoObject::Array(vec![
        color.r.into(),
        color.g.into(),
        color.b.into(),
    ])
}

fn field_dictionary(field: &FieldSpec, page_id: LoObjectId) -> LoDictionary {
    let mut flags: i64 = 0;
    if field.multiline {
        flags |= 1 << 12;
    }
    let da = format!(
        "/{} {} Tf {} {} {} rg",
        ACROFORM_FONT,
        fmt(field.font_size),
        fmt(field.text_color.r),
        fmt(field.text_color.g),
        fmt(field.text_color.b)
    );
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => LoObject::string_literal(field.name.as_str()),
        "TU" => LoObject::string_literal(field.tooltip.as_str()),
        "V" => LoObject::string_literal(""),
        "Ff" => flags,
        // Print flag: fields are part of the printed page.
        "F" => 4,
        "Rect" => vec![
            field.rect.x.into(),
            field.rect.y.into(),
            field.rect.right().into(),
            field.rect.top().into(),
        ],
        "DA" => LoObject::string_literal(da),
        "MK" => dictionary! {
            "BC" => color_array(field.border_color),
            "BG" => color_array(field.background),
        },
        "BS" => dictionary! { "W" => 1, "S" => "I" },
        "P" => page_id,
    }
}

// --- fonts ---------------------------------------------------------------

/// Embeds the face as a CIDFontType2/Identity-H program. Only glyphs the
/// document actually draws get /W and ToUnicode entries.
fn add_embedded_font(
    doc: &mut LoDocument,
    font: &EmbeddedFont,
    document: &Document,
) -> LoObjectId {
    let usage = font.glyph_usage(drawn_chars(document));

    let font_file_id = doc.add_object(LoStream::new(
        dictionary! { "Length1" => font.data.len() as i64 },
        font.data.clone(),
    ));
    let metrics = font.metrics;
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => LoObject::Name(font.postscript_name.as_bytes().to_vec()),
        "Flags" => if metrics.is_fixed_pitch { 32 | 1 } else { 32 },
        "FontBBox" => vec![
            i64::from(metrics.bbox.0).into(),
            i64::from(metrics.bbox.1).into(),
            i64::from(metrics.bbox.2).into(),
            i64::from(metrics.bbox.3).into(),
        ],
        "ItalicAngle" => i64::from(metrics.italic_angle),
        "Ascent" => i64::from(metrics.ascent),
        "Descent" => i64::from(metrics.descent),
        "CapHeight" => i64::from(metrics.cap_height),
        "StemV" => i64::from(metrics.stem_v),
        "FontFile2" => font_file_id,
    });

    let mut widths: Vec<LoObject> = Vec::with_capacity(usage.len() * 2);
    for gid in usage.keys() {
        widths.push(i64::from(*gid).into());
        widths.push(LoObject::Array(vec![
            i64::from(font.glyph_advance(*gid)).into(),
        ]));
    }
    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => LoObject::Name(font.postscript_name.as_bytes().to_vec()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => LoObject::string_literal("Adobe"),
            "Ordering" => LoObject::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "W" => LoObject::Array(widths),
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id = doc.add_object(LoStream::new(
        dictionary! {},
        to_unicode_cmap(&usage).into_bytes(),
    ));
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => LoObject::Name(font.postscript_name.as_bytes().to_vec()),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![LoObject::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    })
}

fn drawn_chars(document: &Document) -> impl Iterator<Item = char> + '_ {
    document
        .pages
        .iter()
        .flat_map(|page| page.commands.iter())
        .filter_map(|cmd| match cmd {
            Command::DrawString { text, .. } => Some(text.chars()),
            _ => None,
        })
        .flatten()
}

fn to_unicode_cmap(usage: &BTreeMap<u16, char>) -> String {
    let mut out = String::new();
    out.push_str("/CIDInit /ProcSet findresource begin\n");
    out.push_str("12 dict begin\nbegincmap\n");
    out.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> def\n");
    out.push_str("/CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n");
    out.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    let entries: Vec<(u16, char)> = usage.iter().map(|(g, c)| (*g, *c)).collect();
    for chunk in entries.chunks(100) {
        out.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut buf = [0u16; 2];
            let mut uni = String::new();
            for unit in ch.encode_utf16(&mut buf) {
                uni.push_str(&format!("{unit:04X}"));
            }
            out.push_str(&format!("<{gid:04X}> <{uni}>\n"));
        }
        out.push_str("endbfchar\n");
    }

    out.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    out
}

// --- logo ----------------------------------------------------------------

fn add_logo_xobject(doc: &mut LoDocument, logo: &LogoImage) -> LoObjectId {
    match &logo.encoding {
        LogoEncoding::Jpeg { data, gray } => doc.add_object(LoStream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => logo.width as i64,
                "Height" => logo.height as i64,
                "ColorSpace" => if *gray { "DeviceGray" } else { "DeviceRGB" },
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            data.clone(),
        )),
        LogoEncoding::Rgb { data, alpha } => {
            let mut dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => logo.width as i64,
                "Height" => logo.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            };
            if let Some(alpha) = alpha {
                let smask_id = doc.add_object(LoStream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => logo.width as i64,
                        "Height" => logo.height as i64,
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8,
                    },
                    alpha.clone(),
                ));
                dict.set("SMask", LoObject::Reference(smask_id));
            }
            doc.add_object(LoStream::new(dict, data.clone()))
        }
    }
}
