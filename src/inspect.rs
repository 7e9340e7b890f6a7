//! Artifact verification: reloads a generated PDF and reports what a
//! form-filling consumer would see. Used for the CLI status line and by
//! the end-to-end tests.

use crate::error::FormPressError;
use lopdf::{Document as LoDocument, Object as LoObject};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct InspectReport {
    pub page_count: usize,
    /// Text-input widgets in page order, then annotation order.
    pub fields: Vec<FieldInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    /// 1-based page number the widget sits on.
    pub page: u32,
    /// [x1, y1, x2, y2] in PDF user space.
    pub rect: [f32; 4],
    pub multiline: bool,
    pub value: String,
}

pub fn inspect_path(path: &Path) -> Result<InspectReport, FormPressError> {
    let bytes = std::fs::read(path)?;
    inspect_bytes(&bytes)
}

pub fn inspect_bytes(bytes: &[u8]) -> Result<InspectReport, FormPressError> {
    let doc = LoDocument::load_mem(bytes)?;
    let pages = doc.get_pages();
    let mut fields = Vec::new();

    for (page_no, page_id) in &pages {
        let page = doc.get_object(*page_id).and_then(LoObject::as_dict)?;
        let Ok(annots) = page.get(b"Annots") else {
            continue;
        };
        let annots = resolve(&doc, annots);
        let Ok(annots) = annots.as_array() else {
            continue;
        };
        for annot in annots {
            let Ok(dict) = resolve(&doc, annot).as_dict() else {
                continue;
            };
            let is_text_widget = name_is(dict.get(b"Subtype").ok(), b"Widget")
                && name_is(dict.get(b"FT").ok(), b"Tx");
            if !is_text_widget {
                continue;
            }
            let rect = match dict.get(b"Rect").and_then(LoObject::as_array) {
                Ok(array) if array.len() == 4 => {
                    let mut rect = [0.0f32; 4];
                    for (slot, value) in rect.iter_mut().zip(array) {
                        *slot = number(value);
                    }
                    rect
                }
                _ => continue,
            };
            let flags = dict.get(b"Ff").and_then(LoObject::as_i64).unwrap_or(0);
            fields.push(FieldInfo {
                name: string_value(dict.get(b"T").ok()),
                page: *page_no,
                rect,
                multiline: flags & (1 << 12) != 0,
                value: string_value(dict.get(b"V").ok()),
            });
        }
    }

    Ok(InspectReport {
        page_count: pages.len(),
        fields,
    })
}

fn resolve<'a>(doc: &'a LoDocument, object: &'a LoObject) -> &'a LoObject {
    match object {
        LoObject::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn name_is(object: Option<&LoObject>, expected: &[u8]) -> bool {
    matches!(object, Some(LoObject::Name(name)) if name == expected)
}

fn string_value(object: Option<&LoObject>) -> String {
    match object {
        Some(LoObject::String(bytes, _)) => String::from_utf8_lossy(bytes).into_owned(),
        _ => String::new(),
    }
}

fn number(object: &LoObject) -> f32 {
    match object {
        LoObject::Integer(value) => *value as f32,
        LoObject::Real(value) => *value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream as LoStream, dictionary};

    fn plain_pdf_without_fields() -> Vec<u8> {
        let mut doc = LoDocument::with_version("1.7");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(LoStream::new(dictionary! {}, b"".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            LoObject::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut out = Vec::new();
        doc.save_to(&mut out).expect("save");
        out
    }

    #[test]
    fn counts_pages_and_tolerates_absent_annotations() {
        let report = inspect_bytes(&plain_pdf_without_fields()).expect("inspect");
        assert_eq!(report.page_count, 1);
        assert!(report.fields.is_empty());
    }

    #[test]
    fn unparseable_bytes_are_an_error() {
        assert!(inspect_bytes(b"not a pdf").is_err());
    }
}
