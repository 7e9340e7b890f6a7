/// One listing platform driving one page of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformLabel {
    /// Human-readable name shown in the page title.
    pub display: &'static str,
    /// Stable key prefixing this page's field names.
    pub key: &'static str,
}

impl PlatformLabel {
    pub fn summary_field_name(&self) -> String {
        format!("{}_ai_summary", self.key)
    }

    pub fn listings_field_name(&self) -> String {
        format!("{}_listings_links", self.key)
    }
}

/// The fixed page order of the output document.
pub const PLATFORM_LABELS: [PlatformLabel; 3] = [
    PlatformLabel {
        display: "Imobiliare.ro",
        key: "imobiliare",
    },
    PlatformLabel {
        display: "OLX",
        key: "olx",
    },
    PlatformLabel {
        display: "Storia",
        key: "storia",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn field_names_are_unique_across_the_document() {
        let mut names = BTreeSet::new();
        for label in PLATFORM_LABELS {
            names.insert(label.summary_field_name());
            names.insert(label.listings_field_name());
        }
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn page_order_is_fixed() {
        let keys: Vec<&str> = PLATFORM_LABELS.iter().map(|l| l.key).collect();
        assert_eq!(keys, ["imobiliare", "olx", "storia"]);
    }
}
