//! Breadcrumb trail shown above the flyer: `Home > Category > Resources`.

use std::fmt;

use crate::template::TemplateDescriptor;

/// Label for a resource subtype (the last `-` segment of a page type).
pub fn resource_label(subtype: &str) -> &'static str {
    match subtype {
        "video" => "Video Resources",
        "biomed" => "BioMed Resources",
        "testing" => "Testing Resources",
        "education" => "Education Resources",
        "resourcelink" => "General Resources",
        _ => "Resources",
    }
}

/// Breadcrumb for a resolved template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub category: &'static str,
    pub page: &'static str,
    pub label: &'static str,
}

impl Breadcrumb {
    pub fn for_template(template: &TemplateDescriptor) -> Self {
        let subtype = template.id.rsplit('-').next().unwrap_or_default();
        Self {
            category: template.breadcrumb_category,
            page: template.breadcrumb_page,
            label: resource_label(subtype),
        }
    }

    /// HTML form used by the page header.
    pub fn to_html(&self) -> String {
        format!(
            r#"<a href="index.html">Home</a> > <a href="{}">{}</a> > {}"#,
            self.page,
            escape_html(self.category),
            self.label
        )
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Home > {} > {}", self.category, self.label)
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
}
