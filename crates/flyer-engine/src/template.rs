//! Per-template geometry and breadcrumb lookup.
//!
//! A page `type` such as `xseries-video` is matched by prefix against a
//! fixed, ordered table. The first matching row wins; unmatched types get
//! the default row.

use crate::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Where the QR code lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrPlacement {
    pub size: u32,
    pub x: u32,
    pub y: u32,
}

struct TemplateRow {
    prefix: &'static str,
    qr: QrPlacement,
    category: &'static str,
    page: &'static str,
}

const DEFAULT_QR: QrPlacement = QrPlacement {
    size: 267,
    x: 356,
    y: 193,
};

const DEFAULT_CATEGORY: &str = "Accessories & Consumables";
const DEFAULT_PAGE: &str = "accessories.html";

// Order matters: prefixes are tested top to bottom.
const TEMPLATES: &[TemplateRow] = &[
    TemplateRow {
        prefix: "autopulsenxt",
        qr: QrPlacement { size: 267, x: 283, y: 164 },
        category: "AutoPulseNXT",
        page: "autopulsenxt.html",
    },
    TemplateRow {
        prefix: "xseries",
        qr: QrPlacement { size: 267, x: 344, y: 191 },
        category: "X Series",
        page: "xseries.html",
    },
    TemplateRow {
        prefix: "rseries-plus",
        qr: QrPlacement { size: 255, x: 40, y: 229 },
        category: "R Series PLUS",
        page: "rseries-plus.html",
    },
    TemplateRow {
        prefix: "rseries-als",
        qr: DEFAULT_QR,
        category: "R Series ALS",
        page: "rseries-als.html",
    },
    TemplateRow {
        prefix: "internalpaddles",
        qr: QrPlacement { size: 267, x: 301, y: 208 },
        category: DEFAULT_CATEGORY,
        page: DEFAULT_PAGE,
    },
    TemplateRow {
        prefix: "aed3bls",
        qr: QrPlacement { size: 267, x: 312, y: 162 },
        category: "AED 3 BLS",
        page: "aed3bls.html",
    },
    TemplateRow {
        prefix: "aedplus",
        qr: QrPlacement { size: 267, x: 312, y: 174 },
        category: "AED Plus",
        page: "aedplus.html",
    },
    // Zenix art is 2000x1608 at 189 DPI; 110mm QR at (147mm, 80mm) scales
    // to 267px at (356, 194) on the display canvas.
    TemplateRow {
        prefix: "zenix",
        qr: QrPlacement { size: 267, x: 356, y: 194 },
        category: "Zenix",
        page: "zenix.html",
    },
];

/// Errors from resolving a page type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("missing template type")]
    MissingType,

    #[error("invalid template type: {0:?}")]
    InvalidType(String),
}

/// Everything needed to render one flyer template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    /// The page type this descriptor was resolved for.
    pub id: String,
    /// Background art, relative to the site root.
    pub background_path: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub qr: QrPlacement,
    pub breadcrumb_category: &'static str,
    pub breadcrumb_page: &'static str,
}

impl TemplateDescriptor {
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Whether the type fell through to the default row.
    pub fn is_default(&self) -> bool {
        !TEMPLATES.iter().any(|row| self.id.starts_with(row.prefix))
    }
}

/// Resolve a page type to its template.
///
/// `None` or an empty string is [`TemplateError::MissingType`]. Types are
/// interpolated into the background path, so only ASCII alphanumerics,
/// `-` and `_` are accepted.
pub fn resolve_template(page_type: Option<&str>) -> Result<TemplateDescriptor, TemplateError> {
    let page_type = page_type
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(TemplateError::MissingType)?;

    if !is_valid_type(page_type) {
        return Err(TemplateError::InvalidType(page_type.to_string()));
    }

    let (qr, category, page) = TEMPLATES
        .iter()
        .find(|row| page_type.starts_with(row.prefix))
        .map_or((DEFAULT_QR, DEFAULT_CATEGORY, DEFAULT_PAGE), |row| {
            (row.qr, row.category, row.page)
        });

    tracing::debug!(page_type, category, qr_x = qr.x, qr_y = qr.y, "Template resolved");

    Ok(TemplateDescriptor {
        id: page_type.to_string(),
        background_path: format!("images/{page_type}.png"),
        canvas_width: CANVAS_WIDTH,
        canvas_height: CANVAS_HEIGHT,
        qr,
        breadcrumb_category: category,
        breadcrumb_page: page,
    })
}

fn is_valid_type(page_type: &str) -> bool {
    page_type
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
