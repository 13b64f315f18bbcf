//! JSON output renderer.
//!
//! Outputs `{"users": [...], "pagination": {...}}`.

use crate::listing::PageView;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, view: &PageView) -> String {
        let output = serde_json::json!({
            "users": view.users,
            "pagination": {
                "page": view.page,
                "total_pages": view.total_pages,
                "matches": view.matches,
                "total": view.total,
                "search": view.search,
            },
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
