//! Output renderers for a page of users: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::listing::PageView;

/// Trait for rendering a page of users to an output format.
pub trait OutputRenderer {
    /// Render the page to a string.
    fn render(&self, view: &PageView) -> String;
}
