//! Client-side search and pagination over the in-memory collection.
//!
//! Everything here is a pure function of `(users, search, page, page_size)`;
//! the store decides *when* the page is reset, these functions decide *what*
//! a given page shows.

use std::ops::Range;

use serde::Serialize;

use crate::models::User;

/// Users whose name contains `search`, ignoring case.
///
/// A search that is blank after trimming matches everyone.
pub fn filter_by_name<'a>(users: &'a [User], search: &str) -> Vec<&'a User> {
    if search.trim().is_empty() {
        return users.iter().collect();
    }
    let needle = search.to_lowercase();
    users
        .iter()
        .filter(|u| u.name.to_lowercase().contains(&needle))
        .collect()
}

/// Number of pages needed for `len` items; 0 when there are none.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Map a requested 1-based page onto one that exists.
///
/// Page 0 becomes 1; a page past the end falls back to 1 as long as there is
/// at least one page.
pub fn normalize_page(page: usize, total_pages: usize) -> usize {
    if page == 0 || (total_pages > 0 && page > total_pages) {
        1
    } else {
        page
    }
}

/// Index range of `page` (1-based) within a list of `len` items.
pub fn page_bounds(page: usize, page_size: usize, len: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

/// One rendered page of the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// The visible slice.
    pub users: Vec<User>,
    /// Current 1-based page.
    pub page: usize,
    pub total_pages: usize,
    /// Size of the filtered view.
    pub matches: usize,
    /// Size of the whole collection.
    pub total: usize,
    pub search: String,
}

impl PageView {
    /// Whether page navigation should be offered at all.
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Build the page view for `page` of the users matching `search`.
pub fn page_view(users: &[User], search: &str, page: usize, page_size: usize) -> PageView {
    let filtered = filter_by_name(users, search);
    let total_pages = page_count(filtered.len(), page_size);
    let page = normalize_page(page, total_pages);
    let visible = filtered[page_bounds(page, page_size, filtered.len())]
        .iter()
        .map(|u| (*u).clone())
        .collect();

    PageView {
        users: visible,
        page,
        total_pages,
        matches: filtered.len(),
        total: users.len(),
        search: search.to_string(),
    }
}
