//! Terminal renderer: a column-aligned user table with banners and a page
//! indicator.

use colored::Colorize;

use crate::form::{Field, FormState};
use crate::listing::PageView;
use crate::output::OutputRenderer;
use crate::store::AppState;

const HEADERS: [&str; 4] = ["ID", "Name", "Email", "Phone"];

/// Terminal output renderer with colored text.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, view: &PageView) -> String {
        if view.users.is_empty() {
            let msg = if view.search.trim().is_empty() {
                "  No users found.\n".to_string()
            } else {
                format!("  No users match \"{}\".\n", view.search)
            };
            return format!("{}", msg.dimmed());
        }

        let rows: Vec<[String; 4]> = view
            .users
            .iter()
            .map(|u| [u.id.to_string(), u.name.clone(), u.email.clone(), u.phone.clone()])
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        let header: Vec<String> = HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| pad(h, w))
            .collect();
        output.push_str(&format!("  {}\n", header.join("  ").bold()));
        let rule: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        output.push_str(&format!("  {}\n", "─".repeat(rule).dimmed()));

        for row in &rows {
            let cells: Vec<String> = row.iter().zip(widths).map(|(c, w)| pad(c, w)).collect();
            output.push_str(&format!("  {}\n", cells.join("  ")));
        }

        if view.is_paginated() {
            output.push('\n');
            output.push_str(&format!("  {}\n", pagination_line(view)));
        }

        output
    }
}

/// `‹ prev   Page x / y   next ›`, with unavailable directions dimmed.
fn pagination_line(view: &PageView) -> String {
    let prev = if view.has_prev() {
        "‹ prev".cyan().to_string()
    } else {
        "‹ prev".dimmed().to_string()
    };
    let next = if view.has_next() {
        "next ›".cyan().to_string()
    } else {
        "next ›".dimmed().to_string()
    };
    format!(
        "{prev}   {}   {next}",
        format!("Page {} / {}", view.page, view.total_pages).bold()
    )
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

/// Error and success banners, if any are showing.
pub fn render_banners(state: &AppState) -> String {
    let mut output = String::new();
    if let Some(ref error) = state.error {
        output.push_str(&format!(" {} {}\n", "✖".red().bold(), error.red()));
    }
    if let Some(ref notice) = state.notice {
        output.push_str(&format!(" {} {}\n", "✔".green().bold(), notice.message.green()));
    }
    output
}

/// The whole screen: banners, then the loading indicator or the table.
pub fn render_screen(state: &AppState) -> String {
    let mut output = render_banners(state);
    if !output.is_empty() {
        output.push('\n');
    }
    if state.loading {
        output.push_str(&format!("  {}\n", "Loading users...".dimmed()));
    } else {
        output.push_str(&TerminalRenderer.render(&state.view()));
    }
    output
}

/// Heading and inline error of an open form.
pub fn render_form_header(form: &FormState) -> String {
    let mut output = format!("\n {}\n", form.title().bold());
    if let Some(ref error) = form.error {
        output.push_str(&format!(" {} {}\n", "✖".red().bold(), error.red()));
    }
    output
}

/// Prompt for one field; edits show the current value.
pub fn field_prompt(form: &FormState, field: Field) -> String {
    let current = form.field(field);
    if current.is_empty() {
        format!("   {}: ", field.to_string().cyan())
    } else {
        format!("   {} [{}]: ", field.to_string().cyan(), current.dimmed())
    }
}
