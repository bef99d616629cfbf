//! Plain-text rendering of a menu result.

use std::fmt::Write;

use chrono::NaiveDate;

use dinecache_core::MenuResult;

/// Render the title, the period selector line and every category.
/// `selected_period` is the id of the period being shown, if known.
pub fn render_menu(title: &str, date: NaiveDate, result: &MenuResult, selected_period: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Menu", title);
    let _ = writeln!(out, "{}", date.format("%b %-d, %Y"));

    let mut periods = result.periods.clone();
    periods.sort_by_key(|p| p.sort_order);
    let names: Vec<String> = periods
        .iter()
        .map(|p| {
            if Some(p.id.as_str()) == selected_period {
                format!("[{}]", p.name)
            } else {
                p.name.clone()
            }
        })
        .collect();
    if !names.is_empty() {
        let _ = writeln!(out, "Periods: {}", names.join(" | "));
    }

    for category in &result.categories {
        let _ = writeln!(out);
        let _ = writeln!(out, "== {} ==", category.name);
        for item in &category.items {
            let _ = writeln!(out, "  {}", item.name);
            if let Some(description) = item.description() {
                let _ = writeln!(out, "    {}", description);
            }
            let portion = if item.portion.is_empty() { "-" } else { item.portion.as_str() };
            let _ = writeln!(out, "    {} · {}", portion, item.calories_display());
        }
    }

    if result.categories.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Nothing on the menu for this period.");
    }

    out
}
