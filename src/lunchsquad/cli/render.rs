//! Terminal rendering for command results.
//!
//! Layout (widths, padding, truncation) is computed on plain text with
//! `unicode-width`, so names like "Jörg" or "Dürüm" line up; colors are applied
//! afterwards and never affect alignment.

use colored::Colorize;
use lunchsquad::api::{CmdMessage, MessageLevel, StatusReport};
use lunchsquad::catalog::Catalog;
use lunchsquad::config::{LunchConfig, CONFIG_KEYS};
use lunchsquad::presenter::DisplayRow;
use lunchsquad::votes::VoteTally;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const BAR_MARK: &str = "■";

/// Pads `s` with spaces to `width` display columns.
fn pad_to(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

/// One line per order, with its detail dimmed underneath.
///
/// The number in front is the 1-based store position, which is what
/// `remove` takes, even when the listing is sorted or filtered.
pub fn render_rows(rows: &[DisplayRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let idx_width = rows
        .iter()
        .map(|r| format!("{}.", r.position + 1).width())
        .max()
        .unwrap_or(0);
    let name_width = rows.iter().map(|r| r.submitter.width()).max().unwrap_or(0);
    let restaurant_width = rows.iter().map(|r| r.restaurant.width()).max().unwrap_or(0);

    let mut output = String::new();
    for row in rows {
        let idx = pad_to(&format!("{}.", row.position + 1), idx_width);
        let prefix_width = 2 + idx_width + 1 + row.timestamp.width() + 2;
        let fixed = prefix_width + name_width + 2 + restaurant_width + 2;
        let summary = truncate_to_width(&row.summary, LINE_WIDTH.saturating_sub(fixed));

        output.push_str(&format!(
            "  {} {}  {}  {}  {}\n",
            idx.yellow(),
            row.timestamp.dimmed(),
            pad_to(&row.submitter, name_width).bold(),
            pad_to(&row.restaurant, restaurant_width),
            summary
        ));
        if !row.detail.is_empty() {
            let indent = " ".repeat(prefix_width);
            let detail = truncate_to_width(&row.detail, LINE_WIDTH.saturating_sub(prefix_width));
            output.push_str(&format!("{}{}\n", indent, detail.dimmed()));
        }
    }
    output
}

/// Vote counts per restaurant, then who voted for what.
pub fn render_tally(tally: &VoteTally, catalog: &Catalog) -> String {
    let counts = tally.counts();
    let label_width = counts
        .iter()
        .map(|(kind, _)| catalog.restaurant_label(*kind).width())
        .max()
        .unwrap_or(0);
    let leader = tally.leader();

    let mut output = String::new();
    for (kind, count) in counts {
        let label = pad_to(catalog.restaurant_label(kind), label_width);
        let bar = BAR_MARK.repeat(count);
        let line = format!("  {}  {:>2} {}", label, count, bar);
        if Some(kind) == leader {
            output.push_str(&format!("{}\n", line.green().bold()));
        } else {
            output.push_str(&format!("{}\n", line));
        }
    }

    if tally.total() > 0 {
        output.push('\n');
        let voter_width = tally.votes().keys().map(|v| v.width()).max().unwrap_or(0);
        for (voter, kind) in tally.votes() {
            output.push_str(&format!(
                "  {}  {}\n",
                pad_to(voter, voter_width).dimmed(),
                catalog.restaurant_label(*kind).dimmed()
            ));
        }
    }
    output
}

pub fn render_status(status: &StatusReport) -> String {
    let per_restaurant = status
        .per_restaurant
        .iter()
        .map(|(label, n)| format!("{} {}", label, n))
        .collect::<Vec<_>>()
        .join(", ");

    let fields = [
        ("Session", status.session.clone()),
        (
            "Orders",
            format!("{} ({})", status.order_count, per_restaurant),
        ),
        (
            "Last order",
            status.last_order.clone().unwrap_or_else(|| "-".to_string()),
        ),
        (
            "Leading vote",
            status.leading_vote.clone().unwrap_or_else(|| "-".to_string()),
        ),
        ("Data", status.data_dir.display().to_string()),
        ("Cache", status.cache_dir.display().to_string()),
    ];
    let key_width = fields.iter().map(|(k, _)| k.width() + 1).max().unwrap_or(0);

    fields
        .iter()
        .map(|(key, value)| format!("{}  {}\n", pad_to(&format!("{}:", key), key_width).bold(), value))
        .collect()
}

pub fn render_config(config: &LunchConfig) -> String {
    CONFIG_KEYS
        .iter()
        .filter_map(|key| config.get(key).map(|value| format!("{} = {}\n", key, value)))
        .collect()
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            let content = match message.level {
                MessageLevel::Info => message.content.dimmed(),
                MessageLevel::Success => message.content.green(),
                MessageLevel::Warning => message.content.yellow(),
                MessageLevel::Error => message.content.red(),
            };
            format!("{}\n", content)
        })
        .collect()
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunchsquad::model::Kind;
    use std::path::PathBuf;

    fn make_row(position: usize, submitter: &str, restaurant: &str, summary: &str) -> DisplayRow {
        DisplayRow {
            position,
            kind: Kind::Numbered,
            timestamp: "2025-06-02 11:58".to_string(),
            submitter: submitter.to_string(),
            restaurant: restaurant.to_string(),
            summary: summary.to_string(),
            detail: String::new(),
        }
    }

    #[test]
    fn test_pad_to_uses_display_width() {
        assert_eq!(pad_to("Jörg", 6), "Jörg  ");
        assert_eq!(pad_to("寿司", 6), "寿司  ");
        assert_eq!(pad_to("toolong", 3), "toolong");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        let cut = truncate_to_width("Falafel-Dürüm with everything", 10);
        assert!(cut.ends_with('…'));
        assert!(cut.width() <= 10);
    }

    #[test]
    fn test_render_rows_empty() {
        assert!(render_rows(&[]).is_empty());
    }

    #[test]
    fn test_render_rows_shows_store_positions() {
        let rows = vec![
            make_row(2, "Zoë", "Döner", "Dürüm (King Kebabo's)"),
            make_row(0, "Anna", "YamYam", "No. 12"),
        ];
        let output = render_rows(&rows);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("3."));
        assert!(lines[0].contains("Dürüm (King Kebabo's)"));
        assert!(lines[1].contains("1."));
        assert!(lines[1].contains("No. 12"));
    }

    #[test]
    fn test_render_rows_detail_line() {
        let mut row = make_row(0, "Anna", "Edeka", "Leberkässemmel");
        row.detail = "Sauce: Senf".to_string();
        let output = render_rows(&[row]);
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains("Sauce: Senf"));
    }

    #[test]
    fn test_render_tally() {
        let mut tally = VoteTally::default();
        tally.cast("Anna", Kind::Kebab).unwrap();
        tally.cast("Ben", Kind::Kebab).unwrap();
        tally.cast("Cem", Kind::Deli).unwrap();
        let output = render_tally(&tally, &Catalog::default());
        assert!(output.contains("Döner"));
        assert!(output.contains(&BAR_MARK.repeat(2)));
        assert!(output.contains("Cem"));
    }

    #[test]
    fn test_render_status() {
        let status = StatusReport {
            session: "friday".to_string(),
            order_count: 1,
            per_restaurant: vec![("YamYam".to_string(), 1), ("Döner".to_string(), 0)],
            last_order: None,
            leading_vote: Some("Döner".to_string()),
            data_dir: PathBuf::from("/data"),
            cache_dir: PathBuf::from("/cache/friday"),
        };
        let output = render_status(&status);
        assert!(output.contains("friday"));
        assert!(output.contains("1 (YamYam 1, Döner 0)"));
        assert!(output.contains("/cache/friday"));
    }

    #[test]
    fn test_render_config_lists_keys() {
        let output = render_config(&LunchConfig::default());
        assert!(output.contains("session = default"));
        assert!(output.contains("max_number = 73"));
    }

    #[test]
    fn test_render_messages() {
        assert!(render_messages(&[]).is_empty());
        let output = render_messages(&[
            CmdMessage::info("Info message"),
            CmdMessage::warning("Warning message"),
        ]);
        assert!(output.contains("Info message"));
        assert!(output.contains("Warning message"));
    }
}
