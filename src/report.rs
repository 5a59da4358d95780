use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::chart::MonthView;
use crate::models::Entry;
use crate::stack;

pub fn build_report(month: &str, generated_at: DateTime<Utc>, entries: &[Entry]) -> String {
    let view = MonthView::compute(entries, month);
    let matching: Vec<&Entry> = entries.iter().filter(|entry| entry.in_month(month)).collect();

    let mut output = String::new();
    let month_label = if month.is_empty() { "all months" } else { month };

    let _ = writeln!(output, "# Feelings Report");
    let _ = writeln!(
        output,
        "Generated for {} on {}",
        month_label,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Category Mix");

    if view.tally.total() == 0 {
        let _ = writeln!(output, "No entries recorded for this month.");
    } else {
        for (category, count) in view.tally.iter() {
            let _ = writeln!(
                output,
                "- {}: {} ({:.1}%)",
                category,
                count,
                view.tally.share(category) * 100.0
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Intensity Columns");

    if view.points.is_empty() {
        let _ = writeln!(output, "No entries recorded for this month.");
    } else {
        for (level, count) in stack::column_sizes(&view.points) {
            let top = view
                .points
                .iter()
                .filter(|point| point.degree == level)
                .map(|point| point.stack_height)
                .reduce(f64::max);
            match top {
                Some(height) => {
                    let _ = writeln!(output, "- {level}: {count} entries (stack top {height:.1})");
                }
                None => {
                    let _ = writeln!(output, "- {level}: no entries");
                }
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Entries");

    if matching.is_empty() {
        let _ = writeln!(output, "No entries recorded for this month.");
    } else {
        for entry in matching {
            let _ = writeln!(
                output,
                "- {} [{} / {}]: {}",
                entry.date, entry.degree, entry.category, entry.feeling
            );
        }
    }

    output
}
