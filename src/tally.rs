use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{CategoryTally, Entry};

pub const DATE_FORMAT: &str = "%d-%b-%y";

/// Counts the entries of `month` per category. Categories without entries stay at zero.
pub fn count_categories(entries: &[Entry], month: &str) -> CategoryTally {
    let mut tally = CategoryTally::default();

    for entry in entries.iter().filter(|entry| entry.in_month(month)) {
        tally.increment(entry.category);
    }

    tally
}

/// Month abbreviations present in the data, in calendar order.
///
/// Dates that do not parse as `3-Jan-24` are skipped.
pub fn distinct_months(entries: &[Entry]) -> Vec<String> {
    let mut months = BTreeMap::new();

    for entry in entries {
        match NaiveDate::parse_from_str(&entry.date, DATE_FORMAT) {
            Ok(date) => {
                months
                    .entry(date.month())
                    .or_insert_with(|| date.format("%b").to_string());
            }
            Err(err) => log::debug!("Skipping unparsed date `{}`: {}", entry.date, err),
        }
    }

    months.into_values().collect()
}
