//! Date label helpers.
//!
//! Roster columns are keyed by compact day-plus-month labels such as
//! "5Sep". The source exports are inconsistent about padding, separators
//! and casing ("05-Sep", "5 september"), so every lookup normalizes first
//! and falls back to fuzzier matching.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex_lite::Regex;

static DAY_MONTH_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\d+)([A-Za-z]+)$").ok());

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn compact(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, ' ' | '-' | '.')).collect()
}

fn month_abbrev(name: &str) -> String {
    let prefix: String = name.chars().take(3).collect();
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Month number (1-12) for a month name or abbreviation, any casing.
pub fn month_number(name: &str) -> Option<u32> {
    let abbrev = month_abbrev(name);
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(&abbrev))
        .map(|i| i as u32 + 1)
}

/// Normalizes a raw header cell to canonical "5Sep" form.
///
/// Separators are stripped, leading zeros dropped from the day and the
/// month reduced to a capitalized three-letter abbreviation. Cells that do
/// not look like day-plus-month come back trimmed but otherwise untouched.
pub fn normalize_date_label(raw: &str) -> String {
    let compacted = compact(raw);
    let Some(caps) = DAY_MONTH_RE.as_ref().and_then(|re| re.captures(&compacted)) else {
        return raw.trim().to_string();
    };
    let (Some(day), Some(month)) = (caps.get(1), caps.get(2)) else {
        return raw.trim().to_string();
    };
    let day = day.as_str().trim_start_matches('0');
    let day = if day.is_empty() { "0" } else { day };
    format!("{day}{}", month_abbrev(month.as_str()))
}

/// Splits a label into (day, month number), when it parses as one.
pub fn split_label(label: &str) -> Option<(u32, u32)> {
    let compacted = compact(label);
    let caps = DAY_MONTH_RE.as_ref()?.captures(&compacted)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    if day == 0 || day > 31 {
        return None;
    }
    let month = month_number(caps.get(2)?.as_str())?;
    Some((day, month))
}

/// Finds the index of `wanted` within `labels`.
///
/// Tries an exact match on normalized forms first, then case-insensitive,
/// then substring containment in either direction.
pub fn find_matching_label(labels: &[String], wanted: &str) -> Option<usize> {
    let target = normalize_date_label(wanted);
    if target.is_empty() {
        return None;
    }
    if let Some(idx) = labels.iter().position(|l| normalize_date_label(l) == target) {
        return Some(idx);
    }
    let lowered = target.to_ascii_lowercase();
    if let Some(idx) = labels
        .iter()
        .position(|l| normalize_date_label(l).eq_ignore_ascii_case(&target))
    {
        return Some(idx);
    }
    labels.iter().position(|l| {
        let norm = normalize_date_label(l).to_ascii_lowercase();
        !norm.is_empty() && (norm.contains(&lowered) || lowered.contains(&norm))
    })
}

/// Canonical label for a real calendar date, e.g. 2025-09-05 becomes "5Sep".
pub fn label_for_date(date: NaiveDate) -> String {
    format!("{}{}", date.day(), date.format("%b"))
}

/// Labels for every day of the given month, in order.
pub fn labels_for_month(year: i32, month: u32) -> Vec<String> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(label_for_date)
        .collect()
}

/// Sorts labels chronologically in place.
///
/// Labels carry no year, so months are ranked relative to the month of the
/// first parseable label. A December roster that spills into January stays
/// in calendar order. Labels that do not parse keep their relative order
/// after all parseable ones.
pub fn sort_date_labels(labels: &mut [String]) {
    let Some(pivot) = labels.iter().find_map(|l| split_label(l).map(|(_, m)| m)) else {
        return;
    };
    labels.sort_by_cached_key(|l| match split_label(l) {
        Some((day, month)) => (0u8, (month + 12 - pivot) % 12, day),
        None => (1u8, 0, 0),
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_strips_padding_and_separators() {
        assert_eq!(normalize_date_label("05-Sep"), "5Sep");
        assert_eq!(normalize_date_label(" 5 september "), "5Sep");
        assert_eq!(normalize_date_label("5.Sep"), "5Sep");
        assert_eq!(normalize_date_label("5Sep"), "5Sep");
    }

    #[test]
    fn normalize_leaves_non_date_cells_trimmed() {
        assert_eq!(normalize_date_label("  Notes  "), "Notes");
        assert_eq!(normalize_date_label(""), "");
    }

    #[test]
    fn month_numbers_accept_full_names() {
        assert_eq!(month_number("Sep"), Some(9));
        assert_eq!(month_number("september"), Some(9));
        assert_eq!(month_number("DECEMBER"), Some(12));
        assert_eq!(month_number("Notamonth"), None);
    }

    #[test]
    fn matching_is_exact_then_fuzzy() {
        let labels = vec!["1Sep".to_string(), "2Sep".to_string(), "3Sep".to_string()];
        assert_eq!(find_matching_label(&labels, "2Sep"), Some(1));
        assert_eq!(find_matching_label(&labels, "02-Sep"), Some(1));
        assert_eq!(find_matching_label(&labels, "2SEP"), Some(1));
        assert_eq!(find_matching_label(&labels, "4Sep"), None);
    }

    #[test]
    fn matching_falls_back_to_substring() {
        let labels = vec!["Week of 5Sep".to_string()];
        assert_eq!(find_matching_label(&labels, "5Sep"), Some(0));
    }

    #[test]
    fn empty_query_never_matches() {
        let labels = vec!["1Sep".to_string()];
        assert_eq!(find_matching_label(&labels, ""), None);
        assert_eq!(find_matching_label(&labels, "   "), None);
    }

    #[test]
    fn label_for_date_matches_header_form() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 5).unwrap();
        assert_eq!(label_for_date(date), "5Sep");
    }

    #[test]
    fn month_labels_cover_the_whole_month() {
        let labels = labels_for_month(2025, 9);
        assert_eq!(labels.len(), 30);
        assert_eq!(labels.first().map(String::as_str), Some("1Sep"));
        assert_eq!(labels.last().map(String::as_str), Some("30Sep"));
    }

    #[test]
    fn sort_orders_within_a_month() {
        let mut labels = vec!["10Sep".to_string(), "2Sep".to_string(), "1Oct".to_string()];
        sort_date_labels(&mut labels);
        assert_eq!(labels, vec!["2Sep", "10Sep", "1Oct"]);
    }

    #[test]
    fn sort_keeps_december_to_january_cycle_in_order() {
        let mut labels = vec!["31Dec".to_string(), "1Jan".to_string(), "30Dec".to_string()];
        sort_date_labels(&mut labels);
        assert_eq!(labels, vec!["30Dec", "31Dec", "1Jan"]);
    }

    #[test]
    fn sort_sinks_unparseable_labels_stably() {
        let mut labels = vec![
            "Notes".to_string(),
            "2Sep".to_string(),
            "Extra".to_string(),
            "1Sep".to_string(),
        ];
        sort_date_labels(&mut labels);
        assert_eq!(labels, vec!["1Sep", "2Sep", "Notes", "Extra"]);
    }
}
