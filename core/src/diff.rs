//! Schedule divergence scans.
//!
//! Compares two schedules aligned to one date label sequence, typically
//! the source-of-truth export against the admin-edited copy. An empty
//! cell means "no data from that source", so a slot only counts as
//! divergent when both sides carry a code and the codes differ.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates;

/// One slot where two aligned schedules disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleDivergence {
    pub index: usize,
    pub date_label: String,
    pub original: String,
    pub current: String,
}

fn diverges(original: &str, current: &str) -> bool {
    let original = original.trim();
    let current = current.trim();
    !original.is_empty() && !current.is_empty() && original != current
}

fn divergence_at(
    labels: &[String],
    original: &[String],
    current: &[String],
    index: usize,
) -> Option<ScheduleDivergence> {
    let label = labels.get(index)?;
    let orig = original.get(index)?;
    let cur = current.get(index)?;
    diverges(orig, cur).then(|| ScheduleDivergence {
        index,
        date_label: label.clone(),
        original: orig.trim().to_string(),
        current: cur.trim().to_string(),
    })
}

/// Scans the full schedule pair.
pub fn diff_schedules(
    labels: &[String],
    original: &[String],
    current: &[String],
) -> Vec<ScheduleDivergence> {
    (0..labels.len())
        .filter_map(|index| divergence_at(labels, original, current, index))
        .collect()
}

/// Divergence at a single date, resolved with fuzzy label matching.
pub fn diff_at(
    labels: &[String],
    original: &[String],
    current: &[String],
    label: &str,
) -> Option<ScheduleDivergence> {
    let index = dates::find_matching_label(labels, label)?;
    divergence_at(labels, original, current, index)
}

/// Divergences over the `days`-day window starting at `from`.
///
/// Window days whose label is not in `labels` contribute nothing.
pub fn diff_window(
    labels: &[String],
    original: &[String],
    current: &[String],
    from: NaiveDate,
    days: u32,
) -> Vec<ScheduleDivergence> {
    from.iter_days()
        .take(days as usize)
        .filter_map(|day| diff_at(labels, original, current, &dates::label_for_date(day)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn empty_cells_suppress_divergence() {
        let labels = strings(&["1Sep", "2Sep", "3Sep"]);
        let original = strings(&["M2", "", "D1"]);
        let current = strings(&["M3", "D2", "D1"]);
        let divergences = diff_schedules(&labels, &original, &current);
        assert_eq!(
            divergences,
            vec![ScheduleDivergence {
                index: 0,
                date_label: "1Sep".to_string(),
                original: "M2".to_string(),
                current: "M3".to_string(),
            }]
        );
    }

    #[test]
    fn identical_schedules_have_no_divergence() {
        let labels = strings(&["1Sep", "2Sep"]);
        let schedule = strings(&["M2", "DO"]);
        assert_eq!(diff_schedules(&labels, &schedule, &schedule), vec![]);
    }

    #[test]
    fn single_date_lookup_is_fuzzy() {
        let labels = strings(&["1Sep", "2Sep"]);
        let original = strings(&["M2", "DO"]);
        let current = strings(&["M2", "D1"]);
        let divergence = diff_at(&labels, &original, &current, "02-Sep").unwrap();
        assert_eq!(divergence.index, 1);
        assert_eq!(divergence.original, "DO");
        assert_eq!(divergence.current, "D1");
        assert!(diff_at(&labels, &original, &current, "1Sep").is_none());
        assert!(diff_at(&labels, &original, &current, "9Sep").is_none());
    }

    #[test]
    fn window_scan_picks_up_changes_inside_the_range() {
        let labels = strings(&["5Sep", "6Sep", "7Sep"]);
        let original = strings(&["M2", "M2", "M2"]);
        let current = strings(&["M2", "M3", "M2"]);
        let from = NaiveDate::from_ymd_opt(2025, 9, 5).unwrap();
        let divergences = diff_window(&labels, &original, &current, from, 30);
        assert_eq!(divergences.len(), 1);
        assert_eq!(divergences[0].date_label, "6Sep");
    }

    #[test]
    fn window_scan_respects_its_length() {
        let labels = strings(&["5Sep", "6Sep", "7Sep"]);
        let original = strings(&["M2", "M2", "M2"]);
        let current = strings(&["M2", "M3", "M3"]);
        let from = NaiveDate::from_ymd_opt(2025, 9, 5).unwrap();
        let divergences = diff_window(&labels, &original, &current, from, 1);
        assert_eq!(divergences, vec![]);
    }
}
