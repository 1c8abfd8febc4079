//! Dashboard scans over one employee's schedule.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::dates;
use crate::model::{Employee, Roster};
use crate::shift_code::ShiftCode;

/// Default window for the upcoming-shift and shift-change views.
pub const SHIFT_WINDOW_DAYS: u32 = 30;
/// Default window for the time-off view.
pub const TIME_OFF_WINDOW_DAYS: u32 = 90;

/// One calendar day resolved against the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledDay {
    pub date: NaiveDate,
    pub date_label: String,
    pub shift: String,
}

fn resolve_day(roster: &Roster, employee: &Employee, day: NaiveDate) -> Option<ScheduledDay> {
    let label = dates::label_for_date(day);
    let index = roster.date_labels.iter().position(|l| *l == label)?;
    let shift = employee.schedule.get(index)?.trim().to_string();
    Some(ScheduledDay {
        date: day,
        date_label: label,
        shift,
    })
}

/// Working shifts over the `days`-day window starting at `from`.
///
/// Days missing from the roster, empty cells and days off are skipped.
pub fn upcoming_shifts(
    roster: &Roster,
    employee: &Employee,
    from: NaiveDate,
    days: u32,
) -> Vec<ScheduledDay> {
    from.iter_days()
        .take(days as usize)
        .filter_map(|day| resolve_day(roster, employee, day))
        .filter(|day| {
            !day.shift.is_empty() && ShiftCode::parse(&day.shift) != Some(ShiftCode::DayOff)
        })
        .collect()
}

/// Time-off days over the window: cells that are "DO" or empty, with
/// weekends excluded.
pub fn upcoming_time_off(
    roster: &Roster,
    employee: &Employee,
    from: NaiveDate,
    days: u32,
) -> Vec<ScheduledDay> {
    from.iter_days()
        .take(days as usize)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .filter_map(|day| resolve_day(roster, employee, day))
        .filter(|day| day.shift.is_empty() || ShiftCode::parse(&day.shift) == Some(ShiftCode::DayOff))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Team;

    // 2025-09-01 is a Monday.
    fn roster_for_week() -> (Roster, NaiveDate) {
        let labels: Vec<String> = (1..=7).map(|d| format!("{d}Sep")).collect();
        let schedule = vec![
            "M2".to_string(), // Mon 1Sep
            "DO".to_string(), // Tue 2Sep
            String::new(),    // Wed 3Sep
            "D1".to_string(), // Thu 4Sep
            "DO".to_string(), // Fri 5Sep
            "DO".to_string(), // Sat 6Sep
            "M2".to_string(), // Sun 7Sep
        ];
        let roster = Roster {
            date_labels: labels,
            teams: vec![Team {
                name: "Support".to_string(),
                employees: vec![Employee {
                    id: "SLL-1001".to_string(),
                    name: "Asha Rao".to_string(),
                    team: "Support".to_string(),
                    schedule,
                }],
            }],
        };
        let monday = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        (roster, monday)
    }

    #[test]
    fn upcoming_shifts_skip_days_off_and_gaps() {
        let (roster, monday) = roster_for_week();
        let employee = roster.find_employee("SLL-1001").unwrap();
        let shifts = upcoming_shifts(&roster, employee, monday, 7);
        let labels: Vec<&str> = shifts.iter().map(|s| s.date_label.as_str()).collect();
        assert_eq!(labels, vec!["1Sep", "4Sep", "7Sep"]);
        assert_eq!(shifts[0].shift, "M2");
    }

    #[test]
    fn time_off_excludes_weekends() {
        let (roster, monday) = roster_for_week();
        let employee = roster.find_employee("SLL-1001").unwrap();
        let days = upcoming_time_off(&roster, employee, monday, 7);
        let labels: Vec<&str> = days.iter().map(|d| d.date_label.as_str()).collect();
        // Saturday 6Sep is "DO" but never reported.
        assert_eq!(labels, vec!["2Sep", "3Sep", "5Sep"]);
    }

    #[test]
    fn days_outside_the_roster_contribute_nothing() {
        let (roster, monday) = roster_for_week();
        let employee = roster.find_employee("SLL-1001").unwrap();
        let far_future = monday + chrono::Days::new(365);
        assert_eq!(upcoming_shifts(&roster, employee, far_future, 30), vec![]);
        assert_eq!(upcoming_time_off(&roster, employee, far_future, 30), vec![]);
    }
}
