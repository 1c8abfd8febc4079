//! Roster export parsing.
//!
//! Exports arrive as comma-separated text: a title row, a header row with
//! three fixed columns ("Team,Name,ID") followed by one date label per
//! column, then employee rows grouped under team headings. A non-blank
//! team cell opens a team context that carries over the blank-team rows
//! beneath it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates;
use crate::model::{self, Employee, Team};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "not enough data: expected a title row, a header row and at least one employee row, got {lines} non-empty lines"
    )]
    NotEnoughData { lines: usize },
}

/// One parsed, unmerged export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterFragment {
    pub date_labels: Vec<String>,
    pub teams: Vec<Team>,
}

fn clean_cell(cell: &str) -> &str {
    cell.trim().trim_matches('"').trim()
}

/// Parses one export into a fragment.
///
/// Rows that do not describe an employee are skipped rather than failing
/// the whole export: short rows, rows with a missing name or id, and rows
/// that appear before any team heading. Every schedule is normalized to
/// exactly the fragment's date label count.
pub fn parse_roster_csv(text: &str) -> Result<RosterFragment, ParseError> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 3 {
        return Err(ParseError::NotEnoughData { lines: lines.len() });
    }

    // Row 0 is the export title. The date labels start after the three
    // fixed columns of row 1.
    let mut date_labels: Vec<String> = lines[1]
        .split(',')
        .skip(3)
        .map(|cell| dates::normalize_date_label(clean_cell(cell)))
        .collect();
    while date_labels.last().is_some_and(String::is_empty) {
        date_labels.pop();
    }

    let mut teams: Vec<Team> = Vec::new();
    let mut current_team: Option<usize> = None;

    for line in &lines[2..] {
        let cells: Vec<&str> = line.split(',').map(clean_cell).collect();
        if cells.len() < 4 {
            debug!("skipping short row: {line:?}");
            continue;
        }
        if !cells[0].is_empty() {
            current_team = Some(model::team_index_or_insert(&mut teams, cells[0]));
        }
        let Some(team_idx) = current_team else {
            debug!("skipping row before any team heading: {line:?}");
            continue;
        };
        let (name, id) = (cells[1], cells[2]);
        if name.is_empty() || id.is_empty() {
            debug!("skipping row with missing name or id: {line:?}");
            continue;
        }
        let mut schedule: Vec<String> = cells[3..].iter().map(|c| c.to_string()).collect();
        schedule.resize(date_labels.len(), String::new());
        let team_name = teams[team_idx].name.clone();
        teams[team_idx].employees.push(Employee {
            id: id.to_string(),
            name: name.to_string(),
            team: team_name,
            schedule,
        });
    }

    Ok(RosterFragment { date_labels, teams })
}

/// Builds an empty upload template whose shape `parse_roster_csv` accepts.
pub fn template_csv(date_labels: &[String]) -> String {
    let headers = date_labels.join(",");
    let blanks = ",".repeat(date_labels.len());
    format!(
        "Team Roster Template\n\
         Team,Name,ID,{headers}\n\
         Team A,John Doe,SLL-1001{blanks}\n\
         ,Jane Smith,SLL-1002{blanks}\n"
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = "September Roster\n\
        Team,Name,ID,1Sep,2Sep,3Sep\n\
        Support,Asha Rao,SLL-1001,M2,DO,M2\n\
        ,Dev Nair,SLL-1002,D1,,D1\n\
        Night,Lena Fox,SLL-2001,D2,D2,DO\n";

    #[test]
    fn parses_teams_with_carry_over_context() {
        let fragment = parse_roster_csv(SAMPLE).unwrap();
        assert_eq!(fragment.date_labels, vec!["1Sep", "2Sep", "3Sep"]);
        assert_eq!(fragment.teams.len(), 2);
        assert_eq!(fragment.teams[0].name, "Support");
        assert_eq!(fragment.teams[0].employees.len(), 2);
        assert_eq!(fragment.teams[0].employees[1].name, "Dev Nair");
        assert_eq!(fragment.teams[0].employees[1].team, "Support");
        assert_eq!(fragment.teams[1].employees[0].schedule, vec!["D2", "D2", "DO"]);
    }

    #[test]
    fn too_few_lines_is_an_error() {
        let err = parse_roster_csv("Title\nTeam,Name,ID,1Sep\n").unwrap_err();
        assert_eq!(err, ParseError::NotEnoughData { lines: 2 });
    }

    #[test]
    fn blank_lines_do_not_count() {
        let text = "Title\n\n\nTeam,Name,ID,1Sep\n\n";
        let err = parse_roster_csv(text).unwrap_err();
        assert_eq!(err, ParseError::NotEnoughData { lines: 2 });
    }

    #[test]
    fn rows_with_missing_name_or_id_are_skipped() {
        let text = "Title\n\
            Team,Name,ID,1Sep\n\
            Support,,SLL-1001,M2\n\
            Support,Asha Rao,,M2\n\
            Support,Asha Rao,SLL-1001,M2\n";
        let fragment = parse_roster_csv(text).unwrap();
        assert_eq!(fragment.teams.len(), 1);
        assert_eq!(fragment.teams[0].employees.len(), 1);
        assert_eq!(fragment.teams[0].employees[0].id, "SLL-1001");
    }

    #[test]
    fn rows_before_any_team_are_skipped() {
        let text = "Title\n\
            Team,Name,ID,1Sep\n\
            ,Ghost Row,SLL-9999,M2\n\
            Support,Asha Rao,SLL-1001,M2\n";
        let fragment = parse_roster_csv(text).unwrap();
        assert_eq!(fragment.teams.len(), 1);
        assert_eq!(fragment.teams[0].employees.len(), 1);
    }

    #[test]
    fn short_rows_are_skipped() {
        let text = "Title\n\
            Team,Name,ID,1Sep\n\
            Support,Asha Rao\n\
            Support,Asha Rao,SLL-1001,M2\n";
        let fragment = parse_roster_csv(text).unwrap();
        assert_eq!(fragment.teams[0].employees.len(), 1);
    }

    #[test]
    fn schedules_are_normalized_to_header_count() {
        let text = "Title\n\
            Team,Name,ID,1Sep,2Sep,3Sep\n\
            Support,Asha Rao,SLL-1001,M2\n\
            ,Dev Nair,SLL-1002,D1,D1,D1,D1,D1\n";
        let fragment = parse_roster_csv(text).unwrap();
        assert_eq!(fragment.teams[0].employees[0].schedule, vec!["M2", "", ""]);
        assert_eq!(fragment.teams[0].employees[1].schedule, vec!["D1", "D1", "D1"]);
    }

    #[test]
    fn quoted_cells_and_messy_headers_are_cleaned() {
        let text = "Title\n\
            Team,Name,ID,\"05-Sep\",\" 6 Sep \"\n\
            \"Support\",\"Asha Rao\",\"SLL-1001\",\"M2\",DO\n";
        let fragment = parse_roster_csv(text).unwrap();
        assert_eq!(fragment.date_labels, vec!["5Sep", "6Sep"]);
        assert_eq!(fragment.teams[0].name, "Support");
        assert_eq!(fragment.teams[0].employees[0].schedule, vec!["M2", "DO"]);
    }

    #[test]
    fn trailing_empty_headers_are_dropped() {
        let text = "Title\n\
            Team,Name,ID,1Sep,2Sep,,\n\
            Support,Asha Rao,SLL-1001,M2,DO,,\n";
        let fragment = parse_roster_csv(text).unwrap();
        assert_eq!(fragment.date_labels, vec!["1Sep", "2Sep"]);
        assert_eq!(fragment.teams[0].employees[0].schedule, vec!["M2", "DO"]);
    }

    #[test]
    fn template_round_trips_through_the_parser() {
        let labels = vec!["1Sep".to_string(), "2Sep".to_string()];
        let fragment = parse_roster_csv(&template_csv(&labels)).unwrap();
        assert_eq!(fragment.date_labels, labels);
        assert_eq!(fragment.teams.len(), 1);
        assert_eq!(fragment.teams[0].employees.len(), 2);
        for employee in &fragment.teams[0].employees {
            assert_eq!(employee.schedule, vec!["", ""]);
        }
    }
}
