//! Fragment merging.
//!
//! Monthly exports overlap at the seams, repeat employees and sometimes
//! move them between teams. The merge unions everything into one roster:
//! the full date label sequence is fixed first, then every fragment is
//! overlaid in the supplied order, so the later fragment wins wherever two
//! fragments disagree about the same cell or the same employee's team.

use std::collections::HashMap;

use tracing::debug;

use crate::dates;
use crate::model::{self, Employee, Roster, Team};
use crate::parser::RosterFragment;

/// Merges fragments into one canonical roster.
///
/// Pass one unions the date labels in first-seen order and sorts them
/// chronologically, so slot indices never move once schedules are
/// allocated. Pass two populates employees, overlaying each fragment's
/// non-empty cells into the matching global slots. An employee found under
/// a new team moves there, keeping one record per id.
pub fn merge_fragments(fragments: &[RosterFragment]) -> Roster {
    let mut date_labels: Vec<String> = Vec::new();
    for fragment in fragments {
        for label in &fragment.date_labels {
            if !date_labels.contains(label) {
                date_labels.push(label.clone());
            }
        }
    }
    dates::sort_date_labels(&mut date_labels);

    let index_of: HashMap<String, usize> = date_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.clone(), i))
        .collect();

    let mut teams: Vec<Team> = Vec::new();
    for fragment in fragments {
        let slots: Vec<Option<usize>> = fragment
            .date_labels
            .iter()
            .map(|l| index_of.get(l).copied())
            .collect();
        for frag_team in &fragment.teams {
            let team_idx = model::team_index_or_insert(&mut teams, &frag_team.name);
            for incoming in &frag_team.employees {
                match locate(&teams, &incoming.id) {
                    Some((ti, ei)) if ti == team_idx => {
                        overlay(&mut teams[ti].employees[ei].schedule, &incoming.schedule, &slots);
                    }
                    Some((ti, ei)) => {
                        debug!(
                            "employee {} moved from team {} to {}",
                            incoming.id, teams[ti].name, frag_team.name
                        );
                        let mut record = teams[ti].employees.remove(ei);
                        overlay(&mut record.schedule, &incoming.schedule, &slots);
                        record.team = frag_team.name.clone();
                        teams[team_idx].employees.push(record);
                    }
                    None => {
                        let mut record = Employee {
                            id: incoming.id.clone(),
                            name: incoming.name.clone(),
                            team: frag_team.name.clone(),
                            schedule: vec![String::new(); date_labels.len()],
                        };
                        overlay(&mut record.schedule, &incoming.schedule, &slots);
                        teams[team_idx].employees.push(record);
                    }
                }
            }
        }
    }

    Roster { date_labels, teams }
}

fn overlay(target: &mut [String], source: &[String], slots: &[Option<usize>]) {
    for (cell, slot) in source.iter().zip(slots) {
        let Some(idx) = slot else { continue };
        let value = cell.trim();
        if value.is_empty() {
            continue;
        }
        if let Some(dst) = target.get_mut(*idx) {
            *dst = value.to_string();
        }
    }
}

fn locate(teams: &[Team], id: &str) -> Option<(usize, usize)> {
    teams.iter().enumerate().find_map(|(ti, team)| {
        team.employees
            .iter()
            .position(|e| e.id == id)
            .map(|ei| (ti, ei))
    })
}
