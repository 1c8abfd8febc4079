//! Core roster aggregates.
//!
//! A `Roster` is the canonical merged view: one ordered date label
//! sequence and the teams currently assigned under it. Every employee
//! lives in exactly one team; flat employee views are derived through the
//! iterator helpers instead of being stored twice.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::dates;

static EMPLOYEE_ID_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^SLL-\d+$").ok());

/// True when `id` matches the `SLL-<digits>` employee id convention.
pub fn is_valid_employee_id(id: &str) -> bool {
    EMPLOYEE_ID_RE
        .as_ref()
        .is_some_and(|re| re.is_match(id.trim()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Name of the team this employee currently belongs to.
    pub team: String,
    /// One shift code per canonical date label; `""` means no data.
    pub schedule: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub employees: Vec<Employee>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub date_labels: Vec<String>,
    pub teams: Vec<Team>,
}

impl Roster {
    /// Iterates every employee across teams in roster order.
    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.teams.iter().flat_map(|t| t.employees.iter())
    }

    pub fn employee_count(&self) -> usize {
        self.teams.iter().map(|t| t.employees.len()).sum()
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn find_employee(&self, id: &str) -> Option<&Employee> {
        self.employees().find(|e| e.id == id)
    }

    pub fn find_employee_mut(&mut self, id: &str) -> Option<&mut Employee> {
        self.teams
            .iter_mut()
            .flat_map(|t| t.employees.iter_mut())
            .find(|e| e.id == id)
    }

    /// Resolves a date label to its column index, tolerating formatting
    /// drift between the query and the stored headers.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        dates::find_matching_label(&self.date_labels, label)
    }

    /// Raw shift code for `employee` on `label`. `None` when the label is
    /// unknown to this roster or the cell is empty.
    pub fn shift_for_date<'a>(&self, employee: &'a Employee, label: &str) -> Option<&'a str> {
        let idx = self.label_index(label)?;
        match employee.schedule.get(idx) {
            Some(cell) if !cell.trim().is_empty() => Some(cell.as_str()),
            _ => None,
        }
    }

    /// Team colleagues of `id`, excluding the employee themselves.
    pub fn teammates(&self, id: &str) -> Vec<&Employee> {
        let Some(me) = self.find_employee(id) else {
            return Vec::new();
        };
        match self.team(&me.team) {
            Some(team) => team.employees.iter().filter(|e| e.id != id).collect(),
            None => Vec::new(),
        }
    }
}

/// Index of the team named `name`, inserting an empty team at the back
/// when it is not present yet.
pub(crate) fn team_index_or_insert(teams: &mut Vec<Team>, name: &str) -> usize {
    if let Some(idx) = teams.iter().position(|t| t.name == name) {
        return idx;
    }
    teams.push(Team {
        name: name.to_string(),
        employees: Vec::new(),
    });
    teams.len() - 1
}
