//! Admin schedule edits and the modification audit log.
//!
//! Edits mutate the in-memory roster and return a record of what changed,
//! which callers feed into the `ModificationLog` and push to the backend.
//! The log itself is a plain value; where it is persisted is the caller's
//! concern.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Roster;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("employee not found: {id}")]
    EmployeeNotFound { id: String },

    #[error("date index {index} out of range for roster with {len} dates")]
    DateOutOfRange { index: usize, len: usize },
}

/// Outcome of one applied edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedEdit {
    pub employee_id: String,
    pub employee_name: String,
    pub team: String,
    pub date_index: usize,
    pub date_label: String,
    pub old_shift: String,
    pub new_shift: String,
}

/// Sets one employee's shift for one date.
pub fn set_shift(
    roster: &mut Roster,
    employee_id: &str,
    date_index: usize,
    new_shift: &str,
) -> Result<AppliedEdit, EditError> {
    let len = roster.date_labels.len();
    if date_index >= len {
        return Err(EditError::DateOutOfRange { index: date_index, len });
    }
    let date_label = roster.date_labels[date_index].clone();
    let employee = roster
        .find_employee_mut(employee_id)
        .ok_or_else(|| EditError::EmployeeNotFound {
            id: employee_id.to_string(),
        })?;
    let new_shift = new_shift.trim().to_string();
    let old_shift = employee.schedule.get(date_index).cloned().unwrap_or_default();
    if let Some(cell) = employee.schedule.get_mut(date_index) {
        cell.clone_from(&new_shift);
    }
    Ok(AppliedEdit {
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        team: employee.team.clone(),
        date_index,
        date_label,
        old_shift,
        new_shift,
    })
}

/// Swaps two employees' shifts on one date, returning both edit records.
///
/// Both employees are resolved and both current shifts read before either
/// cell is written, so a missing second employee leaves the roster
/// untouched.
pub fn swap_shifts(
    roster: &mut Roster,
    first_id: &str,
    second_id: &str,
    date_index: usize,
) -> Result<(AppliedEdit, AppliedEdit), EditError> {
    let first_shift = shift_of(roster, first_id, date_index)?;
    let second_shift = shift_of(roster, second_id, date_index)?;
    let first = set_shift(roster, first_id, date_index, &second_shift)?;
    let second = set_shift(roster, second_id, date_index, &first_shift)?;
    Ok((first, second))
}

fn shift_of(roster: &Roster, id: &str, date_index: usize) -> Result<String, EditError> {
    let len = roster.date_labels.len();
    if date_index >= len {
        return Err(EditError::DateOutOfRange { index: date_index, len });
    }
    let employee = roster
        .find_employee(id)
        .ok_or_else(|| EditError::EmployeeNotFound { id: id.to_string() })?;
    Ok(employee.schedule.get(date_index).cloned().unwrap_or_default())
}

/// One audit entry for an applied edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftModification {
    pub employee_id: String,
    pub employee_name: String,
    pub team: String,
    pub date_label: String,
    pub old_shift: String,
    pub new_shift: String,
    pub modified_by: String,
    pub timestamp: DateTime<Utc>,
    /// Month bucket `YYYY-MM` the stats view groups by.
    pub month_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModificationLog {
    pub entries: Vec<ShiftModification>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub total_modifications: usize,
    /// Distinct employees touched this month.
    pub employees_modified: usize,
    pub modifications_by_user: HashMap<String, usize>,
}

impl ModificationLog {
    pub fn record(&mut self, edit: &AppliedEdit, modified_by: &str, at: DateTime<Utc>) {
        self.entries.push(ShiftModification {
            employee_id: edit.employee_id.clone(),
            employee_name: edit.employee_name.clone(),
            team: edit.team.clone(),
            date_label: edit.date_label.clone(),
            old_shift: edit.old_shift.clone(),
            new_shift: edit.new_shift.clone(),
            modified_by: modified_by.to_string(),
            timestamp: at,
            month_key: at.format("%Y-%m").to_string(),
        });
    }

    /// Latest `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&ShiftModification> {
        let mut sorted: Vec<&ShiftModification> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted.truncate(limit);
        sorted
    }

    pub fn monthly_stats(&self, month_key: &str) -> MonthlyStats {
        let mut stats = MonthlyStats::default();
        let mut seen: HashSet<&str> = HashSet::new();
        for entry in self.entries.iter().filter(|e| e.month_key == month_key) {
            stats.total_modifications += 1;
            if seen.insert(entry.employee_id.as_str()) {
                stats.employees_modified += 1;
            }
            *stats
                .modifications_by_user
                .entry(entry.modified_by.clone())
                .or_insert(0) += 1;
        }
        stats
    }

    /// Month keys present in the log, newest first.
    pub fn month_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !keys.contains(&entry.month_key) {
                keys.push(entry.month_key.clone());
            }
        }
        keys.sort_by(|a, b| b.cmp(a));
        keys
    }
}
