//! Wire types for the backend REST API.
//!
//! Request body keys are camelCase on the wire; response keys are mostly
//! snake_case with a few camelCase stragglers (`allEmployees`), matching
//! the backend exactly.

use std::collections::{BTreeMap, HashMap};

use roster_core::{Employee, Roster, Team};
use serde::{Deserialize, Serialize};

/// Employee entry as the backend serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEmployee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub schedule: Vec<String>,
}

/// Roster payload returned by the `get-display-data`, `get-google-data`
/// and `get-admin-data` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub headers: Vec<String>,

    /// Teams keyed by name. JSON object key order is not preserved, so
    /// `into_roster` derives team order from `allEmployees` instead.
    #[serde(default)]
    pub teams: BTreeMap<String, Vec<SnapshotEmployee>>,

    #[serde(default, rename = "allEmployees")]
    pub all_employees: Vec<SnapshotEmployee>,
}

impl RosterSnapshot {
    /// Canonical roster view of this snapshot.
    ///
    /// Employees are grouped by their team field in `allEmployees` order,
    /// which is the backend's own team ordering. Teams present in the map
    /// with no employees are dropped. Schedules are normalized to the
    /// header count.
    pub fn into_roster(self) -> Roster {
        let date_len = self.headers.len();
        let mut teams: Vec<Team> = Vec::new();
        for entry in self.all_employees {
            let team_idx = match teams.iter().position(|t| t.name == entry.team) {
                Some(idx) => idx,
                None => {
                    teams.push(Team {
                        name: entry.team.clone(),
                        employees: Vec::new(),
                    });
                    teams.len() - 1
                }
            };
            let mut schedule = entry.schedule;
            schedule.resize(date_len, String::new());
            teams[team_idx].employees.push(Employee {
                id: entry.id,
                name: entry.name,
                team: entry.team,
                schedule,
            });
        }
        Roster {
            date_labels: self.headers,
            teams,
        }
    }
}

/// Which copy of the roster an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftSource {
    Admin,
    Google,
}

/// Body of `update-shift`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftUpdate {
    pub employee_id: String,
    pub date_index: usize,
    pub new_shift: String,
    pub source: ShiftSource,
    /// The source-of-truth shift for the same cell; the backend records a
    /// modification only when the new admin shift differs from it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_shift: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveAction {
    Add,
    Edit,
}

/// Body of `save-employee`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEmployee {
    pub name: String,
    pub id: String,
    pub team: String,
    pub action: SaveAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_team: Option<String>,
}

/// Body of `submit-shift-change`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftChangeSubmission {
    pub employee_id: String,
    pub employee_name: String,
    pub team: String,
    pub date: String,
    pub current_shift: String,
    pub requested_shift: String,
    pub reason: String,
}

/// Body of `submit-swap-request`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapSubmission {
    pub requester_id: String,
    pub requester_name: String,
    pub target_employee_id: String,
    pub target_employee_name: String,
    pub team: String,
    pub date: String,
    pub requester_shift: String,
    pub target_shift: String,
    pub reason: String,
}

/// One entry of the `get-team-members` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub shift_display: String,
}

/// Response of `get-employee-shift-history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftHistory {
    #[serde(default)]
    pub employee: Option<SnapshotEmployee>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub google_schedule: Vec<String>,
    #[serde(default)]
    pub admin_schedule: Vec<String>,
    #[serde(default)]
    pub modifications: Vec<RemoteModification>,
}

/// Modification entry as the backend records it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteModification {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub employee_name: String,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub date_index: Option<usize>,
    #[serde(default)]
    pub date_header: String,
    #[serde(default)]
    pub old_shift: String,
    #[serde(default)]
    pub new_shift: String,
    #[serde(default)]
    pub modified_by: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub month_year: String,
}

/// Current-month stats block of `get-modified-shifts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteMonthlyStats {
    #[serde(default)]
    pub total_modifications: usize,
    /// Ids of the employees touched this month.
    #[serde(default)]
    pub employees_modified: Vec<String>,
    #[serde(default)]
    pub modifications_by_user: HashMap<String, usize>,
}

/// Response of `get-modified-shifts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifiedShiftsReport {
    #[serde(default)]
    pub monthly_stats: RemoteMonthlyStats,
    #[serde(default)]
    pub recent_modifications: Vec<RemoteModification>,
    #[serde(default)]
    pub current_month: String,
}

/// Response of `schedule-requests/get-pending`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingRequests {
    #[serde(default)]
    pub pending_requests: Vec<roster_requests::ScheduleRequest>,
    #[serde(default)]
    pub stats: roster_requests::RequestStats,
}

/// Acknowledgement envelope returned by mutation endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
