//! Request records and their serialized shape.
//!
//! Records are written to disk and exchanged with the backend, so the
//! field names and the `type` discriminant are part of the wire format.
//! Timestamps travel as RFC3339 strings.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    ShiftChange,
    Swap,
}

impl RequestKind {
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::ShiftChange => "shift_change",
            Self::Swap => "swap",
        }
    }
}

/// What the requester wants changed. Shifts and names are snapshots taken
/// from the roster at submission time; they are not re-resolved later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestDetail {
    ShiftChange {
        employee_id: String,
        employee_name: String,
        team: String,
        date: String,
        current_shift: String,
        requested_shift: String,
    },

    Swap {
        requester_id: String,
        requester_name: String,
        #[serde(rename = "target_employee_id")]
        target_id: String,
        #[serde(rename = "target_employee_name")]
        target_name: String,
        team: String,
        date: String,
        requester_shift: String,
        target_shift: String,
    },
}

impl RequestDetail {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::ShiftChange { .. } => RequestKind::ShiftChange,
            Self::Swap { .. } => RequestKind::Swap,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            Self::ShiftChange { date, .. } | Self::Swap { date, .. } => date,
        }
    }
}

/// One stored request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub id: String,

    pub status: RequestStatus,

    pub reason: String,

    /// RFC3339 timestamp of the submission.
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,

    #[serde(flatten)]
    pub detail: RequestDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFilter {
    All,
    ShiftChange,
    Swap,
    Pending,
}

impl RequestFilter {
    pub fn matches(self, request: &ScheduleRequest) -> bool {
        match self {
            Self::All => true,
            Self::ShiftChange => request.detail.kind() == RequestKind::ShiftChange,
            Self::Swap => request.detail.kind() == RequestKind::Swap,
            Self::Pending => request.status == RequestStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn resulting_status(self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }
}

/// Aggregate counters computed from the records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestStats {
    pub pending_count: usize,
    pub approved_count: usize,
    pub rejected_count: usize,
    pub total_shift_change: usize,
    pub total_swap: usize,
}

impl RequestStats {
    pub fn tally(requests: &[ScheduleRequest]) -> Self {
        let mut stats = Self::default();
        for request in requests {
            match request.status {
                RequestStatus::Pending => stats.pending_count += 1,
                RequestStatus::Approved => stats.approved_count += 1,
                RequestStatus::Rejected => stats.rejected_count += 1,
            }
            match request.detail.kind() {
                RequestKind::ShiftChange => stats.total_shift_change += 1,
                RequestKind::Swap => stats.total_swap += 1,
            }
        }
        stats
    }
}
