//! Request workflow state machine.
//!
//! Requests are created pending and transition exactly once, to approved
//! or rejected. Deciding never touches the roster; applying an approved
//! change to the schedule is a separate admin action.

use std::sync::Arc;

use chrono::Utc;
use roster_core::Roster;
use tokio::sync::Mutex;
use tracing::info;

use crate::types::{
    Decision, RequestDetail, RequestFilter, RequestKind, RequestStats, RequestStatus,
    ScheduleRequest,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("invalid request: {reason}")]
    Validation { reason: String },

    #[error("request not found: {id}")]
    NotFound { id: String },

    #[error("request {id} was already decided: {status}")]
    InvalidState { id: String, status: RequestStatus },

    #[error("employee not found: {id}")]
    EmployeeNotFound { id: String },
}

fn validation(reason: impl Into<String>) -> WorkflowError {
    WorkflowError::Validation {
        reason: reason.into(),
    }
}

/// Parameters for a shift change submission. The current shift is
/// resolved from the roster, not supplied.
#[derive(Debug, Clone)]
pub struct SubmitShiftChange {
    pub employee_id: String,
    pub date: String,
    pub requested_shift: String,
    pub reason: String,
}

/// Parameters for a swap submission.
#[derive(Debug, Clone)]
pub struct SubmitSwap {
    pub requester_id: String,
    pub target_id: String,
    pub date: String,
    pub reason: String,
}

/// In-memory request workflow over a mutexed record list.
///
/// Loading and saving the records is the caller's concern; see
/// [`crate::store::RequestStore`].
#[derive(Debug, Clone, Default)]
pub struct RequestWorkflow {
    requests: Arc<Mutex<Vec<ScheduleRequest>>>,
}

impl RequestWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ScheduleRequest>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(records)),
        }
    }

    /// All records in creation order.
    pub async fn records(&self) -> Vec<ScheduleRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn list(&self, filter: RequestFilter) -> Vec<ScheduleRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    pub async fn stats(&self) -> RequestStats {
        RequestStats::tally(&self.requests.lock().await)
    }

    pub async fn submit_shift_change(
        &self,
        roster: &Roster,
        params: SubmitShiftChange,
    ) -> Result<ScheduleRequest, WorkflowError> {
        let reason = params.reason.trim();
        if reason.is_empty() {
            return Err(validation("a reason is required"));
        }
        let date = params.date.trim();
        if date.is_empty() {
            return Err(validation("a date is required"));
        }
        let requested_shift = params.requested_shift.trim();
        if requested_shift.is_empty() {
            return Err(validation("a requested shift is required"));
        }
        let employee =
            roster
                .find_employee(&params.employee_id)
                .ok_or_else(|| WorkflowError::EmployeeNotFound {
                    id: params.employee_id.clone(),
                })?;
        let Some(date_index) = roster.label_index(date) else {
            return Err(validation(format!("date {date} is not in the roster")));
        };
        let current_shift = employee
            .schedule
            .get(date_index)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if requested_shift == current_shift {
            return Err(validation("requested shift matches the current shift"));
        }

        let detail = RequestDetail::ShiftChange {
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            team: employee.team.clone(),
            date: date.to_string(),
            current_shift,
            requested_shift: requested_shift.to_string(),
        };
        Ok(self.insert(detail, reason).await)
    }

    pub async fn submit_swap(
        &self,
        roster: &Roster,
        params: SubmitSwap,
    ) -> Result<ScheduleRequest, WorkflowError> {
        let reason = params.reason.trim();
        if reason.is_empty() {
            return Err(validation("a reason is required"));
        }
        let date = params.date.trim();
        if date.is_empty() {
            return Err(validation("a date is required"));
        }
        if params.requester_id == params.target_id {
            return Err(validation("cannot swap a shift with yourself"));
        }
        let requester =
            roster
                .find_employee(&params.requester_id)
                .ok_or_else(|| WorkflowError::EmployeeNotFound {
                    id: params.requester_id.clone(),
                })?;
        let target =
            roster
                .find_employee(&params.target_id)
                .ok_or_else(|| WorkflowError::EmployeeNotFound {
                    id: params.target_id.clone(),
                })?;
        let Some(date_index) = roster.label_index(date) else {
            return Err(validation(format!("date {date} is not in the roster")));
        };
        let target_shift = target
            .schedule
            .get(date_index)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if target_shift.is_empty() {
            return Err(validation(format!(
                "{} has no shift on {date}",
                target.name
            )));
        }
        let requester_shift = requester
            .schedule
            .get(date_index)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let detail = RequestDetail::Swap {
            requester_id: requester.id.clone(),
            requester_name: requester.name.clone(),
            target_id: target.id.clone(),
            target_name: target.name.clone(),
            team: requester.team.clone(),
            date: date.to_string(),
            requester_shift,
            target_shift,
        };
        Ok(self.insert(detail, reason).await)
    }

    /// Transitions a pending request and stamps who decided it and when.
    pub async fn decide(
        &self,
        id: &str,
        decision: Decision,
        decided_by: &str,
    ) -> Result<ScheduleRequest, WorkflowError> {
        let mut requests = self.requests.lock().await;
        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| WorkflowError::NotFound { id: id.to_string() })?;
        if request.status.is_terminal() {
            return Err(WorkflowError::InvalidState {
                id: id.to_string(),
                status: request.status,
            });
        }
        request.status = decision.resulting_status();
        request.decided_at = Some(Utc::now().to_rfc3339());
        request.decided_by = Some(decided_by.to_string());
        info!("request {} {}", request.id, request.status);
        Ok(request.clone())
    }

    async fn insert(&self, detail: RequestDetail, reason: &str) -> ScheduleRequest {
        let mut requests = self.requests.lock().await;
        let request = ScheduleRequest {
            id: next_id(&requests, detail.kind()),
            status: RequestStatus::Pending,
            reason: reason.to_string(),
            created_at: Utc::now().to_rfc3339(),
            decided_at: None,
            decided_by: None,
            detail,
        };
        info!("request {} submitted", request.id);
        requests.push(request.clone());
        request
    }
}

fn next_id(requests: &[ScheduleRequest], kind: RequestKind) -> String {
    let next = requests
        .iter()
        .filter(|r| r.detail.kind() == kind)
        .filter_map(|r| r.id.rsplit('_').next()?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    format!("{}_{next}", kind.id_prefix())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use roster_core::model::{Employee, Team};

    use super::*;

    fn roster() -> Roster {
        Roster {
            date_labels: vec!["1Sep".to_string(), "2Sep".to_string()],
            teams: vec![Team {
                name: "Support".to_string(),
                employees: vec![
                    Employee {
                        id: "SLL-1001".to_string(),
                        name: "Asha Rao".to_string(),
                        team: "Support".to_string(),
                        schedule: vec!["M2".to_string(), "DO".to_string()],
                    },
                    Employee {
                        id: "SLL-1002".to_string(),
                        name: "Dev Nair".to_string(),
                        team: "Support".to_string(),
                        schedule: vec!["D1".to_string(), String::new()],
                    },
                ],
            }],
        }
    }

    fn change(requested: &str) -> SubmitShiftChange {
        SubmitShiftChange {
            employee_id: "SLL-1001".to_string(),
            date: "1Sep".to_string(),
            requested_shift: requested.to_string(),
            reason: "appointment".to_string(),
        }
    }

    #[tokio::test]
    async fn shift_change_snapshots_the_roster() {
        let workflow = RequestWorkflow::new();
        let request = workflow
            .submit_shift_change(&roster(), change("D1"))
            .await
            .unwrap();
        assert_eq!(request.id, "shift_change_1");
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.decided_at.is_none());
        match request.detail {
            RequestDetail::ShiftChange {
                employee_name,
                team,
                current_shift,
                requested_shift,
                ..
            } => {
                assert_eq!(employee_name, "Asha Rao");
                assert_eq!(team, "Support");
                assert_eq!(current_shift, "M2");
                assert_eq!(requested_shift, "D1");
            }
            RequestDetail::Swap { .. } => panic!("expected a shift change"),
        }
    }

    #[tokio::test]
    async fn shift_change_validations() {
        let workflow = RequestWorkflow::new();
        let roster = roster();

        let mut params = change("D1");
        params.reason = "  ".to_string();
        assert!(matches!(
            workflow.submit_shift_change(&roster, params).await,
            Err(WorkflowError::Validation { .. })
        ));

        let mut params = change("D1");
        params.date = String::new();
        assert!(matches!(
            workflow.submit_shift_change(&roster, params).await,
            Err(WorkflowError::Validation { .. })
        ));

        // Same shift as already rostered.
        assert!(matches!(
            workflow.submit_shift_change(&roster, change("M2")).await,
            Err(WorkflowError::Validation { .. })
        ));

        let mut params = change("D1");
        params.date = "9Oct".to_string();
        assert!(matches!(
            workflow.submit_shift_change(&roster, params).await,
            Err(WorkflowError::Validation { .. })
        ));

        let mut params = change("D1");
        params.employee_id = "SLL-9999".to_string();
        assert_eq!(
            workflow.submit_shift_change(&roster, params).await,
            Err(WorkflowError::EmployeeNotFound {
                id: "SLL-9999".to_string()
            })
        );
    }

    #[tokio::test]
    async fn swap_snapshots_both_shifts() {
        let workflow = RequestWorkflow::new();
        let request = workflow
            .submit_swap(
                &roster(),
                SubmitSwap {
                    requester_id: "SLL-1001".to_string(),
                    target_id: "SLL-1002".to_string(),
                    date: "1Sep".to_string(),
                    reason: "family".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(request.id, "swap_1");
        match request.detail {
            RequestDetail::Swap {
                requester_shift,
                target_shift,
                team,
                ..
            } => {
                assert_eq!(requester_shift, "M2");
                assert_eq!(target_shift, "D1");
                assert_eq!(team, "Support");
            }
            RequestDetail::ShiftChange { .. } => panic!("expected a swap"),
        }
    }

    #[tokio::test]
    async fn swap_rejects_self_and_shiftless_targets() {
        let workflow = RequestWorkflow::new();
        let roster = roster();

        let result = workflow
            .submit_swap(
                &roster,
                SubmitSwap {
                    requester_id: "SLL-1001".to_string(),
                    target_id: "SLL-1001".to_string(),
                    date: "1Sep".to_string(),
                    reason: "family".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(WorkflowError::Validation { .. })));

        // SLL-1002 has an empty cell on 2Sep.
        let result = workflow
            .submit_swap(
                &roster,
                SubmitSwap {
                    requester_id: "SLL-1001".to_string(),
                    target_id: "SLL-1002".to_string(),
                    date: "2Sep".to_string(),
                    reason: "family".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(WorkflowError::Validation { .. })));
    }

    #[tokio::test]
    async fn ids_are_sequential_per_kind() {
        let workflow = RequestWorkflow::new();
        let roster = roster();
        let first = workflow
            .submit_shift_change(&roster, change("D1"))
            .await
            .unwrap();
        let second = workflow
            .submit_shift_change(&roster, change("D2"))
            .await
            .unwrap();
        let swap = workflow
            .submit_swap(
                &roster,
                SubmitSwap {
                    requester_id: "SLL-1001".to_string(),
                    target_id: "SLL-1002".to_string(),
                    date: "1Sep".to_string(),
                    reason: "family".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(first.id, "shift_change_1");
        assert_eq!(second.id, "shift_change_2");
        assert_eq!(swap.id, "swap_1");
    }

    #[tokio::test]
    async fn decide_stamps_both_outcomes_and_is_terminal() {
        let workflow = RequestWorkflow::new();
        let roster = roster();
        let first = workflow
            .submit_shift_change(&roster, change("D1"))
            .await
            .unwrap();
        let second = workflow
            .submit_shift_change(&roster, change("D2"))
            .await
            .unwrap();

        let approved = workflow
            .decide(&first.id, Decision::Approve, "admin")
            .await
            .unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert!(approved.decided_at.is_some());
        assert_eq!(approved.decided_by.as_deref(), Some("admin"));

        let rejected = workflow
            .decide(&second.id, Decision::Reject, "admin")
            .await
            .unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert!(rejected.decided_at.is_some());
        assert_eq!(rejected.decided_by.as_deref(), Some("admin"));

        let again = workflow.decide(&first.id, Decision::Reject, "admin").await;
        assert_eq!(
            again,
            Err(WorkflowError::InvalidState {
                id: first.id.clone(),
                status: RequestStatus::Approved,
            })
        );

        assert_eq!(
            workflow.decide("shift_change_99", Decision::Approve, "admin").await,
            Err(WorkflowError::NotFound {
                id: "shift_change_99".to_string()
            })
        );
    }

    #[tokio::test]
    async fn decided_requests_leave_the_pending_list() {
        let workflow = RequestWorkflow::new();
        let roster = roster();
        let first = workflow
            .submit_shift_change(&roster, change("D1"))
            .await
            .unwrap();
        workflow
            .submit_shift_change(&roster, change("D2"))
            .await
            .unwrap();

        assert_eq!(workflow.list(RequestFilter::Pending).await.len(), 2);
        workflow
            .decide(&first.id, Decision::Approve, "admin")
            .await
            .unwrap();
        let pending = workflow.list(RequestFilter::Pending).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "shift_change_2");
        assert_eq!(workflow.list(RequestFilter::All).await.len(), 2);

        let stats = workflow.stats().await;
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.approved_count, 1);
        assert_eq!(stats.total_shift_change, 2);
    }

    #[tokio::test]
    async fn filters_split_by_kind() {
        let workflow = RequestWorkflow::new();
        let roster = roster();
        workflow
            .submit_shift_change(&roster, change("D1"))
            .await
            .unwrap();
        workflow
            .submit_swap(
                &roster,
                SubmitSwap {
                    requester_id: "SLL-1001".to_string(),
                    target_id: "SLL-1002".to_string(),
                    date: "1Sep".to_string(),
                    reason: "family".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(workflow.list(RequestFilter::ShiftChange).await.len(), 1);
        assert_eq!(workflow.list(RequestFilter::Swap).await.len(), 1);
        assert_eq!(workflow.list(RequestFilter::All).await.len(), 2);
    }

    #[tokio::test]
    async fn ids_continue_after_reload() {
        let workflow = RequestWorkflow::new();
        let roster = roster();
        workflow
            .submit_shift_change(&roster, change("D1"))
            .await
            .unwrap();
        let records = workflow.records().await;

        let reloaded = RequestWorkflow::from_records(records);
        let next = reloaded
            .submit_shift_change(&roster, change("D2"))
            .await
            .unwrap();
        assert_eq!(next.id, "shift_change_2");
    }
}
