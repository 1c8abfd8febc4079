//! Shift-change and swap request workflow with JSON persistence.

pub mod store;
pub mod types;
pub mod workflow;

pub use store::{RequestStore, StoreError};
pub use types::{
    Decision, RequestDetail, RequestFilter, RequestKind, RequestStats, RequestStatus,
    ScheduleRequest,
};
pub use workflow::{RequestWorkflow, SubmitShiftChange, SubmitSwap, WorkflowError};
