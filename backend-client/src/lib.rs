//! Typed async client for the roster backend REST API.
//!
//! Thin wrapper over `reqwest`: every endpoint gets one method, bodies
//! are built from the typed structs in [`types`], and the backend's two
//! error shapes (non-2xx statuses and `{"success": false, ...}`
//! envelopes) both surface as [`ApiError::Api`].

use std::collections::BTreeMap;
use std::time::Duration;

use roster_requests::RequestStatus;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

pub mod types;

pub use types::{
    Ack, ModifiedShiftsReport, PendingRequests, RemoteModification, RemoteMonthlyStats,
    RosterSnapshot, SaveAction, SaveEmployee, ShiftChangeSubmission, ShiftHistory, ShiftSource,
    ShiftUpdate, SnapshotEmployee, SwapSubmission, TeamMember,
};

/// Errors from backend API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network request failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend reported a failure.
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a backend response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for backend API operations.
pub type ApiResult<T> = Result<T, ApiError>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error envelope probe; most endpoints answer with one of these shapes
/// when something goes wrong.
#[derive(Debug, Default, serde::Deserialize)]
struct ErrorProbe {
    success: Option<bool>,
    error: Option<String>,
    message: Option<String>,
}

impl ErrorProbe {
    fn describe(&self) -> Option<String> {
        self.error.clone().or_else(|| self.message.clone())
    }
}

/// Client for one backend instance.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000";

    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_http(base_url, http))
    }

    /// Client with a caller-supplied `reqwest::Client` (for testing or
    /// custom configurations).
    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Roster data ──────────────────────────────────────────────────────

    /// Combined viewer payload.
    pub async fn display_data(&self) -> ApiResult<RosterSnapshot> {
        self.get_json("/admin/api/get-display-data").await
    }

    /// Source-of-truth copy last synced from the published sheets.
    pub async fn google_data(&self) -> ApiResult<RosterSnapshot> {
        self.get_json("/admin/api/get-google-data").await
    }

    /// Admin-edited copy.
    pub async fn admin_data(&self) -> ApiResult<RosterSnapshot> {
        self.get_json("/admin/api/get-admin-data").await
    }

    /// Both schedules plus recorded modifications for one employee.
    pub async fn shift_history(&self, employee_id: &str) -> ApiResult<ShiftHistory> {
        self.post_json(
            "/admin/api/get-employee-shift-history",
            &json!({ "employeeId": employee_id }),
        )
        .await
    }

    pub async fn update_shift(&self, update: &ShiftUpdate) -> ApiResult<Ack> {
        self.post_json("/admin/api/update-shift", update).await
    }

    /// Asks the backend to re-fetch every configured sheet.
    pub async fn sync_google_sheets(&self) -> ApiResult<Ack> {
        self.post_json("/admin/api/sync-google-sheets", &json!({})).await
    }

    /// Discards admin edits in favor of the synced data.
    pub async fn reset_to_google(&self) -> ApiResult<Ack> {
        self.post_json("/admin/api/reset-to-google", &json!({})).await
    }

    // ── Team and employee management ─────────────────────────────────────

    pub async fn save_team(&self, team_name: &str, action: SaveAction) -> ApiResult<Ack> {
        self.post_json(
            "/admin/api/save-team",
            &json!({ "teamName": team_name, "action": action }),
        )
        .await
    }

    pub async fn delete_team(&self, team_name: &str) -> ApiResult<Ack> {
        self.post_json("/admin/api/delete-team", &json!({ "teamName": team_name }))
            .await
    }

    pub async fn save_employee(&self, employee: &SaveEmployee) -> ApiResult<Ack> {
        self.post_json("/admin/api/save-employee", employee).await
    }

    pub async fn delete_employee(&self, employee_id: &str) -> ApiResult<Ack> {
        self.post_json(
            "/admin/api/delete-employee",
            &json!({ "employeeId": employee_id }),
        )
        .await
    }

    // ── Sheet links and uploads ──────────────────────────────────────────

    /// Configured sheet URLs keyed by month, e.g. "2025-09".
    pub async fn google_links(&self) -> ApiResult<BTreeMap<String, String>> {
        self.get_json("/admin/api/get-google-links").await
    }

    pub async fn save_google_link(&self, month_year: &str, url: &str) -> ApiResult<Ack> {
        self.post_json(
            "/admin/api/save-google-link",
            &json!({ "monthYear": month_year, "googleLink": url }),
        )
        .await
    }

    pub async fn delete_google_link(&self, month_year: &str) -> ApiResult<Ack> {
        self.post_json(
            "/admin/api/delete-google-link",
            &json!({ "monthYear": month_year }),
        )
        .await
    }

    /// Uploads a roster export as a replacement data source.
    pub async fn upload_csv(&self, file_name: &str, contents: Vec<u8>) -> ApiResult<Ack> {
        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("csv_file", part);
        let response = self
            .http
            .post(self.url("/admin/api/upload-csv"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    // ── Schedule requests ────────────────────────────────────────────────

    pub async fn pending_requests(&self) -> ApiResult<PendingRequests> {
        self.get_json("/admin/api/schedule-requests/get-pending").await
    }

    pub async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> ApiResult<Ack> {
        self.post_json(
            "/admin/api/schedule-requests/update-status",
            &json!({ "requestId": request_id, "status": status }),
        )
        .await
    }

    pub async fn submit_shift_change(
        &self,
        submission: &ShiftChangeSubmission,
    ) -> ApiResult<Ack> {
        self.post_json("/api/schedule-requests/submit-shift-change", submission)
            .await
    }

    pub async fn submit_swap(&self, submission: &SwapSubmission) -> ApiResult<Ack> {
        self.post_json("/api/schedule-requests/submit-swap-request", submission)
            .await
    }

    /// Teammates available as swap targets on `date`, excluding the
    /// requesting employee.
    pub async fn team_members(
        &self,
        team_name: &str,
        current_employee_id: &str,
        date: &str,
    ) -> ApiResult<Vec<TeamMember>> {
        #[derive(serde::Deserialize)]
        struct MembersResponse {
            #[serde(default)]
            members: Vec<TeamMember>,
        }
        let response: MembersResponse = self
            .post_json(
                "/api/schedule-requests/get-team-members",
                &json!({
                    "teamName": team_name,
                    "currentEmployeeId": current_employee_id,
                    "date": date,
                }),
            )
            .await?;
        Ok(response.members)
    }

    // ── Modification log ─────────────────────────────────────────────────

    pub async fn modified_shifts(&self) -> ApiResult<ModifiedShiftsReport> {
        self.get_json("/admin/api/get-modified-shifts").await
    }

    // ── Plumbing ─────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!("GET {path}");
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {path}");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        let text = response.text().await?;
        let probe: ErrorProbe = serde_json::from_str(&text).unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: probe.describe().unwrap_or(text),
            });
        }
        if probe.success == Some(false) {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: probe
                    .describe()
                    .unwrap_or_else(|| "request failed".to_string()),
            });
        }
        serde_json::from_str(&text).map_err(|err| ApiError::Parse(err.to_string()))
    }
}
