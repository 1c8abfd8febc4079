#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for `BackendClient` against a mock HTTP backend.

use pretty_assertions::assert_eq;
use roster_backend_client::ApiError;
use roster_backend_client::BackendClient;
use roster_backend_client::ShiftSource;
use roster_backend_client::ShiftUpdate;
use roster_requests::RequestDetail;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::with_http(server.uri(), reqwest::Client::new())
}

#[tokio::test]
async fn display_data_round_trips_into_roster() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/get-display-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "headers": ["1Sep", "2Sep"],
            "teams": {
                "Support": [
                    {"id": "SLL-1002", "name": "Dev Nair", "team": "Support", "schedule": ["D1", "D2"]}
                ],
                "Night": [
                    {"id": "SLL-1001", "name": "Asha Rao", "team": "Night", "schedule": ["M2", "DO"]}
                ]
            },
            "allEmployees": [
                {"id": "SLL-1001", "name": "Asha Rao", "team": "Night", "schedule": ["M2", "DO"]},
                {"id": "SLL-1002", "name": "Dev Nair", "team": "Support", "schedule": ["D1", "D2"]}
            ]
        })))
        .mount(&server)
        .await;

    let snapshot = client_for(&server).display_data().await.unwrap();
    let roster = snapshot.into_roster();

    let team_names: Vec<&str> = roster.teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(team_names, vec!["Night", "Support"]);
    let asha = roster.find_employee("SLL-1001").unwrap();
    assert_eq!(roster.shift_for_date(asha, "2Sep"), Some("DO"));
    assert_eq!(asha.schedule, vec!["M2", "DO"]);
}

#[tokio::test]
async fn update_shift_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/api/update-shift"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .update_shift(&ShiftUpdate {
            employee_id: "SLL-1001".to_string(),
            date_index: 1,
            new_shift: "D1".to_string(),
            source: ShiftSource::Admin,
            google_shift: None,
        })
        .await
        .unwrap();
    assert!(ack.success);

    let request = &server.received_requests().await.unwrap()[0];
    let body = request.body_json::<serde_json::Value>().unwrap();
    assert_eq!(body["employeeId"], "SLL-1001");
    assert_eq!(body["dateIndex"], 1);
    assert_eq!(body["newShift"], "D1");
    assert_eq!(body["source"], "admin");
    assert!(body.get("googleShift").is_none());
}

#[tokio::test]
async fn failure_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/api/update-shift"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "Employee not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update_shift(&ShiftUpdate {
            employee_id: "SLL-9999".to_string(),
            date_index: 0,
            new_shift: "D1".to_string(),
            source: ShiftSource::Admin,
            google_shift: None,
        })
        .await
        .unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 200);
            assert_eq!(message, "Employee not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_error_status_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/get-google-links"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": "Authentication required"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).google_links().await.unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Authentication required");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn google_links_returns_raw_month_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/get-google-links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "2025-09": "https://docs.google.com/pub?output=csv",
            "2025-10": "https://docs.google.com/pub2?output=csv"
        })))
        .mount(&server)
        .await;

    let links = client_for(&server).google_links().await.unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(
        links.get("2025-09").map(String::as_str),
        Some("https://docs.google.com/pub?output=csv")
    );
}

#[tokio::test]
async fn pending_requests_parses_swap_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/schedule-requests/get-pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pending_requests": [{
                "id": "swap_1",
                "type": "swap",
                "status": "pending",
                "requester_id": "SLL-1001",
                "requester_name": "Asha Rao",
                "target_employee_id": "SLL-1002",
                "target_employee_name": "Dev Nair",
                "team": "Night",
                "date": "2Sep",
                "requester_shift": "M2",
                "target_shift": "D1",
                "reason": "family event",
                "created_at": "2025-09-01T10:00:00"
            }],
            "stats": {
                "pending_count": 1,
                "approved_count": 4,
                "rejected_count": 2,
                "total_shift_change": 5,
                "total_swap": 2
            }
        })))
        .mount(&server)
        .await;

    let pending = client_for(&server).pending_requests().await.unwrap();
    assert_eq!(pending.stats.pending_count, 1);
    assert_eq!(pending.stats.total_swap, 2);
    assert_eq!(pending.pending_requests.len(), 1);
    let request = &pending.pending_requests[0];
    assert_eq!(request.id, "swap_1");
    match &request.detail {
        RequestDetail::Swap {
            requester_id,
            target_id,
            target_name,
            ..
        } => {
            assert_eq!(requester_id, "SLL-1001");
            assert_eq!(target_id, "SLL-1002");
            assert_eq!(target_name, "Dev Nair");
        }
        other => panic!("expected swap detail, got {other:?}"),
    }
}

#[tokio::test]
async fn team_members_unwraps_members_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/schedule-requests/get-team-members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "members": [
                {"id": "SLL-1002", "name": "Dev Nair", "shift": "D1", "shift_display": "9 AM – 6 PM"}
            ]
        })))
        .mount(&server)
        .await;

    let members = client_for(&server)
        .team_members("Night", "SLL-1001", "2Sep")
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, "SLL-1002");
    assert_eq!(members[0].shift_display, "9 AM – 6 PM");

    let request = &server.received_requests().await.unwrap()[0];
    let body = request.body_json::<serde_json::Value>().unwrap();
    assert_eq!(body["teamName"], "Night");
    assert_eq!(body["currentEmployeeId"], "SLL-1001");
    assert_eq!(body["date"], "2Sep");
}
