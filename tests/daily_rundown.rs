//! End-to-end daily rundown against a mocked Attrove API.

use chrono::NaiveDate;
use rundown_lib::attrove::AttroveClient;
use rundown_lib::diagnostics::{Diagnostic, MemorySink};
use rundown_lib::error::{RunError, RunStatus};
use rundown_lib::rundown::{self, Delivery};
use rundown_lib::timefmt::DisplayZone;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

fn new_york() -> DisplayZone {
    DisplayZone::from_name("America/New_York").unwrap()
}

async fn mount_events(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/users/user-1/events"))
        .and(query_param("start_date", "2026-01-05"))
        .and(query_param("end_date", "2026-01-05"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {
                    "id": "evt_1",
                    "title": "Weekly Sync",
                    "start_time": "2026-01-05T14:00:00Z",
                    "end_time": "2026-01-05T14:30:00Z",
                    "attendees": "[{\"name\":\"Sarah Chen\",\"email\":\"sarah@acme.com\"},{\"email\":\"bo@acme.com\"}]"
                },
                {
                    "id": "evt_2",
                    "title": "Board prep",
                    "start_time": "2026-01-05T19:00:00Z",
                    "end_time": "2026-01-05T20:00:00Z",
                    "attendees": "{\"oops\": true}"
                }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/users/user-1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "conversations": {
                "c1": {
                    "conversation_name": "Project Alpha",
                    "threads": {"t1": [{}, {}], "t2": [{}], "t3": [{}]}
                },
                "c2": {"conversation_name": null, "threads": {"t1": [{}]}}
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_partial_failure_report() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    mount_search(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/users/user-1/query"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"code": "INTERNAL_ERROR", "message": "Digest model unavailable"}
        })))
        .mount(&server)
        .await;

    let client = AttroveClient::with_base_url("sk_test", "user-1", &server.uri()).unwrap();
    let sink = MemorySink::new();
    let built = rundown::build(&client, monday(), &new_york(), &sink)
        .await
        .unwrap();

    let expected = [
        "Daily Rundown - Monday, January 5",
        "==================================================",
        "",
        "Calendar (2 events)",
        "------------------------------",
        "  09:00 AM  Weekly Sync",
        "         with Sarah Chen, bo@acme.com",
        "  02:00 PM  Board prep",
        "",
        "Recent Threads (2 active)",
        "------------------------------",
        "  - Project Alpha (4 messages)",
        "  - Unnamed thread (1 messages)",
        "",
        "Digest",
        "------------------------------",
        "  (failed to generate — see error above)",
    ]
    .join("\n");
    assert_eq!(built.report, expected);
    assert_eq!(built.failures, 1);

    let entries = sink.entries();
    assert!(entries.contains(&Diagnostic::SourceFailed {
        label: "generate AI digest".to_string(),
        reason: "Digest model unavailable".to_string(),
    }));
    assert!(entries
        .iter()
        .any(|d| matches!(d, Diagnostic::FieldNotList { found, .. } if found == "object")));

    let mut out = Vec::new();
    let status = rundown::emit(&built, &mut out, Delivery::PrintOnly)
        .await
        .unwrap();
    assert_eq!(status, RunStatus::Partial);
    assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", expected));
}

#[tokio::test]
async fn test_unauthorized_everywhere_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"message": "Invalid API key"})),
        )
        .mount(&server)
        .await;

    let client = AttroveClient::with_base_url("sk_bad", "user-1", &server.uri()).unwrap();
    let sink = MemorySink::new();
    let err = rundown::build(&client, monday(), &new_york(), &sink)
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::AllSourcesFailed));
    assert_eq!(sink.len(), 3);
}
