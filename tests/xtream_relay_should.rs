use std::sync::Arc;

use serde_json::json;

use playlist_relay::server::error::Error;
use playlist_relay::server::services::fetch_services::{DynFetchService, MockFetchServiceTrait};
use playlist_relay::server::services::xtream_services::{
    XtreamEnvelope, XtreamService, XtreamServiceTrait,
};

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[tokio::test]
async fn test_success_wraps_payload_and_echoes_action() {
    let mut fetch = MockFetchServiceTrait::new();
    fetch
        .expect_get_json()
        .withf(|url, query| {
            url == "http://portal.example/player_api.php"
                && query
                    .iter()
                    .any(|(key, value)| key == "action" && value == "get_live_streams")
        })
        .times(1)
        .returning(|_, _| Ok(json!({ "streams": [] })));

    let service = XtreamService::new(Arc::new(fetch) as DynFetchService);
    let envelope = service
        .relay(
            "http://portal.example",
            params(&[
                ("url", "http://portal.example"),
                ("action", "get_live_streams"),
            ]),
        )
        .await;

    assert_eq!(
        envelope,
        XtreamEnvelope::Success {
            payload: json!({ "streams": [] }),
            action: Some("get_live_streams".to_string()),
        }
    );
}

#[tokio::test]
async fn test_missing_action_is_not_invented() {
    let mut fetch = MockFetchServiceTrait::new();
    fetch
        .expect_get_json()
        .returning(|_, _| Ok(json!({ "user_info": {} })));

    let service = XtreamService::new(Arc::new(fetch) as DynFetchService);
    let envelope = service
        .relay("http://portal.example", params(&[("url", "http://portal.example")]))
        .await;

    match envelope {
        XtreamEnvelope::Success { action, .. } => assert!(action.is_none()),
        other => panic!("expected success envelope, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upstream_failure_carries_its_status() {
    let mut fetch = MockFetchServiceTrait::new();
    fetch.expect_get_json().returning(|_, _| {
        Err(Error::Upstream {
            status: 403,
            message: "Forbidden".to_string(),
        })
    });

    let service = XtreamService::new(Arc::new(fetch) as DynFetchService);
    let envelope = service
        .relay("http://portal.example", params(&[("action", "get_vod_streams")]))
        .await;

    assert_eq!(
        envelope,
        XtreamEnvelope::Failure {
            message: "Forbidden".to_string(),
            status: 403,
        }
    );
}

#[tokio::test]
async fn test_no_response_defaults_to_not_found() {
    let mut fetch = MockFetchServiceTrait::new();
    fetch
        .expect_get_json()
        .returning(|_, _| Err(Error::FetchFailed));

    let service = XtreamService::new(Arc::new(fetch) as DynFetchService);
    let envelope = service.relay("http://portal.example", Vec::new()).await;

    assert_eq!(
        envelope,
        XtreamEnvelope::Failure {
            message: "Error: not found".to_string(),
            status: 404,
        }
    );
}

#[test]
fn test_envelope_serialization_shape() {
    let success = XtreamEnvelope::Success {
        payload: json!({ "ok": true }),
        action: Some("get_series".to_string()),
    };
    let value = serde_json::to_value(&success).unwrap();
    assert_eq!(value["payload"]["ok"], json!(true));
    assert_eq!(value["action"], json!("get_series"));

    // action is omitted entirely when the caller never sent one
    let bare = XtreamEnvelope::Success {
        payload: json!(1),
        action: None,
    };
    let value = serde_json::to_value(&bare).unwrap();
    assert!(value.get("action").is_none());

    let failure = XtreamEnvelope::Failure {
        message: "Error: not found".to_string(),
        status: 404,
    };
    let value = serde_json::to_value(&failure).unwrap();
    assert_eq!(value["message"], json!("Error: not found"));
    assert_eq!(value["status"], json!(404));
}
