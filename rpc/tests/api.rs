//! Handler-level API tests over the in-memory backend.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::Json;

use zid_nullables::NullNotifier;
use zid_rpc::handlers::{
    self, CreateJobHistoryRequest, IssueVerificationRequest,
};
use zid_rpc::pagination::PaginationParams;
use zid_rpc::{router, AppState, RpcError};
use zid_store_memory::MemoryStore;
use zid_types::WorkflowParams;
use zid_verification::VerificationError;

type TestState = Arc<AppState<MemoryStore, Arc<NullNotifier>>>;

fn state() -> (TestState, Arc<NullNotifier>) {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(NullNotifier::new());
    let app = Arc::new(AppState::new(
        store,
        Arc::clone(&notifier),
        WorkflowParams::defaults(),
        "https://app.example.com",
    ));
    (app, notifier)
}

fn principal_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-zid-principal", HeaderValue::from_static("user_admin_1"));
    headers
}

fn create_request(candidate_id: &str) -> CreateJobHistoryRequest {
    CreateJobHistoryRequest {
        candidate_id: candidate_id.into(),
        company_name: "Globex".into(),
        job_title: "Engineer".into(),
        start_date: 1_600_000_000,
        end_date: None,
        is_current_job: true,
        location: None,
        employment_type: Some("full-time".into()),
        description: "Built the widget pipeline".into(),
    }
}

async fn create_record(app: &TestState) -> String {
    let (status, Json(record)) = handlers::create_job_history(
        State(Arc::clone(app)),
        Json(create_request("cand_7f3a")),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record.verification_status, "UNVERIFIED");
    record.id
}

async fn issue(app: &TestState, record_id: &str) -> String {
    let (status, Json(issued)) = handlers::issue_verification(
        State(Arc::clone(app)),
        Path(record_id.to_string()),
        principal_headers(),
        Json(IssueVerificationRequest {
            verifier_email: "boss@co.com".into(),
            message: Some("please confirm".into()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    issued.token_id
}

#[tokio::test]
async fn full_flow_over_the_api() {
    let (app, notifier) = state();

    let record_id = create_record(&app).await;
    let token_id = issue(&app, &record_id).await;
    assert!(token_id.starts_with("vtk_"));
    assert_eq!(notifier.sent_count(), 1);

    // The verifier follows the accept link.
    let Json(resolved) = handlers::resolve_link(
        State(Arc::clone(&app)),
        Path((token_id.clone(), "accept".to_string())),
    )
    .await
    .unwrap();
    assert_eq!(resolved.job_history_id, record_id);
    assert_eq!(resolved.new_status, "VERIFIED");

    // Replays conflict.
    let err = handlers::resolve_link(
        State(Arc::clone(&app)),
        Path((token_id, "accept".to_string())),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        RpcError::Workflow(VerificationError::TokenAlreadyConsumed(_))
    ));

    // Telemetry sees the queued anchor item.
    let Json(telemetry) = handlers::anchor_telemetry(State(Arc::clone(&app)))
        .await
        .unwrap();
    assert_eq!(telemetry.pending, 1);
    assert_eq!(telemetry.records, 1);

    // Metrics counted the lifecycle.
    let text = handlers::metrics(State(app)).await.unwrap();
    assert!(text.contains("zid_verification_requests_issued_total 1"));
    assert!(text.contains("zid_verification_resolutions_accepted_total 1"));
    assert!(text.contains("zid_verification_resolution_failures_total 1"));
}

#[tokio::test]
async fn issuance_requires_a_principal() {
    let (app, _) = state();
    let record_id = create_record(&app).await;

    let err = handlers::issue_verification(
        State(Arc::clone(&app)),
        Path(record_id),
        HeaderMap::new(),
        Json(IssueVerificationRequest {
            verifier_email: "boss@co.com".into(),
            message: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RpcError::MissingPrincipal));
}

#[tokio::test]
async fn malformed_path_segments_are_validation_errors() {
    let (app, _) = state();

    // A record id is not a token: the capability check is by prefix.
    let err = handlers::resolve_link(
        State(Arc::clone(&app)),
        Path(("jh_0011".to_string(), "accept".to_string())),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        RpcError::Workflow(VerificationError::InvalidIdentifier(_))
    ));

    let err = handlers::resolve_link(
        State(app),
        Path(("vtk_0011".to_string(), "approve".to_string())),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        RpcError::Workflow(VerificationError::InvalidAction(_))
    ));
}

#[tokio::test]
async fn list_paginates_with_cursor() {
    let (app, _) = state();

    for _ in 0..3 {
        let (_, Json(_)) = handlers::create_job_history(
            State(Arc::clone(&app)),
            Json(create_request("cand_7f3a")),
        )
        .await
        .unwrap();
    }

    let Json(first_page) = handlers::list_job_histories(
        State(Arc::clone(&app)),
        Path("cand_7f3a".to_string()),
        Query(PaginationParams {
            cursor: None,
            count: Some(2),
        }),
    )
    .await
    .unwrap();
    assert_eq!(first_page.items.len(), 2);
    let cursor = first_page.pagination.cursor.clone().unwrap();

    let Json(second_page) = handlers::list_job_histories(
        State(Arc::clone(&app)),
        Path("cand_7f3a".to_string()),
        Query(PaginationParams {
            cursor: Some(cursor),
            count: Some(2),
        }),
    )
    .await
    .unwrap();
    assert_eq!(second_page.items.len(), 1);
    assert!(second_page.pagination.cursor.is_none());
}

#[tokio::test]
async fn deleting_a_record_with_pending_request_conflicts() {
    let (app, _) = state();
    let record_id = create_record(&app).await;
    issue(&app, &record_id).await;

    let err = handlers::delete_job_history(
        State(Arc::clone(&app)),
        Path(record_id),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        RpcError::Workflow(VerificationError::RecordLocked(_))
    ));
}

#[test]
fn router_builds() {
    let (app, _) = state();
    let _ = router(app);
}
