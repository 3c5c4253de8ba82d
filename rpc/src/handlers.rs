//! Request handlers and wire DTOs.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use zid_notify::Notifier;
use zid_store::{AnchorQueueStore, JobHistoryStore, TokenStore};
use zid_types::{
    CandidateId, JobDetails, JobHistoryId, JobHistoryRecord, PrincipalId, Timestamp, TokenId,
    VerificationAction,
};
use zid_verification::VerificationError;

use crate::error::RpcError;
use crate::pagination::{paginate, PaginationMeta, PaginationParams};
use crate::server::AppState;

fn principal(headers: &HeaderMap) -> Result<PrincipalId, RpcError> {
    headers
        .get("x-zid-principal")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(PrincipalId::new)
        .ok_or(RpcError::MissingPrincipal)
}

fn parse_workflow<T>(result: Result<T, zid_types::TypeError>) -> Result<T, RpcError> {
    result.map_err(|e| RpcError::Workflow(VerificationError::from(e)))
}

// ── Job histories ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateJobHistoryRequest {
    pub candidate_id: String,
    pub company_name: String,
    pub job_title: String,
    /// Unix seconds.
    pub start_date: u64,
    pub end_date: Option<u64>,
    #[serde(default)]
    pub is_current_job: bool,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize)]
pub struct JobHistoryResponse {
    pub id: String,
    pub candidate_id: String,
    pub company_name: String,
    pub job_title: String,
    pub start_date: u64,
    pub end_date: Option<u64>,
    pub is_current_job: bool,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub description: String,
    pub verification_status: String,
    pub verifier_email: Option<String>,
    pub verification_requested_at: Option<u64>,
    pub verification_processed_at: Option<u64>,
    pub onchain_confirmation_reference: Option<String>,
}

impl From<JobHistoryRecord> for JobHistoryResponse {
    fn from(record: JobHistoryRecord) -> Self {
        Self {
            id: record.id.to_string(),
            candidate_id: record.candidate_id.to_string(),
            company_name: record.details.company_name,
            job_title: record.details.job_title,
            start_date: record.details.start_date.as_secs(),
            end_date: record.details.end_date.map(|t| t.as_secs()),
            is_current_job: record.details.is_current_job,
            location: record.details.location,
            employment_type: record.details.employment_type,
            description: record.details.description,
            verification_status: record.verification_status.as_str().to_string(),
            verifier_email: record.verifier_email.map(|e| e.as_str().to_string()),
            verification_requested_at: record.verification_requested_at.map(|t| t.as_secs()),
            verification_processed_at: record.verification_processed_at.map(|t| t.as_secs()),
            onchain_confirmation_reference: record.onchain_confirmation_reference,
        }
    }
}

pub async fn create_job_history<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Json(body): Json<CreateJobHistoryRequest>,
) -> Result<(StatusCode, Json<JobHistoryResponse>), RpcError>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let candidate_id = parse_workflow(CandidateId::parse(body.candidate_id))?;
    let details = JobDetails {
        company_name: body.company_name,
        job_title: body.job_title,
        start_date: Timestamp::new(body.start_date),
        end_date: body.end_date.map(Timestamp::new),
        is_current_job: body.is_current_job,
        location: body.location,
        employment_type: body.employment_type,
        description: body.description,
    };
    let record = state
        .records
        .create_record(candidate_id, details, Timestamp::now())?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn get_job_history<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Path(id): Path<String>,
) -> Result<Json<JobHistoryResponse>, RpcError>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let id = parse_workflow(JobHistoryId::parse(id))?;
    let record = state.records.get_record(&id)?;
    Ok(Json(record.into()))
}

#[derive(Serialize)]
pub struct JobHistoryListResponse {
    pub items: Vec<JobHistoryResponse>,
    pub pagination: PaginationMeta,
}

pub async fn list_job_histories<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Path(candidate_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<JobHistoryListResponse>, RpcError>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let candidate_id = parse_workflow(CandidateId::parse(candidate_id))?;
    let records = state.records.list_records(&candidate_id)?;
    let (page, pagination) = paginate(records, &params);
    Ok(Json(JobHistoryListResponse {
        items: page.into_iter().map(JobHistoryResponse::from).collect(),
        pagination,
    }))
}

pub async fn delete_job_history<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, RpcError>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let id = parse_workflow(JobHistoryId::parse(id))?;
    state.records.delete_record(&id, Timestamp::now())?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Verification requests ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IssueVerificationRequest {
    pub verifier_email: String,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IssueVerificationResponse {
    pub token_id: String,
    pub expires_at: u64,
}

pub async fn issue_verification<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<IssueVerificationRequest>,
) -> Result<(StatusCode, Json<IssueVerificationResponse>), RpcError>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let requested_by = principal(&headers)?;
    let id = parse_workflow(JobHistoryId::parse(id))?;

    let issued = state
        .issuer
        .issue_request(
            &id,
            &body.verifier_email,
            requested_by,
            body.message,
            Timestamp::now(),
        )
        .await?;

    state.metrics.requests_issued.inc();
    Ok((
        StatusCode::CREATED,
        Json(IssueVerificationResponse {
            token_id: issued.token_id.to_string(),
            expires_at: issued.expires_at.as_secs(),
        }),
    ))
}

// ── Verification links (public entry point) ──────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub job_history_id: String,
    pub action: String,
    pub new_status: String,
}

pub async fn resolve_link<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Path((token_id, action)): Path<(String, String)>,
) -> Result<Json<ResolveResponse>, RpcError>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let token_id = parse_workflow(TokenId::parse(token_id))?;
    let action = parse_workflow(VerificationAction::parse(&action))?;

    match state.resolver.resolve(&token_id, action, Timestamp::now()) {
        Ok(resolution) => {
            match action {
                VerificationAction::Accept => state.metrics.resolutions_accepted.inc(),
                VerificationAction::Reject => state.metrics.resolutions_rejected.inc(),
            }
            Ok(Json(ResolveResponse {
                job_history_id: resolution.job_history_id.to_string(),
                action: resolution.action.to_string(),
                new_status: resolution.new_status.as_str().to_string(),
            }))
        }
        Err(e) => {
            state.metrics.resolution_failures.inc();
            Err(e.into())
        }
    }
}

// ── Telemetry ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AnchorTelemetryResponse {
    pub pending: u64,
    pub in_progress: u64,
    pub done: u64,
    pub failed: u64,
    pub records: u64,
}

pub async fn anchor_telemetry<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
) -> Result<Json<AnchorTelemetryResponse>, RpcError>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let counts = state
        .store
        .queue_counts()
        .map_err(VerificationError::from)?;
    let records = state
        .store
        .record_count()
        .map_err(VerificationError::from)?;
    Ok(Json(AnchorTelemetryResponse {
        pending: counts.pending,
        in_progress: counts.in_progress,
        done: counts.done,
        failed: counts.failed,
        records,
    }))
}

pub async fn metrics<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
) -> Result<String, RpcError>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    state.metrics.render()
}
