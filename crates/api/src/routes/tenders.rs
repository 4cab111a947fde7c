//! Tender routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    extractors::{Caller, JsonBody, PathParams, QueryParams, RepeatedQuery, resolve_employee},
};
use tenderbid_core::tender::{NewTender, ServiceType, TenderPatch, TenderService, TenderStatus};
use tenderbid_db::{TenderRepository, entities::tenders};
use tenderbid_shared::types::{EmployeeId, OrganizationId, PageRequest, TenderId};

/// Default page size of the public tender list.
const DEFAULT_LIST_LIMIT: u64 = 5;
/// Default page size of per-employee listings.
const DEFAULT_MY_LIMIT: u64 = 100;

/// Creates the tender routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenders", get(list_tenders))
        .route("/tenders/new", post(create_tender))
        .route("/tenders/my", get(my_tenders))
        .route("/tenders/{tender_id}/status", get(get_status).put(set_status))
        .route("/tenders/{tender_id}/edit", patch(edit_tender))
        .route("/tenders/{tender_id}/rollback/{version}", put(rollback_tender))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the public tender list.
///
/// `service_type` may be repeated.
#[derive(Debug, Default, Deserialize)]
pub struct ListTendersQuery {
    /// Page size (default 5).
    pub limit: Option<i64>,
    /// Items to skip.
    pub offset: Option<i64>,
    /// Service types to include. Empty means all.
    #[serde(default)]
    pub service_type: Vec<String>,
}

/// Pagination for per-employee listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page size (default 100).
    pub limit: Option<i64>,
    /// Items to skip.
    pub offset: Option<i64>,
}

/// Request body for creating a tender.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenderRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Free text.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Service type label.
    pub service_type: String,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Username of the creating employee.
    #[validate(length(min = 1))]
    pub creator_username: String,
}

/// Request body for editing a tender. Absent fields keep their values.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditTenderRequest {
    /// New name.
    #[validate(length(max = 100))]
    pub name: Option<String>,
    /// New description.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// New service type label.
    pub service_type: Option<String>,
}

/// Query parameters for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// New status label.
    pub status: Option<String>,
}

/// Tender as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderResponse {
    /// Tender ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free text.
    pub description: Option<String>,
    /// Status label.
    pub status: &'static str,
    /// Service type label.
    pub service_type: &'static str,
    /// Live version.
    pub version: i32,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Creation time (RFC 3339).
    pub created_at: String,
}

impl From<tenders::Model> for TenderResponse {
    fn from(t: tenders::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            status: TenderStatus::from(t.status).as_str(),
            service_type: ServiceType::from(t.service_type).as_str(),
            version: t.version,
            organization_id: t.organization_id,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

fn into_responses(tenders: Vec<tenders::Model>) -> Vec<TenderResponse> {
    tenders.into_iter().map(TenderResponse::from).collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /tenders - List tenders, optionally filtered by service type.
async fn list_tenders(
    State(state): State<AppState>,
    RepeatedQuery(query): RepeatedQuery<ListTendersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.limit, query.offset).resolve(DEFAULT_LIST_LIMIT)?;
    let service_types = query
        .service_type
        .iter()
        .map(|raw| TenderService::parse_service_type(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let repo = TenderRepository::new((*state.db).clone());
    let tenders = repo.list(&service_types, page).await?;

    Ok(Json(into_responses(tenders)))
}

/// POST /tenders/new - Create a tender at version 1.
async fn create_tender(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateTenderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let creator = resolve_employee(&state.db, "creatorUsername", &payload.creator_username).await?;
    let service_type = TenderService::parse_service_type(&payload.service_type)?;

    let repo = TenderRepository::new((*state.db).clone());
    let tender = repo
        .create(NewTender {
            name: payload.name,
            description: payload.description,
            service_type,
            organization_id: OrganizationId::from_uuid(payload.organization_id),
            created_by: EmployeeId::from_uuid(creator.id),
        })
        .await?;

    Ok((StatusCode::OK, Json(TenderResponse::from(tender))))
}

/// GET /tenders/my - Tenders created by the caller.
async fn my_tenders(
    State(state): State<AppState>,
    caller: Caller,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.limit, query.offset).resolve(DEFAULT_MY_LIMIT)?;

    let repo = TenderRepository::new((*state.db).clone());
    let tenders = repo.list_by_creator(caller.id(), page).await?;

    Ok(Json(into_responses(tenders)))
}

/// GET `/tenders/{tender_id}/status` - Current status label.
async fn get_status(
    State(state): State<AppState>,
    caller: Caller,
    PathParams(tender_id): PathParams<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TenderRepository::new((*state.db).clone());
    let status = repo
        .status(TenderId::from_uuid(tender_id), caller.id())
        .await?;

    Ok(Json(status.as_str()))
}

/// PUT `/tenders/{tender_id}/status` - Change the status label.
async fn set_status(
    State(state): State<AppState>,
    caller: Caller,
    PathParams(tender_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<StatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let raw = query
        .status
        .ok_or_else(|| ApiError::validation("status is required"))?;
    let status = TenderService::parse_status(&raw)?;

    let repo = TenderRepository::new((*state.db).clone());
    let tender = repo
        .set_status(TenderId::from_uuid(tender_id), caller.id(), status)
        .await?;

    Ok(Json(TenderResponse::from(tender)))
}

/// PATCH `/tenders/{tender_id}/edit` - Edit content, producing a new version.
async fn edit_tender(
    State(state): State<AppState>,
    caller: Caller,
    PathParams(tender_id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<EditTenderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let service_type = payload
        .service_type
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(TenderService::parse_service_type)
        .transpose()?;
    let patch = TenderPatch {
        name: payload.name,
        description: payload.description,
        service_type,
    };

    let repo = TenderRepository::new((*state.db).clone());
    let tender = repo
        .edit(TenderId::from_uuid(tender_id), caller.id(), &patch)
        .await?;

    info!(tender_id = %tender.id, username = caller.username(), "Tender edited via API");
    Ok(Json(TenderResponse::from(tender)))
}

/// PUT `/tenders/{tender_id}/rollback/{version}` - Restore an archived version.
async fn rollback_tender(
    State(state): State<AppState>,
    caller: Caller,
    PathParams((tender_id, version)): PathParams<(Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TenderRepository::new((*state.db).clone());
    let tender = repo
        .rollback(TenderId::from_uuid(tender_id), caller.id(), version)
        .await?;

    Ok(Json(TenderResponse::from(tender)))
}
