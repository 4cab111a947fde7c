//! Bid routes: lifecycle, decisions and feedback.

use axum::{
    Json, Router,
    extract::State,
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
    extractors::{Caller, JsonBody, PathParams, QueryParams, resolve_employee},
};
use tenderbid_core::bid::{AuthorType, BidPatch, BidService, BidStatus, NewBid};
use tenderbid_db::{
    BidRepository,
    entities::{bids, feedbacks},
};
use tenderbid_shared::types::{BidId, EmployeeId, PageRequest, TenderId};

/// Default page size of bid listings.
const DEFAULT_LIST_LIMIT: u64 = 100;
/// Default page size of the reviews listing.
const DEFAULT_REVIEWS_LIMIT: u64 = 10;

/// Creates the bid routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bids/new", post(create_bid))
        .route("/bids/my", get(my_bids))
        .route("/bids/{id}/list", get(list_for_tender))
        .route("/bids/{id}/reviews", get(reviews))
        .route("/bids/{id}/status", get(get_status).put(set_status))
        .route("/bids/{id}/edit", patch(edit_bid))
        .route("/bids/{id}/submit_decision", put(submit_decision))
        .route("/bids/{id}/feedback", put(submit_feedback))
        .route("/bids/{id}/rollback/{version}", put(rollback_bid))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Pagination for bid listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page size.
    pub limit: Option<i64>,
    /// Items to skip.
    pub offset: Option<i64>,
}

/// Request body for placing a bid.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBidRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Free text.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Tender being bid on.
    pub tender_id: Uuid,
    /// `Organization` or `User`.
    pub author_type: String,
    /// Employee placing the bid.
    pub author_id: Uuid,
}

/// Request body for editing a bid. Absent fields keep their values.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditBidRequest {
    /// New name.
    #[validate(length(max = 100))]
    pub name: Option<String>,
    /// New description.
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Query parameters for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// New status label.
    pub status: Option<String>,
}

/// Query parameters for a decision.
#[derive(Debug, Deserialize)]
pub struct DecisionQuery {
    /// `Approved` or `Rejected`.
    pub decision: Option<String>,
}

/// Query parameters for feedback.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackQuery {
    /// Feedback text.
    pub bid_feedback: Option<String>,
}

/// Query parameters for the reviews listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsQuery {
    /// Author whose bids were reviewed.
    pub author_username: Option<String>,
    /// Employee asking for the reviews.
    pub requester_username: Option<String>,
    /// Page size (default 10).
    pub limit: Option<i64>,
    /// Items to skip.
    pub offset: Option<i64>,
}

/// Bid as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidResponse {
    /// Bid ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free text.
    pub description: Option<String>,
    /// Status label.
    pub status: &'static str,
    /// Tender the bid is placed on.
    pub tender_id: Uuid,
    /// Author type label.
    pub author_type: &'static str,
    /// Authoring employee.
    pub author_id: Uuid,
    /// Live version.
    pub version: i32,
    /// Creation time (RFC 3339).
    pub created_at: String,
}

impl From<bids::Model> for BidResponse {
    fn from(b: bids::Model) -> Self {
        Self {
            id: b.id,
            name: b.name,
            description: b.description,
            status: BidStatus::from(b.status).as_str(),
            tender_id: b.tender_id,
            author_type: AuthorType::from(b.author_type).as_str(),
            author_id: b.author_id,
            version: b.version,
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// Feedback as returned by the reviews listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    /// Feedback ID.
    pub id: Uuid,
    /// Feedback text.
    pub description: String,
    /// Creation time (RFC 3339).
    pub created_at: String,
}

impl From<feedbacks::Model> for ReviewResponse {
    fn from(f: feedbacks::Model) -> Self {
        Self {
            id: f.id,
            description: f.feedback,
            created_at: f.created_at.to_rfc3339(),
        }
    }
}

fn into_responses(bids: Vec<bids::Model>) -> Vec<BidResponse> {
    bids.into_iter().map(BidResponse::from).collect()
}

fn required(value: Option<String>, param: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::validation(format!("{param} is required")))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /bids/new - Place a bid at version 1.
async fn create_bid(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateBidRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let author_type = BidService::parse_author_type(&payload.author_type)?;

    let repo = BidRepository::new((*state.db).clone());
    let bid = repo
        .create(NewBid {
            name: payload.name,
            description: payload.description,
            tender_id: TenderId::from_uuid(payload.tender_id),
            author_type,
            author_id: EmployeeId::from_uuid(payload.author_id),
        })
        .await?;

    Ok(Json(BidResponse::from(bid)))
}

/// GET /bids/my - Bids created by the caller.
async fn my_bids(
    State(state): State<AppState>,
    caller: Caller,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.limit, query.offset).resolve(DEFAULT_LIST_LIMIT)?;

    let repo = BidRepository::new((*state.db).clone());
    let bids = repo.list_by_creator(caller.id(), page).await?;

    Ok(Json(into_responses(bids)))
}

/// GET `/bids/{tender_id}/list` - Bids on a tender, for its responsible employees.
async fn list_for_tender(
    State(state): State<AppState>,
    caller: Caller,
    PathParams(tender_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.limit, query.offset).resolve(DEFAULT_LIST_LIMIT)?;

    let repo = BidRepository::new((*state.db).clone());
    let bids = repo
        .list_for_tender(TenderId::from_uuid(tender_id), caller.id(), page)
        .await?;

    Ok(Json(into_responses(bids)))
}

/// GET `/bids/{bid_id}/status` - Current status label, for the creator.
async fn get_status(
    State(state): State<AppState>,
    caller: Caller,
    PathParams(bid_id): PathParams<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = BidRepository::new((*state.db).clone());
    let status = repo.status(BidId::from_uuid(bid_id), caller.id()).await?;

    Ok(Json(status.as_str()))
}

/// PUT `/bids/{bid_id}/status` - Change the status label.
async fn set_status(
    State(state): State<AppState>,
    caller: Caller,
    PathParams(bid_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<StatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = BidService::parse_status(&required(query.status, "status")?)?;

    let repo = BidRepository::new((*state.db).clone());
    let bid = repo
        .set_status(BidId::from_uuid(bid_id), caller.id(), status)
        .await?;

    Ok(Json(BidResponse::from(bid)))
}

/// PATCH `/bids/{bid_id}/edit` - Edit content, producing a new version.
async fn edit_bid(
    State(state): State<AppState>,
    caller: Caller,
    PathParams(bid_id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<EditBidRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let patch = BidPatch {
        name: payload.name,
        description: payload.description,
    };

    let repo = BidRepository::new((*state.db).clone());
    let bid = repo
        .edit(BidId::from_uuid(bid_id), caller.id(), &patch)
        .await?;

    Ok(Json(BidResponse::from(bid)))
}

/// PUT `/bids/{bid_id}/submit_decision` - Approve or reject a bid.
async fn submit_decision(
    State(state): State<AppState>,
    caller: Caller,
    PathParams(bid_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<DecisionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let decision = BidService::parse_decision(&required(query.decision, "decision")?)?;

    let repo = BidRepository::new((*state.db).clone());
    let bid = repo
        .submit_decision(BidId::from_uuid(bid_id), caller.id(), decision)
        .await?;

    Ok(Json(BidResponse::from(bid)))
}

/// PUT `/bids/{bid_id}/feedback` - Leave feedback on a bid.
async fn submit_feedback(
    State(state): State<AppState>,
    caller: Caller,
    PathParams(bid_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<FeedbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let text = required(query.bid_feedback, "bidFeedback")?;

    let repo = BidRepository::new((*state.db).clone());
    let bid = repo
        .submit_feedback(BidId::from_uuid(bid_id), caller.id(), &text)
        .await?;

    Ok(Json(BidResponse::from(bid)))
}

/// GET `/bids/{tender_id}/reviews` - Feedback on an author's bids.
async fn reviews(
    State(state): State<AppState>,
    PathParams(tender_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<ReviewsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let author_username = required(query.author_username, "authorUsername")?;
    let requester = resolve_employee(
        &state.db,
        "requesterUsername",
        query.requester_username.as_deref().unwrap_or_default(),
    )
    .await?;
    let page = PageRequest::new(query.limit, query.offset).resolve(DEFAULT_REVIEWS_LIMIT)?;

    let repo = BidRepository::new((*state.db).clone());
    let reviews = repo
        .reviews(
            TenderId::from_uuid(tender_id),
            author_username.trim(),
            EmployeeId::from_uuid(requester.id),
            page,
        )
        .await?;

    let items: Vec<ReviewResponse> = reviews.into_iter().map(ReviewResponse::from).collect();
    Ok(Json(items))
}

/// PUT `/bids/{bid_id}/rollback/{version}` - Restore an archived version.
async fn rollback_bid(
    State(state): State<AppState>,
    caller: Caller,
    PathParams((bid_id, version)): PathParams<(Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = BidRepository::new((*state.db).clone());
    let bid = repo
        .rollback(BidId::from_uuid(bid_id), caller.id(), version)
        .await?;

    info!(bid_id = %bid.id, version = bid.version, username = caller.username(), "Bid rollback served");
    Ok(Json(BidResponse::from(bid)))
}
