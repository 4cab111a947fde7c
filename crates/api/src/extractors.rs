//! Request extractors.
//!
//! The wrappers below run the stock axum extractors but reject with
//! [`ApiError`], so malformed path segments, query strings and bodies leave
//! the API in the same `{"error", "reason"}` shape as every other failure.

use axum::{
    extract::{FromRequest, FromRequestParts, Query},
    http::request::Parts,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::{AppState, error::ApiError};
use tenderbid_db::{EmployeeRepository, entities::employee};
use tenderbid_shared::{AppError, types::EmployeeId};

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParams<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Query string whose keys may repeat, collected into `Vec` fields.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(ApiError))]
pub struct RepeatedQuery<T>(pub T);

#[derive(Debug, Deserialize)]
struct CallerQuery {
    username: Option<String>,
}

/// The employee named by the `username` query parameter.
///
/// A missing parameter is a validation error, an unknown name is 401.
///
/// ```ignore
/// async fn handler(caller: Caller) -> impl IntoResponse {
///     let employee_id = caller.id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Caller(pub employee::Model);

impl Caller {
    /// Returns the caller's employee ID.
    #[must_use]
    pub fn id(&self) -> EmployeeId {
        EmployeeId::from_uuid(self.0.id)
    }

    /// Returns the caller's username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.0.username
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<CallerQuery>::from_request_parts(parts, state).await?;

        let username = query.username.unwrap_or_default();
        resolve_employee(&state.db, "username", &username)
            .await
            .map(Caller)
    }
}

/// Looks up an employee by username.
///
/// `param` names the request field in error messages.
pub async fn resolve_employee(
    db: &DatabaseConnection,
    param: &str,
    username: &str,
) -> Result<employee::Model, ApiError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ApiError::validation(format!("{param} is required")));
    }

    EmployeeRepository::new(db.clone())
        .find_by_username(username)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized(format!("unknown user {username}")).into())
}
