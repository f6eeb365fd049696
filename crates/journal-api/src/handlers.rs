//! Route handlers.
//!
//! Every protected handler authorizes before it looks at the body or query
//! string, so a caller without the right role never learns whether their
//! payload was well formed.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum_extra::extract::cookie::CookieJar;
use journal_acl::Operation;
use journal_core::{Entry, EntryPatch, Error, NewEntry, Role};
use journal_query::{GroupedEntries, ListFilter, entry_not_found};
use serde::{Deserialize, Serialize};

use crate::cookies::{clear_session, session_token, set_session};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Payloads
// ============================================================================

/// `{message}` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin or viewer password.
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Role the session grants.
    pub role: Role,
    /// Human-readable outcome.
    pub message: String,
}

/// Query string of `GET /entries`.
#[derive(Debug, Default, Deserialize)]
pub struct EntriesParams {
    /// Literal search term.
    pub search: Option<String>,
    /// Category, or `all`.
    pub category: Option<String>,
    /// Group by category (default `true`).
    pub grouped: Option<bool>,
}

/// Body of `GET /entries`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EntriesResponse {
    /// Grouped by category.
    Grouped {
        /// Category label to entries.
        grouped: GroupedEntries,
    },
    /// Flat list.
    Flat {
        /// Entries, newest first.
        entries: Vec<Entry>,
    },
}

/// Body of `GET /categories`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    /// Sorted category names.
    pub categories: Vec<String>,
}

// ============================================================================
// Public routes
// ============================================================================

/// Liveness probe.
pub async fn root() -> Json<MessageResponse> {
    MessageResponse::new("Journal API is running")
}

/// Exchange a password for a session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let Json(request) = body?;

    // Argon2 verification is CPU-bound; keep it off the async workers.
    let gate = Arc::clone(&state.gate);
    let role = tokio::task::spawn_blocking(move || gate.authenticate(&request.password))
        .await
        .map_err(|e| Error::storage(format!("Password check task failed: {e}")))??
        .ok_or_else(ApiError::invalid_credentials)?;
    let session = state.gate.issue_session(role)?;
    tracing::info!(%role, "Session issued");

    let jar = set_session(jar, &session, state.gate.cookie_secure());
    Ok((
        jar,
        Json(LoginResponse {
            role,
            message: format!("Successfully logged in as {role}"),
        }),
    ))
}

/// Drop the session cookie. Succeeds with or without a session.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (clear_session(jar), MessageResponse::new("Successfully logged out"))
}

// ============================================================================
// Entry routes
// ============================================================================

/// List entries visible to the caller.
pub async fn list_entries(
    State(state): State<AppState>,
    jar: CookieJar,
    params: Result<Query<EntriesParams>, QueryRejection>,
) -> ApiResult<Json<EntriesResponse>> {
    let grant = state
        .policy
        .authorize(session_token(&jar), Operation::ListEntries)?;
    let Query(params) = params?;

    let response = if params.grouped.unwrap_or(true) {
        let grouped = state
            .entries
            .list_grouped(grant.scope, params.search.as_deref())
            .await?;
        EntriesResponse::Grouped { grouped }
    } else {
        let filter = ListFilter {
            search: params.search,
            category: params.category,
        };
        let entries = state.entries.list(grant.scope, &filter).await?;
        EntriesResponse::Flat { entries }
    };
    Ok(Json(response))
}

/// Create an entry.
pub async fn create_entry(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<NewEntry>, JsonRejection>,
) -> ApiResult<Json<Entry>> {
    state
        .policy
        .authorize(session_token(&jar), Operation::CreateEntry)?;
    let Json(fields) = body?;
    Ok(Json(state.entries.create(fields).await?))
}

/// Fetch one entry.
pub async fn get_entry(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> ApiResult<Json<Entry>> {
    state
        .policy
        .authorize(session_token(&jar), Operation::ReadEntry)?;
    let entry = state
        .entries
        .get(&id)
        .await?
        .ok_or_else(|| entry_not_found(&id))?;
    Ok(Json(entry))
}

/// Partially update an entry.
pub async fn update_entry(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    body: Result<Json<EntryPatch>, JsonRejection>,
) -> ApiResult<Json<Entry>> {
    state
        .policy
        .authorize(session_token(&jar), Operation::UpdateEntry)?;
    let Json(patch) = body?;
    Ok(Json(state.entries.update(&id, &patch).await?))
}

/// Delete an entry.
pub async fn delete_entry(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .policy
        .authorize(session_token(&jar), Operation::DeleteEntry)?;
    if !state.entries.delete(&id).await? {
        return Err(entry_not_found(&id).into());
    }
    Ok(MessageResponse::new("Entry deleted successfully"))
}

/// Categories visible to the caller.
pub async fn list_categories(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<Json<CategoriesResponse>> {
    let grant = state
        .policy
        .authorize(session_token(&jar), Operation::ListCategories)?;
    let categories = state.entries.categories(grant.scope).await?;
    Ok(Json(CategoriesResponse { categories }))
}
