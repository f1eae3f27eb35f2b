//! Variable endpoint handlers.
//!
//! Every handler serves both `/repos/{owner}/{repo}/...` and
//! `/repositories/{id}/...`, for repository and environment collections.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::mock_server::state::{MockError, MockState, ScopeKey};
use crate::{CreateVariable, UpdateVariable, VariableList};

type SharedState = Arc<RwLock<MockState>>;

/// GitHub's default page size for variable listings.
const DEFAULT_PER_PAGE: usize = 10;

/// GitHub's largest page size for variable listings.
const MAX_PER_PAGE: usize = 30;

/// Path parameters of all variable routes.
#[derive(Debug, Deserialize)]
pub struct VariablePath {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub id: Option<u64>,
    pub env: Option<String>,
    pub name: Option<String>,
}

/// Query parameters for listing variables.
#[derive(Debug, Default, Deserialize)]
pub struct ListVariablesQuery {
    pub per_page: Option<usize>,
    pub page: Option<usize>,
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest/actions/variables"
        })),
    )
        .into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Not Found")
}

fn mock_error(err: MockError) -> Response {
    match err {
        MockError::NotFound => not_found(),
        MockError::AlreadyExists => error(StatusCode::CONFLICT, "Already exists"),
    }
}

/// Reject requests without the required bearer token, if one is configured.
fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(ref token) = state.required_token else {
        return Ok(());
    };

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(token.as_str()) {
        Ok(())
    } else {
        Err(error(StatusCode::UNAUTHORIZED, "Bad credentials"))
    }
}

/// Resolve route parameters to a collection, or a 404 response.
fn resolve(state: &MockState, path: &VariablePath) -> Result<ScopeKey, Response> {
    let repo = match (&path.owner, &path.repo, path.id) {
        (Some(owner), Some(repo), _) => format!("{owner}/{repo}"),
        (_, _, Some(id)) => state.repository_name(id).ok_or_else(not_found)?.to_string(),
        _ => return Err(not_found()),
    };

    let scope = ScopeKey {
        repo,
        environment: path.env.clone(),
    };

    // Unknown repositories and environments are 404s, like on GitHub.
    state.list_variables(&scope).ok_or_else(not_found)?;
    Ok(scope)
}

fn name(path: &VariablePath) -> Result<&str, Response> {
    path.name.as_deref().ok_or_else(not_found)
}

/// Build an RFC 8288 `Link` header for a page listing.
fn link_header(
    headers: &HeaderMap,
    uri: &axum::http::Uri,
    per_page: usize,
    page: usize,
    last_page: usize,
) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let base = format!("http://{host}{}", uri.path());
    let link =
        |p: usize, rel: &str| format!("<{base}?per_page={per_page}&page={p}>; rel=\"{rel}\"");

    let mut links = Vec::new();
    if page < last_page {
        links.push(link(page + 1, "next"));
        links.push(link(last_page, "last"));
    }
    if page > 1 {
        links.push(link(1, "first"));
        links.push(link(page - 1, "prev"));
    }

    (!links.is_empty()).then(|| links.join(", "))
}

/// GET .../variables
pub async fn list_variables(
    State(state): State<SharedState>,
    Path(path): Path<VariablePath>,
    Query(query): Query<ListVariablesQuery>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let scope = match resolve(&state, &path) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let all = state.list_variables(&scope).unwrap_or_default();
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let page = query.page.unwrap_or(1).max(1);
    let last_page = all.len().div_ceil(per_page).max(1);

    // Apply pagination
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(all.len());
    let variables = if start < all.len() {
        all[start..end].to_vec()
    } else {
        vec![]
    };

    let body = Json(VariableList {
        total_count: all.len() as u64,
        variables,
    });

    match link_header(&headers, &uri, per_page, page, last_page) {
        Some(link) => (StatusCode::OK, [(header::LINK, link)], body).into_response(),
        None => (StatusCode::OK, body).into_response(),
    }
}

/// GET .../variables/{name}
pub async fn get_variable(
    State(state): State<SharedState>,
    Path(path): Path<VariablePath>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let (scope, name) = match resolve(&state, &path).and_then(|s| Ok((s, name(&path)?))) {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match state.get_variable(&scope, name) {
        Some(variable) => (StatusCode::OK, Json(variable.clone())).into_response(),
        None => not_found(),
    }
}

/// POST .../variables
pub async fn create_variable(
    State(state): State<SharedState>,
    Path(path): Path<VariablePath>,
    headers: HeaderMap,
    Json(params): Json<CreateVariable>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let scope = match resolve(&state, &path) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    if params.name.is_empty() {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid request: name is empty");
    }

    match state.create_variable(&scope, params) {
        Ok(_) => (StatusCode::CREATED, Json(serde_json::json!({}))).into_response(),
        Err(err) => mock_error(err),
    }
}

/// PATCH .../variables/{name}
pub async fn update_variable(
    State(state): State<SharedState>,
    Path(path): Path<VariablePath>,
    headers: HeaderMap,
    Json(params): Json<UpdateVariable>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let (scope, name) = match resolve(&state, &path).and_then(|s| Ok((s, name(&path)?))) {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match state.update_variable(&scope, name, params) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => mock_error(err),
    }
}

/// DELETE .../variables/{name}
pub async fn delete_variable(
    State(state): State<SharedState>,
    Path(path): Path<VariablePath>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let (scope, name) = match resolve(&state, &path).and_then(|s| Ok((s, name(&path)?))) {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match state.delete_variable(&scope, name) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => mock_error(err),
    }
}
