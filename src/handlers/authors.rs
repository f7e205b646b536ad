use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use serde_json::json;

use super::JsonBody;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::author::{Author, AuthorPatch, NewAuthor, AUTHOR_SCHEMA};
use crate::state::AppState;
use crate::store::Filter;
use crate::validation::{self, Mode};

/// Query parameters recognized by the list endpoint. Anything else is
/// ignored, not rejected.
const LIST_FILTERS: &[&str] = &["fullname", "country", "gender", "birthdate"];

fn list_filter(params: &HashMap<String, String>) -> Filter {
    let mut filter = Filter::new();
    for &name in LIST_FILTERS {
        if let Some(raw) = params.get(name) {
            filter = filter.eq(name, json!(raw));
        }
    }
    filter
}

/// GET /authors - list all authors, optionally filtered
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Author>> {
    let authors = state.authors.find(&list_filter(&params)).await?;
    Ok(ApiResponse::success(authors))
}

/// GET /authors/:id - fetch a single author
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Author> {
    let id = validation::parse_id(&id)?;
    match state.authors.find_by_id(id).await? {
        Some(author) => Ok(ApiResponse::success(author)),
        None => Err(ApiError::not_found("Author not found")),
    }
}

/// POST /authors - create an author after validation and duplicate pre-check
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult<Author> {
    let errors = validation::validate(AUTHOR_SCHEMA, &body, Mode::Create);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    let new: NewAuthor = super::decode(body)?;

    // Optimistic pre-check; the store's unique index is the backstop.
    let taken = state
        .authors
        .find_one(&Filter::new().eq("fullname", json!(new.fullname)))
        .await?;
    if taken.is_some() {
        return Err(ApiError::conflict("Fullname already exists"));
    }

    let author = state.authors.insert(Author::from(new)).await?;
    Ok(ApiResponse::created(author).with_message("Author created"))
}

/// PUT /authors/:id - partial update with merge semantics
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Author> {
    let id = validation::parse_id(&id)?;
    let errors = validation::validate(AUTHOR_SCHEMA, &body, Mode::Update);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    let patch: AuthorPatch = super::decode(body)?;

    let existing = state
        .authors
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Author not found"))?;

    // Changing the fullname requires that no other record holds it.
    if let Some(fullname) = &patch.fullname {
        if *fullname != existing.fullname {
            if let Some(other) = state
                .authors
                .find_one(&Filter::new().eq("fullname", json!(fullname)))
                .await?
            {
                if other.id != id {
                    return Err(ApiError::conflict("Fullname already exists"));
                }
            }
        }
    }

    let updated = state.authors.replace(id, patch.apply(existing)).await?;
    Ok(ApiResponse::success(updated).with_message("Author updated"))
}

/// DELETE /authors/:id - delete, confirming without a record payload
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = validation::parse_id(&id)?;
    if !state.authors.delete(id).await? {
        return Err(ApiError::not_found("Author not found"));
    }
    Ok(ApiResponse::success(()).with_message("Author deleted"))
}
