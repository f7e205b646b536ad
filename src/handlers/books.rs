use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use serde_json::json;

use super::JsonBody;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::book::{Book, BookPatch, NewBook, BOOK_SCHEMA};
use crate::state::AppState;
use crate::store::Filter;
use crate::validation::{self, Mode};

/// Query parameters recognized by the list endpoint. Anything else is
/// ignored, not rejected.
const LIST_FILTERS: &[&str] = &["genre", "available"];

fn list_filter(params: &HashMap<String, String>) -> Filter {
    let mut filter = Filter::new();
    for &name in LIST_FILTERS {
        if let Some(raw) = params.get(name) {
            let value = match name {
                "available" => match raw.as_str() {
                    "true" => json!(true),
                    "false" => json!(false),
                    // non-boolean literal can never equal a stored boolean
                    _ => json!(raw),
                },
                _ => json!(raw),
            };
            filter = filter.eq(name, value);
        }
    }
    filter
}

/// GET /books - list all books, optionally filtered by genre/available
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Book>> {
    let books = state.books.find(&list_filter(&params)).await?;
    Ok(ApiResponse::success(books))
}

/// GET /books/:id - fetch a single book
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Book> {
    let id = validation::parse_id(&id)?;
    match state.books.find_by_id(id).await? {
        Some(book) => Ok(ApiResponse::success(book)),
        None => Err(ApiError::not_found("Book not found")),
    }
}

/// POST /books - create a book after validation and duplicate pre-check
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult<Book> {
    let errors = validation::validate(BOOK_SCHEMA, &body, Mode::Create);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    let new: NewBook = super::decode(body)?;

    // Optimistic pre-check for a friendly message; the store's unique
    // index is the backstop if a concurrent create wins the race.
    let taken = state
        .books
        .find_one(&Filter::new().eq("isbn", json!(new.isbn)))
        .await?;
    if taken.is_some() {
        return Err(ApiError::conflict("ISBN already exists"));
    }

    let book = state.books.insert(Book::from(new)).await?;
    Ok(ApiResponse::created(book).with_message("Book created"))
}

/// PUT /books/:id - partial update with merge semantics
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Book> {
    let id = validation::parse_id(&id)?;
    let errors = validation::validate(BOOK_SCHEMA, &body, Mode::Update);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    let patch: BookPatch = super::decode(body)?;

    let existing = state
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;

    // Changing the isbn requires that no other record holds the new value.
    if let Some(isbn) = &patch.isbn {
        if *isbn != existing.isbn {
            if let Some(other) = state
                .books
                .find_one(&Filter::new().eq("isbn", json!(isbn)))
                .await?
            {
                if other.id != id {
                    return Err(ApiError::conflict("ISBN already exists"));
                }
            }
        }
    }

    let updated = state.books.replace(id, patch.apply(existing)).await?;
    Ok(ApiResponse::success(updated).with_message("Book updated"))
}

/// DELETE /books/:id - delete, confirming without a record payload
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = validation::parse_id(&id)?;
    if !state.books.delete(id).await? {
        return Err(ApiError::not_found("Book not found"));
    }
    Ok(ApiResponse::success(()).with_message("Book deleted"))
}
