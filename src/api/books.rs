use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use super::response::{ApiResult, MessageBody};
use crate::{
    error::AppError,
    models::{Book, BookDraft},
    search,
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Search text matched against title, author and year
    #[serde(default)]
    pub q: Option<String>,
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>().map_err(|_| AppError::validation("invalid book id"))
}

/// Decode the raw body regardless of Content-Type
fn decode_draft(body: &Bytes) -> ApiResult<BookDraft> {
    serde_json::from_slice(body).map_err(|_| AppError::validation("invalid request payload"))
}

/// GET /api/books
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "All books ordered by id", body = [Book]),
        (status = 500, description = "Internal server error", body = crate::api::response::ErrorBody)
    )
)]
pub async fn list_books(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Book>>> {
    let books = state.store.list_all().await?;
    Ok(Json(books))
}

/// GET /api/books/:id
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 400, description = "Invalid book id", body = crate::api::response::ErrorBody),
        (status = 404, description = "Book not found", body = crate::api::response::ErrorBody)
    )
)]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Book>> {
    let id = parse_id(&id)?;
    let book = state.store.get_by_id(id).await?;
    Ok(Json(book))
}

/// POST /api/books
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookDraft,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid payload or missing fields", body = crate::api::response::ErrorBody)
    )
)]
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let draft = decode_draft(&body)?;
    let new_book = draft
        .validate()
        .ok_or_else(|| AppError::validation("title, author and year are required"))?;

    let book = state.store.create(&new_book).await?;
    tracing::info!("Book created: {} (id {})", book.title, book.id);
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /api/books/:id - full replace
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookDraft,
    responses(
        (status = 200, description = "Book replaced", body = Book),
        (status = 400, description = "Invalid id, payload or missing fields", body = crate::api::response::ErrorBody),
        (status = 404, description = "Book not found", body = crate::api::response::ErrorBody)
    )
)]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Book>> {
    let id = parse_id(&id)?;
    let draft = decode_draft(&body)?;
    let new_book = draft
        .validate()
        .ok_or_else(|| AppError::validation("title, author and year are required"))?;

    let book = state.store.update(id, &new_book).await?;
    Ok(Json(book))
}

/// PATCH /api/books/:id - field-level merge
///
/// The record is looked up before the body is decoded, so an unknown id wins
/// over a malformed payload.
#[utoipa::path(
    patch,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookDraft,
    responses(
        (status = 200, description = "Book after the merge", body = Book),
        (status = 400, description = "Invalid id or payload", body = crate::api::response::ErrorBody),
        (status = 404, description = "Book not found", body = crate::api::response::ErrorBody)
    )
)]
pub async fn patch_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Book>> {
    let id = parse_id(&id)?;
    let existing = state.store.get_by_id(id).await?;
    let draft = decode_draft(&body)?;

    let Some(merged) = draft.merge_into(&existing) else {
        // Nothing usable in the payload, skip the write
        return Ok(Json(existing));
    };

    let book = state.store.update(id, &merged).await?;
    Ok(Json(book))
}

/// DELETE /api/books/:id
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book deleted", body = MessageBody),
        (status = 400, description = "Invalid book id", body = crate::api::response::ErrorBody),
        (status = 404, description = "Book not found", body = crate::api::response::ErrorBody)
    )
)]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id)?;
    state.store.delete(id).await?;
    tracing::info!("Book deleted: id {}", id);
    Ok(Json(MessageBody::new("book deleted successfully")))
}

/// GET /api/books/search?q=
#[utoipa::path(
    get,
    path = "/api/books/search",
    tag = "books",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching books, most relevant first", body = [Book]),
        (status = 400, description = "Missing search query", body = crate::api::response::ErrorBody)
    )
)]
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Book>>> {
    let query = params.q.unwrap_or_default();
    let books = search::search_books(state.store.as_ref(), &query).await?;
    Ok(Json(books))
}
