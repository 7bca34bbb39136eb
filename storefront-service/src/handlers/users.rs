//! User endpoints

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::read_image_field;
use crate::error::{ApiMessage, Error, Result};
use crate::listing::{EntityKind, PageQuery, PageRequest, PageResponse};
use crate::models::{CreateUser, UpdateUser, UserDto};
use crate::repository::list_page;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/email", get(get_user_by_email))
        .route("/search/{keyword}", get(search_users))
        .route("/images/{id}", post(upload_image).get(serve_image))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserDto>)> {
    let row = state.users().create(&input).await?;
    tracing::info!(user_id = %row.id, "User created");
    Ok((StatusCode::CREATED, Json(UserDto::from_row(row))))
}

async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<UserDto>>> {
    page_of_users(&state, &query, None).await
}

async fn search_users(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<UserDto>>> {
    page_of_users(&state, &query, Some(&keyword)).await
}

async fn page_of_users(
    state: &AppState,
    query: &PageQuery,
    keyword: Option<&str>,
) -> Result<Json<PageResponse<UserDto>>> {
    let defaults = state.config.listing.for_kind(EntityKind::User);
    let request = PageRequest::resolve(EntityKind::User, query, defaults)?;
    let page = list_page(&state.users(), &request, keyword).await?;
    Ok(Json(PageResponse::from_page(
        &request,
        page.map(UserDto::from_row),
    )))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>> {
    let row = state.users().find_by_id(&id).await?;
    Ok(Json(UserDto::from_row(row)))
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: String,
}

async fn get_user_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<UserDto>> {
    let row = state.users().find_by_email(&query.email).await?;
    Ok(Json(UserDto::from_row(row)))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<UserDto>> {
    let row = state.users().update(&id, &input).await?;
    Ok(Json(UserDto::from_row(row)))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>> {
    state.users().delete(&id).await?;
    tracing::info!(user_id = %id, "User deleted");
    Ok(Json(ApiMessage::success(
        StatusCode::OK,
        "User deleted successfully!",
    )))
}

async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiMessage>)> {
    // 404 before touching the filesystem
    state.users().find_by_id(&id).await?;

    let (original_name, data) = read_image_field(&mut multipart).await?;
    let file_name = state
        .images()
        .save(EntityKind::User, &original_name, &data)
        .await?;
    state.users().set_image(&id, &file_name).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::success(
            StatusCode::CREATED,
            format!("{} image is uploaded successfully!", file_name),
        )),
    ))
}

async fn serve_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let row = state.users().find_by_id(&id).await?;
    let file_name = row
        .image
        .ok_or_else(|| Error::NotFound(format!("No image stored for user {}", id)))?;

    let (data, content_type) = state.images().load(EntityKind::User, &file_name).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
