//! Category endpoints
//!
//! Besides category CRUD, this module owns the category-nested product
//! routes: creating a product directly inside a category and listing a
//! category's products as a page.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::read_image_field;
use crate::error::{ApiMessage, Error, Result};
use crate::listing::{EntityKind, PageQuery, PageRequest, PageResponse};
use crate::models::{CategoryDto, CreateCategory, CreateProduct, ProductDto, UpdateCategory};
use crate::repository::{list_page, paging_fault, PageSource};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route("/search/{keyword}", get(search_categories))
        .route("/images/{id}", post(upload_image).get(serve_image))
        .route(
            "/{id}/products",
            post(create_product_in_category).get(list_category_products),
        )
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> Result<(StatusCode, Json<CategoryDto>)> {
    let row = state.categories().create(&input).await?;
    tracing::info!(category_id = %row.id, "Category created");
    Ok((StatusCode::CREATED, Json(CategoryDto::from_row(row))))
}

async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<CategoryDto>>> {
    page_of_categories(&state, &query, None).await
}

async fn search_categories(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<CategoryDto>>> {
    page_of_categories(&state, &query, Some(&keyword)).await
}

async fn page_of_categories(
    state: &AppState,
    query: &PageQuery,
    keyword: Option<&str>,
) -> Result<Json<PageResponse<CategoryDto>>> {
    let defaults = state.config.listing.for_kind(EntityKind::Category);
    let request = PageRequest::resolve(EntityKind::Category, query, defaults)?;
    let page = list_page(&state.categories(), &request, keyword).await?;
    Ok(Json(PageResponse::from_page(
        &request,
        page.map(CategoryDto::from_row),
    )))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryDto>> {
    let row = state.categories().find_by_id(&id).await?;
    Ok(Json(CategoryDto::from_row(row)))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCategory>,
) -> Result<Json<CategoryDto>> {
    let row = state.categories().update(&id, &input).await?;
    Ok(Json(CategoryDto::from_row(row)))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>> {
    state.categories().delete(&id).await?;
    tracing::info!(category_id = %id, "Category deleted");
    Ok(Json(ApiMessage::success(
        StatusCode::OK,
        "Category deleted successfully!",
    )))
}

async fn create_product_in_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateProduct>,
) -> Result<(StatusCode, Json<ProductDto>)> {
    // resolve the category first so a bad id is a 404, not an FK error
    state.categories().find_by_id(&id).await?;

    let row = state.products().create(&input, Some(&id)).await?;
    tracing::info!(product_id = %row.id, category_id = %id, "Product created in category");
    Ok((StatusCode::CREATED, Json(ProductDto::from_row(row))))
}

async fn list_category_products(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<ProductDto>>> {
    state.categories().find_by_id(&id).await?;

    let defaults = state.config.listing.for_kind(EntityKind::Product);
    let request = PageRequest::resolve(EntityKind::Product, &query, defaults)?;

    let products = state.products();
    let column = products
        .sort_column(&request.sort_field)
        .ok_or(Error::InvalidPaging(EntityKind::Product))?;
    let page = products
        .find_page_by_category(&id, column, &request)
        .await
        .map_err(|e| paging_fault(EntityKind::Product, e))?;

    Ok(Json(PageResponse::from_page(
        &request,
        page.map(ProductDto::from_row),
    )))
}

async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiMessage>)> {
    state.categories().find_by_id(&id).await?;

    let (original_name, data) = read_image_field(&mut multipart).await?;
    let file_name = state
        .images()
        .save(EntityKind::Category, &original_name, &data)
        .await?;
    state.categories().set_cover_image(&id, &file_name).await?;

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
    let row = state.categories().find_by_id(&id).await?;
    let file_name = row
        .cover_image
        .ok_or_else(|| Error::NotFound(format!("No cover image stored for category {}", id)))?;

    let (data, content_type) = state
        .images()
        .load(EntityKind::Category, &file_name)
        .await?;
    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
