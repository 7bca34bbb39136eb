//! Product endpoints

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::read_image_field;
use crate::error::{ApiMessage, Error, Result};
use crate::listing::{EntityKind, PageQuery, PageRequest, PageResponse};
use crate::models::{CreateProduct, ProductDto, UpdateProduct};
use crate::repository::{list_page, paging_fault, PageSource};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/live", get(list_live_products))
        .route("/search/{keyword}", get(search_products))
        .route("/images/{id}", post(upload_image).get(serve_image))
        .route("/{id}/category/{category_id}", post(assign_category))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> Result<(StatusCode, Json<ProductDto>)> {
    let row = state.products().create(&input, None).await?;
    tracing::info!(product_id = %row.id, "Product created");
    Ok((StatusCode::CREATED, Json(ProductDto::from_row(row))))
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<ProductDto>>> {
    page_of_products(&state, &query, None).await
}

async fn search_products(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<ProductDto>>> {
    page_of_products(&state, &query, Some(&keyword)).await
}

async fn page_of_products(
    state: &AppState,
    query: &PageQuery,
    keyword: Option<&str>,
) -> Result<Json<PageResponse<ProductDto>>> {
    let defaults = state.config.listing.for_kind(EntityKind::Product);
    let request = PageRequest::resolve(EntityKind::Product, query, defaults)?;
    let page = list_page(&state.products(), &request, keyword).await?;
    Ok(Json(PageResponse::from_page(
        &request,
        page.map(ProductDto::from_row),
    )))
}

async fn list_live_products(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<ProductDto>>> {
    let defaults = state.config.listing.for_kind(EntityKind::Product);
    let request = PageRequest::resolve(EntityKind::Product, &query, defaults)?;

    let products = state.products();
    let column = products
        .sort_column(&request.sort_field)
        .ok_or(Error::InvalidPaging(EntityKind::Product))?;
    let page = products
        .find_live_page(column, &request)
        .await
        .map_err(|e| paging_fault(EntityKind::Product, e))?;

    Ok(Json(PageResponse::from_page(
        &request,
        page.map(ProductDto::from_row),
    )))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDto>> {
    let row = state.products().find_by_id(&id).await?;
    Ok(Json(ProductDto::from_row(row)))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProduct>,
) -> Result<Json<ProductDto>> {
    let row = state.products().update(&id, &input).await?;
    Ok(Json(ProductDto::from_row(row)))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>> {
    state.products().delete(&id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(ApiMessage::success(
        StatusCode::OK,
        "Product deleted successfully!",
    )))
}

async fn assign_category(
    State(state): State<AppState>,
    Path((id, category_id)): Path<(String, String)>,
) -> Result<Json<ProductDto>> {
    // resolve the category first so a bad id is a 404, not an FK error
    state.categories().find_by_id(&category_id).await?;

    let row = state.products().assign_category(&id, &category_id).await?;
    tracing::info!(product_id = %id, category_id = %category_id, "Product assigned to category");
    Ok(Json(ProductDto::from_row(row)))
}

async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiMessage>)> {
    state.products().find_by_id(&id).await?;

    let (original_name, data) = read_image_field(&mut multipart).await?;
    let file_name = state
        .images()
        .save(EntityKind::Product, &original_name, &data)
        .await?;
    state.products().set_image(&id, &file_name).await?;

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
    let row = state.products().find_by_id(&id).await?;
    let file_name = row
        .image
        .ok_or_else(|| Error::NotFound(format!("No image stored for product {}", id)))?;

    let (data, content_type) = state.images().load(EntityKind::Product, &file_name).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
