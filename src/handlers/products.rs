use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    db,
    error::AppResult,
    extract::{JsonBody, PathParam, QueryParams},
    models::{CreateProduct, Product, ProductFilters, ProductOut, StockUpdate, UpdateProduct},
    AppState,
};

fn render(state: &AppState, product: Product) -> ProductOut {
    ProductOut::from_product(product, &state.static_base_url)
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(filters): QueryParams<ProductFilters>,
) -> AppResult<Json<Vec<ProductOut>>> {
    filters.validate()?;

    let start = Instant::now();
    let products = db::fetch_products(&state.db, &filters).await?;

    info!(
        count = products.len(),
        skip = filters.skip(),
        limit = filters.limit(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed products"
    );

    Ok(Json(
        products.into_iter().map(|p| render(&state, p)).collect(),
    ))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProduct>,
) -> AppResult<(StatusCode, Json<ProductOut>)> {
    payload.validate()?;

    let start = Instant::now();
    let product = db::insert_product(&state.db, &payload).await?;

    info!(
        id = product.id,
        nombre = %product.nombre,
        elapsed_ms = start.elapsed().as_millis(),
        "Created product"
    );

    Ok((StatusCode::CREATED, Json(render(&state, product))))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ProductOut>> {
    let product = db::fetch_product_by_id(&state.db, id).await?;
    info!(id, "Fetched product");
    Ok(Json(render(&state, product)))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateProduct>,
) -> AppResult<Json<ProductOut>> {
    payload.validate()?;

    let start = Instant::now();
    let product = db::update_product(&state.db, id, &payload).await?;

    info!(id, elapsed_ms = start.elapsed().as_millis(), "Updated product");

    Ok(Json(render(&state, product)))
}

// ── Delete ────────────────────────────────────────────────────────────────────

/// Soft delete: the product stays in the table with `disponible = false`.
pub async fn delete_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ProductOut>> {
    let product = db::soft_delete_product(&state.db, id).await?;
    info!(id, "Marked product unavailable");
    Ok(Json(render(&state, product)))
}

// ── Stock ─────────────────────────────────────────────────────────────────────

pub async fn update_stock(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<StockUpdate>,
) -> AppResult<Json<ProductOut>> {
    payload.validate()?;

    let product = db::update_stock(&state.db, id, payload.stock).await?;
    info!(id, stock = product.stock, "Updated stock");

    Ok(Json(render(&state, product)))
}
