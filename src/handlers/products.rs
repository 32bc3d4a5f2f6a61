use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::ProductModel;
use crate::errors::{ApiError, ErrorResponse};
use crate::handlers::common::{self, JsonBody, MessageResponse};
use crate::services::catalog::{ProductFields, ProductQuery};
use crate::AppState;

/// Categories accepted by the catalog. Anything else is rejected at the door.
pub const CATEGORIES: [&str; 5] = ["Điện tử", "Quần áo", "Đồ ăn", "Sách", "Khác"];

/// Validation reports one violation at a time, walking fields in this order.
const FIELD_ORDER: [&str; 5] = ["name", "category", "price", "quantity", "description"];

pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/categories", get(list_categories))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn validate_category(category: &str) -> Result<(), validator::ValidationError> {
    if CATEGORIES.contains(&category) {
        return Ok(());
    }
    let mut err = validator::ValidationError::new("category");
    err.message = Some(
        format!(
            "\"category\" must be one of [{}]",
            CATEGORIES.join(", ")
        )
        .into(),
    );
    Err(err)
}

/// Incoming body for create and update. Every field is optional at the serde
/// layer so that missing fields produce validation messages instead of a
/// deserialization failure.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    #[validate(
        required,
        length(min = 3, message = "\"name\" length must be at least 3 characters long")
    )]
    pub name: Option<String>,
    #[validate(required, custom = "validate_category")]
    pub category: Option<String>,
    #[validate(
        required,
        range(min = 0, message = "\"price\" must be greater than or equal to 0")
    )]
    pub price: Option<i64>,
    #[validate(
        required,
        range(min = 1, message = "\"quantity\" must be greater than or equal to 1")
    )]
    pub quantity: Option<i64>,
    pub description: Option<String>,
}

impl ProductPayload {
    /// Runs validation and, on success, unwraps the optional fields.
    pub fn into_validated(self) -> Result<ProductFields, ApiError> {
        if let Err(errors) = self.validate() {
            let message = common::first_violation(&errors, &FIELD_ORDER)
                .unwrap_or_else(|| "invalid payload".to_string());
            return Err(ApiError::ValidationError(message));
        }
        Ok(ProductFields {
            name: self.name.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
            description: self.description,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    /// 1-based page number. Values below 1 fall back to 1.
    pub page: Option<i64>,
    /// Page size. Values below 1 fall back to the configured default.
    pub limit: Option<i64>,
    /// Substring match on the product name.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Inclusive lower price bound. Ignored when zero or negative.
    pub min_price: Option<i64>,
    /// Inclusive upper price bound.
    pub max_price: Option<i64>,
}

impl ListProductsParams {
    pub fn into_query(self, default_limit: i64) -> ProductQuery {
        let page = match self.page {
            Some(p) if p >= 1 => p,
            _ => 1,
        };
        let limit = match self.limit {
            Some(l) if l >= 1 => l,
            _ => default_limit,
        };
        ProductQuery {
            page,
            limit,
            search: self.search.filter(|s| !s.is_empty()),
            category: self.category.filter(|c| !c.is_empty()),
            min_price: self.min_price.unwrap_or(0),
            max_price: self.max_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub quantity: i64,
    pub description: Option<String>,
}

impl From<ProductModel> for ProductResponse {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            price: model.price,
            quantity: model.quantity,
            description: model.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListProductsResponse {
    pub page: i64,
    pub limit: i64,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    pub data: Vec<ProductResponse>,
}

impl ListProductsResponse {
    pub fn new(page: i64, limit: i64, total: u64, rows: Vec<ProductModel>) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: common::total_pages(total, limit),
            data: rows.into_iter().map(ProductResponse::from).collect(),
        }
    }
}

/// List products with optional filters and pagination.
#[utoipa::path(
    get,
    path = "/products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Page of products", body = ListProductsResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.into_query(state.config.default_page_size);
    let page = query.page;
    let limit = query.limit;
    let listing = state.catalog.list(&query).await?;
    Ok(Json(ListProductsResponse::new(
        page,
        limit,
        listing.total,
        listing.rows,
    )))
}

/// List the distinct categories present in the catalog.
#[utoipa::path(
    get,
    path = "/products/categories",
    responses(
        (status = 200, description = "Sorted distinct categories", body = Vec<String>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.catalog.categories().await?;
    Ok(Json(categories))
}

/// Fetch a single product by id.
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "No such product", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.catalog.get(id).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// Create a product. Responds with the new id as a bare JSON integer.
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Id of the created product", body = i64),
        (status = 400, description = "Invalid payload", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = payload.into_validated()?;
    let id = state.catalog.create(fields).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

/// Replace a product's fields. The payload is validated the same way as create.
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Confirmation message", body = MessageResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "No such product", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = payload.into_validated()?;
    state.catalog.update(id, fields).await?;
    Ok(Json(MessageResponse::new("Product updated successfully")))
}

/// Delete a product by id.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Confirmation message", body = MessageResponse),
        (status = 404, description = "No such product", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.catalog.delete(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
