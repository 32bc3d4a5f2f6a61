use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::ErrorResponse;
use crate::handlers::common::MessageResponse;
use crate::handlers::products::{ListProductsResponse, ProductPayload, ProductResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::list_categories,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
    ),
    components(schemas(
        ProductResponse,
        ProductPayload,
        ListProductsResponse,
        MessageResponse,
        ErrorResponse,
    )),
    tags((name = "Products", description = "Product catalog operations")),
    info(
        title = "Catalog API",
        description = "REST API for managing a product catalog"
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
