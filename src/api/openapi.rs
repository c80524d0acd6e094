//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, ouvrages};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ouvrages API",
        version = "0.1.0",
        description = "Library catalog administration REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Records
        ouvrages::list_records,
        ouvrages::get_record,
        ouvrages::create_record,
        ouvrages::create_record_from_form,
        ouvrages::update_record,
        ouvrages::delete_record,
    ),
    components(
        schemas(
            // Records
            crate::models::Record,
            crate::models::NewRecord,
            crate::models::RecordPatch,
            crate::models::RecordForm,
            crate::models::RecordType,
            crate::models::Content,
            crate::models::Details,
            crate::models::BookDetails,
            crate::models::PeriodicalDetails,
            crate::models::Periodicity,
            crate::models::TypeFilter,
            crate::models::WriteOutcome,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "ouvrages", description = "Catalog records (books and periodicals)")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
