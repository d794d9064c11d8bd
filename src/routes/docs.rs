use axum::response::Json;
use utoipa::OpenApi;

use crate::models::posting::Posting;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::posting::list_posts,
        crate::routes::posting::search_posts,
        crate::routes::posting::create_post,
    ),
    components(schemas(Posting)),
    tags((name = "postings", description = "Job posting listing, search and creation"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
