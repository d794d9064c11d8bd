use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{error::Result, models::posting::Posting, AppState};

#[utoipa::path(
    get,
    path = "/allPosts",
    responses(
        (status = 200, description = "Every stored job posting", body = [Posting]),
        (status = 500, description = "Storage failure")
    )
)]
#[axum::debug_handler]
pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let postings = state.posting_service.list_all().await?;
    Ok(Json(postings))
}

#[utoipa::path(
    get,
    path = "/posts/{text}",
    params(
        ("text" = String, Path, description = "Free-text search terms")
    ),
    responses(
        (status = 200, description = "Postings matching any search term", body = [Posting]),
        (status = 500, description = "Storage failure")
    )
)]
#[axum::debug_handler]
pub async fn search_posts(
    State(state): State<AppState>,
    Path(text): Path<String>,
) -> Result<impl IntoResponse> {
    let postings = state.posting_service.search(&text).await?;
    Ok(Json(postings))
}

#[utoipa::path(
    post,
    path = "/post",
    request_body = Posting,
    responses(
        (status = 201, description = "Posting created", body = Posting),
        (status = 500, description = "Storage failure")
    )
)]
#[axum::debug_handler]
pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<Posting>,
) -> Result<impl IntoResponse> {
    let posting = state.posting_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(posting)))
}
