//! Blog service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use common::session::Session;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::require_session,
    models::{
        ListQuery, NewBlogPost, PostIdRequest, PostListResponse, PostResponse, UpdatePostRequest,
    },
    state::AppState,
};

/// Create the router for the blog service
pub fn create_router(state: AppState) -> Router {
    let protected = post(create_post)
        .put(update_post)
        .delete(delete_post)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/post-blog", get(list_posts).merge(protected))
        .route("/api/post-blog/:id", get(get_post))
        .route("/api/post-blog/:id/like", post(like_post))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "blog-service"
    }))
}

/// Create a blog post
pub async fn create_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(Json(payload), _): WithRejection<Json<NewBlogPost>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    payload.validate().map_err(ApiError::Malformed)?;

    let id = state.posts.create(&payload).await?;
    info!("Blog post {} created by {}", id, session.email);

    Ok(Json(json!({
        "message": "Blog post saved successfully",
        "id": id
    })))
}

/// List blog posts in insertion order
pub async fn list_posts(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ListQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let posts = state.posts.list(&query.filter()).await?;

    Ok(Json(PostListResponse {
        message: "Blog posts retrieved successfully".to_string(),
        posts,
    }))
}

/// Get a single blog post
pub async fn get_post(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let post = state.posts.get(id).await?.ok_or(ApiError::NotFound)?;

    Ok(Json(PostResponse {
        message: "Blog post retrieved successfully".to_string(),
        post,
    }))
}

/// Merge the supplied fields into a blog post
pub async fn update_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdatePostRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    payload.fields.validate().map_err(ApiError::Malformed)?;

    if !state.posts.update(payload.id, &payload.fields).await? {
        return Err(ApiError::NotFound);
    }
    info!("Blog post {} updated by {}", payload.id, session.email);

    Ok(Json(json!({"message": "Blog post updated successfully"})))
}

/// Delete a blog post
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(Json(payload), _): WithRejection<Json<PostIdRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    if !state.posts.delete(payload.id).await? {
        return Err(ApiError::NotFound);
    }
    info!("Blog post {} deleted by {}", payload.id, session.email);

    Ok(Json(json!({"message": "Blog post deleted successfully"})))
}

/// Increment the like counter of a blog post
pub async fn like_post(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let likes = state.posts.like(id).await?.ok_or(ApiError::NotFound)?;

    Ok(Json(json!({
        "message": "Blog post liked",
        "likes": likes
    })))
}
