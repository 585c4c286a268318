//! Admin console handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use nebula_core::domain::{BulkOutcome, PostKey};
use nebula_shared::ApiResponse;
use nebula_shared::dto::{
    AdminListParams, BulkActionRequest, BulkActionResponse, CreatePostRequest,
    DeletedPostResponse, UpdatePostRequest,
};

use super::convert;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<AdminListParams>,
) -> AppResult<HttpResponse> {
    let query = convert::admin_query(params.into_inner())?;
    let page = state.blog.list_posts(query).await?;

    Ok(HttpResponse::Ok().json(convert::post_list(page)))
}

/// POST /api/admin/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .blog
        .create_post(convert::new_post(body.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        convert::post(view),
        "Post created successfully",
    )))
}

/// GET /api/admin/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state.blog.get_post(&PostKey::Id(id.into_inner())).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::post(detail.post))))
}

/// PUT /api/admin/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .blog
        .update_post(id.into_inner(), convert::post_changes(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        convert::post(view),
        "Post updated successfully",
    )))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();
    state.blog.delete_post(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        DeletedPostResponse { id },
        "Post deleted successfully",
    )))
}

/// POST /api/admin/posts/bulk
pub async fn bulk_action(
    state: web::Data<AppState>,
    body: web::Json<BulkActionRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let ids = convert::post_ids(&req.post_ids);

    // Every id was malformed: nothing can match, but the action is still checked.
    let outcome = if ids.is_empty() && !req.post_ids.is_empty() {
        BulkOutcome {
            action: req.action.parse()?,
            affected: 0,
        }
    } else {
        state.blog.bulk_mutate(&ids, &req.action).await?
    };

    let message = format!(
        "{} {} posts successfully",
        outcome.action.past_tense(),
        outcome.affected
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        BulkActionResponse {
            action: outcome.action.as_str().to_string(),
            affected_count: outcome.affected,
        },
        message,
    )))
}

/// GET /api/admin/stats
pub async fn dashboard_stats(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let stats = state.blog.dashboard_stats().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::dashboard(stats))))
}
