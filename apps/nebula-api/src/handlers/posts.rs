//! Public blog handlers.

use actix_web::{HttpResponse, web};

use nebula_core::domain::PostKey;
use nebula_shared::dto::PublicListParams;

use super::convert;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<PublicListParams>,
) -> AppResult<HttpResponse> {
    let query = convert::public_query(params.into_inner())?;
    let page = state.blog.list_posts(query).await?;

    Ok(HttpResponse::Ok().json(convert::post_list(page)))
}

/// GET /api/posts/{slug}
///
/// Drafts are reported as missing.
pub async fn get_post(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let key = PostKey::Slug(slug.into_inner());
    let detail = state.blog.get_post(&key).await?;

    Ok(HttpResponse::Ok().json(convert::post_detail(detail)))
}
