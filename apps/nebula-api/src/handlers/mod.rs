//! HTTP handlers and route configuration.

mod admin;
mod convert;
mod health;
mod posts;

use actix_web::error::InternalError;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use nebula_shared::ErrorResponse;

use crate::observability::RequestId;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| {
        let detail = err.to_string();
        InternalError::from_response(err, bad_request(req, detail)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, req| {
        let detail = err.to_string();
        InternalError::from_response(err, bad_request(req, detail)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, req| {
        let detail = err.to_string();
        InternalError::from_response(err, bad_request(req, detail)).into()
    }))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // Public blog
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("/{slug}", web::get().to(posts::get_post)),
            )
            // Admin console
            .service(
                web::scope("/admin")
                    .route("/stats", web::get().to(admin::dashboard_stats))
                    .route("/posts", web::get().to(admin::list_posts))
                    .route("/posts", web::post().to(admin::create_post))
                    .route("/posts/bulk", web::post().to(admin::bulk_action))
                    .route("/posts/{id}", web::get().to(admin::get_post))
                    .route("/posts/{id}", web::put().to(admin::update_post))
                    .route("/posts/{id}", web::delete().to(admin::delete_post)),
            ),
    );
}

/// Problem response for requests the extractors could not decode.
fn bad_request(req: &HttpRequest, detail: String) -> HttpResponse {
    let mut problem = ErrorResponse::bad_request(detail);
    if let Some(RequestId(id)) = req.extensions().get::<RequestId>() {
        problem = problem.with_request_id(id.clone());
    }
    HttpResponse::BadRequest().json(problem)
}

#[cfg(test)]
mod tests;
