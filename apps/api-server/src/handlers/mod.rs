//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Static segments must precede `/{id}`.
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_published))
                    .route("", web::post().to(posts::create))
                    .route("/mine", web::get().to(posts::list_mine))
                    .route("/pending", web::get().to(posts::list_pending))
                    .route("/{id}", web::get().to(posts::view))
                    .route("/{id}", web::put().to(posts::revise))
                    .route(
                        "/{id}/transitions",
                        web::get().to(posts::available_transitions),
                    )
                    .route(
                        "/{id}/transitions/{name}",
                        web::post().to(posts::transition),
                    ),
            ),
    );
}
