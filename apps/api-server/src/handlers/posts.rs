//! Post handlers: authoring, listings and workflow transitions.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogflow_core::domain::Post;
use blogflow_shared::ApiResponse;
use blogflow_shared::dto::{PostRequest, PostResponse, TransitionsResponse};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        title: post.title.clone(),
        content: post.content.clone(),
        state: post.state().to_string(),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

fn list_response(posts: &[Post]) -> HttpResponse {
    let body: Vec<PostResponse> = posts.iter().map(post_response).collect();
    HttpResponse::Ok().json(ApiResponse::ok(body))
}

/// GET /api/posts - published posts, newest first.
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published().await?;
    Ok(list_response(&posts))
}

/// GET /api/posts/mine
pub async fn list_mine(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_author(identity.user_id).await?;
    Ok(list_response(&posts))
}

/// GET /api/posts/pending - the moderation queue.
pub async fn list_pending(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_awaiting_approval().await?;
    Ok(list_response(&posts))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create(&identity.principal, req.title, req.content)
        .await?;

    tracing::debug!(post_id = %post.id, author_id = %post.author_id, "Post created");
    Ok(HttpResponse::Created().json(ApiResponse::ok(post_response(&post))))
}

/// GET /api/posts/{id}
pub async fn view(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .view(path.into_inner(), identity.principal())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&post))))
}

/// PUT /api/posts/{id}
pub async fn revise(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .revise(path.into_inner(), &identity.principal, req.title, req.content)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&post))))
}

/// GET /api/posts/{id}/transitions
pub async fn available_transitions(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let (post, names) = state
        .posts
        .available(path.into_inner(), &identity.principal)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(TransitionsResponse {
        post_id: post.id.to_string(),
        state: post.state().to_string(),
        transitions: names.iter().map(|n| n.to_string()).collect(),
    })))
}

/// POST /api/posts/{id}/transitions/{name}
pub async fn transition(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, String)>,
) -> AppResult<HttpResponse> {
    let (id, name) = path.into_inner();
    let post = state
        .posts
        .transition(id, &name, &identity.principal)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&post))))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use blogflow_core::domain::{NewUser, User};
    use blogflow_core::ports::{BaseRepository, TokenService};
    use blogflow_infra::JwtConfig;

    use crate::handlers::configure_routes;

    use super::*;

    async fn register(state: &AppState, username: &str, admin: bool) -> String {
        let profile = NewUser {
            email: format!("{}@example.com", username),
            username: username.to_string(),
            first_name: "Test".into(),
            last_name: "User".into(),
            phone_number: String::new(),
        };
        let user = if admin {
            User::new_superuser(profile, "unused".into())
        } else {
            User::new(profile, "unused".into())
        };
        let user = state.users.save(user).await.unwrap();
        state
            .tokens
            .generate_token(user.id, &user.email, user.roles())
            .unwrap()
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    #[actix_rt::test]
    async fn test_editorial_workflow_over_http() {
        let state = AppState::in_memory(JwtConfig::default());
        let author = register(&state, "author", false).await;
        let reader = register(&state, "reader", false).await;
        let admin = register(&state, "admin", true).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        // Scenario: author creates a draft.
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&author))
            .set_json(json!({ "title": "Hello", "content": "World" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["state"], "draft");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        // Drafts are hidden from other readers.
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", id))
            .insert_header(bearer(&reader))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        // Submit.
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/Submit", id))
            .insert_header(bearer(&author))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["state"], "waiting approval");

        // Submitting twice is stale.
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/submit", id))
            .insert_header(bearer(&author))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CONFLICT
        );

        // Non-admins cannot approve.
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/approve", id))
            .insert_header(bearer(&author))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert!(body.get("detail").is_none());

        // Admin sees the moderation actions.
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}/transitions", id))
            .insert_header(bearer(&admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["transitions"], json!(["approve", "disapprove"]));

        // Only the author may pull a post back out of the queue.
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/edit", id))
            .insert_header(bearer(&admin))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        // Strangers cannot see the pending post at all.
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/edit", id))
            .insert_header(bearer(&reader))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/approve", id))
            .insert_header(bearer(&reader))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert!(!body["detail"].as_str().unwrap().contains("waiting approval"));

        // Approve.
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/approve", id))
            .insert_header(bearer(&admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["state"], "published");

        // Published posts are public.
        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        // A stranger cannot unpublish, the author can.
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/unpublish", id))
            .insert_header(bearer(&reader))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/unpublish", id))
            .insert_header(bearer(&author))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["state"], "draft");
    }

    #[actix_rt::test]
    async fn test_unknown_transition_is_bad_request() {
        let state = AppState::in_memory(JwtConfig::default());
        let author = register(&state, "author", false).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&author))
            .set_json(json!({ "title": "Hello", "content": "World" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/transitions/publish", id))
            .insert_header(bearer(&author))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_rt::test]
    async fn test_revise_is_limited_to_the_author() {
        let state = AppState::in_memory(JwtConfig::default());
        let author = register(&state, "author", false).await;
        let reader = register(&state, "reader", false).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&author))
            .set_json(json!({ "title": "Hello", "content": "World" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", id))
            .insert_header(bearer(&reader))
            .set_json(json!({ "title": "Mine", "content": "Now" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", id))
            .insert_header(bearer(&author))
            .set_json(json!({ "title": "Hello again", "content": "Changed" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["title"], "Hello again");
    }

    #[actix_rt::test]
    async fn test_creating_requires_a_token() {
        let state = AppState::in_memory(JwtConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "Hello", "content": "World" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
