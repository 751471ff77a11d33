//! Account handlers: sign up, sign in, profile.

use actix_web::{HttpResponse, web};

use blogflow_core::domain::{NewUser, User, normalize_email};
use blogflow_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use blogflow_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_USERNAME_LEN: usize = 30;

fn validate_registration(req: &RegisterUserRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.first_name.trim().is_empty() {
        errors.push("First name is required".to_string());
    }
    if req.last_name.trim().is_empty() {
        errors.push("Last name is required".to_string());
    }
    if req.username.trim().is_empty() {
        errors.push("Username is required".to_string());
    } else if req.username.chars().count() > MAX_USERNAME_LEN {
        errors.push(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LEN
        ));
    }
    if req.email.is_empty() || !req.email.contains('@') {
        errors.push("Invalid email address".to_string());
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    if req.password != req.password_confirmation {
        errors.push("Password confirmation does not match".to_string());
    }

    errors
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.email, user.roles())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        email: user.email.clone(),
        username: user.username.clone(),
        display_name: user.display_name(),
        is_admin: user.is_superuser,
        created_at: user.created_at.to_rfc3339(),
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let errors = validate_registration(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let email = normalize_email(&req.email);
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User::new(
        NewUser {
            email,
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
        },
        password_hash,
    );
    let saved_user = state.users.save(user).await?;
    tracing::info!(user_id = %saved_user.id, "User registered");

    Ok(HttpResponse::Created().json(issue_token(&state, &saved_user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&normalize_email(&req.email))
        .await?
        .filter(|u| u.is_active)
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(issue_token(&state, &user)?))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}
