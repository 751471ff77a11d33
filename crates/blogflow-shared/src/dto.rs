//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub is_admin: bool,
    pub created_at: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request to create or revise a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    /// `"draft"`, `"waiting approval"` or `"published"`.
    pub state: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Transitions the caller may fire on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionsResponse {
    pub post_id: String,
    pub state: String,
    pub transitions: Vec<String>,
}
