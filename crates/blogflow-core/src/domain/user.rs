use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an account that can author and moderate posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields collected at sign up.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl User {
    /// Create a new active, non-privileged user with generated ID and timestamps.
    pub fn new(profile: NewUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(&profile.email),
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone_number: profile.phone_number,
            password_hash,
            is_staff: false,
            is_superuser: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a superuser. Superusers moderate the approval queue.
    pub fn new_superuser(profile: NewUser, password_hash: String) -> Self {
        Self {
            is_staff: true,
            is_superuser: true,
            ..Self::new(profile, password_hash)
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The workflow identity of this user.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            is_admin: self.is_superuser,
        }
    }

    /// Roles carried in issued access tokens.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec!["user".to_string()];
        if self.is_superuser {
            roles.push(ADMIN_ROLE.to_string());
        }
        roles
    }
}

/// Role name granting superuser capabilities.
pub const ADMIN_ROLE: &str = "admin";

/// Lowercase the domain part of an email address.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// The acting user of a workflow call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub is_admin: bool,
}

impl Principal {
    pub fn user(id: Uuid) -> Self {
        Self { id, is_admin: false }
    }

    pub fn admin(id: Uuid) -> Self {
        Self { id, is_admin: true }
    }
}
