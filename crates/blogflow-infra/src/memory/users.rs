use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogflow_core::domain::User;
use blogflow_core::error::RepoError;
use blogflow_core::ports::{BaseRepository, UserRepository};

/// In-memory user repository.
///
/// Enforces the same uniqueness rules as the `users` table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        let taken = users.values().any(|u| {
            u.id != entity.id && (u.email == entity.email || u.username == entity.username)
        });
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        users.insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use blogflow_core::domain::NewUser;

    use super::*;

    fn user(email: &str, username: &str) -> User {
        User::new(
            NewUser {
                email: email.into(),
                username: username.into(),
                first_name: "Test".into(),
                last_name: "User".into(),
                phone_number: String::new(),
            },
            "hash".into(),
        )
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryUserRepository::new();
        let saved = repo.save(user("a@example.com", "a")).await.unwrap();

        assert!(repo.find_by_id(saved.id).await.unwrap().is_some());
        assert!(repo.find_by_email("a@example.com").await.unwrap().is_some());
        assert!(repo.find_by_username("a").await.unwrap().is_some());
        assert!(repo.find_by_username("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("a@example.com", "a")).await.unwrap();

        let result = repo.save(user("a@example.com", "other")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}
