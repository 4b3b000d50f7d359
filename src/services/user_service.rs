use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{hash_password, verify_password},
    errors::{AppError, AppResult},
    models::domain::user::{User, UserRole},
    models::dto::request::{RegisterRequest, UpdateUserRequest},
    models::dto::response::{Paginated, UserDto},
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Public registration. Role defaults to student when the caller does not
    /// supply one.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        if self.repository.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                request.email
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let role = request.role.unwrap_or(UserRole::Student);
        let user = User::new(&request.name, &request.email, &password_hash, role);

        let user = self.repository.create(user).await?;
        log::info!("Registered {:?} account for {}", user.role, user.email);
        Ok(user)
    }

    /// Email + password check. Failures are indistinguishable to the caller
    /// whether the account is missing or the password is wrong.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.repository.find_by_email(email).await?;

        let user = match user {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                log::warn!("Failed login attempt for {}", email);
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            }
        };

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> AppResult<UserDto> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;
        Ok(user.into())
    }

    /// Lookup used by idempotent tooling such as the seeder.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repository.find_by_email(email).await
    }

    /// Full user record for token issuance; never leaves the process.
    pub async fn get_user_for_token(&self, id: &str) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
    }

    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> AppResult<UserDto> {
        request.validate()?;

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;

        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(profile) = request.profile {
            user.profile = Some(profile);
        }
        if let Some(instructor_profile) = request.instructor_profile {
            user.instructor_profile = Some(instructor_profile);
        }
        if let Some(preferences) = request.preferences {
            user.preferences = preferences;
        }
        user.updated_at = Some(chrono::Utc::now());

        let user = self.repository.update(id, user).await?;
        Ok(user.into())
    }

    pub async fn delete_user(&self, id: &str) -> AppResult<()> {
        self.repository.delete(id).await
    }

    pub async fn get_all_users_paginated(
        &self,
        offset: i64,
        limit: i64,
    ) -> AppResult<Paginated<UserDto>> {
        let (users, total) = self.repository.find_all(offset, limit).await?;

        Ok(Paginated {
            items: users.into_iter().map(UserDto::from).collect(),
            total,
            offset,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        UserRepo {}

        #[async_trait::async_trait]
        impl UserRepository for UserRepo {
            async fn create(&self, user: User) -> AppResult<User>;
            async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
            async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
            async fn find_all(&self, offset: i64, limit: i64) -> AppResult<(Vec<User>, i64)>;
            async fn update(&self, id: &str, user: User) -> AppResult<User>;
            async fn delete(&self, id: &str) -> AppResult<()>;
            async fn ensure_indexes(&self) -> AppResult<()>;
        }
    }

    #[tokio::test]
    async fn test_get_user_maps_missing_to_not_found() {
        let mut repo = MockUserRepo::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repo));
        let result = service.get_user("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_register_defaults_role_to_student() {
        let mut repo = MockUserRepo::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(Ok);

        let service = UserService::new(Arc::new(repo));
        let user = service
            .register(RegisterRequest {
                name: "No Role".to_string(),
                email: "norole@example.com".to_string(),
                password: "supersecret".to_string(),
                role: None,
            })
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Student);
        // The stored hash is never the raw password
        assert_ne!(user.password_hash, "supersecret");
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let mut repo = MockUserRepo::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(User::test_student(email))));

        let service = UserService::new(Arc::new(repo));
        let result = service
            .register(RegisterRequest {
                name: "Jane".to_string(),
                email: "taken@example.com".to_string(),
                password: "supersecret".to_string(),
                role: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }
}
