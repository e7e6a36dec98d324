//! User service.

use ajoclub_common::{AppError, AppResult, IdGenerator};
use ajoclub_db::entities::{
    uploaded_file::UploadPurpose,
    user::{self, UserRole, UserStatus},
};
use ajoclub_db::repositories::{UploadedFileRepository, UserRepository, UserStats};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::Actor;

/// Input for creating a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: UserRole,
}

/// Input for a partial user update.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// Service for managing users.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    file_repo: UploadedFileRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, file_repo: UploadedFileRepository) -> Self {
        Self {
            user_repo,
            file_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_id(id).await
    }

    /// Get a user by ID, returning an error if not found.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List all users, ordered by name.
    pub async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    /// Register a new active user.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            email: Set(input.email),
            role: Set(input.role),
            status: Set(UserStatus::Active),
            profile_picture_url: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        self.user_repo.create(model).await
    }

    /// Partially update a user. Email uniqueness is re-checked against
    /// other accounts.
    pub async fn update(&self, id: &str, input: UpdateUserInput) -> AppResult<user::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let user = self.user_repo.get_by_id(id).await?;

        if let Some(ref email) = input.email
            && self
                .user_repo
                .find_by_email_excluding(email, id)
                .await?
                .is_some()
        {
            return Err(AppError::Conflict(
                "Email already registered to another user".to_string(),
            ));
        }

        let mut model: user::ActiveModel = user.into();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(email) = input.email {
            model.email = Set(email);
        }
        if let Some(role) = input.role {
            model.role = Set(role);
        }
        if let Some(status) = input.status {
            model.status = Set(status);
        }
        model.updated_at = Set(Some(Utc::now()));

        self.user_repo.update(model).await
    }

    /// Deactivate a user. Accounts are never hard-deleted.
    pub async fn deactivate(&self, id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(id).await?;

        let mut model: user::ActiveModel = user.into();
        model.status = Set(UserStatus::Inactive);
        model.updated_at = Set(Some(Utc::now()));

        self.user_repo.update(model).await
    }

    /// Set a user's profile picture from one of their uploads.
    pub async fn set_profile_picture(
        &self,
        actor: &Actor,
        file_id: &str,
    ) -> AppResult<user::Model> {
        let file = self.file_repo.get_by_id(file_id).await?;

        if file.user_id != actor.id {
            return Err(AppError::Forbidden("Not your file".to_string()));
        }
        if file.purpose != UploadPurpose::Profile {
            return Err(AppError::Validation(
                "Profile pictures must be uploaded with purpose 'profile'".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(&actor.id).await?;
        let mut model: user::ActiveModel = user.into();
        model.profile_picture_url = Set(Some(file.url));
        model.updated_at = Set(Some(Utc::now()));

        self.user_repo.update(model).await
    }

    /// Aggregate statistics for a user.
    pub async fn stats(&self, id: &str) -> AppResult<UserStats> {
        self.user_repo.get_by_id(id).await?;
        self.user_repo.stats(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn mock_user(id: &str, email: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: "Bola Ade".to_string(),
            email: email.to_string(),
            role,
            status: UserStatus::Active,
            profile_picture_url: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> UserService {
        let db = Arc::new(db);
        UserService::new(
            UserRepository::new(Arc::clone(&db)),
            UploadedFileRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_create_user() {
        let created = mock_user("u1", "bola@example.com", UserRole::Member);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // Email pre-check finds nothing
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([[created]])
            .into_connection();
        let service = service(db);

        let result = service
            .create(CreateUserInput {
                name: "Bola Ade".to_string(),
                email: "bola@example.com".to_string(),
                role: UserRole::Member,
            })
            .await
            .unwrap();

        assert_eq!(result.status, UserStatus::Active);
        assert_eq!(result.email, "bola@example.com");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let result = service
            .create(CreateUserInput {
                name: "Bola Ade".to_string(),
                email: "not-an-email".to_string(),
                role: UserRole::Member,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_is_conflict() {
        let existing = mock_user("u1", "bola@example.com", UserRole::Member);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();
        let service = service(db);

        let result = service
            .create(CreateUserInput {
                name: "Impostor".to_string(),
                email: "bola@example.com".to_string(),
                role: UserRole::Member,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other_user_is_conflict() {
        let target = mock_user("u1", "bola@example.com", UserRole::Member);
        let other = mock_user("u2", "ada@example.com", UserRole::Member);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[target]])
            .append_query_results([[other]])
            .into_connection();
        let service = service(db);

        let result = service
            .update(
                "u1",
                UpdateUserInput {
                    email: Some("ada@example.com".to_string()),
                    ..UpdateUserInput::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_deactivate_flips_status() {
        let active = mock_user("u1", "bola@example.com", UserRole::Member);
        let mut inactive = active.clone();
        inactive.status = UserStatus::Inactive;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[active]])
            .append_query_results([[inactive]])
            .into_connection();
        let service = service(db);

        let result = service.deactivate("u1").await.unwrap();
        assert_eq!(result.status, UserStatus::Inactive);
    }
}
