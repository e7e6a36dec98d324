//! File validation and upload pipeline.
//!
//! Every upload is checked against a per-purpose policy (allowed MIME
//! types, size ceiling) before a single byte reaches the blob store.
//! On success the blob is stored first and the metadata row second, so
//! a metadata row never points at a missing blob.

use std::collections::HashMap;

use ajoclub_common::{AppError, AppResult, IdGenerator, StorageService, generate_storage_key};
use ajoclub_db::{
    entities::uploaded_file::{self, UploadPurpose},
    repositories::UploadedFileRepository,
};
use sea_orm::Set;

use crate::services::Actor;

/// Validation policy for one upload purpose.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Maximum accepted size in bytes.
    pub max_size: i64,
    /// Accepted MIME types.
    pub allowed_types: Vec<String>,
}

/// The full purpose-to-policy map, passed to the service at construction.
#[derive(Debug, Clone)]
pub struct UploadPolicySet {
    policies: HashMap<UploadPurpose, UploadPolicy>,
}

impl UploadPolicySet {
    /// Build a policy set from an explicit map.
    #[must_use]
    pub fn new(policies: HashMap<UploadPurpose, UploadPolicy>) -> Self {
        Self { policies }
    }

    /// Look up the policy for a purpose.
    #[must_use]
    pub fn policy_for(&self, purpose: UploadPurpose) -> Option<&UploadPolicy> {
        self.policies.get(&purpose)
    }
}

impl Default for UploadPolicySet {
    /// The club's standing policies: profile pictures are images up to
    /// 5 MiB, payment proofs are images or PDFs up to 10 MiB, documents
    /// are PDF/Word up to 20 MiB.
    fn default() -> Self {
        let mut policies = HashMap::new();
        policies.insert(
            UploadPurpose::Profile,
            UploadPolicy {
                max_size: 5 * 1024 * 1024,
                allowed_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
            },
        );
        policies.insert(
            UploadPurpose::Contribution,
            UploadPolicy {
                max_size: 10 * 1024 * 1024,
                allowed_types: vec![
                    "image/jpeg".to_string(),
                    "image/png".to_string(),
                    "application/pdf".to_string(),
                ],
            },
        );
        policies.insert(
            UploadPurpose::Document,
            UploadPolicy {
                max_size: 20 * 1024 * 1024,
                allowed_types: vec![
                    "application/pdf".to_string(),
                    "application/msword".to_string(),
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                        .to_string(),
                ],
            },
        );
        Self { policies }
    }
}

/// Input for uploading a file.
pub struct UploadInput {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Service for validated file uploads.
#[derive(Clone)]
pub struct UploadService {
    file_repo: UploadedFileRepository,
    storage: StorageService,
    policies: UploadPolicySet,
    id_gen: IdGenerator,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(
        file_repo: UploadedFileRepository,
        storage: StorageService,
        policies: UploadPolicySet,
    ) -> Self {
        Self {
            file_repo,
            storage,
            policies,
            id_gen: IdGenerator::new(),
        }
    }

    /// Validate and store a file, then record its metadata.
    ///
    /// Validation order: purpose policy, MIME type, size. All checks run
    /// before the blob store is touched, so a rejected upload leaves no
    /// partial state anywhere.
    pub async fn upload(
        &self,
        actor: &Actor,
        purpose: UploadPurpose,
        input: UploadInput,
    ) -> AppResult<uploaded_file::Model> {
        let policy = self.policies.policy_for(purpose).ok_or_else(|| {
            AppError::Validation("No upload policy configured for this purpose".to_string())
        })?;

        if !policy
            .allowed_types
            .iter()
            .any(|t| t == &input.content_type)
        {
            return Err(AppError::Validation(format!(
                "Invalid file type. Allowed types: {}",
                policy.allowed_types.join(", ")
            )));
        }

        let size = input.data.len() as i64;
        if size == 0 {
            return Err(AppError::Validation("File is empty".to_string()));
        }
        if size > policy.max_size {
            return Err(AppError::Validation(format!(
                "File too large. Maximum size is {} bytes",
                policy.max_size
            )));
        }

        let storage_key = generate_storage_key(&actor.id, &input.filename);
        let blob = self
            .storage
            .put(&storage_key, &input.data, &input.content_type)
            .await?;

        let file_id = self.id_gen.generate();
        let model = uploaded_file::ActiveModel {
            id: Set(file_id),
            url: Set(blob.url),
            filename: Set(input.filename),
            size: Set(size),
            content_type: Set(input.content_type),
            purpose: Set(purpose),
            user_id: Set(actor.id.clone()),
            storage_key: Set(storage_key),
            md5: Set(blob.md5),
            created_at: Set(chrono::Utc::now()),
        };

        self.file_repo.create(model).await
    }

    /// Get file metadata by ID.
    pub async fn get_metadata(&self, file_id: &str) -> AppResult<uploaded_file::Model> {
        self.file_repo.get_by_id(file_id).await
    }

    /// List the acting user's uploads.
    pub async fn list_for_user(&self, actor: &Actor) -> AppResult<Vec<uploaded_file::Model>> {
        self.file_repo.find_by_user(&actor.id).await
    }

    /// Delete a file: blob first, metadata second.
    ///
    /// If the blob deletion fails the metadata row is left untouched so
    /// the caller can retry; a row must never outlive its blob but the
    /// reverse is recoverable.
    pub async fn delete(&self, actor: &Actor, file_id: &str) -> AppResult<()> {
        let file = self.file_repo.get_by_id(file_id).await?;

        if file.user_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden("Not your file".to_string()));
        }

        if let Err(e) = self.storage.delete(&file.storage_key).await {
            tracing::warn!(
                file_id = %file.id,
                storage_key = %file.storage_key,
                error = %e,
                "Blob deletion failed, keeping metadata so the delete can be retried"
            );
            return Err(e);
        }

        self.file_repo.delete(&file.id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ajoclub_common::{StorageBackend, StoredBlob};
    use ajoclub_db::entities::user::{self, UserRole, UserStatus};
    use ajoclub_db::repositories::UserRepository;
    use ajoclub_db::test_utils::TestDatabase;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory storage that counts calls and can be told to fail deletes.
    struct RecordingStorage {
        puts: AtomicUsize,
        deletes: AtomicUsize,
        fail_delete: bool,
    }

    impl RecordingStorage {
        fn new(fail_delete: bool) -> Self {
            Self {
                puts: AtomicUsize::new(0),
                deletes: AtomicUsize::new(0),
                fail_delete,
            }
        }
    }

    #[async_trait::async_trait]
    impl StorageBackend for RecordingStorage {
        async fn put(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredBlob> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            Ok(StoredBlob {
                key: key.to_string(),
                url: format!("mem://{key}"),
                size: data.len() as u64,
                content_type: content_type.to_string(),
                md5: "test-md5".to_string(),
            })
        }

        async fn delete(&self, _key: &str) -> AppResult<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete {
                return Err(AppError::Storage("simulated outage".to_string()));
            }
            Ok(())
        }

        async fn list(&self, _prefix: &str) -> AppResult<Vec<String>> {
            Ok(Vec::new())
        }

        fn public_url(&self, key: &str) -> String {
            format!("mem://{key}")
        }

        async fn exists(&self, _key: &str) -> AppResult<bool> {
            Ok(true)
        }
    }

    async fn setup(fail_delete: bool) -> (UploadService, Arc<RecordingStorage>, Actor) {
        let db = TestDatabase::new().await.unwrap();
        let db = Arc::new(db.conn);

        let users = UserRepository::new(Arc::clone(&db));
        let member = users
            .create(user::ActiveModel {
                id: sea_orm::Set("member1".to_string()),
                name: sea_orm::Set("Bola Ade".to_string()),
                email: sea_orm::Set("bola@example.com".to_string()),
                role: sea_orm::Set(UserRole::Member),
                status: sea_orm::Set(UserStatus::Active),
                profile_picture_url: sea_orm::Set(None),
                created_at: sea_orm::Set(chrono::Utc::now()),
                updated_at: sea_orm::Set(None),
            })
            .await
            .unwrap();

        let storage = Arc::new(RecordingStorage::new(fail_delete));
        let service = UploadService::new(
            UploadedFileRepository::new(db),
            Arc::clone(&storage) as StorageService,
            UploadPolicySet::default(),
        );

        (service, storage, Actor::from(&member))
    }

    fn png_input() -> UploadInput {
        UploadInput {
            filename: "proof.png".to_string(),
            content_type: "image/png".to_string(),
            data: vec![1, 2, 3, 4],
        }
    }

    #[test]
    fn test_default_policies() {
        let policies = UploadPolicySet::default();

        let profile = policies.policy_for(UploadPurpose::Profile).unwrap();
        assert_eq!(profile.max_size, 5 * 1024 * 1024);
        assert!(!profile.allowed_types.contains(&"application/pdf".to_string()));

        let contribution = policies.policy_for(UploadPurpose::Contribution).unwrap();
        assert_eq!(contribution.max_size, 10 * 1024 * 1024);
        assert!(contribution.allowed_types.contains(&"application/pdf".to_string()));

        let document = policies.policy_for(UploadPurpose::Document).unwrap();
        assert_eq!(document.max_size, 20 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_disallowed_content_type_rejected_before_storage() {
        let (service, storage, actor) = setup(false).await;

        let result = service
            .upload(
                &actor,
                UploadPurpose::Profile,
                UploadInput {
                    filename: "archive.zip".to_string(),
                    content_type: "application/zip".to_string(),
                    data: vec![0; 16],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversize_file_rejected_before_storage() {
        let (service, storage, actor) = setup(false).await;

        let result = service
            .upload(
                &actor,
                UploadPurpose::Profile,
                UploadInput {
                    filename: "huge.png".to_string(),
                    content_type: "image/png".to_string(),
                    data: vec![0; 5 * 1024 * 1024 + 1],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_file_rejected() {
        let (service, storage, actor) = setup(false).await;

        let result = service
            .upload(
                &actor,
                UploadPurpose::Profile,
                UploadInput {
                    filename: "empty.png".to_string(),
                    content_type: "image/png".to_string(),
                    data: Vec::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_upload_persists_metadata() {
        let (service, storage, actor) = setup(false).await;

        let file = service
            .upload(&actor, UploadPurpose::Contribution, png_input())
            .await
            .unwrap();

        assert_eq!(storage.puts.load(Ordering::SeqCst), 1);
        assert_eq!(file.filename, "proof.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.size, 4);
        assert_eq!(file.user_id, actor.id);
        assert!(file.url.starts_with("mem://"));

        let fetched = service.get_metadata(&file.id).await.unwrap();
        assert_eq!(fetched.url, file.url);
    }

    #[tokio::test]
    async fn test_get_metadata_missing_is_not_found() {
        let (service, _storage, _actor) = setup(false).await;

        let result = service.get_metadata("nope").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_blob_then_metadata() {
        let (service, storage, actor) = setup(false).await;

        let file = service
            .upload(&actor, UploadPurpose::Contribution, png_input())
            .await
            .unwrap();

        service.delete(&actor, &file.id).await.unwrap();

        assert_eq!(storage.deletes.load(Ordering::SeqCst), 1);
        assert!(matches!(
            service.get_metadata(&file.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_blob_delete_leaves_metadata_intact() {
        let (service, storage, actor) = setup(true).await;

        let file = service
            .upload(&actor, UploadPurpose::Contribution, png_input())
            .await
            .unwrap();

        let result = service.delete(&actor, &file.id).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(storage.deletes.load(Ordering::SeqCst), 1);

        // The row is still queryable, so a retry remains possible.
        let fetched = service.get_metadata(&file.id).await.unwrap();
        assert_eq!(fetched.id, file.id);
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden() {
        let (service, _storage, actor) = setup(false).await;

        let file = service
            .upload(&actor, UploadPurpose::Contribution, png_input())
            .await
            .unwrap();

        let stranger = Actor {
            id: "stranger".to_string(),
            role: UserRole::Member,
        };
        let result = service.delete(&stranger, &file.id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        // Admins may delete any file.
        let admin = Actor {
            id: "admin1".to_string(),
            role: UserRole::Admin,
        };
        service.delete(&admin, &file.id).await.unwrap();
    }
}
