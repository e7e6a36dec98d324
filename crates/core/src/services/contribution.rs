//! Contribution lifecycle service.

use ajoclub_common::{AppError, AppResult, IdGenerator};
use ajoclub_db::entities::{
    contribution::{self, ContributionStatus},
    uploaded_file::UploadPurpose,
    user,
};
use ajoclub_db::repositories::{
    ContributionRepository, ContributionSummary, MonthlyContributionSummary,
    UploadedFileRepository,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveEnum, Set};
use serde::Deserialize;

use crate::services::Actor;

/// Minimum accepted contribution amount in naira.
pub const MINIMUM_CONTRIBUTION: f64 = 5000.0;

/// Input for submitting a contribution.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContributionInput {
    pub amount: f64,
    pub transaction_reference: String,
    /// ID of a previously uploaded proof-of-payment file.
    pub payment_proof_file_id: Option<String>,
    pub contribution_date: NaiveDate,
}

/// Input for an admin status decision on a contribution.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetContributionStatusInput {
    pub status: ContributionStatus,
    pub rejection_reason: Option<String>,
}

/// Service for the contribution lifecycle.
#[derive(Clone)]
pub struct ContributionService {
    contribution_repo: ContributionRepository,
    file_repo: UploadedFileRepository,
    id_gen: IdGenerator,
}

impl ContributionService {
    /// Create a new contribution service.
    #[must_use]
    pub const fn new(
        contribution_repo: ContributionRepository,
        file_repo: UploadedFileRepository,
    ) -> Self {
        Self {
            contribution_repo,
            file_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new contribution; it starts out `pending`.
    ///
    /// All validation happens before the insert, and the transaction
    /// reference is checked here as well as enforced by a unique index.
    pub async fn submit(
        &self,
        actor: &Actor,
        input: SubmitContributionInput,
    ) -> AppResult<contribution::Model> {
        if input.amount < MINIMUM_CONTRIBUTION {
            return Err(AppError::Validation(
                "Minimum contribution amount is ₦5,000".to_string(),
            ));
        }

        let reference = input.transaction_reference.trim();
        if reference.is_empty() {
            return Err(AppError::Validation(
                "Transaction reference is required".to_string(),
            ));
        }

        if self
            .contribution_repo
            .find_by_reference(reference)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Transaction reference already used".to_string(),
            ));
        }

        // Resolve the proof file, if any, to its stored URL.
        let payment_proof_url = match input.payment_proof_file_id {
            Some(ref file_id) => {
                let file = self.file_repo.get_by_id(file_id).await?;
                if file.user_id != actor.id {
                    return Err(AppError::Forbidden("Not your file".to_string()));
                }
                if file.purpose != UploadPurpose::Contribution {
                    return Err(AppError::Validation(
                        "Payment proof must be uploaded with purpose 'contribution'".to_string(),
                    ));
                }
                Some(file.url)
            }
            None => None,
        };

        let model = contribution::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor.id.clone()),
            amount: Set(input.amount),
            transaction_reference: Set(reference.to_string()),
            payment_proof_url: Set(payment_proof_url),
            contribution_date: Set(input.contribution_date),
            status: Set(ContributionStatus::Pending),
            validated_by: Set(None),
            validation_date: Set(None),
            rejection_reason: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        self.contribution_repo.create(model).await
    }

    /// Validate or reject a pending contribution.
    ///
    /// Only `pending -> validated` and `pending -> rejected` are legal;
    /// validated and rejected are terminal. The acting admin is recorded
    /// as `validated_by` for both outcomes.
    pub async fn set_status(
        &self,
        contribution_id: &str,
        actor: &Actor,
        input: SetContributionStatusInput,
    ) -> AppResult<contribution::Model> {
        let contribution = self.contribution_repo.get_by_id(contribution_id).await?;

        if !contribution.status.can_transition_to(input.status) {
            return Err(AppError::InvalidState(format!(
                "Cannot change contribution status from {} to {}",
                contribution.status.to_value(),
                input.status.to_value()
            )));
        }

        let rejection_reason = match input.status {
            ContributionStatus::Rejected => {
                let reason = input
                    .rejection_reason
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default();
                if reason.is_empty() {
                    return Err(AppError::Validation(
                        "Rejection reason is required when rejecting a contribution".to_string(),
                    ));
                }
                Some(reason.to_string())
            }
            _ => None,
        };

        let mut model: contribution::ActiveModel = contribution.into();
        model.status = Set(input.status);
        model.validated_by = Set(Some(actor.id.clone()));
        model.validation_date = Set(Some(Utc::now()));
        model.rejection_reason = Set(rejection_reason);
        model.updated_at = Set(Some(Utc::now()));

        self.contribution_repo.update(model).await
    }

    /// Get a contribution by ID.
    pub async fn get(&self, id: &str) -> AppResult<contribution::Model> {
        self.contribution_repo.get_by_id(id).await
    }

    /// List all contributions with their owners (admin view).
    pub async fn list_all(
        &self,
    ) -> AppResult<Vec<(contribution::Model, Option<user::Model>)>> {
        self.contribution_repo.find_all_with_users().await
    }

    /// List a user's contributions.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<contribution::Model>> {
        self.contribution_repo.find_by_user(user_id).await
    }

    /// Club-wide summary statistics. Only validated rows count toward
    /// committed totals.
    pub async fn summary(&self) -> AppResult<ContributionSummary> {
        self.contribution_repo.summary().await
    }

    /// Monthly summary of validated contributions.
    pub async fn monthly_summary(&self) -> AppResult<Vec<MonthlyContributionSummary>> {
        self.contribution_repo.monthly_summary().await
    }
}
