//! Investment opportunity and participation service.

use ajoclub_common::{AppError, AppResult, IdGenerator};
use ajoclub_db::entities::{
    investment_opportunity::{self, OpportunityStatus, RiskLevel},
    investment_participant::{self, ParticipationStatus},
    investment_update::{self, UpdateType},
    user,
};
use ajoclub_db::repositories::{
    InvestmentOpportunityRepository, InvestmentParticipantRepository, InvestmentUpdateRepository,
    UserRepository,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveEnum, Set};
use serde::Deserialize;
use validator::Validate;

use crate::services::Actor;

/// Minimum target amount for an opportunity in naira.
pub const MINIMUM_TARGET_AMOUNT: f64 = 100_000.0;

/// Minimum allowed `minimum_investment` in naira.
pub const MINIMUM_INVESTMENT_FLOOR: f64 = 5000.0;

/// Input for creating an investment opportunity.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpportunityInput {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 1000))]
    pub description: String,
    pub target_amount: f64,
    pub minimum_investment: f64,
    pub expected_returns: f64,
    pub duration: i32,
    pub risk_level: RiskLevel,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Input for a partial update of an opportunity. Absent fields keep
/// their current values.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOpportunityInput {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub description: Option<String>,
    pub target_amount: Option<f64>,
    pub minimum_investment: Option<f64>,
    pub expected_returns: Option<f64>,
    pub duration: Option<i32>,
    pub risk_level: Option<RiskLevel>,
    pub status: Option<OpportunityStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Input for joining an opportunity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipateInput {
    pub amount: f64,
}

/// Input for an admin decision on a participation's status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetParticipationStatusInput {
    pub status: ParticipationStatus,
    pub returns_amount: Option<f64>,
}

/// Input for appending an investment update.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddUpdateInput {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub update_type: UpdateType,
}

/// Funding and performance figures for one opportunity.
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    pub participant_count: i64,
    pub total_invested: f64,
    pub min_investment: f64,
    pub max_investment: f64,
    pub average_investment: f64,
    pub target_amount: f64,
    /// `total_invested / target_amount * 100`, rounded to 2 decimal places.
    pub funding_percentage: f64,
}

/// Service for investment opportunities and participation.
#[derive(Clone)]
pub struct InvestmentService {
    opportunity_repo: InvestmentOpportunityRepository,
    participant_repo: InvestmentParticipantRepository,
    update_repo: InvestmentUpdateRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl InvestmentService {
    /// Create a new investment service.
    #[must_use]
    pub const fn new(
        opportunity_repo: InvestmentOpportunityRepository,
        participant_repo: InvestmentParticipantRepository,
        update_repo: InvestmentUpdateRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            opportunity_repo,
            participant_repo,
            update_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new opportunity in `draft`.
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateOpportunityInput,
    ) -> AppResult<investment_opportunity::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        check_amounts(
            input.target_amount,
            input.minimum_investment,
            input.expected_returns,
            input.duration,
        )?;
        check_dates(input.start_date, input.end_date, true)?;

        let model = investment_opportunity::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            target_amount: Set(input.target_amount),
            minimum_investment: Set(input.minimum_investment),
            expected_returns: Set(input.expected_returns),
            duration: Set(input.duration),
            risk_level: Set(input.risk_level),
            status: Set(OpportunityStatus::Draft),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_by: Set(actor.id.clone()),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        self.opportunity_repo.create(model).await
    }

    /// Partially update an opportunity, including status transitions.
    ///
    /// Opening requires both start and end dates (taking any dates in
    /// this same update into account).
    pub async fn update(
        &self,
        id: &str,
        input: UpdateOpportunityInput,
    ) -> AppResult<investment_opportunity::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let opportunity = self.opportunity_repo.get_by_id(id).await?;

        let target = input.target_amount.unwrap_or(opportunity.target_amount);
        let minimum = input
            .minimum_investment
            .unwrap_or(opportunity.minimum_investment);
        let returns = input.expected_returns.unwrap_or(opportunity.expected_returns);
        let duration = input.duration.unwrap_or(opportunity.duration);
        check_amounts(target, minimum, returns, duration)?;

        let start_date = input.start_date.or(opportunity.start_date);
        let end_date = input.end_date.or(opportunity.end_date);
        check_dates(start_date, end_date, input.start_date.is_some())?;

        if let Some(new_status) = input.status
            && new_status != opportunity.status
        {
            if !opportunity.status.can_transition_to(new_status) {
                return Err(AppError::InvalidState(format!(
                    "Cannot change investment status from {} to {}",
                    opportunity.status.to_value(),
                    new_status.to_value()
                )));
            }

            if new_status == OpportunityStatus::Open
                && (start_date.is_none() || end_date.is_none())
            {
                return Err(AppError::InvalidState(
                    "Start and end dates must be set before opening investment".to_string(),
                ));
            }
        }

        let mut model: investment_opportunity::ActiveModel = opportunity.into();
        if let Some(title) = input.title {
            model.title = Set(title);
        }
        if let Some(description) = input.description {
            model.description = Set(description);
        }
        if let Some(target_amount) = input.target_amount {
            model.target_amount = Set(target_amount);
        }
        if let Some(minimum_investment) = input.minimum_investment {
            model.minimum_investment = Set(minimum_investment);
        }
        if let Some(expected_returns) = input.expected_returns {
            model.expected_returns = Set(expected_returns);
        }
        if let Some(duration) = input.duration {
            model.duration = Set(duration);
        }
        if let Some(risk_level) = input.risk_level {
            model.risk_level = Set(risk_level);
        }
        if let Some(status) = input.status {
            model.status = Set(status);
        }
        if let Some(start_date) = input.start_date {
            model.start_date = Set(Some(start_date));
        }
        if let Some(end_date) = input.end_date {
            model.end_date = Set(Some(end_date));
        }
        model.updated_at = Set(Some(Utc::now()));

        self.opportunity_repo.update(model).await
    }

    /// Open an opportunity for participation.
    pub async fn open(&self, id: &str) -> AppResult<investment_opportunity::Model> {
        self.update(
            id,
            UpdateOpportunityInput {
                status: Some(OpportunityStatus::Open),
                ..UpdateOpportunityInput::default()
            },
        )
        .await
    }

    /// Get an opportunity by ID.
    pub async fn get(&self, id: &str) -> AppResult<investment_opportunity::Model> {
        self.opportunity_repo.get_by_id(id).await
    }

    /// List all opportunities, newest first.
    pub async fn list(&self) -> AppResult<Vec<investment_opportunity::Model>> {
        self.opportunity_repo.find_all().await
    }

    /// Delete an opportunity (participants and updates cascade).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.opportunity_repo.delete(id).await
    }

    /// Join an open opportunity with a pledge.
    ///
    /// Preconditions in order: the opportunity exists, is open, and the
    /// amount meets its minimum. The target-amount ceiling is enforced by
    /// a single conditional insert that recomputes the committed total
    /// inside the statement, so concurrent pledges cannot jointly
    /// overcommit the target.
    pub async fn participate(
        &self,
        opportunity_id: &str,
        actor: &Actor,
        input: ParticipateInput,
    ) -> AppResult<investment_participant::Model> {
        let opportunity = self.opportunity_repo.get_by_id(opportunity_id).await?;

        if opportunity.status != OpportunityStatus::Open {
            return Err(AppError::InvalidState(
                "Investment is not open for participation".to_string(),
            ));
        }

        if input.amount < opportunity.minimum_investment {
            return Err(AppError::Validation(format!(
                "Amount must be at least ₦{}",
                opportunity.minimum_investment
            )));
        }

        let id = self.id_gen.generate();
        let inserted = self
            .participant_repo
            .insert_if_within_target(&id, opportunity_id, &actor.id, input.amount, Utc::now())
            .await?;

        if !inserted {
            return Err(AppError::Validation(
                "This investment would exceed the target amount".to_string(),
            ));
        }

        self.participant_repo.get_by_id(&id).await
    }

    /// Activate or complete a participation.
    ///
    /// Completing requires a returns amount and stamps `completed_at`.
    pub async fn set_participation_status(
        &self,
        participation_id: &str,
        input: SetParticipationStatusInput,
    ) -> AppResult<investment_participant::Model> {
        let participation = self.participant_repo.get_by_id(participation_id).await?;

        if !participation.status.can_transition_to(input.status) {
            return Err(AppError::InvalidState(format!(
                "Cannot change participation status from {} to {}",
                participation.status.to_value(),
                input.status.to_value()
            )));
        }

        let mut model: investment_participant::ActiveModel = participation.into();
        model.status = Set(input.status);

        if input.status == ParticipationStatus::Completed {
            let Some(returns_amount) = input.returns_amount else {
                return Err(AppError::Validation(
                    "Returns amount is required when completing an investment".to_string(),
                ));
            };
            if returns_amount < 0.0 {
                return Err(AppError::Validation(
                    "Returns amount cannot be negative".to_string(),
                ));
            }
            model.returns_amount = Set(Some(returns_amount));
            model.completed_at = Set(Some(Utc::now()));
        }

        self.participant_repo.update(model).await
    }

    /// Funding metrics for an opportunity. Zero participants yields zero
    /// totals, not an error.
    pub async fn performance(&self, opportunity_id: &str) -> AppResult<PerformanceMetrics> {
        let row = self
            .participant_repo
            .performance(opportunity_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Investment opportunity: {opportunity_id}"))
            })?;

        Ok(PerformanceMetrics {
            participant_count: row.participant_count,
            total_invested: row.total_invested,
            min_investment: row.min_investment.unwrap_or(0.0),
            max_investment: row.max_investment.unwrap_or(0.0),
            average_investment: row.avg_investment.unwrap_or(0.0),
            target_amount: row.target_amount,
            funding_percentage: row.funding_percentage,
        })
    }

    /// List participants of an opportunity with their user rows.
    pub async fn participants(
        &self,
        opportunity_id: &str,
    ) -> AppResult<Vec<(investment_participant::Model, Option<user::Model>)>> {
        // Surface a 404 for unknown opportunities rather than an empty list
        self.opportunity_repo.get_by_id(opportunity_id).await?;
        self.participant_repo
            .find_by_investment_with_users(opportunity_id)
            .await
    }

    /// List a user's participations with their opportunities.
    pub async fn user_participations(
        &self,
        user_id: &str,
    ) -> AppResult<
        Vec<(
            investment_participant::Model,
            Option<investment_opportunity::Model>,
        )>,
    > {
        self.user_repo.get_by_id(user_id).await?;
        self.participant_repo
            .find_by_user_with_opportunities(user_id)
            .await
    }

    /// Append an update to an opportunity's log.
    pub async fn add_update(
        &self,
        opportunity_id: &str,
        actor: &Actor,
        input: AddUpdateInput,
    ) -> AppResult<investment_update::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.opportunity_repo.get_by_id(opportunity_id).await?;

        let model = investment_update::ActiveModel {
            id: Set(self.id_gen.generate()),
            investment_id: Set(opportunity_id.to_string()),
            title: Set(input.title),
            description: Set(input.description),
            update_type: Set(input.update_type),
            created_by: Set(actor.id.clone()),
            created_at: Set(Utc::now()),
        };

        self.update_repo.create(model).await
    }

    /// List an opportunity's updates with their authors.
    pub async fn list_updates(
        &self,
        opportunity_id: &str,
    ) -> AppResult<Vec<(investment_update::Model, Option<user::Model>)>> {
        self.opportunity_repo.get_by_id(opportunity_id).await?;
        self.update_repo
            .find_by_investment_with_creators(opportunity_id)
            .await
    }
}

/// Shared amount invariants for create and update.
fn check_amounts(target: f64, minimum: f64, returns: f64, duration: i32) -> AppResult<()> {
    if target < MINIMUM_TARGET_AMOUNT {
        return Err(AppError::Validation(
            "Target amount must be at least ₦100,000".to_string(),
        ));
    }
    if minimum < MINIMUM_INVESTMENT_FLOOR {
        return Err(AppError::Validation(
            "Minimum investment must be at least ₦5,000".to_string(),
        ));
    }
    if minimum > target {
        return Err(AppError::Validation(
            "Minimum investment cannot be greater than target amount".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&returns) {
        return Err(AppError::Validation(
            "Expected returns must be between 0% and 100%".to_string(),
        ));
    }
    if !(1..=120).contains(&duration) {
        return Err(AppError::Validation(
            "Duration must be between 1 and 120 months".to_string(),
        ));
    }
    Ok(())
}

/// Shared date invariants. The past check only applies to a start date
/// supplied in the current call.
fn check_dates(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    start_is_new: bool,
) -> AppResult<()> {
    if start_is_new
        && let Some(start) = start_date
        && start < Utc::now().date_naive()
    {
        return Err(AppError::Validation(
            "Start date cannot be in the past".to_string(),
        ));
    }

    if let (Some(start), Some(end)) = (start_date, end_date)
        && end <= start
    {
        return Err(AppError::Validation(
            "End date must be after start date".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ajoclub_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn admin() -> Actor {
        Actor {
            id: "admin1".to_string(),
            role: UserRole::Admin,
        }
    }

    fn member() -> Actor {
        Actor {
            id: "member1".to_string(),
            role: UserRole::Member,
        }
    }

    fn mock_opportunity(
        id: &str,
        status: OpportunityStatus,
        with_dates: bool,
    ) -> investment_opportunity::Model {
        investment_opportunity::Model {
            id: id.to_string(),
            title: "Treasury bills pool".to_string(),
            description: "Short-dated government paper".to_string(),
            target_amount: 100_000.0,
            minimum_investment: 10_000.0,
            expected_returns: 12.5,
            duration: 6,
            risk_level: RiskLevel::Low,
            status,
            start_date: with_dates.then(|| NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
            end_date: with_dates.then(|| NaiveDate::from_ymd_opt(2030, 7, 1).unwrap()),
            created_by: "admin1".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn mock_participation(
        id: &str,
        status: ParticipationStatus,
    ) -> investment_participant::Model {
        investment_participant::Model {
            id: id.to_string(),
            investment_id: "inv1".to_string(),
            user_id: "member1".to_string(),
            amount: 20_000.0,
            status,
            joined_at: Utc::now(),
            completed_at: None,
            returns_amount: None,
        }
    }

    fn valid_create_input() -> CreateOpportunityInput {
        CreateOpportunityInput {
            title: "Treasury bills pool".to_string(),
            description: "Short-dated government paper".to_string(),
            target_amount: 100_000.0,
            minimum_investment: 10_000.0,
            expected_returns: 12.5,
            duration: 6,
            risk_level: RiskLevel::Low,
            start_date: None,
            end_date: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> InvestmentService {
        let db = Arc::new(db);
        InvestmentService::new(
            InvestmentOpportunityRepository::new(Arc::clone(&db)),
            InvestmentParticipantRepository::new(Arc::clone(&db)),
            InvestmentUpdateRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_create_starts_in_draft() {
        let created = mock_opportunity("inv1", OpportunityStatus::Draft, false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[created]])
            .into_connection();
        let service = service(db);

        let result = service.create(&admin(), valid_create_input()).await.unwrap();

        assert_eq!(result.status, OpportunityStatus::Draft);
    }

    #[tokio::test]
    async fn test_create_rejects_low_target_amount() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let mut input = valid_create_input();
        input.target_amount = 99_999.0;

        let result = service.create(&admin(), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_minimum_above_target() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let mut input = valid_create_input();
        input.minimum_investment = 150_000.0;

        let result = service.create(&admin(), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_returns_and_duration() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let mut input = valid_create_input();
        input.expected_returns = 120.0;
        assert!(matches!(
            service.create(&admin(), input).await,
            Err(AppError::Validation(_))
        ));

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = self::service(db);
        let mut input = valid_create_input();
        input.duration = 0;
        assert!(matches!(
            service.create(&admin(), input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_past_start_date() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let mut input = valid_create_input();
        input.start_date = NaiveDate::from_ymd_opt(2020, 1, 1);

        let result = service.create(&admin(), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_end_before_start() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let mut input = valid_create_input();
        input.start_date = NaiveDate::from_ymd_opt(2030, 7, 1);
        input.end_date = NaiveDate::from_ymd_opt(2030, 1, 1);

        let result = service.create(&admin(), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_open_fails_without_dates() {
        let draft = mock_opportunity("inv1", OpportunityStatus::Draft, false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[draft]])
            .into_connection();
        let service = service(db);

        let result = service.open("inv1").await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_open_succeeds_with_dates() {
        let draft = mock_opportunity("inv1", OpportunityStatus::Draft, true);
        let mut opened = draft.clone();
        opened.status = OpportunityStatus::Open;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[draft]])
            .append_query_results([[opened]])
            .into_connection();
        let service = service(db);

        let result = service.open("inv1").await.unwrap();
        assert_eq!(result.status, OpportunityStatus::Open);
    }

    #[tokio::test]
    async fn test_illegal_status_transition_is_rejected() {
        let draft = mock_opportunity("inv1", OpportunityStatus::Draft, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[draft]])
            .into_connection();
        let service = service(db);

        let result = service
            .update(
                "inv1",
                UpdateOpportunityInput {
                    status: Some(OpportunityStatus::Closed),
                    ..UpdateOpportunityInput::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_participate_requires_open_opportunity() {
        let draft = mock_opportunity("inv1", OpportunityStatus::Draft, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[draft]])
            .into_connection();
        let service = service(db);

        let result = service
            .participate("inv1", &member(), ParticipateInput { amount: 20_000.0 })
            .await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_participate_missing_opportunity_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<investment_opportunity::Model>::new()])
            .into_connection();
        let service = service(db);

        let result = service
            .participate("ghost", &member(), ParticipateInput { amount: 20_000.0 })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_participate_below_minimum_is_rejected() {
        let open = mock_opportunity("inv1", OpportunityStatus::Open, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[open]])
            .into_connection();
        let service = service(db);

        let result = service
            .participate("inv1", &member(), ParticipateInput { amount: 9999.0 })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_participate_at_minimum_is_accepted() {
        let open = mock_opportunity("inv1", OpportunityStatus::Open, true);
        let mut participation = mock_participation("p1", ParticipationStatus::Pending);
        participation.amount = 10_000.0;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[open]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[participation]])
            .into_connection();
        let service = service(db);

        let result = service
            .participate("inv1", &member(), ParticipateInput { amount: 10_000.0 })
            .await
            .unwrap();

        assert_eq!(result.status, ParticipationStatus::Pending);
        assert_eq!(result.amount, 10_000.0);
    }

    #[tokio::test]
    async fn test_participate_over_target_is_rejected() {
        let open = mock_opportunity("inv1", OpportunityStatus::Open, true);

        // The conditional insert reports zero affected rows.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[open]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let service = service(db);

        let result = service
            .participate("inv1", &member(), ParticipateInput { amount: 60_000.0 })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_complete_requires_returns_amount() {
        let active = mock_participation("p1", ParticipationStatus::Active);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[active]])
            .into_connection();
        let service = service(db);

        let result = service
            .set_participation_status(
                "p1",
                SetParticipationStatusInput {
                    status: ParticipationStatus::Completed,
                    returns_amount: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_complete_with_returns_amount() {
        let active = mock_participation("p1", ParticipationStatus::Active);
        let mut completed = active.clone();
        completed.status = ParticipationStatus::Completed;
        completed.returns_amount = Some(22_500.0);
        completed.completed_at = Some(Utc::now());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[active]])
            .append_query_results([[completed]])
            .into_connection();
        let service = service(db);

        let result = service
            .set_participation_status(
                "p1",
                SetParticipationStatusInput {
                    status: ParticipationStatus::Completed,
                    returns_amount: Some(22_500.0),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.status, ParticipationStatus::Completed);
        assert_eq!(result.returns_amount, Some(22_500.0));
        assert!(result.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_completed_participation_is_terminal() {
        let completed = mock_participation("p1", ParticipationStatus::Completed);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[completed]])
            .into_connection();
        let service = service(db);

        let result = service
            .set_participation_status(
                "p1",
                SetParticipationStatusInput {
                    status: ParticipationStatus::Active,
                    returns_amount: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_performance_maps_null_aggregates_to_zero() {
        use sea_orm::Value;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[maplit::btreemap! {
                "participant_count" => Value::BigInt(Some(0)),
                "total_invested" => Value::Double(Some(0.0)),
                "min_investment" => Value::Double(None),
                "max_investment" => Value::Double(None),
                "avg_investment" => Value::Double(None),
                "target_amount" => Value::Double(Some(100_000.0)),
                "funding_percentage" => Value::Double(Some(0.0)),
            }]])
            .into_connection();
        let service = service(db);

        let metrics = service.performance("inv1").await.unwrap();

        assert_eq!(metrics.participant_count, 0);
        assert_eq!(metrics.total_invested, 0.0);
        assert_eq!(metrics.min_investment, 0.0);
        assert_eq!(metrics.funding_percentage, 0.0);
        assert_eq!(metrics.target_amount, 100_000.0);
    }

    #[tokio::test]
    async fn test_performance_missing_opportunity_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<
                std::collections::BTreeMap<&str, sea_orm::Value>,
            >::new()])
            .into_connection();
        let service = service(db);

        let result = service.performance("ghost").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
