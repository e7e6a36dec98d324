//! Database integration tests.
//!
//! These run against an in-memory `SQLite` database with the full schema
//! applied, so they need no external services.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use ajoclub_common::AppError;
use ajoclub_db::entities::{
    contribution::{self, ContributionStatus},
    investment_opportunity::{self, OpportunityStatus, RiskLevel},
    user::{self, UserRole, UserStatus},
};
use ajoclub_db::repositories::{
    ContributionRepository, InvestmentOpportunityRepository, InvestmentParticipantRepository,
    UserRepository,
};
use ajoclub_db::test_utils::TestDatabase;
use chrono::{NaiveDate, Utc};
use sea_orm::Set;

async fn setup() -> (Arc<sea_orm::DatabaseConnection>, String, String) {
    let db = TestDatabase::new().await.unwrap();
    let db = Arc::new(db.conn);

    let users = UserRepository::new(Arc::clone(&db));

    let admin = users
        .create(user::ActiveModel {
            id: Set("admin1".to_string()),
            name: Set("Ada Obi".to_string()),
            email: Set("ada@example.com".to_string()),
            role: Set(UserRole::Admin),
            status: Set(UserStatus::Active),
            profile_picture_url: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let member = users
        .create(user::ActiveModel {
            id: Set("member1".to_string()),
            name: Set("Bola Ade".to_string()),
            email: Set("bola@example.com".to_string()),
            role: Set(UserRole::Member),
            status: Set(UserStatus::Active),
            profile_picture_url: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    (db, admin.id, member.id)
}

fn contribution_model(
    id: &str,
    user_id: &str,
    amount: f64,
    reference: &str,
    date: NaiveDate,
    status: ContributionStatus,
) -> contribution::ActiveModel {
    contribution::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        amount: Set(amount),
        transaction_reference: Set(reference.to_string()),
        payment_proof_url: Set(None),
        contribution_date: Set(date),
        status: Set(status),
        validated_by: Set(None),
        validation_date: Set(None),
        rejection_reason: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
}

fn opportunity_model(
    id: &str,
    created_by: &str,
    target_amount: f64,
    minimum_investment: f64,
    status: OpportunityStatus,
) -> investment_opportunity::ActiveModel {
    investment_opportunity::ActiveModel {
        id: Set(id.to_string()),
        title: Set("Treasury bills pool".to_string()),
        description: Set("Short-dated government paper".to_string()),
        target_amount: Set(target_amount),
        minimum_investment: Set(minimum_investment),
        expected_returns: Set(12.5),
        duration: Set(6),
        risk_level: Set(RiskLevel::Low),
        status: Set(status),
        start_date: Set(NaiveDate::from_ymd_opt(2026, 9, 1)),
        end_date: Set(NaiveDate::from_ymd_opt(2027, 3, 1)),
        created_by: Set(created_by.to_string()),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
}

#[tokio::test]
async fn test_migrations_apply_cleanly() {
    let db = TestDatabase::new().await;
    assert!(db.is_ok(), "Migration failed: {:?}", db.err());
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let (db, _admin, _member) = setup().await;
    let users = UserRepository::new(Arc::clone(&db));

    let result = users
        .create(user::ActiveModel {
            id: Set("other".to_string()),
            name: Set("Other".to_string()),
            email: Set("ada@example.com".to_string()),
            role: Set(UserRole::Member),
            status: Set(UserStatus::Active),
            profile_picture_url: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_duplicate_transaction_reference_is_conflict() {
    let (db, _admin, member) = setup().await;
    let contributions = ContributionRepository::new(Arc::clone(&db));
    let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

    contributions
        .create(contribution_model(
            "c1",
            &member,
            5000.0,
            "TXN-001",
            date,
            ContributionStatus::Pending,
        ))
        .await
        .unwrap();

    let result = contributions
        .create(contribution_model(
            "c2",
            &member,
            6000.0,
            "TXN-001",
            date,
            ContributionStatus::Pending,
        ))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_guarded_insert_respects_target_amount() {
    let (db, admin, member) = setup().await;
    let opportunities = InvestmentOpportunityRepository::new(Arc::clone(&db));
    let participants = InvestmentParticipantRepository::new(Arc::clone(&db));

    opportunities
        .create(opportunity_model(
            "inv1",
            &admin,
            100_000.0,
            10_000.0,
            OpportunityStatus::Open,
        ))
        .await
        .unwrap();

    // First pledge of 60,000 fits under the 100,000 target.
    let inserted = participants
        .insert_if_within_target("p1", "inv1", &member, 60_000.0, Utc::now())
        .await
        .unwrap();
    assert!(inserted);

    // A second 60,000 would overcommit; the guard must reject it.
    let inserted = participants
        .insert_if_within_target("p2", "inv1", &member, 60_000.0, Utc::now())
        .await
        .unwrap();
    assert!(!inserted);

    assert_eq!(participants.committed_total("inv1").await.unwrap(), 60_000.0);

    // Exactly reaching the target is allowed.
    let inserted = participants
        .insert_if_within_target("p3", "inv1", &member, 40_000.0, Utc::now())
        .await
        .unwrap();
    assert!(inserted);
    assert_eq!(
        participants.committed_total("inv1").await.unwrap(),
        100_000.0
    );
}

#[tokio::test]
async fn test_guarded_insert_boundary_near_target() {
    let (db, admin, member) = setup().await;
    let opportunities = InvestmentOpportunityRepository::new(Arc::clone(&db));
    let participants = InvestmentParticipantRepository::new(Arc::clone(&db));

    opportunities
        .create(opportunity_model(
            "inv1",
            &admin,
            100_000.0,
            10_000.0,
            OpportunityStatus::Open,
        ))
        .await
        .unwrap();

    // Existing participants already total 95,000.
    participants
        .insert_if_within_target("p1", "inv1", &member, 50_000.0, Utc::now())
        .await
        .unwrap();
    participants
        .insert_if_within_target("p2", "inv1", &member, 45_000.0, Utc::now())
        .await
        .unwrap();

    // 6,000 more would overcommit; 5,000 lands exactly on the target.
    let inserted = participants
        .insert_if_within_target("p3", "inv1", &member, 6000.0, Utc::now())
        .await
        .unwrap();
    assert!(!inserted);

    let inserted = participants
        .insert_if_within_target("p4", "inv1", &member, 5000.0, Utc::now())
        .await
        .unwrap();
    assert!(inserted);
    assert_eq!(
        participants.committed_total("inv1").await.unwrap(),
        100_000.0
    );
}

#[tokio::test]
async fn test_performance_with_zero_participants_is_all_zeroes() {
    let (db, admin, _member) = setup().await;
    let opportunities = InvestmentOpportunityRepository::new(Arc::clone(&db));
    let participants = InvestmentParticipantRepository::new(Arc::clone(&db));

    opportunities
        .create(opportunity_model(
            "inv1",
            &admin,
            100_000.0,
            10_000.0,
            OpportunityStatus::Open,
        ))
        .await
        .unwrap();

    let row = participants.performance("inv1").await.unwrap().unwrap();
    assert_eq!(row.participant_count, 0);
    assert_eq!(row.total_invested, 0.0);
    assert_eq!(row.funding_percentage, 0.0);
    assert_eq!(row.target_amount, 100_000.0);
}

#[tokio::test]
async fn test_performance_missing_opportunity_is_none() {
    let (db, _admin, _member) = setup().await;
    let participants = InvestmentParticipantRepository::new(Arc::clone(&db));

    let row = participants.performance("ghost").await.unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn test_summary_counts_only_validated_amounts() {
    let (db, _admin, member) = setup().await;
    let contributions = ContributionRepository::new(Arc::clone(&db));
    let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

    contributions
        .create(contribution_model(
            "c1",
            &member,
            5000.0,
            "TXN-001",
            date,
            ContributionStatus::Validated,
        ))
        .await
        .unwrap();
    contributions
        .create(contribution_model(
            "c2",
            &member,
            7000.0,
            "TXN-002",
            date,
            ContributionStatus::Pending,
        ))
        .await
        .unwrap();
    contributions
        .create(contribution_model(
            "c3",
            &member,
            9000.0,
            "TXN-003",
            date,
            ContributionStatus::Rejected,
        ))
        .await
        .unwrap();

    let summary = contributions.summary().await.unwrap();
    assert_eq!(summary.total_contributions, 3);
    assert_eq!(summary.total_amount_validated, 5000.0);
    assert_eq!(summary.total_amount_pending, 7000.0);
    assert_eq!(summary.average_contribution, Some(5000.0));
}

#[tokio::test]
async fn test_monthly_summary_excludes_unvalidated_rows() {
    let (db, _admin, member) = setup().await;
    let contributions = ContributionRepository::new(Arc::clone(&db));

    let july = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let august = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

    contributions
        .create(contribution_model(
            "c1",
            &member,
            5000.0,
            "TXN-001",
            july,
            ContributionStatus::Validated,
        ))
        .await
        .unwrap();
    contributions
        .create(contribution_model(
            "c2",
            &member,
            6000.0,
            "TXN-002",
            august,
            ContributionStatus::Validated,
        ))
        .await
        .unwrap();
    contributions
        .create(contribution_model(
            "c3",
            &member,
            9000.0,
            "TXN-003",
            august,
            ContributionStatus::Pending,
        ))
        .await
        .unwrap();

    let months = contributions.monthly_summary().await.unwrap();
    assert_eq!(months.len(), 2);

    // Newest first
    assert_eq!(months[0].month, "2026-08");
    assert_eq!(months[0].contribution_count, 1);
    assert_eq!(months[0].total_amount, 6000.0);
    assert_eq!(months[1].month, "2026-07");
    assert_eq!(months[1].total_amount, 5000.0);
}

#[tokio::test]
async fn test_user_stats() {
    let (db, admin, member) = setup().await;
    let users = UserRepository::new(Arc::clone(&db));
    let contributions = ContributionRepository::new(Arc::clone(&db));
    let opportunities = InvestmentOpportunityRepository::new(Arc::clone(&db));
    let participants = InvestmentParticipantRepository::new(Arc::clone(&db));
    let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

    contributions
        .create(contribution_model(
            "c1",
            &member,
            5000.0,
            "TXN-001",
            date,
            ContributionStatus::Validated,
        ))
        .await
        .unwrap();
    contributions
        .create(contribution_model(
            "c2",
            &member,
            8000.0,
            "TXN-002",
            date,
            ContributionStatus::Pending,
        ))
        .await
        .unwrap();

    opportunities
        .create(opportunity_model(
            "inv1",
            &admin,
            100_000.0,
            10_000.0,
            OpportunityStatus::Open,
        ))
        .await
        .unwrap();
    participants
        .insert_if_within_target("p1", "inv1", &member, 20_000.0, Utc::now())
        .await
        .unwrap();

    let stats = users.stats(&member).await.unwrap();
    assert_eq!(stats.total_contributions, 2);
    assert_eq!(stats.total_contribution_amount, 5000.0);
    assert_eq!(stats.total_investments, 1);
    assert_eq!(stats.total_investment_amount, 20_000.0);
}

#[tokio::test]
async fn test_deleting_opportunity_cascades_to_participants() {
    let (db, admin, member) = setup().await;
    let opportunities = InvestmentOpportunityRepository::new(Arc::clone(&db));
    let participants = InvestmentParticipantRepository::new(Arc::clone(&db));

    opportunities
        .create(opportunity_model(
            "inv1",
            &admin,
            100_000.0,
            10_000.0,
            OpportunityStatus::Open,
        ))
        .await
        .unwrap();
    participants
        .insert_if_within_target("p1", "inv1", &member, 20_000.0, Utc::now())
        .await
        .unwrap();

    opportunities.delete("inv1").await.unwrap();

    assert!(participants.find_by_id("p1").await.unwrap().is_none());
}
