//! Business logic services.

#![allow(missing_docs)]

pub mod contribution;
pub mod investment;
pub mod support;
pub mod upload;
pub mod user;

pub use contribution::{ContributionService, SetContributionStatusInput, SubmitContributionInput};
pub use investment::{
    AddUpdateInput, CreateOpportunityInput, InvestmentService, ParticipateInput,
    PerformanceMetrics, SetParticipationStatusInput, UpdateOpportunityInput,
};
pub use support::{
    CreateFaqInput, CreateInquiryInput, RespondToInquiryInput, SupportService, UpdateFaqInput,
};
pub use upload::{UploadInput, UploadPolicy, UploadPolicySet, UploadService};
pub use user::{CreateUserInput, UpdateUserInput, UserService};

use ajoclub_db::entities::user::UserRole;

/// Identity context for a call: who is acting and in which role.
///
/// Always passed explicitly into service calls, never read from
/// ambient or global state.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Acting user's ID.
    pub id: String,
    /// Acting user's role.
    pub role: UserRole,
}

impl Actor {
    /// Whether this actor is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&ajoclub_db::entities::user::Model> for Actor {
    fn from(user: &ajoclub_db::entities::user::Model) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
        }
    }
}
