//! Database repositories.

pub mod contribution;
pub mod faq;
pub mod inquiry;
pub mod investment_opportunity;
pub mod investment_participant;
pub mod investment_update;
pub mod uploaded_file;
pub mod user;

pub use contribution::{ContributionRepository, ContributionSummary, MonthlyContributionSummary};
pub use faq::FaqRepository;
pub use inquiry::InquiryRepository;
pub use investment_opportunity::InvestmentOpportunityRepository;
pub use investment_participant::{InvestmentParticipantRepository, PerformanceRow};
pub use investment_update::InvestmentUpdateRepository;
pub use uploaded_file::UploadedFileRepository;
pub use user::{UserRepository, UserStats};
