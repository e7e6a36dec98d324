//! Database entities.

#![allow(missing_docs)]

pub mod contribution;
pub mod faq;
pub mod inquiry;
pub mod inquiry_response;
pub mod investment_opportunity;
pub mod investment_participant;
pub mod investment_update;
pub mod uploaded_file;
pub mod user;

pub use contribution::Entity as Contribution;
pub use faq::Entity as Faq;
pub use inquiry::Entity as Inquiry;
pub use inquiry_response::Entity as InquiryResponse;
pub use investment_opportunity::Entity as InvestmentOpportunity;
pub use investment_participant::Entity as InvestmentParticipant;
pub use investment_update::Entity as InvestmentUpdate;
pub use uploaded_file::Entity as UploadedFile;
pub use user::Entity as User;
