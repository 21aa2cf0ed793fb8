pub mod donation_place_service;
pub mod monthly_overview_service;
pub mod user_service;
pub mod validation;
pub mod yearly_summary_service;

pub use donation_place_service::DonationPlaceService;
pub use monthly_overview_service::{
    CreateMonthInput, DistributionUpdateInput, DonationUpdateInput, MonthlyOverviewService,
    NewDistributionInput, NewDonationInput,
};
pub use user_service::{NewUserInput, UserService};
pub use yearly_summary_service::{YearlySummaryInput, YearlySummaryService};

pub use crate::core::errors::{CoreError, CoreResult, ErrorCode};
