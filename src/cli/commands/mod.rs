mod args;
pub mod distribution;
pub mod donation;
pub mod month;
pub mod place;
pub mod system;
pub mod user;
pub mod yearly;

use super::registry::{CommandGroup, CommandRegistry};

pub(crate) fn registry() -> CommandRegistry {
    CommandRegistry::from_groups(vec![
        CommandGroup::new("Months", month::definitions()),
        CommandGroup::new("Donations", donation::definitions()),
        CommandGroup::new("Distributions", distribution::definitions()),
        CommandGroup::new("Donation places", place::definitions()),
        CommandGroup::new("Users", user::definitions()),
        CommandGroup::new("Yearly summaries", yearly::definitions()),
        CommandGroup::new("System", system::definitions()),
    ])
}
