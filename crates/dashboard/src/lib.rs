pub mod drivers;
pub mod interaction;
pub mod outcome;
pub mod shell;
pub mod statistics;
pub mod vehicles;

pub use drivers::{DriverReviewFlow, DRIVERS_EMPTY_STATE};
pub use interaction::{Interaction, ScriptedInteraction};
pub use outcome::DecisionOutcome;
pub use shell::{ActiveTab, DashboardShell, DashboardSummary};
pub use statistics::StatisticsPanel;
pub use vehicles::{VehicleReviewFlow, VEHICLES_EMPTY_STATE};
