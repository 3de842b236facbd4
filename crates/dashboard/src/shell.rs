use std::sync::Arc;

use rentgate_core::config::DashboardConfig;
use rentgate_core::domain::driver::DriverApplication;
use rentgate_core::domain::vehicle::VehicleApplication;
use rentgate_core::{PasswordProvisioner, ReviewerSession};
use rentgate_gateway::ApprovalGateway;

use crate::drivers::DriverReviewFlow;
use crate::interaction::Interaction;
use crate::statistics::StatisticsPanel;
use crate::vehicles::VehicleReviewFlow;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActiveTab {
    #[default]
    All,
    Drivers,
    Vehicles,
}

/// Combined view for the `All` tab: the first N applications of each kind,
/// with the full counts so "view all" links can be rendered.
#[derive(Clone, Debug)]
pub struct DashboardSummary<'a> {
    pub drivers: &'a [DriverApplication],
    pub vehicles: &'a [VehicleApplication],
    pub driver_total: usize,
    pub vehicle_total: usize,
}

/// Tab container over the statistics panel and both review flows.
///
/// Mounting loads statistics once; selecting a tab refreshes only that tab's
/// flow. Tab switches never re-fetch statistics, so the panel can drift from
/// the lists until `reload_statistics` is called explicitly.
pub struct DashboardShell<G, I, P> {
    statistics: StatisticsPanel<G>,
    drivers: DriverReviewFlow<G, I, P>,
    vehicles: VehicleReviewFlow<G, I>,
    active_tab: ActiveTab,
    summary_limit: usize,
}

impl<G, I, P> DashboardShell<G, I, P>
where
    G: ApprovalGateway,
    I: Interaction,
    P: PasswordProvisioner,
{
    pub fn new(
        gateway: Arc<G>,
        interaction: Arc<I>,
        provisioner: P,
        session: ReviewerSession,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            statistics: StatisticsPanel::new(Arc::clone(&gateway)),
            drivers: DriverReviewFlow::new(
                Arc::clone(&gateway),
                Arc::clone(&interaction),
                provisioner,
                session.clone(),
            ),
            vehicles: VehicleReviewFlow::new(gateway, interaction, session),
            active_tab: ActiveTab::All,
            summary_limit: config.summary_limit,
        }
    }

    /// Initial mount: statistics plus both lists for the combined tab.
    pub async fn mount(&mut self) {
        self.statistics.reload().await;
        self.drivers.refresh().await;
        self.vehicles.refresh().await;
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    /// Switches tabs and refreshes the lists that tab renders. Statistics
    /// are left as-is on purpose.
    pub async fn select_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
        match tab {
            ActiveTab::All => {
                self.drivers.refresh().await;
                self.vehicles.refresh().await;
            }
            ActiveTab::Drivers => self.drivers.refresh().await,
            ActiveTab::Vehicles => self.vehicles.refresh().await,
        }
    }

    /// Deep links from the summary cards.
    pub async fn view_all_drivers(&mut self) {
        self.select_tab(ActiveTab::Drivers).await;
    }

    pub async fn view_all_vehicles(&mut self) {
        self.select_tab(ActiveTab::Vehicles).await;
    }

    pub fn summary(&self) -> DashboardSummary<'_> {
        let drivers = self.drivers.applications();
        let vehicles = self.vehicles.applications();
        DashboardSummary {
            drivers: &drivers[..drivers.len().min(self.summary_limit)],
            vehicles: &vehicles[..vehicles.len().min(self.summary_limit)],
            driver_total: drivers.len(),
            vehicle_total: vehicles.len(),
        }
    }

    pub fn statistics(&self) -> &StatisticsPanel<G> {
        &self.statistics
    }

    pub async fn reload_statistics(&mut self) {
        self.statistics.reload().await;
    }

    pub fn drivers(&self) -> &DriverReviewFlow<G, I, P> {
        &self.drivers
    }

    pub fn drivers_mut(&mut self) -> &mut DriverReviewFlow<G, I, P> {
        &mut self.drivers
    }

    pub fn vehicles(&self) -> &VehicleReviewFlow<G, I> {
        &self.vehicles
    }

    pub fn vehicles_mut(&mut self) -> &mut VehicleReviewFlow<G, I> {
        &mut self.vehicles
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use rentgate_core::config::DashboardConfig;
    use rentgate_core::domain::driver::{DriverApplication, DriverApplicationId, DriverId};
    use rentgate_core::{
        ApprovalStatistics, ApprovalTotals, PendingCounts, RandomPasswordProvisioner,
        ReviewerSession,
    };
    use rentgate_gateway::InMemoryApprovalGateway;

    use crate::interaction::ScriptedInteraction;

    use super::{ActiveTab, DashboardShell};

    fn application(id: &str) -> DriverApplication {
        DriverApplication {
            id: DriverApplicationId(id.to_string()),
            driver_id: DriverId(format!("DRV-{id}")),
            full_name: "Imani Okafor".to_string(),
            email: "imani@example.com".to_string(),
            phone: "+2348012345678".to_string(),
            license_number: "LAG-99-1204".to_string(),
            years_of_experience: 6,
            vehicle_type: "sedan".to_string(),
            vehicle_model: "Toyota Camry".to_string(),
            vehicle_plate_number: "KJA-412-XY".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 8, 30, 0).unwrap(),
        }
    }

    fn shell(
        gateway: Arc<InMemoryApprovalGateway>,
    ) -> DashboardShell<InMemoryApprovalGateway, ScriptedInteraction, RandomPasswordProvisioner>
    {
        DashboardShell::new(
            gateway,
            Arc::new(ScriptedInteraction::default()),
            RandomPasswordProvisioner,
            ReviewerSession::new("owner-1", "Adaeze Eze"),
            &DashboardConfig { summary_limit: 2 },
        )
    }

    fn statistics(total: u64) -> ApprovalStatistics {
        ApprovalStatistics {
            pending: PendingCounts { drivers: total, vehicles: 0, total },
            my_approvals: ApprovalTotals { total: 7 },
        }
    }

    #[tokio::test]
    async fn summary_is_capped_at_the_configured_limit() {
        let gateway = Arc::new(InMemoryApprovalGateway::with_applications(
            vec![application("app-1"), application("app-2"), application("app-3")],
            Vec::new(),
        ));

        let mut shell = shell(Arc::clone(&gateway));
        shell.mount().await;

        let summary = shell.summary();
        assert_eq!(summary.drivers.len(), 2);
        assert_eq!(summary.driver_total, 3);
        assert_eq!(summary.vehicle_total, 0);
    }

    #[tokio::test]
    async fn view_all_link_switches_the_active_tab() {
        let gateway = Arc::new(InMemoryApprovalGateway::default());
        let mut shell = shell(Arc::clone(&gateway));
        shell.mount().await;

        assert_eq!(shell.active_tab(), ActiveTab::All);
        shell.view_all_drivers().await;
        assert_eq!(shell.active_tab(), ActiveTab::Drivers);
    }

    #[tokio::test]
    async fn statistics_stay_stale_across_decisions_and_tab_switches() {
        let gateway = Arc::new(InMemoryApprovalGateway::with_applications(
            vec![application("app-1")],
            Vec::new(),
        ));
        gateway.set_statistics(statistics(5));

        let mut shell = shell(Arc::clone(&gateway));
        shell.mount().await;
        assert_eq!(shell.statistics().snapshot().expect("snapshot").pending.total, 5);

        // The backend's counts change; a decision and a tab switch later the
        // panel still shows the mounted snapshot.
        gateway.set_statistics(statistics(4));
        shell.drivers_mut().reject(&DriverApplicationId("app-1".to_string())).await;
        shell.select_tab(ActiveTab::Vehicles).await;
        shell.select_tab(ActiveTab::All).await;
        assert_eq!(shell.statistics().snapshot().expect("snapshot").pending.total, 5);

        shell.reload_statistics().await;
        assert_eq!(shell.statistics().snapshot().expect("snapshot").pending.total, 4);
    }

    #[tokio::test]
    async fn selecting_a_tab_refreshes_only_that_flow() {
        let gateway = Arc::new(InMemoryApprovalGateway::with_applications(
            vec![application("app-1")],
            Vec::new(),
        ));

        let mut shell = shell(Arc::clone(&gateway));
        shell.select_tab(ActiveTab::Drivers).await;

        assert_eq!(shell.drivers().applications().len(), 1);
        // The vehicles flow has never loaded, so it shows no empty state yet.
        assert!(shell.vehicles().empty_state().is_none());
    }
}
