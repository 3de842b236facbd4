use std::sync::Arc;

use tracing::warn;

use rentgate_core::ApprovalStatistics;
use rentgate_gateway::ApprovalGateway;

/// Aggregate-counts panel. Fetches once when loaded and otherwise keeps
/// whatever snapshot it has: actions taken in the review flows do not
/// invalidate it, so the displayed counts drift until the next explicit
/// `reload`. A failed fetch is logged and leaves the panel empty rather than
/// blocking the rest of the dashboard.
#[derive(Clone, Debug)]
pub struct StatisticsPanel<G> {
    gateway: Arc<G>,
    snapshot: Option<ApprovalStatistics>,
}

impl<G> StatisticsPanel<G>
where
    G: ApprovalGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway, snapshot: None }
    }

    pub async fn load(gateway: Arc<G>) -> Self {
        let mut panel = Self::new(gateway);
        panel.reload().await;
        panel
    }

    pub async fn reload(&mut self) {
        match self.gateway.statistics().await {
            Ok(statistics) => self.snapshot = Some(statistics),
            Err(error) => {
                warn!(error = %error, "failed to load approval statistics");
            }
        }
    }

    pub fn snapshot(&self) -> Option<&ApprovalStatistics> {
        self.snapshot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rentgate_core::{ApprovalStatistics, ApprovalTotals, PendingCounts};
    use rentgate_gateway::InMemoryApprovalGateway;

    use super::StatisticsPanel;

    fn statistics(total: u64) -> ApprovalStatistics {
        ApprovalStatistics {
            pending: PendingCounts { drivers: total, vehicles: 0, total },
            my_approvals: ApprovalTotals { total: 41 },
        }
    }

    #[tokio::test]
    async fn load_captures_one_snapshot() {
        let gateway = Arc::new(InMemoryApprovalGateway::default());
        gateway.set_statistics(statistics(5));

        let panel = StatisticsPanel::load(Arc::clone(&gateway)).await;
        assert_eq!(panel.snapshot().expect("snapshot").pending.total, 5);
    }

    #[tokio::test]
    async fn failed_load_leaves_the_panel_empty() {
        let gateway = Arc::new(InMemoryApprovalGateway::default());
        gateway.fail_next_with_outage();

        let panel = StatisticsPanel::load(Arc::clone(&gateway)).await;
        assert!(panel.snapshot().is_none());
    }

    #[tokio::test]
    async fn failed_reload_keeps_the_previous_snapshot() {
        let gateway = Arc::new(InMemoryApprovalGateway::default());
        gateway.set_statistics(statistics(5));

        let mut panel = StatisticsPanel::load(Arc::clone(&gateway)).await;
        gateway.fail_next_with_outage();
        panel.reload().await;

        assert_eq!(panel.snapshot().expect("snapshot").pending.total, 5);
    }

    #[tokio::test]
    async fn snapshot_does_not_track_backend_changes_until_reload() {
        let gateway = Arc::new(InMemoryApprovalGateway::default());
        gateway.set_statistics(statistics(5));

        let mut panel = StatisticsPanel::load(Arc::clone(&gateway)).await;
        gateway.set_statistics(statistics(4));
        assert_eq!(panel.snapshot().expect("snapshot").pending.total, 5);

        panel.reload().await;
        assert_eq!(panel.snapshot().expect("snapshot").pending.total, 4);
    }
}
