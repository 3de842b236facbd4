use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCounts {
    pub drivers: u64,
    pub vehicles: u64,
    pub total: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTotals {
    pub total: u64,
}

/// Aggregate counts recomputed by the gateway. The dashboard only ever holds
/// the last fetched snapshot; it is not kept in sync with actions taken in
/// the same session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStatistics {
    pub pending: PendingCounts,
    pub my_approvals: ApprovalTotals,
}

#[cfg(test)]
mod tests {
    use super::ApprovalStatistics;

    #[test]
    fn statistics_decode_wire_shape() {
        let raw = r#"{
            "pending": { "drivers": 3, "vehicles": 2, "total": 5 },
            "myApprovals": { "total": 41 }
        }"#;

        let statistics: ApprovalStatistics =
            serde_json::from_str(raw).expect("wire shape should decode");
        assert_eq!(statistics.pending.total, 5);
        assert_eq!(statistics.my_approvals.total, 41);
    }
}
