use rentgate_dashboard::StatisticsPanel;

use crate::commands::{block_on, CommandResult, ReviewContext};

pub fn run(json_output: bool) -> CommandResult {
    let context = match ReviewContext::load("stats") {
        Ok(context) => context,
        Err(result) => return result,
    };

    let panel = match block_on("stats", StatisticsPanel::load(context.gateway)) {
        Ok(panel) => panel,
        Err(result) => return result,
    };

    let Some(statistics) = panel.snapshot() else {
        return CommandResult::failure(
            "stats",
            "gateway",
            "approval statistics are unavailable",
            1,
        );
    };

    if json_output {
        let output = serde_json::to_string_pretty(statistics)
            .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
        return CommandResult::plain(0, output);
    }

    CommandResult::plain(
        0,
        format!(
            "pending driver applications:  {}\n\
             pending vehicle applications: {}\n\
             total pending:                {}\n\
             approvals by this account:    {}",
            statistics.pending.drivers,
            statistics.pending.vehicles,
            statistics.pending.total,
            statistics.my_approvals.total,
        ),
    )
}
