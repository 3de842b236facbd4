use std::sync::Arc;

use rentgate_core::domain::driver::{DriverApplication, DriverApplicationId, ReviewStatus};
use rentgate_core::RandomPasswordProvisioner;
use rentgate_dashboard::{DecisionOutcome, DriverReviewFlow};
use rentgate_gateway::ApprovalGateway;

use crate::commands::{block_on, CommandResult, ReviewContext};
use crate::terminal::TerminalInteraction;

pub fn list(status: Option<&str>) -> CommandResult {
    let status = match status {
        None => ReviewStatus::Pending,
        Some(raw) => match parse_status(raw) {
            Some(status) => status,
            None => {
                return CommandResult::failure(
                    "drivers list",
                    "arguments",
                    format!("unknown status `{raw}` (expected pending|approved|rejected)"),
                    2,
                )
            }
        },
    };

    let context = match ReviewContext::load("drivers list") {
        Ok(context) => context,
        Err(result) => return result,
    };

    let fetched = block_on("drivers list", async {
        match status {
            ReviewStatus::Pending => context.gateway.pending_drivers().await,
            other => context.gateway.drivers_by_status(other).await,
        }
    });
    let applications = match fetched {
        Ok(Ok(applications)) => applications,
        Ok(Err(error)) => {
            return CommandResult::failure("drivers list", "gateway", error.to_string(), 1)
        }
        Err(result) => return result,
    };

    if applications.is_empty() {
        return CommandResult::plain(0, "All driver applications have been processed");
    }

    let mut lines =
        vec![format!("{} driver application(s) with status {}:", applications.len(), status.as_str())];
    for application in &applications {
        lines.push(format!(
            "- {}  {}  {}  {} {}  submitted {}",
            application.id.as_str(),
            application.driver_id.0,
            application.full_name,
            application.vehicle_type,
            application.vehicle_model,
            application.created_at.format("%Y-%m-%d"),
        ));
    }
    CommandResult::plain(0, lines.join("\n"))
}

pub fn show(id: &str) -> CommandResult {
    let context = match ReviewContext::load("drivers show") {
        Ok(context) => context,
        Err(result) => return result,
    };

    let fetched = block_on("drivers show", async {
        context.gateway.driver(&DriverApplicationId(id.to_string())).await
    });
    match fetched {
        Ok(Ok(application)) => CommandResult::plain(0, render_detail(&application)),
        Ok(Err(error)) => CommandResult::failure("drivers show", "gateway", error.to_string(), 1),
        Err(result) => result,
    }
}

pub fn approve(id: &str, assume_yes: bool) -> CommandResult {
    decide("drivers approve", id, assume_yes, true)
}

pub fn reject(id: &str, assume_yes: bool) -> CommandResult {
    decide("drivers reject", id, assume_yes, false)
}

fn decide(command: &str, id: &str, assume_yes: bool, approving: bool) -> CommandResult {
    let context = match ReviewContext::load(command) {
        Ok(context) => context,
        Err(result) => return result,
    };
    tracing::info!(
        correlation_id = %context.correlation_id,
        application = id,
        approving,
        "submitting driver decision"
    );

    let interaction = Arc::new(TerminalInteraction::new(assume_yes));
    let outcome = block_on(command, async {
        let mut flow = DriverReviewFlow::new(
            context.gateway,
            interaction,
            RandomPasswordProvisioner,
            context.session,
        );
        flow.refresh().await;
        if let Some(error) = flow.last_error() {
            return Err(error.to_string());
        }

        let id = DriverApplicationId(id.to_string());
        let outcome =
            if approving { flow.approve(&id).await } else { flow.reject(&id).await };
        Ok((outcome, flow.applications().len()))
    });

    match outcome {
        Ok(Ok((DecisionOutcome::Completed, remaining))) => CommandResult::success(
            command,
            format!("decision recorded; {remaining} pending application(s) remaining"),
        ),
        Ok(Ok((DecisionOutcome::DeclinedByReviewer, _))) => {
            CommandResult::success(command, "cancelled at the confirmation prompt")
        }
        Ok(Ok((DecisionOutcome::AlreadyProcessing, _))) => CommandResult::failure(
            command,
            "processing_guard",
            "a request for this application is already in flight",
            1,
        ),
        Ok(Ok((_, _))) => CommandResult::failure(
            command,
            "gateway",
            "the decision was not accepted; see the message above",
            1,
        ),
        Ok(Err(message)) => CommandResult::failure(command, "gateway", message, 1),
        Err(result) => result,
    }
}

fn parse_status(raw: &str) -> Option<ReviewStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pending" => Some(ReviewStatus::Pending),
        "approved" => Some(ReviewStatus::Approved),
        "rejected" => Some(ReviewStatus::Rejected),
        _ => None,
    }
}

fn render_detail(application: &DriverApplication) -> String {
    format!(
        "driver application {}\n\
         - driver id:      {}\n\
         - name:           {}\n\
         - email:          {}\n\
         - phone:          {}\n\
         - license number: {}\n\
         - experience:     {} year(s)\n\
         - vehicle:        {} {} ({})\n\
         - submitted:      {}",
        application.id.as_str(),
        application.driver_id.0,
        application.full_name,
        application.email,
        application.phone,
        application.license_number,
        application.years_of_experience,
        application.vehicle_type,
        application.vehicle_model,
        application.vehicle_plate_number,
        application.created_at.format("%Y-%m-%d %H:%M UTC"),
    )
}
