use std::sync::Arc;

use rentgate_core::domain::vehicle::{VehicleApplication, VehicleApplicationId};
use rentgate_core::PricingDraft;
use rentgate_dashboard::{DecisionOutcome, VehicleReviewFlow};
use rentgate_gateway::ApprovalGateway;

use crate::commands::{block_on, CommandResult, ReviewContext};
use crate::terminal::TerminalInteraction;

#[derive(Debug, Default)]
pub struct PricingArgs {
    pub daily_rate: Option<String>,
    pub weekly_rate: Option<String>,
    pub monthly_rate: Option<String>,
    pub security_deposit: Option<String>,
    pub processing_fee: Option<String>,
}

impl PricingArgs {
    fn into_draft(self) -> PricingDraft {
        PricingDraft {
            daily_rate: self.daily_rate.unwrap_or_default(),
            weekly_rate: self.weekly_rate.unwrap_or_default(),
            monthly_rate: self.monthly_rate.unwrap_or_default(),
            security_deposit: self.security_deposit.unwrap_or_default(),
            processing_fee: self.processing_fee.unwrap_or_default(),
        }
    }
}

pub fn list() -> CommandResult {
    let context = match ReviewContext::load("vehicles list") {
        Ok(context) => context,
        Err(result) => return result,
    };

    let fetched = block_on("vehicles list", async { context.gateway.pending_vehicles().await });
    let applications = match fetched {
        Ok(Ok(applications)) => applications,
        Ok(Err(error)) => {
            return CommandResult::failure("vehicles list", "gateway", error.to_string(), 1)
        }
        Err(result) => return result,
    };

    if applications.is_empty() {
        return CommandResult::plain(0, "All Caught Up!");
    }

    let mut lines = vec![format!("{} pending vehicle application(s):", applications.len())];
    for application in &applications {
        lines.push(format!(
            "- {}  {}  {}  {} seat(s)  {}  owner {}",
            application.id.as_str(),
            application.display_name(),
            application.license_plate,
            application.seating_capacity,
            application.location.city,
            application.owner.full_name(),
        ));
    }
    CommandResult::plain(0, lines.join("\n"))
}

pub fn show(id: &str) -> CommandResult {
    let context = match ReviewContext::load("vehicles show") {
        Ok(context) => context,
        Err(result) => return result,
    };

    let fetched = block_on("vehicles show", async { context.gateway.pending_vehicles().await });
    match fetched {
        Ok(Ok(applications)) => {
            match applications.iter().find(|application| application.id.as_str() == id) {
                Some(application) => CommandResult::plain(0, render_detail(application)),
                None => CommandResult::failure(
                    "vehicles show",
                    "gateway",
                    format!("no pending vehicle application with id `{id}`"),
                    1,
                ),
            }
        }
        Ok(Err(error)) => CommandResult::failure("vehicles show", "gateway", error.to_string(), 1),
        Err(result) => result,
    }
}

pub fn approve(id: &str, pricing: PricingArgs) -> CommandResult {
    let command = "vehicles approve";
    let context = match ReviewContext::load(command) {
        Ok(context) => context,
        Err(result) => return result,
    };
    tracing::info!(
        correlation_id = %context.correlation_id,
        application = id,
        "submitting vehicle approval with pricing"
    );

    let interaction = Arc::new(TerminalInteraction::default());
    let outcome = block_on(command, async {
        let mut flow = VehicleReviewFlow::new(context.gateway, interaction, context.session);
        flow.refresh().await;
        if let Some(error) = flow.last_error() {
            return Err(error.to_string());
        }

        let id = VehicleApplicationId(id.to_string());
        flow.begin_approval(&id);
        flow.update_draft(pricing.into_draft());
        let outcome = flow.submit_pricing().await;
        Ok((outcome, flow.applications().len()))
    });

    match outcome {
        Ok(Ok((DecisionOutcome::Completed, remaining))) => CommandResult::success(
            command,
            format!("vehicle approved; {remaining} pending application(s) remaining"),
        ),
        Ok(Ok((DecisionOutcome::Invalid, _))) => CommandResult::failure(
            command,
            "validation",
            "pricing was rejected client-side; no request was sent",
            1,
        ),
        Ok(Ok((DecisionOutcome::AlreadyProcessing, _))) => CommandResult::failure(
            command,
            "processing_guard",
            "a request for this application is already in flight",
            1,
        ),
        Ok(Ok((_, _))) => CommandResult::failure(
            command,
            "gateway",
            "the approval was not accepted; see the message above",
            1,
        ),
        Ok(Err(message)) => CommandResult::failure(command, "gateway", message, 1),
        Err(result) => result,
    }
}

pub fn reject(id: &str, reason: Option<String>) -> CommandResult {
    let command = "vehicles reject";
    let context = match ReviewContext::load(command) {
        Ok(context) => context,
        Err(result) => return result,
    };
    tracing::info!(
        correlation_id = %context.correlation_id,
        application = id,
        "submitting vehicle rejection"
    );

    let interaction = Arc::new(TerminalInteraction::default());
    let outcome = block_on(command, async {
        let mut flow = VehicleReviewFlow::new(context.gateway, interaction, context.session);
        flow.refresh().await;
        if let Some(error) = flow.last_error() {
            return Err(error.to_string());
        }

        let id = VehicleApplicationId(id.to_string());
        let outcome = flow.reject(&id, reason).await;
        Ok((outcome, flow.applications().len()))
    });

    match outcome {
        Ok(Ok((DecisionOutcome::Completed, remaining))) => CommandResult::success(
            command,
            format!("vehicle rejected; {remaining} pending application(s) remaining"),
        ),
        Ok(Ok((DecisionOutcome::Invalid, _))) => CommandResult::failure(
            command,
            "validation",
            "a rejection reason is required; no request was sent",
            1,
        ),
        Ok(Ok((DecisionOutcome::AlreadyProcessing, _))) => CommandResult::failure(
            command,
            "processing_guard",
            "a request for this application is already in flight",
            1,
        ),
        Ok(Ok((_, _))) => CommandResult::failure(
            command,
            "gateway",
            "the rejection was not accepted; see the message above",
            1,
        ),
        Ok(Err(message)) => CommandResult::failure(command, "gateway", message, 1),
        Err(result) => result,
    }
}

fn render_detail(application: &VehicleApplication) -> String {
    let features = if application.features.is_empty() {
        "none listed".to_string()
    } else {
        application.features.join(", ")
    };
    format!(
        "vehicle application {}\n\
         - vehicle:       {}\n\
         - plate:         {}\n\
         - type:          {} ({} seats, {})\n\
         - location:      {}\n\
         - description:   {}\n\
         - features:      {}\n\
         - images:        {}\n\
         - owner:         {} <{}> {}\n\
         - owner since:   {}\n\
         - submitted:     {}\n\
         - last updated:  {}",
        application.id.as_str(),
        application.display_name(),
        application.license_plate,
        application.vehicle_type,
        application.seating_capacity,
        application.fuel_type,
        application.location.city,
        application.description,
        features,
        application.images.len(),
        application.owner.full_name(),
        application.owner.email,
        application.owner.phone,
        application.owner.created_at.format("%Y-%m-%d"),
        application.created_at.format("%Y-%m-%d %H:%M UTC"),
        application.updated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}
