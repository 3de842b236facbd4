use std::sync::Arc;

use anyhow::{Context, Result};
use dialoguer::{Input, Select};

use rentgate_core::domain::driver::DriverApplicationId;
use rentgate_core::domain::vehicle::VehicleApplicationId;
use rentgate_core::{PricingDraft, RandomPasswordProvisioner};
use rentgate_dashboard::{ActiveTab, DashboardShell};
use rentgate_gateway::HttpGateway;

use crate::commands::{block_on, CommandResult, ReviewContext};
use crate::terminal::TerminalInteraction;

type Shell = DashboardShell<HttpGateway, TerminalInteraction, RandomPasswordProvisioner>;

/// Interactive dashboard loop: statistics header, combined summary, and
/// per-tab review menus, mirroring the three-tab page layout.
pub fn run() -> CommandResult {
    let command = "review";
    let context = match ReviewContext::load(command) {
        Ok(context) => context,
        Err(result) => return result,
    };

    let interaction = Arc::new(TerminalInteraction::default());
    let summary_limit = context.config.dashboard.summary_limit;
    let outcome = block_on(command, async move {
        let mut shell = DashboardShell::new(
            context.gateway,
            interaction,
            RandomPasswordProvisioner,
            context.session,
            &context.config.dashboard,
        );
        shell.mount().await;

        loop {
            print_header(&shell, summary_limit);
            let choice = Select::new()
                .with_prompt("Dashboard")
                .items(&["Driver applications", "Vehicle applications", "Reload statistics", "Quit"])
                .default(0)
                .interact()
                .context("dashboard menu closed unexpectedly")?;
            match choice {
                0 => {
                    shell.view_all_drivers().await;
                    driver_tab(&mut shell).await?;
                }
                1 => {
                    shell.view_all_vehicles().await;
                    vehicle_tab(&mut shell).await?;
                }
                2 => shell.reload_statistics().await,
                _ => break,
            }
            shell.select_tab(ActiveTab::All).await;
        }
        Ok::<(), anyhow::Error>(())
    });

    match outcome {
        Ok(Ok(())) => CommandResult::plain(0, "review session ended"),
        Ok(Err(error)) => {
            CommandResult::failure(command, "terminal", format!("{error:#}"), 1)
        }
        Err(result) => result,
    }
}

fn print_header(shell: &Shell, summary_limit: usize) {
    match shell.statistics().snapshot() {
        Some(statistics) => println!(
            "\npending: {} driver(s), {} vehicle(s), {} total | approvals by this account: {}",
            statistics.pending.drivers,
            statistics.pending.vehicles,
            statistics.pending.total,
            statistics.my_approvals.total,
        ),
        None => println!("\napproval statistics are unavailable"),
    }

    let summary = shell.summary();
    println!("showing up to {summary_limit} of each queue:");
    for application in summary.drivers {
        println!("  [driver]  {}  {}", application.id.as_str(), application.full_name);
    }
    if summary.driver_total > summary.drivers.len() {
        println!(
            "  ... and {} more driver application(s)",
            summary.driver_total - summary.drivers.len()
        );
    }
    for application in summary.vehicles {
        println!("  [vehicle] {}  {}", application.id.as_str(), application.display_name());
    }
    if summary.vehicle_total > summary.vehicles.len() {
        println!(
            "  ... and {} more vehicle application(s)",
            summary.vehicle_total - summary.vehicles.len()
        );
    }
}

async fn driver_tab(shell: &mut Shell) -> Result<()> {
    loop {
        let flow = shell.drivers();
        if let Some(empty) = flow.empty_state() {
            println!("{empty}");
            return Ok(());
        }
        if let Some(error) = flow.last_error() {
            println!("{error}");
            return Ok(());
        }

        let mut items: Vec<String> = flow
            .applications()
            .iter()
            .map(|application| {
                format!(
                    "{}  {}  {} {}",
                    application.id.as_str(),
                    application.full_name,
                    application.vehicle_type,
                    application.vehicle_model,
                )
            })
            .collect();
        items.push("Back".to_string());

        let choice = Select::new()
            .with_prompt("Driver applications")
            .items(&items)
            .interact()
            .context("driver list menu closed unexpectedly")?;
        if choice == items.len() - 1 {
            return Ok(());
        }
        let id = DriverApplicationId(
            shell.drivers().applications()[choice].id.as_str().to_string(),
        );

        let action = Select::new()
            .with_prompt("Action")
            .items(&["View details", "Approve", "Reject", "Back"])
            .interact()
            .context("driver action menu closed unexpectedly")?;
        match action {
            0 => {
                if let Some(application) = shell.drivers_mut().open_detail(&id) {
                    println!(
                        "{} | {} | {} | license {} | {} year(s) experience",
                        application.full_name,
                        application.email,
                        application.phone,
                        application.license_number,
                        application.years_of_experience,
                    );
                }
                shell.drivers_mut().close_detail();
            }
            1 => {
                shell.drivers_mut().approve(&id).await;
            }
            2 => {
                shell.drivers_mut().reject(&id).await;
            }
            _ => {}
        }
    }
}

async fn vehicle_tab(shell: &mut Shell) -> Result<()> {
    loop {
        let flow = shell.vehicles();
        if let Some(empty) = flow.empty_state() {
            println!("{empty}");
            return Ok(());
        }
        if let Some(error) = flow.last_error() {
            println!("{error}");
            return Ok(());
        }

        let mut items: Vec<String> = flow
            .applications()
            .iter()
            .map(|application| {
                format!(
                    "{}  {}  {}",
                    application.id.as_str(),
                    application.display_name(),
                    application.license_plate,
                )
            })
            .collect();
        items.push("Back".to_string());

        let choice = Select::new()
            .with_prompt("Vehicle applications")
            .items(&items)
            .interact()
            .context("vehicle list menu closed unexpectedly")?;
        if choice == items.len() - 1 {
            return Ok(());
        }
        let id = VehicleApplicationId(
            shell.vehicles().applications()[choice].id.as_str().to_string(),
        );

        let action = Select::new()
            .with_prompt("Action")
            .items(&["View details", "Approve & set pricing", "Reject", "Back"])
            .interact()
            .context("vehicle action menu closed unexpectedly")?;
        match action {
            0 => {
                if let Some(application) = shell.vehicles_mut().open_detail(&id) {
                    println!(
                        "{} | {} | {} seat(s) | {} | owner {} <{}>",
                        application.display_name(),
                        application.license_plate,
                        application.seating_capacity,
                        application.location.city,
                        application.owner.full_name(),
                        application.owner.email,
                    );
                }
                shell.vehicles_mut().close_detail();
            }
            1 => {
                shell.vehicles_mut().begin_approval(&id);
                let draft = capture_pricing_draft()?;
                shell.vehicles_mut().update_draft(draft);
                shell.vehicles_mut().submit_pricing().await;
                // A validation failure leaves pricing open; back out so the
                // menu does not strand the reviewer mid-protocol.
                shell.vehicles_mut().cancel_pricing();
            }
            2 => {
                shell.vehicles_mut().reject(&id, None).await;
            }
            _ => {}
        }
    }
}

fn capture_pricing_draft() -> Result<PricingDraft> {
    let field = |prompt: &str| -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("input for `{prompt}` closed unexpectedly"))
    };

    Ok(PricingDraft {
        daily_rate: field("Daily rate (required)")?,
        weekly_rate: field("Weekly rate (optional)")?,
        monthly_rate: field("Monthly rate (optional)")?,
        security_deposit: field("Security deposit (optional)")?,
        processing_fee: field("Processing fee (optional)")?,
    })
}
