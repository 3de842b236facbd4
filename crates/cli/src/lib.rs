pub mod commands;
pub mod terminal;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use rentgate_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "rentgate",
    about = "Rentgate marketplace review CLI",
    long_about = "Review pending driver and vehicle applications, inspect approval statistics, and manage the business-owner profile against the marketplace gateway.",
    after_help = "Examples:\n  rentgate stats\n  rentgate drivers list\n  rentgate vehicles approve veh-31 --daily-rate 45\n  rentgate review"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Show the approval statistics snapshot")]
    Stats {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Review driver onboarding applications")]
    Drivers {
        #[command(subcommand)]
        action: DriverAction,
    },
    #[command(about = "Review vehicle listing applications")]
    Vehicles {
        #[command(subcommand)]
        action: VehicleAction,
    },
    #[command(about = "Run the interactive review dashboard")]
    Review,
    #[command(about = "Manage the signed-in business-owner profile")]
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and gateway reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum DriverAction {
    #[command(about = "List driver applications (pending by default)")]
    List {
        #[arg(long, help = "Filter by status: pending|approved|rejected")]
        status: Option<String>,
    },
    #[command(about = "Show one driver application in full")]
    Show { id: String },
    #[command(about = "Approve a driver application and provision a one-time password")]
    Approve {
        id: String,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Reject a driver application")]
    Reject {
        id: String,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum VehicleAction {
    #[command(about = "List pending vehicle applications")]
    List,
    #[command(about = "Show one vehicle application in full")]
    Show { id: String },
    #[command(about = "Approve a vehicle application with rental pricing")]
    Approve {
        id: String,
        #[arg(long, help = "Required daily rental rate")]
        daily_rate: Option<String>,
        #[arg(long)]
        weekly_rate: Option<String>,
        #[arg(long)]
        monthly_rate: Option<String>,
        #[arg(long)]
        security_deposit: Option<String>,
        #[arg(long)]
        processing_fee: Option<String>,
    },
    #[command(about = "Reject a vehicle application with a reason")]
    Reject {
        id: String,
        #[arg(long, help = "Rejection reason; prompted for when omitted")]
        reason: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileAction {
    #[command(about = "Show the business-owner profile")]
    Show,
    #[command(about = "Update profile fields")]
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company_name: Option<String>,
    },
    #[command(about = "Change the account password")]
    ChangePassword,
    #[command(about = "Upload a new profile image")]
    UploadImage {
        #[arg(help = "Path to the image file")]
        path: String,
    },
    #[command(about = "Delete the business-owner account")]
    Delete {
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let builder = tracing_subscriber::fmt().with_target(false).with_max_level(log_level);
    let result = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // A second init (e.g. under test) is harmless.
    let _ = result;
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Stats { json } => commands::stats::run(json),
        Command::Drivers { action } => match action {
            DriverAction::List { status } => commands::drivers::list(status.as_deref()),
            DriverAction::Show { id } => commands::drivers::show(&id),
            DriverAction::Approve { id, yes } => commands::drivers::approve(&id, yes),
            DriverAction::Reject { id, yes } => commands::drivers::reject(&id, yes),
        },
        Command::Vehicles { action } => match action {
            VehicleAction::List => commands::vehicles::list(),
            VehicleAction::Show { id } => commands::vehicles::show(&id),
            VehicleAction::Approve {
                id,
                daily_rate,
                weekly_rate,
                monthly_rate,
                security_deposit,
                processing_fee,
            } => commands::vehicles::approve(
                &id,
                commands::vehicles::PricingArgs {
                    daily_rate,
                    weekly_rate,
                    monthly_rate,
                    security_deposit,
                    processing_fee,
                },
            ),
            VehicleAction::Reject { id, reason } => commands::vehicles::reject(&id, reason),
        },
        Command::Review => commands::review::run(),
        Command::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(),
            ProfileAction::Update { first_name, last_name, phone, company_name } => {
                commands::profile::update(first_name, last_name, phone, company_name)
            }
            ProfileAction::ChangePassword => commands::profile::change_password(),
            ProfileAction::UploadImage { path } => commands::profile::upload_image(&path),
            ProfileAction::Delete { yes } => commands::profile::delete(yes),
        },
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
