use base64::Engine as _;
use dialoguer::Password;

use rentgate_core::domain::profile::{BusinessOwnerProfile, PasswordChange, ProfileUpdate};
use rentgate_dashboard::Interaction;
use rentgate_gateway::ProfileGateway;

use crate::commands::{block_on, CommandResult, ReviewContext};
use crate::terminal::TerminalInteraction;

pub fn show() -> CommandResult {
    let context = match ReviewContext::load("profile show") {
        Ok(context) => context,
        Err(result) => return result,
    };

    let user_id = context.session.user_id.clone();
    let fetched = block_on("profile show", async { context.gateway.profile(&user_id).await });
    match fetched {
        Ok(Ok(profile)) => CommandResult::plain(0, render_profile(&profile)),
        Ok(Err(error)) => CommandResult::failure("profile show", "gateway", error.to_string(), 1),
        Err(result) => result,
    }
}

pub fn update(
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    company_name: Option<String>,
) -> CommandResult {
    let command = "profile update";
    let update = ProfileUpdate { first_name, last_name, phone, company_name };
    if update.is_empty() {
        return CommandResult::failure(
            command,
            "arguments",
            "nothing to update; pass at least one of --first-name, --last-name, --phone, --company-name",
            2,
        );
    }

    let context = match ReviewContext::load(command) {
        Ok(context) => context,
        Err(result) => return result,
    };

    let user_id = context.session.user_id.clone();
    let updated =
        block_on(command, async { context.gateway.update_profile(&user_id, &update).await });
    match updated {
        Ok(Ok(profile)) => CommandResult::plain(
            0,
            format!("profile updated\n{}", render_profile(&profile)),
        ),
        Ok(Err(error)) => CommandResult::failure(command, "gateway", error.to_string(), 1),
        Err(result) => result,
    }
}

pub fn change_password() -> CommandResult {
    let command = "profile change-password";
    let context = match ReviewContext::load(command) {
        Ok(context) => context,
        Err(result) => return result,
    };

    let current_password = match read_password("Current password") {
        Some(value) => value,
        None => {
            return CommandResult::failure(command, "input", "no password entered", 2);
        }
    };
    let new_password = match read_password("New password") {
        Some(value) => value,
        None => {
            return CommandResult::failure(command, "input", "no password entered", 2);
        }
    };

    let change = PasswordChange { current_password, new_password };
    let user_id = context.session.user_id.clone();
    let changed =
        block_on(command, async { context.gateway.change_password(&user_id, &change).await });
    match changed {
        Ok(Ok(message)) => CommandResult::success(
            command,
            message.unwrap_or_else(|| "password updated".to_string()),
        ),
        Ok(Err(error)) => CommandResult::failure(command, "gateway", error.to_string(), 1),
        Err(result) => result,
    }
}

pub fn upload_image(path: &str) -> CommandResult {
    let command = "profile upload-image";
    let context = match ReviewContext::load(command) {
        Ok(context) => context,
        Err(result) => return result,
    };

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            return CommandResult::failure(
                command,
                "input",
                format!("could not read `{path}`: {error}"),
                2,
            );
        }
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

    let user_id = context.session.user_id.clone();
    let uploaded = block_on(command, async {
        context.gateway.upload_profile_image(&user_id, &encoded).await
    });
    match uploaded {
        Ok(Ok(message)) => CommandResult::success(
            command,
            message.unwrap_or_else(|| "profile image updated".to_string()),
        ),
        Ok(Err(error)) => CommandResult::failure(command, "gateway", error.to_string(), 1),
        Err(result) => result,
    }
}

pub fn delete(assume_yes: bool) -> CommandResult {
    let command = "profile delete";
    let context = match ReviewContext::load(command) {
        Ok(context) => context,
        Err(result) => return result,
    };

    let interaction = TerminalInteraction::new(assume_yes);
    let user_id = context.session.user_id.clone();
    let deleted = block_on(command, async {
        if !interaction
            .confirm("Delete this business-owner account? This cannot be undone.")
            .await
        {
            return None;
        }
        Some(context.gateway.delete_account(&user_id).await)
    });
    match deleted {
        Ok(None) => CommandResult::success(command, "cancelled at the confirmation prompt"),
        Ok(Some(Ok(message))) => CommandResult::success(
            command,
            message.unwrap_or_else(|| "account deleted".to_string()),
        ),
        Ok(Some(Err(error))) => CommandResult::failure(command, "gateway", error.to_string(), 1),
        Err(result) => result,
    }
}

fn read_password(prompt: &str) -> Option<String> {
    let value = Password::new().with_prompt(prompt).interact().ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn render_profile(profile: &BusinessOwnerProfile) -> String {
    format!(
        "business owner {}\n\
         - name:    {} {}\n\
         - email:   {}\n\
         - phone:   {}\n\
         - company: {}\n\
         - avatar:  {}\n\
         - since:   {}",
        profile.id,
        profile.first_name,
        profile.last_name,
        profile.email,
        profile.phone,
        profile.company_name,
        profile.profile_image.as_deref().unwrap_or("<none>"),
        profile.created_at.format("%Y-%m-%d"),
    )
}
