pub mod config;
pub mod doctor;
pub mod drivers;
pub mod profile;
pub mod review;
pub mod stats;
pub mod vehicles;

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use rentgate_core::config::{AppConfig, LoadOptions};
use rentgate_core::ReviewerSession;
use rentgate_gateway::HttpGateway;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn plain(exit_code: u8, output: impl Into<String>) -> Self {
        Self { exit_code, output: output.into() }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Shared setup for every command that talks to the gateway: validated
/// config, one HTTP client, the injected reviewer identity, and a
/// correlation id tying the command's log lines together.
pub(crate) struct ReviewContext {
    pub config: AppConfig,
    pub gateway: Arc<HttpGateway>,
    pub session: ReviewerSession,
    pub correlation_id: String,
}

impl ReviewContext {
    pub(crate) fn load(command: &str) -> Result<Self, CommandResult> {
        let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
            CommandResult::failure(command, "config", error.to_string(), 2)
        })?;

        let gateway = HttpGateway::new(&config.gateway, &config.session).map_err(|error| {
            CommandResult::failure(command, "gateway_client", error.to_string(), 2)
        })?;

        let display_name = if config.session.display_name.is_empty() {
            config.session.user_id.clone()
        } else {
            config.session.display_name.clone()
        };
        let session = ReviewerSession::new(config.session.user_id.clone(), display_name);

        let correlation_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(
            command,
            correlation_id = %correlation_id,
            reviewer = %session.user_id,
            "review context ready"
        );

        Ok(Self { config, gateway: Arc::new(gateway), session, correlation_id })
    }
}

/// Commands are synchronous at the clap boundary; gateway work runs on a
/// per-command current-thread runtime.
pub(crate) fn block_on<T>(
    command: &str,
    future: impl Future<Output = T>,
) -> Result<T, CommandResult> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| {
            CommandResult::failure(
                command,
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                2,
            )
        })?;
    Ok(runtime.block_on(future))
}
