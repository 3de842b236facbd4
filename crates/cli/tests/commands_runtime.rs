use std::env;
use std::sync::{Mutex, OnceLock};

use rentgate_cli::commands::{drivers, CommandResult};
use serde_json::Value;

#[test]
fn decision_commands_fail_fast_without_session_config() {
    with_env(&[], || {
        let result = drivers::approve("app-1", true);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "drivers approve");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config");
    });
}

#[test]
fn driver_list_rejects_an_unknown_status_filter() {
    with_env(
        &[
            ("RENTGATE_SESSION_USER_ID", "owner-test"),
            ("RENTGATE_SESSION_API_TOKEN", "tok-test"),
        ],
        || {
            let result = drivers::list(Some("archived"));
            assert_eq!(result.exit_code, 2, "expected argument validation failure code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["command"], "drivers list");
            assert_eq!(payload["status"], "error");
            assert_eq!(payload["error_class"], "arguments");
            let message = payload["message"].as_str().unwrap_or("");
            assert!(message.contains("archived"));
        },
    );
}

#[test]
fn config_command_reports_validation_failure_without_session() {
    with_env(&[], || {
        let output = rentgate_cli::commands::config::run();
        assert!(output.contains("config validation failed"));
        assert!(output.contains("session"));
    });
}

#[test]
fn config_command_redacts_the_api_token_and_names_sources() {
    with_env(
        &[
            ("RENTGATE_SESSION_USER_ID", "owner-test"),
            ("RENTGATE_SESSION_API_TOKEN", "tok-very-secret"),
        ],
        || {
            let output = rentgate_cli::commands::config::run();
            assert!(output.contains("session.api_token = <redacted>"));
            assert!(!output.contains("tok-very-secret"));
            assert!(output.contains("(source: env (RENTGATE_SESSION_API_TOKEN))"));
            assert!(output.contains("gateway.base_url"));
            assert!(output.contains("(source: default)"));
        },
    );
}

#[test]
fn command_result_payloads_are_machine_readable() {
    let success = CommandResult::success("stats", "snapshot rendered");
    assert_eq!(success.exit_code, 0);
    let payload = parse_payload(&success.output);
    assert_eq!(payload["command"], "stats");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["error_class"], Value::Null);

    let failure = CommandResult::failure("stats", "gateway", "unreachable", 1);
    assert_eq!(failure.exit_code, 1);
    let payload = parse_payload(&failure.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "gateway");
}

fn parse_payload(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|error| {
        panic!("command output should be JSON, got `{raw}`: {error}");
    })
}

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const MANAGED_VARS: &[&str] = &[
    "RENTGATE_GATEWAY_BASE_URL",
    "RENTGATE_GATEWAY_TIMEOUT_SECS",
    "RENTGATE_SESSION_USER_ID",
    "RENTGATE_SESSION_DISPLAY_NAME",
    "RENTGATE_SESSION_API_TOKEN",
    "RENTGATE_DASHBOARD_SUMMARY_LIMIT",
    "RENTGATE_LOGGING_LEVEL",
    "RENTGATE_LOG_LEVEL",
    "RENTGATE_LOGGING_FORMAT",
    "RENTGATE_LOG_FORMAT",
];

fn with_env(vars: &[(&str, &str)], body: impl FnOnce()) {
    let lock = ENV_LOCK.get_or_init(|| Mutex::new(()));
    let _guard = match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    for var in MANAGED_VARS {
        env::remove_var(var);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    body();

    for var in MANAGED_VARS {
        env::remove_var(var);
    }
}
