use thiserror::Error;

/// Failure taxonomy for gateway calls, mirrored by how the dashboard surfaces
/// them: `Api` carries the backend's own message and is shown verbatim;
/// everything else collapses to the caller's generic "failed to ..." text.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("gateway returned unexpected status {status}")]
    UnexpectedStatus { status: u16 },
    #[error("could not decode gateway response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("gateway unreachable: {0}")]
    Unreachable(String),
    #[error("{message}")]
    Api { message: String },
}

impl GatewayError {
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api { message: message.into() }
    }

    /// The text to show the reviewer: the backend's message when it sent one,
    /// otherwise the caller-supplied fallback.
    pub fn surface_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_business_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::GatewayError;

    #[test]
    fn api_errors_surface_the_backend_message_verbatim() {
        let error = GatewayError::api("Already reviewed");
        assert_eq!(error.surface_message("failed to reject vehicle"), "Already reviewed");
        assert!(error.is_business_rejection());
    }

    #[test]
    fn transport_class_errors_surface_the_generic_fallback() {
        let error = GatewayError::Unreachable("connection refused".to_string());
        assert_eq!(
            error.surface_message("failed to approve driver"),
            "failed to approve driver"
        );
        assert!(!error.is_business_rejection());
    }
}
