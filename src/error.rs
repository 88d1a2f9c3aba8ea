// Error taxonomy for catalog calls. Transport failures and absent results
// are kept apart here so logs can tell them apart; the controller treats
// every variant the same way (log, leave the view alone).

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No usable {expected} in response")]
    AbsentResult { expected: &'static str },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl ApiError {
    pub fn absent(expected: &'static str) -> Self {
        Self::AbsentResult { expected }
    }

    pub fn invalid(msg: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            message: msg.to_string(),
        }
    }

    /// Stable code used as a structured log field.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "TRANSPORT",
            ApiError::Status { .. } => "STATUS",
            ApiError::AbsentResult { .. } => "ABSENT_RESULT",
            ApiError::InvalidInput { .. } => "INVALID_INPUT",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 404,
            body: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "Server responded 404: Not Found");
        assert_eq!(err.error_code(), "STATUS");
    }

    #[test]
    fn test_absent_result_display() {
        let err = ApiError::absent("cupcake");
        assert_eq!(err.to_string(), "No usable cupcake in response");
        assert_eq!(err.error_code(), "ABSENT_RESULT");
    }
}
