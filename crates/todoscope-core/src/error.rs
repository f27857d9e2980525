/// Failure of a remote task operation. The display text is what the error
/// banner shows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Bulk read failed.
    #[error("{message}")]
    Fetch { message: String },

    /// Create failed.
    #[error("{message}")]
    Append { message: String },
}

const FETCH_FAILED: &str = "Failed to fetch todos";
const APPEND_FAILED: &str = "Failed to add todo";

impl ClientError {
    pub fn message(&self) -> &str {
        match self {
            Self::Fetch { message } | Self::Append { message } => message,
        }
    }

    pub fn fetch_status(status: u16) -> Self {
        Self::Fetch {
            message: format!("{FETCH_FAILED} (HTTP {status})"),
        }
    }

    pub fn fetch_transport(detail: impl std::fmt::Display) -> Self {
        Self::Fetch {
            message: format!("{FETCH_FAILED}: {detail}"),
        }
    }

    pub fn append_status(status: u16) -> Self {
        Self::Append {
            message: format!("{APPEND_FAILED} (HTTP {status})"),
        }
    }

    pub fn append_transport(detail: impl std::fmt::Display) -> Self {
        Self::Append {
            message: format!("{APPEND_FAILED}: {detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_banner_message() {
        let err = ClientError::fetch_status(503);
        assert_eq!(err.to_string(), "Failed to fetch todos (HTTP 503)");
        assert_eq!(err.message(), err.to_string());
    }

    #[test]
    fn append_transport_keeps_detail() {
        let err = ClientError::append_transport("connection refused");
        assert!(matches!(err, ClientError::Append { .. }));
        assert_eq!(err.message(), "Failed to add todo: connection refused");
    }
}
