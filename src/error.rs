use reqwest::StatusCode;
use thiserror::Error;

/// Shown when the server rejected the request without saying why.
pub const SERVER_FALLBACK_REASON: &str = "Network response was not ok";

/// Shown for every failure that never produced a usable server answer.
pub const CONNECT_FALLBACK_REASON: &str = "Could not connect to the server. Please try again.";

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or(SERVER_FALLBACK_REASON))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode reply: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("reply has no `message` field")]
    MissingReply,

    #[error("invalid endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("no suggestion numbered {0}")]
    UnknownSuggestion(usize),
}

impl ChatError {
    /// The text that follows `Error: ` in the bot message rendered for this failure.
    pub fn reason(&self) -> &str {
        match self {
            ChatError::Server {
                message: Some(message),
                ..
            } => message,
            ChatError::Server { message: None, .. } => SERVER_FALLBACK_REASON,
            _ => CONNECT_FALLBACK_REASON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_the_reason() {
        let err = ChatError::Server {
            status: StatusCode::BAD_REQUEST,
            message: Some("bad input".to_string()),
        };
        assert_eq!(err.reason(), "bad input");
    }

    #[test]
    fn server_without_message_uses_server_fallback() {
        let err = ChatError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.reason(), SERVER_FALLBACK_REASON);
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn decode_failures_use_connect_fallback() {
        let err = ChatError::from(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err());
        assert_eq!(err.reason(), CONNECT_FALLBACK_REASON);
        assert_eq!(ChatError::MissingReply.reason(), CONNECT_FALLBACK_REASON);
    }
}
