use std::env;

use url::Url;

use crate::error::{ChatError, ChatResult};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

pub const DEFAULT_GREETING: &str = "Hello! How can I help you with safety training today?";

pub const DEFAULT_SUGGESTIONS: &[&str] = &[
    "What should I do in case of a fire?",
    "Where can I find the safety manual?",
    "How do I report a hazard?",
    "What PPE do I need for handling chemicals?",
];

pub const ENDPOINT_VAR: &str = "CHAT_ENDPOINT";
pub const GREETING_VAR: &str = "CHAT_GREETING";

/// Settings the chat widget reads once at startup.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub endpoint: Url,
    pub greeting: String,
    pub suggestions: Vec<String>,
}

/// Values given on the command line. Anything left `None` falls back to the
/// environment, then to the built-in default.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub greeting: Option<String>,
    pub suggestions: Vec<String>,
}

impl ChatConfig {
    pub fn load(overrides: ConfigOverrides) -> ChatResult<Self> {
        Self::resolve(overrides, |key| env::var(key).ok())
    }

    pub fn resolve<F>(overrides: ConfigOverrides, lookup: F) -> ChatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = overrides
            .endpoint
            .or_else(|| lookup(ENDPOINT_VAR))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = parse_endpoint(&endpoint)?;

        // An empty greeting attribute behaves like a missing one.
        let greeting = overrides
            .greeting
            .filter(non_blank)
            .or_else(|| lookup(GREETING_VAR).filter(non_blank))
            .unwrap_or_else(|| DEFAULT_GREETING.to_string());

        let suggestions = if overrides.suggestions.is_empty() {
            DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
        } else {
            overrides.suggestions
        };

        Ok(Self {
            endpoint,
            greeting,
            suggestions,
        })
    }
}

fn non_blank(value: &String) -> bool {
    !value.trim().is_empty()
}

fn parse_endpoint(endpoint: &str) -> ChatResult<Url> {
    Url::parse(endpoint.trim()).map_err(|source| ChatError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })
}
