use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::error::{ChatError, ChatResult};

/// The one outbound call the chat widget makes per submission.
#[async_trait(?Send)]
pub trait ChatTransport {
    async fn send(&self, message: &str) -> ChatResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Both the success and error bodies carry an optional `message`.
#[derive(Debug, Deserialize)]
struct ChatReply {
    message: Option<String>,
}

pub struct ChatClient {
    chat_url: Url,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(endpoint: &Url) -> ChatResult<Self> {
        let chat_url = chat_url(endpoint)?;
        debug!("Chat endpoint resolved to {}", chat_url);

        Ok(Self {
            chat_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    pub async fn post_message(&self, message: &str) -> ChatResult<String> {
        debug!("Sending message to {}: {}", self.chat_url, message);

        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Chat request failed with {}: {}", status, error_text);

            let message = serde_json::from_str::<ChatReply>(&error_text)
                .ok()
                .and_then(|reply| reply.message)
                .filter(|message| !message.is_empty());
            return Err(ChatError::Server { status, message });
        }

        let body = response.text().await?;
        debug!("Received reply: {}", body);

        let reply: ChatReply = serde_json::from_str(&body)?;
        reply.message.ok_or(ChatError::MissingReply)
    }
}

#[async_trait(?Send)]
impl ChatTransport for ChatClient {
    async fn send(&self, message: &str) -> ChatResult<String> {
        self.post_message(message).await
    }
}

/// `<endpoint>/chat`, keeping any path prefix the endpoint already has.
fn chat_url(endpoint: &Url) -> ChatResult<Url> {
    let mut base = endpoint.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("chat").map_err(|source| ChatError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })
}
