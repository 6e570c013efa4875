use async_openai::{Client, config::OpenAIConfig};

use crate::config::Settings;
use crate::error::Result;

use super::response::request_single_text_response;

/// Something that can turn a prompt into the model's text reply.
///
/// The quiz loop only sees this trait, so tests can hand it canned replies
/// instead of going over the network.
#[allow(async_fn_in_trait)]
pub trait CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct OpenAiCompletion {
    client: Client<OpenAIConfig>,
    model: String,
    max_output_tokens: u32,
}

impl OpenAiCompletion {
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionClient for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        request_single_text_response(&self.client, &self.model, self.max_output_tokens, prompt)
            .await
    }
}

pub fn initialize_client(settings: &Settings) -> OpenAiCompletion {
    let config = OpenAIConfig::new().with_api_key(settings.api_key.as_str());

    OpenAiCompletion {
        client: Client::with_config(config),
        model: settings.model.clone(),
        max_output_tokens: settings.max_output_tokens,
    }
}
