use async_openai::{
    Client,
    config::OpenAIConfig,
    types::responses::{
        CreateResponse, CreateResponseArgs, InputMessage, InputRole, OutputItem,
        OutputMessageContent,
    },
};
use log::debug;

use crate::error::{QuizError, Result};

/// `prompt` as the only message, sent with the system role.
fn build_request(model: &str, max_output_tokens: u32, prompt: &str) -> Result<CreateResponse> {
    CreateResponseArgs::default()
        .model(model)
        .max_output_tokens(max_output_tokens)
        .input(vec![InputMessage {
            role: InputRole::System,
            content: vec![prompt.into()],
            status: None,
        }])
        .build()
        .map_err(|err| QuizError::Transport(format!("invalid request: {err}")))
}

/// Sends `prompt` and returns the first non-empty text the model produced.
pub async fn request_single_text_response(
    client: &Client<OpenAIConfig>,
    model: &str,
    max_output_tokens: u32,
    prompt: &str,
) -> Result<String> {
    let request = build_request(model, max_output_tokens, prompt)?;

    let response = client
        .responses()
        .create(request)
        .await
        .map_err(|err| QuizError::Transport(err.to_string()))?;

    for item in response.output {
        if let OutputItem::Message(message) = item {
            for content in message.content {
                if let OutputMessageContent::OutputText(text) = content {
                    let trimmed = text.text.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    debug!("Completion: {trimmed:?}");
                    return Ok(trimmed.to_string());
                }
            }
        }
    }

    Err(QuizError::Transport(
        "no text output returned from model".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL};
    use crate::llm::build_prompt;

    #[test]
    fn request_has_single_system_message_and_token_budget() {
        let prompt = build_prompt("History");
        let request = build_request(DEFAULT_MODEL, DEFAULT_MAX_OUTPUT_TOKENS, &prompt).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["max_output_tokens"], DEFAULT_MAX_OUTPUT_TOKENS);

        let input = json["input"].as_array().expect("input should be a list of messages");
        assert_eq!(input.len(), 1);
        assert_eq!(input[0]["role"], "system");
        assert!(input[0].to_string().contains("question about History with 4 options"));
    }
}
