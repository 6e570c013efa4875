use log::debug;

use crate::error::Result;
use crate::question::QuizQuestion;

use super::client::CompletionClient;

const PROMPT_TEMPLATE: &str = r#"Generate a distinct multiple-choice question about {topic} with 4 options.
Format the response as a JSON object with the following structure:
{
  "Question": "string",
  "Options": ["option1", "option2", "option3", "option4"],
  "CorrectAnswer": {"Number": "string", "Answer": "string"}
}
"Number" is the position of the correct option, from "1" to "4", and "Answer" repeats that option's text.
Ensure that the options are plain strings without any prefixes like "a.", "b.", "c.", "d." or "1.", "2.", "3.", "4.".
Respond with the JSON object only."#;

pub fn build_prompt(topic: &str) -> String {
    PROMPT_TEMPLATE.replace("{topic}", topic)
}

/// One round-trip per call; nothing is cached or deduplicated.
pub async fn fetch_question<C: CompletionClient>(client: &C, topic: &str) -> Result<QuizQuestion> {
    let prompt = build_prompt(topic);
    debug!("Requesting question about {topic:?}");

    let raw = client.complete(&prompt).await?;
    QuizQuestion::from_completion(&raw)
}
