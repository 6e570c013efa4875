use log::warn;
use serde::Deserialize;

use crate::error::{QuizError, Result};

pub const OPTION_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: CorrectAnswer,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CorrectAnswer {
    pub number: String,
    pub answer: String,
}

impl QuizQuestion {
    /// Parses the model's reply. Either the whole question is valid or an
    /// error comes back; nothing half-filled escapes.
    pub fn from_completion(raw: &str) -> Result<Self> {
        let body = strip_code_fence(raw);
        let parsed: QuizQuestion = serde_json::from_str(body)
            .map_err(|err| QuizError::MalformedResponse(err.to_string()))?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> Result<()> {
        if self.options.len() != OPTION_COUNT {
            return Err(QuizError::MalformedResponse(format!(
                "expected {OPTION_COUNT} options, got {}",
                self.options.len()
            )));
        }

        let index = self.correct_index().ok_or_else(|| {
            QuizError::MalformedResponse(format!(
                "correct answer number {:?} is not between 1 and {OPTION_COUNT}",
                self.correct_answer.number
            ))
        })?;

        if self.options[index].trim() != self.correct_answer.answer.trim() {
            warn!(
                "Correct answer {:?} does not match option {} ({:?})",
                self.correct_answer.answer,
                index + 1,
                self.options[index]
            );
        }

        Ok(())
    }

    fn correct_index(&self) -> Option<usize> {
        match self.correct_answer.number.as_str() {
            "1" => Some(0),
            "2" => Some(1),
            "3" => Some(2),
            "4" => Some(3),
            _ => None,
        }
    }

    /// Plain string comparison against the expected number; out-of-range or
    /// non-numeric input simply doesn't match.
    pub fn is_correct(&self, input: &str) -> bool {
        input == self.correct_answer.number
    }

    pub fn correct_label(&self) -> String {
        format!(
            "{}. {}",
            self.correct_answer.number, self.correct_answer.answer
        )
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    match inner.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => inner
            .trim_start()
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .trim(),
    }
}
