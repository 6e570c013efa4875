use std::io::{BufRead, Write};

use log::debug;

use crate::error::Result;
use crate::llm::{CompletionClient, fetch_question};
use crate::palette::Palette;
use crate::question::QuizQuestion;
use crate::topic::is_valid_topic;
use crate::utils::strip_controls_and_escapes;

const QUIT: &str = "q";

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    AwaitingTopic,
    AwaitingAnswer { topic: String },
    Terminated,
}

/// In-memory tally for one run. Only logged, never shown to the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub answered: usize,
    pub correct: usize,
}

/// Interactive quiz over any line-based input and output.
pub struct Session<'a, C, R, W> {
    client: &'a C,
    input: R,
    output: W,
}

impl<'a, C, R, W> Session<'a, C, R, W>
where
    C: CompletionClient,
    R: BufRead,
    W: Write,
{
    pub fn new(client: &'a C, input: R, output: W) -> Self {
        Self {
            client,
            input,
            output,
        }
    }

    /// Runs until the player quits or input ends. A failed fetch stops the
    /// session and is returned to the caller.
    pub async fn run(&mut self) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut state = State::AwaitingTopic;

        loop {
            state = match state {
                State::AwaitingTopic => self.read_topic()?,
                State::AwaitingAnswer { topic } => self.play_round(topic, &mut summary).await?,
                State::Terminated => {
                    writeln!(
                        self.output,
                        "{}",
                        Palette::paint(Palette::INFO, "Exiting the app. Goodbye!")
                    )?;
                    return Ok(summary);
                }
            };
        }
    }

    fn read_topic(&mut self) -> Result<State> {
        loop {
            self.prompt(
                "Enter a topic (must not be empty and contain only letters, spaces, and hyphens): ",
            )?;
            let Some(topic) = self.read_line()? else {
                return Ok(State::Terminated);
            };

            if is_valid_topic(&topic) {
                return Ok(State::AwaitingAnswer { topic });
            }
            writeln!(
                self.output,
                "{}",
                Palette::paint(Palette::WARNING, "Invalid topic. Please enter again.")
            )?;
        }
    }

    async fn play_round(&mut self, topic: String, summary: &mut SessionSummary) -> Result<State> {
        writeln!(
            self.output,
            "{}",
            Palette::dim(format!("Generating a question about {topic}..."))
        )?;
        let question = fetch_question(self.client, &topic).await?;
        self.render_question(&question)?;

        self.prompt("\nEnter your answer number (1,2,3,4) or 'q' to quit: ")?;
        let Some(answer) = self.read_line()? else {
            return Ok(State::Terminated);
        };
        if answer == QUIT {
            return Ok(State::Terminated);
        }

        debug!(
            "Answer {answer:?}, expected {:?}",
            question.correct_answer.number
        );
        summary.answered += 1;
        if question.is_correct(&answer) {
            summary.correct += 1;
            writeln!(
                self.output,
                "{}",
                Palette::paint(Palette::SUCCESS, "Correct! Well done!")
            )?;
        } else {
            let label = strip_controls_and_escapes(&question.correct_label());
            writeln!(
                self.output,
                "{} The correct answer is [ {} ]",
                Palette::paint(Palette::DANGER, "Incorrect."),
                Palette::bold(label)
            )?;
        }

        self.prompt("\nPress Enter to continue...")?;
        match self.read_line()? {
            Some(_) => Ok(State::AwaitingAnswer { topic }),
            None => Ok(State::Terminated),
        }
    }

    fn render_question(&mut self, question: &QuizQuestion) -> Result<()> {
        writeln!(self.output, "\n{}", Palette::paint(Palette::INFO, "Question:"))?;
        writeln!(
            self.output,
            "{}",
            Palette::bold(strip_controls_and_escapes(&question.question))
        )?;
        for (n, option) in question.options.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {}",
                Palette::paint(Palette::ACCENT, n + 1),
                strip_controls_and_escapes(option)
            )?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Next trimmed line, or `None` once input is exhausted. Bytes that
    /// aren't UTF-8 become U+FFFD, so they fail validation or scoring instead
    /// of ending the session.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::io::Cursor;

    use super::*;
    use crate::error::QuizError;

    const PARIS: &str = r#"{"Question":"What is the capital of France?","Options":["Berlin","Paris","Rome","Madrid"],"CorrectAnswer":{"Number":"2","Answer":"Paris"}}"#;

    struct Scripted {
        replies: RefCell<VecDeque<String>>,
        calls: Cell<usize>,
    }

    impl Scripted {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: RefCell::new(replies.iter().map(|r| r.to_string()).collect()),
                calls: Cell::new(0),
            }
        }
    }

    impl CompletionClient for Scripted {
        async fn complete(&self, _prompt: &str) -> crate::error::Result<String> {
            self.calls.set(self.calls.get() + 1);
            self.replies
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| QuizError::Transport("no scripted reply left".to_string()))
        }
    }

    async fn play(
        client: &Scripted,
        input: impl AsRef<[u8]>,
    ) -> (crate::error::Result<SessionSummary>, String) {
        let mut output = Vec::new();
        let result = Session::new(client, Cursor::new(input.as_ref()), &mut output)
            .run()
            .await;
        let printed = String::from_utf8(output).unwrap();
        (result, strip_controls_and_escapes(&printed))
    }

    #[tokio::test]
    async fn correct_answer_takes_success_path() {
        let client = Scripted::new(&[PARIS, PARIS]);
        let (result, printed) = play(&client, "Geography\n2\n\nq\n").await;

        assert_eq!(
            result.unwrap(),
            SessionSummary {
                answered: 1,
                correct: 1
            }
        );
        assert!(printed.contains("Correct! Well done!"));
        assert!(!printed.contains("Incorrect."));
        assert_eq!(client.calls.get(), 2);
    }

    #[tokio::test]
    async fn wrong_answer_shows_correct_option() {
        let client = Scripted::new(&[PARIS, PARIS]);
        let (result, printed) = play(&client, "Geography\n3\n\nq\n").await;

        assert_eq!(
            result.unwrap(),
            SessionSummary {
                answered: 1,
                correct: 0
            }
        );
        assert!(printed.contains("Incorrect. The correct answer is [ 2. Paris ]"));
    }

    #[tokio::test]
    async fn non_numeric_answer_is_just_incorrect() {
        let client = Scripted::new(&[PARIS, PARIS]);
        let (result, printed) = play(&client, "Geography\nParis\n\nq\n").await;

        assert_eq!(result.unwrap().correct, 0);
        assert!(printed.contains("[ 2. Paris ]"));
    }

    #[tokio::test]
    async fn quit_stops_without_another_fetch() {
        let client = Scripted::new(&[PARIS, PARIS]);
        let (result, printed) = play(&client, "Geography\n  q  \n").await;

        assert_eq!(result.unwrap(), SessionSummary::default());
        assert_eq!(client.calls.get(), 1);
        assert!(printed.ends_with("Exiting the app. Goodbye!"));
    }

    #[tokio::test]
    async fn uppercase_q_is_not_quit() {
        let client = Scripted::new(&[PARIS, PARIS]);
        let (result, printed) = play(&client, "Geography\nQ\n\nq\n").await;

        assert_eq!(result.unwrap().answered, 1);
        assert!(printed.contains("Incorrect."));
        assert_eq!(client.calls.get(), 2);
    }

    #[tokio::test]
    async fn invalid_topic_reprompts() {
        let client = Scripted::new(&[PARIS]);
        let (result, printed) = play(&client, "\nbad_topic!\nUnder-water Life\nq\n").await;

        assert!(result.is_ok());
        assert_eq!(printed.matches("Invalid topic. Please enter again.").count(), 2);
        assert!(printed.contains("Generating a question about Under-water Life..."));
        assert_eq!(client.calls.get(), 1);
    }

    #[tokio::test]
    async fn non_utf8_topic_reprompts() {
        let client = Scripted::new(&[PARIS]);
        let (result, printed) = play(&client, b"\xff\xfe topic\n\xff\nHistory\nq\n").await;

        assert_eq!(result.unwrap(), SessionSummary::default());
        assert_eq!(printed.matches("Invalid topic. Please enter again.").count(), 2);
        assert!(printed.contains("Generating a question about History..."));
        assert_eq!(client.calls.get(), 1);
    }

    #[tokio::test]
    async fn non_utf8_answer_is_incorrect() {
        let client = Scripted::new(&[PARIS, PARIS]);
        let (result, printed) = play(&client, b"History\n\xff\n\nq\n").await;

        assert_eq!(
            result.unwrap(),
            SessionSummary {
                answered: 1,
                correct: 0
            }
        );
        assert!(printed.contains("Incorrect. The correct answer is [ 2. Paris ]"));
        assert_eq!(client.calls.get(), 2);
    }

    #[tokio::test]
    async fn multi_line_question_keeps_line_breaks_as_spaces() {
        let client = Scripted::new(&[
            r#"{"Question":"Consider this:\nWhich city is the capital of France?","Options":["Berlin","Paris","Rome","Madrid"],"CorrectAnswer":{"Number":"2","Answer":"Paris"}}"#,
        ]);
        let mut output = Vec::new();
        let result = Session::new(&client, Cursor::new(&b"Geography\nq\n"[..]), &mut output)
            .run()
            .await;

        assert!(result.is_ok());
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Consider this: Which city is the capital of France?"));
    }

    #[tokio::test]
    async fn renders_numbered_options() {
        let client = Scripted::new(&[PARIS]);
        let (_, printed) = play(&client, "Geography\nq\n").await;

        assert!(printed.contains("What is the capital of France?"));
        assert!(printed.contains("1. Berlin 2. Paris 3. Rome 4. Madrid"));
    }

    #[tokio::test]
    async fn end_of_input_terminates_cleanly() {
        let client = Scripted::new(&[]);
        let (result, printed) = play(&client, "").await;

        assert!(result.is_ok());
        assert_eq!(client.calls.get(), 0);
        assert!(printed.contains("Goodbye!"));

        let client = Scripted::new(&[PARIS]);
        let (result, _) = play(&client, "Geography\n").await;
        assert!(result.is_ok());
        assert_eq!(client.calls.get(), 1);
    }

    #[tokio::test]
    async fn malformed_reply_ends_session_with_error() {
        let client = Scripted::new(&[r#"{"Question":"Q?","Options":["A","B","C","D"],"CorrectAnswer":{"Number":"#]);
        let (result, printed) = play(&client, "Geography\n1\n").await;

        assert!(matches!(result, Err(QuizError::MalformedResponse(_))));
        assert!(!printed.contains("Question:"));
        assert!(!printed.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn transport_failure_ends_session_with_error() {
        let client = Scripted::new(&[PARIS]);
        let (result, _) = play(&client, "Geography\n2\n\n").await;

        assert!(matches!(result, Err(QuizError::Transport(_))));
        assert_eq!(client.calls.get(), 2);
    }
}
