pub mod client;
pub mod question;
pub mod response;

pub use client::{CompletionClient, OpenAiCompletion, initialize_client};
pub use question::{build_prompt, fetch_question};
