pub mod config;
pub mod error;
pub mod llm;
pub mod palette;
pub mod question;
pub mod session;
pub mod topic;
pub mod utils;

pub use error::QuizError;
pub use question::{CorrectAnswer, QuizQuestion};
pub use session::{Session, SessionSummary};
