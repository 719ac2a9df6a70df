mod config;
mod ids;
mod mode;
pub mod question;

pub use config::{ConfigError, SessionConfig, SessionConfigDraft};
pub use ids::QuestionId;
pub use mode::{Difficulty, GameMode, Screen};
pub use question::{CorrectReference, Question, RawQuestion, normalize, normalize_all};
