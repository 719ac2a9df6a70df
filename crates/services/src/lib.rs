#![forbid(unsafe_code)]

pub mod error;
pub mod generation;
pub mod reviewer_service;
pub mod runner;
pub mod timers;

pub use levelup_core::Clock;

pub use error::{GenerationError, ReviewerError};
pub use generation::{
    GenerationConfig, GenerationRequest, HttpQuestionSource, MaterialFile, QuestionSource,
    StaticQuestionSource,
};
pub use reviewer_service::{GeneratedSet, ReviewerService};
pub use runner::{RunnerStatus, SessionRunner};
pub use timers::AlarmScheduler;
