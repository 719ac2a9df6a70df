#![forbid(unsafe_code)]

pub mod adventure;
pub mod alarm;
pub mod flashcard;
pub mod model;
pub mod quiz;
pub mod time;

pub use time::Clock;
