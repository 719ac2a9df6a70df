use std::io;

use levelup_core::model::{Difficulty, SessionConfig, SessionConfigDraft};

use super::Terminal;

/// Ask for difficulty and question count. `None` when the user backs out.
///
/// Blank answers keep the current value.
pub async fn run(
    term: &mut Terminal,
    mut draft: SessionConfigDraft,
    difficulty: Difficulty,
) -> io::Result<Option<SessionConfig>> {
    if draft.available() == 0 {
        term.say("No questions to play. Generate a new reviewer first.")
            .await?;
        return Ok(None);
    }

    term.say("── Configure quiz ──").await?;
    let answer = term
        .ask(&format!("Difficulty (easy/medium/hard) [{difficulty}]:"))
        .await?;
    if is_back(&answer) {
        return Ok(None);
    }
    let difficulty = Difficulty::from_label(&answer).unwrap_or(difficulty);
    draft = draft.with_difficulty(difficulty);

    let answer = term
        .ask(&format!(
            "Number of questions (1-{}) [{}]:",
            draft.available(),
            draft.question_count()
        ))
        .await?;
    if is_back(&answer) {
        return Ok(None);
    }
    if let Ok(requested) = answer.parse::<i64>() {
        draft.set_question_count(requested);
    }

    match draft.confirm() {
        Ok(config) => {
            term.say(&format!(
                "Starting {} · {} · {} questions",
                config.mode(),
                config.difficulty(),
                config.question_count()
            ))
            .await?;
            Ok(Some(config))
        }
        Err(err) => {
            term.say(&err.to_string()).await?;
            Ok(None)
        }
    }
}

fn is_back(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "q" | "back")
}
