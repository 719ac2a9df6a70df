use std::io;

use rand::Rng;
use services::{ReviewerService, RunnerStatus};

use levelup_core::adventure::choice_letter;
use levelup_core::model::{Screen, SessionConfig};
use levelup_core::quiz::{ChoiceMark, EMPTY_MESSAGE, QuizPhase, QuizSession};

use super::{Command, Input, Terminal};

const HELP: &str = "Pick with a letter or number · q back to settings";

pub async fn run<R: Rng + ?Sized>(
    term: &mut Terminal,
    service: &ReviewerService,
    config: SessionConfig,
    rng: &mut R,
) -> io::Result<()> {
    let mut runner = service
        .start_quiz(config, rng)
        .with_exit_callback(|| tracing::info!(to = ?Screen::Quiz.back(), "leaving quiz"));
    term.say(&render(runner.engine())).await?;

    loop {
        tokio::select! {
            Some(_) = runner.next_alarm() => {
                term.say(&render_after_alarm(runner.engine())).await?;
            }
            line = term.read_line() => {
                let Some(line) = line? else {
                    runner.exit();
                    return Ok(());
                };
                let status = match Input::parse(&line) {
                    Input::Back => runner.exit(),
                    Input::Choice(index) => runner.dispatch(|quiz| quiz.choose(index)),
                    Input::Word(Command::Restart) => runner.dispatch(|quiz| quiz.restart(rng)),
                    Input::Word(Command::Help) => {
                        term.say(HELP).await?;
                        continue;
                    }
                    Input::Word(_) | Input::Unknown => continue,
                };
                if status == RunnerStatus::Exited {
                    return Ok(());
                }
                term.say(&render(runner.engine())).await?;
            }
        }
    }
}

/// Ticks only print the countdown; everything else redraws the question.
fn render_after_alarm(quiz: &QuizSession) -> String {
    match quiz.active() {
        Some(active) if !active.is_answered() => countdown(quiz),
        _ => render(quiz),
    }
}

fn countdown(quiz: &QuizSession) -> String {
    let secs = quiz.remaining_secs().unwrap_or_default();
    if quiz.is_low_time() {
        format!("  ⏱ {secs}s !")
    } else {
        format!("  ⏱ {secs}s")
    }
}

fn render(quiz: &QuizSession) -> String {
    match quiz.phase() {
        QuizPhase::Loading => "Loading…".to_string(),
        QuizPhase::Finished(summary) if summary.total == 0 => {
            format!("{}\n(q to go back)", EMPTY_MESSAGE)
        }
        QuizPhase::Finished(summary) => format!(
            "── {} complete ──\nScore: {} / {}  ({})\nr restart · q back",
            summary.mode, summary.score, summary.total, summary.difficulty
        ),
        QuizPhase::Active(active) => {
            let Some(question) = quiz.current_question() else {
                return String::new();
            };
            let mut out = format!(
                "\nQuestion {} of {} · {} · score {}\n{}\n",
                active.position + 1,
                quiz.total(),
                quiz.difficulty(),
                quiz.score(),
                question.prompt()
            );
            let marks = quiz.choice_marks();
            for (index, choice) in question.choices().iter().enumerate() {
                let mark = match marks.get(index) {
                    Some(ChoiceMark::Correct) => " ✓",
                    Some(ChoiceMark::Incorrect) => " ✗",
                    Some(ChoiceMark::Neutral) | None => "",
                };
                out.push_str(&format!("  {}) {choice}{mark}\n", choice_letter(index)));
            }
            if active.is_answered() {
                out.push_str("  next question shortly…");
            } else {
                out.push_str(&countdown(quiz));
            }
            out
        }
    }
}
