use std::io;

use services::{ReviewerService, RunnerStatus};

use levelup_core::adventure::{
    self, AdventureSession, ChoiceState, Feedback, LevelStatus, OpenLevel, choice_letter,
};
use levelup_core::model::{Question, Screen};

use super::{Command, Input, Terminal};

const HELP: &str = "o open level · letter/number choose · s skip · x close · q back";

pub async fn run(
    term: &mut Terminal,
    service: &ReviewerService,
    questions: Vec<Question>,
) -> io::Result<()> {
    if questions.is_empty() {
        term.say(adventure::EMPTY_MESSAGE).await?;
        return Ok(());
    }

    let mut runner = service
        .start_adventure(questions)
        .with_exit_callback(|| tracing::info!(to = ?Screen::Adventure.back(), "leaving adventure"));
    term.say(&render(runner.engine())).await?;

    loop {
        tokio::select! {
            Some(status) = runner.next_alarm() => {
                if status == RunnerStatus::Exited {
                    return Ok(());
                }
                term.say(&render(runner.engine())).await?;
            }
            line = term.read_line() => {
                let Some(line) = line? else {
                    runner.exit();
                    return Ok(());
                };
                let level = runner.engine().current_level();
                let status = match Input::parse(&line) {
                    Input::Back => runner.exit(),
                    Input::Choice(choice) => runner.dispatch(|map| map.choose(choice)),
                    Input::Word(Command::Open) => runner.dispatch(|map| map.open_level(level)),
                    Input::Word(Command::Close) => runner.dispatch(AdventureSession::close_level),
                    Input::Word(Command::Skip) => runner.dispatch(AdventureSession::skip),
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

fn render(map: &AdventureSession) -> String {
    if map.is_finished() {
        return format!("★ {} ★", adventure::COMPLETED_MESSAGE);
    }
    if let (Some(open), Some(question)) = (map.modal(), map.open_question()) {
        return render_level(map, open, question);
    }

    let mut out = format!("\n── Adventure Path ── {:.0}%\n", map.progress() * 100.0);
    for level in 0..map.levels().len() {
        let marker = match map.level_status(level) {
            LevelStatus::Completed => "✓",
            LevelStatus::Current => "▶",
            LevelStatus::Locked => "·",
        };
        out.push_str(&format!("  {marker} Level {}\n", level + 1));
    }
    out.push_str("o open the current level · q back");
    out
}

fn render_level(map: &AdventureSession, open: &OpenLevel, question: &Question) -> String {
    let mut out = format!("\nLevel {}\n{}\n", open.level() + 1, question.prompt());
    for (index, choice) in question.choices().iter().enumerate() {
        let line = match open.choice_state(index) {
            ChoiceState::Removed => continue,
            ChoiceState::Available => format!("  {}) {choice}\n", choice_letter(index)),
            ChoiceState::Wrong => format!("  {}) {choice}  ✗\n", choice_letter(index)),
            ChoiceState::Correct => format!("  {}) {choice}  ✓\n", choice_letter(index)),
        };
        out.push_str(&line);
    }
    match open.feedback() {
        Feedback::Idle => out.push_str(map.hint()),
        Feedback::Wrong { .. } => out.push_str("Not quite."),
        Feedback::Correct { .. } => out.push_str("Correct!"),
    }
    out
}
