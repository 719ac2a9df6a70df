use std::io;

use services::{ReviewerService, RunnerStatus};

use levelup_core::flashcard::{self, FlashcardDeck, NavKey};
use levelup_core::model::{Question, Screen};

use super::{Command, Input, Terminal};

const HELP: &str = "enter/f flip · n next · p prev · q back";

pub async fn run(
    term: &mut Terminal,
    service: &ReviewerService,
    questions: Vec<Question>,
) -> io::Result<()> {
    if questions.is_empty() {
        term.say(flashcard::EMPTY_MESSAGE).await?;
        return Ok(());
    }

    let mut runner = service
        .start_flashcards(questions)
        .with_exit_callback(|| tracing::info!(to = ?Screen::Flashcards.back(), "leaving flashcards"));
    term.say(&render(runner.engine())).await?;

    loop {
        tokio::select! {
            Some(_) = runner.next_alarm() => {
                term.say(&render(runner.engine())).await?;
            }
            line = term.read_line() => {
                let Some(line) = line? else {
                    runner.exit();
                    return Ok(());
                };
                let status = match Input::parse(&line) {
                    Input::Back => runner.exit(),
                    Input::Word(Command::Flip) => runner.dispatch(FlashcardDeck::flip),
                    Input::Word(Command::Next) => runner.dispatch(|deck| deck.key(NavKey::ArrowRight)),
                    Input::Word(Command::Prev) => runner.dispatch(|deck| deck.key(NavKey::ArrowLeft)),
                    Input::Word(Command::Help) => {
                        term.say(HELP).await?;
                        continue;
                    }
                    Input::Choice(_) | Input::Word(_) | Input::Unknown => continue,
                };
                if status == RunnerStatus::Exited {
                    return Ok(());
                }
                term.say(&render(runner.engine())).await?;
            }
        }
    }
}

fn render(deck: &FlashcardDeck) -> String {
    let side = if deck.is_flipped() {
        deck.back().unwrap_or_default()
    } else {
        deck.front().unwrap_or_default().to_string()
    };
    format!(
        "\nCard {} / {} ({:.0}%) · {}\n  {side}",
        deck.index() + 1,
        deck.len(),
        deck.progress() * 100.0,
        if deck.is_flipped() { "answer" } else { "question" },
    )
}
