//! Terminal hosts for the review screens.
//!
//! Each host owns a `SessionRunner` and multiplexes stdin lines with fired
//! alarms until the engine exits.

pub mod adventure;
pub mod config;
pub mod flashcards;
pub mod quiz;

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

pub struct Terminal {
    lines: Lines<BufReader<Stdin>>,
    out: Stdout,
}

impl Terminal {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            out: tokio::io::stdout(),
        }
    }

    /// Next trimmed input line; `None` at end of input.
    ///
    /// Cancel safe.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let line = self.lines.next_line().await?;
        Ok(line.map(|line| line.trim().to_string()))
    }

    pub async fn say(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await
    }

    /// Print `question` and wait for an answer. End of input reads as `q`.
    pub async fn ask(&mut self, question: &str) -> io::Result<String> {
        self.say(question).await?;
        Ok(self.read_line().await?.unwrap_or_else(|| "q".to_string()))
    }
}

/// Input common to every screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Choice(usize),
    Back,
    Word(Command),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Skip,
    Flip,
    Next,
    Prev,
    Restart,
    Help,
}

impl Input {
    /// Letters pick choices (`a` is the first); so do numbers starting at 1.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let word = raw.to_ascii_lowercase();
        match word.as_str() {
            "q" | "quit" | "back" | "exit" => return Self::Back,
            "o" | "open" => return Self::Word(Command::Open),
            "x" | "close" => return Self::Word(Command::Close),
            "s" | "skip" => return Self::Word(Command::Skip),
            "f" | "flip" | "" => return Self::Word(Command::Flip),
            "n" | "next" | "right" => return Self::Word(Command::Next),
            "p" | "prev" | "left" => return Self::Word(Command::Prev),
            "r" | "restart" => return Self::Word(Command::Restart),
            "h" | "help" | "?" => return Self::Word(Command::Help),
            _ => {}
        }

        if let [letter @ b'a'..=b'z'] = word.as_bytes() {
            return Self::Choice(usize::from(letter - b'a'));
        }
        match word.parse::<usize>() {
            Ok(number) if number >= 1 => Self::Choice(number - 1),
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_numbers_pick_choices() {
        assert_eq!(Input::parse("a"), Input::Choice(0));
        assert_eq!(Input::parse(" D "), Input::Choice(3));
        assert_eq!(Input::parse("2"), Input::Choice(1));
        assert_eq!(Input::parse("0"), Input::Unknown);
    }

    #[test]
    fn words_map_to_commands() {
        assert_eq!(Input::parse("Q"), Input::Back);
        assert_eq!(Input::parse("c"), Input::Choice(2));
        assert_eq!(Input::parse("skip"), Input::Word(Command::Skip));
        assert_eq!(Input::parse(""), Input::Word(Command::Flip));
        assert_eq!(Input::parse("right"), Input::Word(Command::Next));
        assert_eq!(Input::parse("banana"), Input::Unknown);
    }
}
