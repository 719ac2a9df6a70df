use std::fmt;

/// Presentation mode selected on the upload screen.
///
/// The generation service and the upload screen exchange these as plain
/// labels; anything unrecognised is kept verbatim and routed to the
/// configuration screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameMode {
    QuizChallenge,
    FlashcardFrenzy,
    AdventurePath,
    Other(String),
}

impl GameMode {
    pub const QUIZ_CHALLENGE: &'static str = "Quiz Challenge";
    pub const FLASHCARD_FRENZY: &'static str = "Flashcard Frenzy";
    pub const ADVENTURE_PATH: &'static str = "Adventure Path";

    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            Self::QUIZ_CHALLENGE => Self::QuizChallenge,
            Self::FLASHCARD_FRENZY => Self::FlashcardFrenzy,
            Self::ADVENTURE_PATH => Self::AdventurePath,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::QuizChallenge => Self::QUIZ_CHALLENGE,
            Self::FlashcardFrenzy => Self::FLASHCARD_FRENZY,
            Self::AdventurePath => Self::ADVENTURE_PATH,
            Self::Other(label) => label,
        }
    }

    /// Screen that receives a freshly generated question set in this mode.
    #[must_use]
    pub fn entry_screen(&self) -> Screen {
        match self {
            Self::FlashcardFrenzy => Screen::Flashcards,
            Self::AdventurePath => Screen::Adventure,
            Self::QuizChallenge | Self::Other(_) => Screen::Config,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Screens the navigation host can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Config,
    Quiz,
    Flashcards,
    Adventure,
}

impl Screen {
    /// Where the back action of this screen leads.
    #[must_use]
    pub fn back(self) -> Self {
        match self {
            Self::Quiz => Self::Config,
            Self::Home | Self::Config | Self::Flashcards | Self::Adventure => Self::Home,
        }
    }
}

/// Display-only difficulty label carried through the quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_modes() {
        assert_eq!(GameMode::from_label("Quiz Challenge"), GameMode::QuizChallenge);
        assert_eq!(
            GameMode::from_label("Flashcard Frenzy"),
            GameMode::FlashcardFrenzy
        );
        assert_eq!(GameMode::from_label("Adventure Path"), GameMode::AdventurePath);
    }

    #[test]
    fn unknown_label_is_kept_and_routes_to_config() {
        let mode = GameMode::from_label("Boss Rush");
        assert_eq!(mode, GameMode::Other("Boss Rush".to_string()));
        assert_eq!(mode.label(), "Boss Rush");
        assert_eq!(mode.entry_screen(), Screen::Config);
    }

    #[test]
    fn modes_route_to_their_screens() {
        assert_eq!(GameMode::QuizChallenge.entry_screen(), Screen::Config);
        assert_eq!(GameMode::FlashcardFrenzy.entry_screen(), Screen::Flashcards);
        assert_eq!(GameMode::AdventurePath.entry_screen(), Screen::Adventure);
    }

    #[test]
    fn back_navigation() {
        assert_eq!(Screen::Quiz.back(), Screen::Config);
        assert_eq!(Screen::Config.back(), Screen::Home);
        assert_eq!(Screen::Adventure.back(), Screen::Home);
    }

    #[test]
    fn difficulty_parses_labels() {
        assert_eq!(Difficulty::from_label("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label(" Easy "), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label("extreme"), None);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }
}
