mod host;
mod identity;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use levelup_core::model::{Difficulty, GameMode, Screen};
use services::generation::{COUNT_OPTIONS, DEFAULT_COUNT};
use services::{
    Clock, GenerationRequest, HttpQuestionSource, MaterialFile, QuestionSource, ReviewerError,
    ReviewerService, StaticQuestionSource,
};
use tracing_subscriber::EnvFilter;

use crate::host::Terminal;
use crate::identity::{Greeting, Identity};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCount { raw: String },
    InvalidDifficulty { raw: String },
    MissingSource,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw}")
            }
            ArgsError::MissingSource => write!(f, "either --file or --questions is required"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  levelup --file <notes> [--mode <label>] [--count <n>] [--difficulty <level>]");
    eprintln!("  levelup --questions <json> [--mode <label>] [--difficulty <level>]");
    eprintln!();
    eprintln!("Modes:");
    eprintln!(
        "  \"{}\" (default), \"{}\", \"{}\"",
        GameMode::QUIZ_CHALLENGE,
        GameMode::FLASHCARD_FRENZY,
        GameMode::ADVENTURE_PATH
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --count {DEFAULT_COUNT} (offered: {COUNT_OPTIONS:?})");
    eprintln!("  --difficulty medium");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEVELUP_BACKEND_URL, LEVELUP_USER_NAME, LEVELUP_USER_EMAIL, RUST_LOG");
}

/// Where the question set comes from.
#[derive(Debug)]
enum Source {
    /// Study material uploaded to the generation backend.
    Material(PathBuf),
    /// A question set already on disk.
    Questions(PathBuf),
}

#[derive(Debug)]
struct Args {
    source: Source,
    mode: GameMode,
    count: u32,
    difficulty: Difficulty,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut material = None;
        let mut questions = None;
        let mut mode = GameMode::QuizChallenge;
        let mut count = DEFAULT_COUNT;
        let mut difficulty = Difficulty::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--file" => material = Some(PathBuf::from(require_value(args, "--file")?)),
                "--questions" => {
                    questions = Some(PathBuf::from(require_value(args, "--questions")?));
                }
                "--mode" => mode = GameMode::from_label(&require_value(args, "--mode")?),
                "--count" => {
                    let value = require_value(args, "--count")?;
                    count = value
                        .parse::<u32>()
                        .ok()
                        .filter(|count| *count >= 1)
                        .ok_or(ArgsError::InvalidCount { raw: value })?;
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    difficulty = Difficulty::from_label(&value)
                        .ok_or(ArgsError::InvalidDifficulty { raw: value })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let source = match (questions, material) {
            (Some(path), _) => Source::Questions(path),
            (None, Some(path)) => Source::Material(path),
            (None, None) => return Err(ArgsError::MissingSource),
        };

        Ok(Self {
            source,
            mode,
            count,
            difficulty,
        })
    }
}

async fn material_file(path: &Path) -> std::io::Result<MaterialFile> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map_or_else(|| "material".to_string(), |name| name.to_string_lossy().into_owned());
    Ok(MaterialFile::new(name, bytes))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let (source, file): (Arc<dyn QuestionSource>, MaterialFile) = match &args.source {
        Source::Questions(path) => {
            let text = tokio::fs::read_to_string(path).await?;
            let source: Arc<dyn QuestionSource> = Arc::new(StaticQuestionSource::from_json(&text)?);
            (source, MaterialFile::new(path.display().to_string(), Vec::new()))
        }
        Source::Material(path) => {
            let source = HttpQuestionSource::from_env();
            if !source.enabled() {
                tracing::warn!("LEVELUP_BACKEND_URL is not set");
            }
            let source: Arc<dyn QuestionSource> = Arc::new(source);
            (source, material_file(path).await?)
        }
    };

    let service = ReviewerService::new(Clock::system(), source);
    let mut term = Terminal::new();
    let identity = Identity::from_env();
    term.say(&format!("LevelUp · {}", Greeting(identity.as_ref())))
        .await?;
    term.say(&format!("Generating {} questions…", args.mode)).await?;

    let request = GenerationRequest::new(file, args.mode.clone()).with_count(args.count);
    let set = match service.generate(request).await {
        Ok(set) => set,
        Err(ReviewerError::Generation(err)) => return Err(err.user_message().into()),
        Err(err) => return Err(err.into()),
    };

    let mut rng = rand::rng();
    let mut screen = set.entry_screen();
    tracing::info!(?screen, questions = set.questions.len(), "question set ready");

    loop {
        screen = match screen {
            Screen::Home => break,
            Screen::Config | Screen::Quiz => {
                match host::config::run(&mut term, set.draft(), args.difficulty).await? {
                    Some(config) => {
                        host::quiz::run(&mut term, &service, config, &mut rng).await?;
                        Screen::Quiz.back()
                    }
                    None => Screen::Config.back(),
                }
            }
            Screen::Flashcards => {
                host::flashcards::run(&mut term, &service, set.questions.clone()).await?;
                Screen::Flashcards.back()
            }
            Screen::Adventure => {
                host::adventure::run(&mut term, &service, set.questions.clone()).await?;
                Screen::Adventure.back()
            }
        };
    }

    term.say("Bye!").await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
