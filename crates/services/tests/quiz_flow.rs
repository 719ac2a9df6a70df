use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use levelup_core::model::{
    CorrectReference, Difficulty, GameMode, Question, QuestionId, SessionConfig,
};
use levelup_core::quiz::QuizPhase;
use levelup_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{Clock, ReviewerService, RunnerStatus, StaticQuestionSource};
use tokio::time::{Instant, timeout};

fn questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(
                QuestionId::from(i),
                format!("Question {i}"),
                vec![format!("wrong {i}"), format!("right {i}")],
                Some(CorrectReference::Letter(1)),
            )
        })
        .collect()
}

fn service() -> ReviewerService {
    ReviewerService::new(
        Clock::fixed(fixed_now()),
        Arc::new(StaticQuestionSource::default()),
    )
}

fn config(n: usize) -> SessionConfig {
    SessionConfig::new(GameMode::QuizChallenge, Difficulty::Medium, n, questions(n))
}

#[tokio::test(start_paused = true)]
async fn answered_question_advances_after_reveal_delay() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut runner = service().start_quiz(config(2), &mut rng);

    let status = runner.dispatch(|quiz| quiz.choose(1));
    assert_eq!(status, RunnerStatus::Running);
    assert_eq!(runner.engine().score(), 1);

    let early = timeout(Duration::from_millis(1_900), runner.next_alarm()).await;
    assert!(early.is_err());
    assert_eq!(runner.engine().active().map(|q| q.position), Some(0));

    assert_eq!(runner.next_alarm().await, Some(RunnerStatus::Running));
    let active = runner.engine().active().unwrap();
    assert_eq!(active.position, 1);
    assert_eq!(active.remaining_secs, 15);
}

#[tokio::test(start_paused = true)]
async fn unanswered_quiz_times_out_to_summary() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut runner = service().start_quiz(config(2), &mut rng);
    let start = Instant::now();

    let status = runner.run_until_idle().await;

    assert_eq!(status, RunnerStatus::Completed);
    assert!(start.elapsed() >= Duration::from_secs(34));
    let QuizPhase::Finished(summary) = runner.engine().phase() else {
        panic!("quiz should be finished");
    };
    assert_eq!(summary.score, 0);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.completed_at, fixed_now());
}

#[tokio::test(start_paused = true)]
async fn restart_after_finish_runs_again() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut runner = service().start_quiz(config(1), &mut rng);
    runner.dispatch(|quiz| quiz.choose(1));
    assert_eq!(runner.run_until_idle().await, RunnerStatus::Completed);

    let status = runner.dispatch(|quiz| quiz.restart(&mut rng));
    assert_eq!(status, RunnerStatus::Running);
    assert_eq!(runner.engine().score(), 0);
    assert_eq!(runner.engine().remaining_secs(), Some(15));
}

#[tokio::test(start_paused = true)]
async fn exit_invokes_callback_and_stops_timers() {
    let exited = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&exited);
    let mut rng = StdRng::seed_from_u64(1);
    let mut runner = service()
        .start_quiz(config(2), &mut rng)
        .with_exit_callback(move || flag.store(true, Ordering::SeqCst));

    assert!(runner.has_pending_alarms());
    assert_eq!(runner.exit(), RunnerStatus::Exited);
    assert!(!runner.has_pending_alarms());
    assert!(exited.load(Ordering::SeqCst));
    assert_eq!(runner.next_alarm().await, None);

    assert_eq!(runner.dispatch(|quiz| quiz.choose(1)), RunnerStatus::Exited);
    assert_eq!(runner.engine().score(), 0);
}
