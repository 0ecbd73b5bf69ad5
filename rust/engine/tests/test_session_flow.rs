use trivium_engine::config::{ConfigUpdate, Difficulty};
use trivium_engine::countdown::TIME_BUDGET;
use trivium_engine::errors::{FetchError, SessionError};
use trivium_engine::question::{Question, RawQuestion};
use trivium_engine::session::{Phase, Session, TickOutcome};
use trivium_engine::shuffle::Shuffler;

fn raw(i: usize) -> RawQuestion {
    RawQuestion {
        category: "General Knowledge".into(),
        question_type: "multiple".into(),
        difficulty: "easy".into(),
        question: format!("Question number {}?", i + 1),
        correct_answer: format!("correct {}", i + 1),
        incorrect_answers: vec![
            format!("wrong {}a", i + 1),
            format!("wrong {}b", i + 1),
            format!("wrong {}c", i + 1),
        ],
    }
}

fn batch(n: usize, seed: u64) -> Vec<Question> {
    let mut shuffler = Shuffler::with_seed(seed);
    (0..n).map(|i| Question::from_raw(raw(i), &mut shuffler)).collect()
}

fn started(n: usize) -> Session {
    let mut session = Session::new();
    let request = session.begin().expect("begin");
    session
        .complete_fetch(request.ticket, Ok(batch(n, 42)))
        .expect("apply batch");
    session
}

fn wrong_option(session: &Session) -> String {
    let q = session.current_question().expect("question on screen");
    q.options()
        .iter()
        .find(|o| !q.is_correct(o))
        .cloned()
        .expect("a wrong option")
}

fn run_out_the_clock(session: &mut Session) {
    for _ in 1..TIME_BUDGET {
        assert!(matches!(
            session.tick().expect("tick"),
            TickOutcome::Running { .. }
        ));
    }
    assert_eq!(session.tick().expect("last tick"), TickOutcome::TimedOut);
}

#[test]
fn mixed_run_scores_one_of_three() {
    let mut session = Session::new();
    session
        .configure(
            &ConfigUpdate::default()
                .amount(5)
                .difficulty(Some(Difficulty::Easy)),
        )
        .expect("configure");
    let request = session.begin().expect("begin");
    assert_eq!(request.config.difficulty, Some(Difficulty::Easy));

    // the bank only had three questions for this filter
    session
        .complete_fetch(request.ticket, Ok(batch(3, 7)))
        .expect("apply batch");

    // Q1 correct
    let correct = session
        .current_question()
        .unwrap()
        .correct_answer()
        .to_string();
    session.record_answer(&correct).expect("answer q1");
    session.advance().expect("advance to q2");

    // Q2 times out
    run_out_the_clock(&mut session);
    assert_eq!(session.time_remaining(), 0);
    assert!(!session.countdown_running());
    session.advance().expect("advance to q3");
    assert_eq!(session.time_remaining(), TIME_BUDGET);

    // Q3 incorrect
    let wrong = wrong_option(&session);
    session.record_answer(&wrong).expect("answer q3");
    assert_eq!(session.advance().expect("finish"), Phase::Terminal);

    assert_eq!(session.score(), 1);
    let q2 = session.answer(1).expect("q2 record");
    assert!(q2.timed_out);
    assert_eq!(q2.selected_option, None);
    let q3 = session.answer(2).expect("q3 record");
    assert!(!q3.is_correct);
    assert!(!q3.timed_out);

    let results = session.results().expect("results");
    assert_eq!(results.score, 1);
    assert_eq!(results.total, 3);
    assert_eq!(results.percentage, 33);
}

#[test]
fn failing_response_code_returns_to_configuring_with_message() {
    let mut session = Session::new();
    session
        .configure(&ConfigUpdate::default().amount(20).category(Some(13)))
        .unwrap();
    let request = session.begin().unwrap();

    session
        .complete_fetch(request.ticket, Err(FetchError::from_response_code(1)))
        .expect("failure is applied, not rejected");

    assert_eq!(session.phase(), Phase::Configuring);
    let message = session.last_error().expect("error kept for display");
    assert!(!message.is_empty());
    assert!(message.starts_with("Failed to load questions"));
    assert!(session.questions().is_empty());
    // configuration survives for the retry
    assert_eq!(session.config().amount, 20);
    assert_eq!(session.config().category, Some(13));

    // retry clears the message
    session.begin().expect("retry");
    assert_eq!(session.last_error(), None);
}

#[test]
fn empty_batch_is_treated_as_a_failed_fetch() {
    let mut session = Session::new();
    let request = session.begin().unwrap();
    session.complete_fetch(request.ticket, Ok(Vec::new())).unwrap();
    assert_eq!(session.phase(), Phase::Configuring);
    assert!(session.last_error().is_some());
}

#[test]
fn superseded_fetch_result_is_discarded() {
    let mut session = Session::new();
    let first = session.begin().unwrap();
    let second = session.begin().unwrap();

    let second_batch = batch(2, 100);
    session
        .complete_fetch(second.ticket, Ok(second_batch.clone()))
        .expect("newest ticket applies");

    let late = session.complete_fetch(first.ticket, Ok(batch(5, 200)));
    assert!(matches!(late, Err(SessionError::StaleFetch { .. })));
    assert_eq!(session.questions(), second_batch.as_slice());
    assert_eq!(session.phase(), Phase::Presenting { index: 0 });
}

#[test]
fn stale_result_arriving_first_does_not_populate() {
    let mut session = Session::new();
    let first = session.begin().unwrap();
    let second = session.begin().unwrap();

    let err = session
        .complete_fetch(first.ticket, Ok(batch(3, 1)))
        .unwrap_err();
    assert!(matches!(err, SessionError::StaleFetch { .. }));
    assert_eq!(session.phase(), Phase::Loading);
    assert!(session.questions().is_empty());

    session.complete_fetch(second.ticket, Ok(batch(1, 2))).unwrap();
    assert_eq!(session.questions().len(), 1);
}

#[test]
fn second_answer_for_same_question_is_rejected_without_change() {
    let mut session = started(2);
    let correct = session
        .current_question()
        .unwrap()
        .correct_answer()
        .to_string();
    session.record_answer(&correct).unwrap();

    let score = session.score();
    let record = session.answer(0).cloned();
    let wrong = wrong_option(&session);
    let err = session.record_answer(&wrong).unwrap_err();

    assert!(matches!(err, SessionError::InvalidTransition { .. }));
    assert_eq!(session.score(), score);
    assert_eq!(session.answer(0).cloned(), record);
}

#[test]
fn timeout_after_answer_is_rejected() {
    let mut session = started(1);
    session.select_option(0).unwrap();
    let err = session.record_timeout().unwrap_err();
    assert!(matches!(err, SessionError::InvalidTransition { .. }));
    assert!(!session.answer(0).unwrap().timed_out);
}

#[test]
fn answer_after_timeout_is_rejected() {
    let mut session = started(1);
    run_out_the_clock(&mut session);
    let err = session.select_option(0).unwrap_err();
    assert!(matches!(err, SessionError::InvalidTransition { .. }));
    assert_eq!(session.score(), 0);
}

#[test]
fn timeout_before_the_clock_runs_out_is_rejected() {
    let mut session = started(1);
    let err = session.record_timeout().unwrap_err();
    assert!(matches!(err, SessionError::InvalidTransition { .. }));
    assert!(session.answer(0).is_none());
    assert!(session.countdown_running());
}

#[test]
fn advance_requires_an_answer_record() {
    let mut session = started(2);
    let err = session.advance().unwrap_err();
    assert!(matches!(err, SessionError::InvalidTransition { .. }));
    assert_eq!(session.phase(), Phase::Presenting { index: 0 });
}

#[test]
fn advance_from_last_question_reaches_terminal_and_locks_input() {
    let mut session = started(2);
    session.select_option(0).unwrap();
    assert_eq!(session.advance().unwrap(), Phase::Presenting { index: 1 });
    session.select_option(1).unwrap();
    assert_eq!(session.advance().unwrap(), Phase::Terminal);
    assert_eq!(session.current_index(), session.questions().len());

    assert!(session.select_option(0).is_err());
    assert!(session.tick().is_err());
    assert!(session.record_timeout().is_err());
    assert!(session.advance().is_err());
    assert!(!session.countdown_running());
}

#[test]
fn restart_replays_same_questions_in_same_option_order() {
    let mut session = started(3);
    let before = session.questions().to_vec();
    for _ in 0..3 {
        session.select_option(0).unwrap();
        session.advance().unwrap();
    }
    assert_eq!(session.phase(), Phase::Terminal);

    session.restart().expect("restart from terminal");
    assert_eq!(session.phase(), Phase::Presenting { index: 0 });
    assert_eq!(session.score(), 0);
    assert!(session.answers().is_empty());
    assert_eq!(session.time_remaining(), TIME_BUDGET);
    assert!(session.countdown_running());
    assert_eq!(session.questions(), before.as_slice());
}

#[test]
fn restart_outside_terminal_is_rejected() {
    let mut session = started(2);
    assert!(session.restart().is_err());
    assert_eq!(session.phase(), Phase::Presenting { index: 0 });
}

#[test]
fn new_quiz_discards_everything_from_any_phase() {
    let mut session = started(2);
    session
        .select_option(0)
        .expect("answer before abandoning");
    session.new_quiz();

    assert_eq!(session.phase(), Phase::Configuring);
    assert!(session.questions().is_empty());
    assert!(session.answers().is_empty());
    assert_eq!(session.score(), 0);
    assert_eq!(session.config().amount, 10);
    assert!(!session.countdown_running());

    // a fetch issued before new_quiz can no longer land
    let mut loading = Session::new();
    let request = loading.begin().unwrap();
    loading.new_quiz();
    assert!(matches!(
        loading.complete_fetch(request.ticket, Ok(batch(1, 1))),
        Err(SessionError::StaleFetch { .. })
    ));
    assert_eq!(loading.phase(), Phase::Configuring);
}

#[test]
fn score_always_matches_correct_records() {
    let mut session = started(10);
    for i in 0..10 {
        if i % 3 == 0 {
            run_out_the_clock(&mut session);
        } else if i % 2 == 0 {
            let correct = session
                .current_question()
                .unwrap()
                .correct_answer()
                .to_string();
            session.record_answer(&correct).unwrap();
        } else {
            let wrong = wrong_option(&session);
            session.record_answer(&wrong).unwrap();
        }
        let correct_records = session.answers().values().filter(|a| a.is_correct).count();
        assert_eq!(session.score(), correct_records);
        session.advance().unwrap();
    }
    assert_eq!(session.phase(), Phase::Terminal);
    assert_eq!(session.answers().len(), 10);
}

#[test]
fn begin_is_rejected_while_playing() {
    let mut session = started(1);
    let ticket = session.current_ticket();
    assert!(session.begin().is_err());
    assert_eq!(session.current_ticket(), ticket);
}
