//! Text rendering of quiz screens.
//!
//! Each function writes one screen from a [`SessionSnapshot`]; the play loop
//! decides when a screen needs redrawing.

use std::io::{self, Write};
use trivium_bank::Category;
use trivium_engine::results::QuizResults;
use trivium_engine::session::{AnswerRecord, QuestionView, SessionSnapshot};

/// Remaining seconds at which a warning line is printed.
pub const TIME_WARNINGS: &[u32] = &[10, 5];

pub fn option_label(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// `[#####-----]` style bar for `progress` in `0.0..=1.0`.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn render_question(out: &mut dyn Write, snapshot: &SessionSnapshot) -> io::Result<()> {
    let Some(view) = snapshot.question.as_ref() else {
        return Ok(());
    };
    writeln!(out)?;
    writeln!(
        out,
        "Question {}/{} {}  Score: {}  Time: {}s",
        view.number,
        snapshot.total_questions,
        progress_bar(snapshot.progress, 20),
        snapshot.score,
        snapshot.time_remaining
    )?;
    writeln!(out, "{} ({})", view.category, view.difficulty)?;
    writeln!(out, "{}", view.prompt)?;
    for (i, option) in view.options.iter().enumerate() {
        writeln!(out, "  {}) {}", option_label(i), option)?;
    }
    write!(out, "Your answer: ")?;
    out.flush()
}

pub fn render_feedback(out: &mut dyn Write, snapshot: &SessionSnapshot) -> io::Result<()> {
    let (Some(view), Some(record)) = (snapshot.question.as_ref(), snapshot.answer.as_ref()) else {
        return Ok(());
    };
    writeln!(out)?;
    writeln!(out, "{}", feedback_line(view, record))?;
    writeln!(
        out,
        "Score: {}/{}",
        snapshot.score, snapshot.total_questions
    )?;
    let next = if view.number >= snapshot.total_questions {
        "see your results"
    } else {
        "continue"
    };
    write!(out, "Press Enter to {} (q to quit): ", next)?;
    out.flush()
}

pub fn feedback_line(view: &QuestionView, record: &AnswerRecord) -> String {
    let correct = view
        .correct_option
        .and_then(|i| view.options.get(i).map(|o| (i, o)));
    let reveal = match correct {
        Some((i, text)) => format!("{}) {}", option_label(i), text),
        None => "unknown".to_string(),
    };
    if record.timed_out {
        format!("Time's up! The correct answer was {}", reveal)
    } else if record.is_correct {
        "Correct!".to_string()
    } else {
        format!("Wrong. The correct answer was {}", reveal)
    }
}

pub fn render_results(out: &mut dyn Write, results: &QuizResults) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Quiz Completed!")?;
    writeln!(
        out,
        "Your Score: {}/{} ({}%)",
        results.score, results.total, results.percentage
    )?;
    writeln!(out)?;
    writeln!(out, "Question Breakdown:")?;
    for outcome in &results.breakdown {
        let mark = if outcome.is_correct { "+" } else { "x" };
        writeln!(out, "{} Q{}: {}", mark, outcome.number, outcome.prompt)?;
        if !outcome.is_correct {
            let yours = match (&outcome.selected, outcome.timed_out) {
                (Some(selected), _) => selected.as_str(),
                (None, true) => "Time expired",
                (None, false) => "No answer",
            };
            writeln!(out, "    Your answer: {}", yours)?;
        }
        writeln!(out, "    Correct answer: {}", outcome.correct_answer)?;
    }
    writeln!(out)?;
    write!(out, "r) Play again  n) New quiz  q) Quit: ")?;
    out.flush()
}

pub fn render_load_failure(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", message)?;
    write!(out, "r) Try again  q) Quit: ")?;
    out.flush()
}

pub fn format_time_warning(remaining: u32) -> String {
    format!("{} seconds left!", remaining)
}

pub fn render_categories(out: &mut dyn Write, categories: &[Category]) -> io::Result<()> {
    let width = categories
        .iter()
        .map(|c| c.id.to_string().len())
        .max()
        .unwrap_or(2);
    for category in categories {
        writeln!(out, "{:>width$}  {}", category.id, category.name, width = width)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivium_engine::results::QuestionOutcome;

    fn view(correct: Option<usize>) -> QuestionView {
        QuestionView {
            number: 1,
            prompt: "Largest planet?".into(),
            options: vec!["Mars".into(), "Jupiter".into(), "Venus".into(), "Mercury".into()],
            category: "Science".into(),
            difficulty: "easy".into(),
            correct_option: correct,
        }
    }

    #[test]
    fn labels_and_progress() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
        assert_eq!(progress_bar(0.5, 10), "[#####-----]");
        assert_eq!(progress_bar(1.5, 4), "[####]");
    }

    #[test]
    fn feedback_reveals_correct_option() {
        let wrong = AnswerRecord {
            selected_option: Some("Mars".into()),
            is_correct: false,
            timed_out: false,
        };
        assert_eq!(
            feedback_line(&view(Some(1)), &wrong),
            "Wrong. The correct answer was B) Jupiter"
        );

        let timeout = AnswerRecord {
            selected_option: None,
            is_correct: false,
            timed_out: true,
        };
        assert!(feedback_line(&view(Some(1)), &timeout).starts_with("Time's up!"));
    }

    #[test]
    fn results_list_timeouts_as_expired() {
        let results = QuizResults {
            score: 1,
            total: 2,
            percentage: 50,
            breakdown: vec![
                QuestionOutcome {
                    number: 1,
                    prompt: "Largest planet?".into(),
                    correct_answer: "Jupiter".into(),
                    selected: Some("Jupiter".into()),
                    is_correct: true,
                    timed_out: false,
                },
                QuestionOutcome {
                    number: 2,
                    prompt: "Smallest planet?".into(),
                    correct_answer: "Mercury".into(),
                    selected: None,
                    is_correct: false,
                    timed_out: true,
                },
            ],
        };
        let mut out = Vec::new();
        render_results(&mut out, &results).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Your Score: 1/2 (50%)"));
        assert!(text.contains("Your answer: Time expired"));
        assert_eq!(text.matches("Your answer:").count(), 1);
    }

    #[test]
    fn categories_align_ids() {
        let mut out = Vec::new();
        render_categories(
            &mut out,
            &[
                Category {
                    id: 9,
                    name: "General Knowledge".into(),
                },
                Category {
                    id: 18,
                    name: "Science: Computers".into(),
                },
            ],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            " 9  General Knowledge\n18  Science: Computers\n"
        );
    }
}
