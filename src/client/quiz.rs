use std::time::Duration;

use uuid::Uuid;

use super::{ApiClient, Credential};
use crate::dto::history_dto::{CreateQuizResultPayload, QuizResultResponse};
use crate::models::quiz::QuizQuestion;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizScore {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score_percentage: f64,
}

impl QuizScore {
    /// Unanswered questions (`None`) count as wrong.
    pub fn grade(questions: &[QuizQuestion], answers: &[Option<usize>]) -> Self {
        let total_questions = questions.len();
        let correct_answers = questions
            .iter()
            .zip(answers.iter().copied().chain(std::iter::repeat(None)))
            .filter(|(q, answer)| *answer == Some(q.correct))
            .count();
        let score_percentage = if total_questions == 0 {
            0.0
        } else {
            100.0 * correct_answers as f64 / total_questions as f64
        };
        Self {
            total_questions,
            correct_answers,
            score_percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReview {
    pub question: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub correct: usize,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub score: QuizScore,
    pub review: Vec<QuestionReview>,
    /// `None` when the history write failed.
    pub recorded: Option<QuizResultResponse>,
}

pub fn review(questions: &[QuizQuestion], answers: &[Option<usize>]) -> Vec<QuestionReview> {
    questions
        .iter()
        .enumerate()
        .map(|(idx, q)| {
            let selected = answers.get(idx).copied().flatten();
            QuestionReview {
                question: q.question.clone(),
                options: q.options.clone(),
                selected,
                correct: q.correct,
                is_correct: selected == Some(q.correct),
                explanation: q.explanation.clone(),
            }
        })
        .collect()
}

/// Grades a finished quiz and records the result in history.
///
/// A failed write is logged and swallowed: the score and review are
/// always returned.
pub async fn complete_quiz(
    client: &ApiClient,
    credential: &Credential,
    session_id: Uuid,
    questions: &[QuizQuestion],
    answers: &[Option<usize>],
    time_taken: Option<Duration>,
) -> QuizOutcome {
    let score = QuizScore::grade(questions, answers);
    let review = review(questions, answers);

    let payload = CreateQuizResultPayload {
        session_id,
        total_questions: score.total_questions as i32,
        correct_answers: score.correct_answers as i32,
        score_percentage: score.score_percentage,
        time_taken_seconds: time_taken.map(|d| d.as_secs().min(i32::MAX as u64) as i32),
    };

    let recorded = match client.save_quiz_result(credential, &payload).await {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!(error = %e, %session_id, "Failed to record quiz result");
            None
        }
    };

    QuizOutcome {
        score,
        review,
        recorded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<QuizQuestion> {
        (0..5)
            .map(|i| QuizQuestion {
                question: format!("Q{}", i),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct: i % 4,
                explanation: "because".into(),
            })
            .collect()
    }

    #[test]
    fn score_is_twenty_points_per_correct_answer() {
        let qs = questions();
        for correct_count in 0..=5 {
            let answers: Vec<Option<usize>> = qs
                .iter()
                .enumerate()
                .map(|(i, q)| {
                    if i < correct_count {
                        Some(q.correct)
                    } else {
                        Some((q.correct + 1) % 4)
                    }
                })
                .collect();
            let score = QuizScore::grade(&qs, &answers);
            assert_eq!(score.total_questions, 5);
            assert_eq!(score.correct_answers, correct_count);
            assert!((score.score_percentage - 20.0 * correct_count as f64).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn three_of_five_is_sixty_percent() {
        let qs = questions();
        let answers = vec![Some(0), Some(1), Some(2), Some(0), Some(1)];
        let score = QuizScore::grade(&qs, &answers);
        assert_eq!(score.correct_answers, 3);
        assert_eq!(score.score_percentage, 60.0);
    }

    #[test]
    fn missing_answers_count_as_wrong() {
        let qs = questions();
        let score = QuizScore::grade(&qs, &[Some(0), None]);
        assert_eq!(score.correct_answers, 1);
        assert_eq!(score.score_percentage, 20.0);

        let rows = review(&qs, &[Some(0), None]);
        assert!(rows[0].is_correct);
        assert_eq!(rows[1].selected, None);
        assert!(!rows[4].is_correct);
    }
}
