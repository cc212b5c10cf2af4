//! One attempt at a generated quiz.
//!
//! A `QuizSession` is a plain value. Every transition borrows the current
//! session and returns a new one, so callers keep (or drop) the previous
//! state themselves and a rejected transition never alters anything.
//!
//! ```
//! use training_hub::models::question::Question;
//! use training_hub::models::quiz_session::QuizSession;
//!
//! let questions = vec![
//!     Question::new("First?", vec!["A".into(), "B".into()], 0),
//!     Question::new("Second?", vec!["C".into(), "D".into()], 1),
//! ];
//! let session = QuizSession::generate(questions)?
//!     .select_answer(0, 0)?
//!     .select_answer(1, 0)?
//!     .submit()?;
//! assert_eq!(session.score(), Some(1));
//! # Ok::<(), training_hub::models::quiz_session::QuizError>(())
//! ```

use thiserror::Error;

use crate::models::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("quiz has no questions")]
    EmptyQuestionSet,

    #[error("question {index} has no option at its correct index")]
    InvalidQuestion { index: usize },

    #[error("no option {option} for question {question}")]
    InvalidIndex { question: usize, option: usize },

    #[error("{unanswered} question(s) still unanswered")]
    IncompleteAnswers { unanswered: usize },

    #[error("quiz results are already revealed")]
    AlreadyRevealed,
}

/// How a single option should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFeedback {
    Unselected,
    Selected,
    Correct,
    Incorrect,
    Dimmed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<Question>,
    selections: Vec<Option<usize>>,
    score: Option<usize>,
}

impl QuizSession {
    /// The state of a lesson view before any quiz was requested.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start a fresh, unrevealed attempt over `questions`.
    ///
    /// # Errors
    ///
    /// `EmptyQuestionSet` when `questions` is empty, `InvalidQuestion` when a
    /// question's correct index is outside its options.
    pub fn generate(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }
        if let Some(index) = questions.iter().position(|q| !q.is_well_formed()) {
            return Err(QuizError::InvalidQuestion { index });
        }

        let selections = vec![None; questions.len()];
        Ok(Self {
            questions,
            selections,
            score: None,
        })
    }

    /// Record `option_index` as the answer to `question_index`.
    ///
    /// # Errors
    ///
    /// `AlreadyRevealed` after submission, `InvalidIndex` when either index is
    /// out of range.
    pub fn select_answer(
        &self,
        question_index: usize,
        option_index: usize,
    ) -> Result<Self, QuizError> {
        if self.is_revealed() {
            return Err(QuizError::AlreadyRevealed);
        }
        let in_range = self
            .questions
            .get(question_index)
            .is_some_and(|q| option_index < q.options.len());
        if !in_range {
            return Err(QuizError::InvalidIndex {
                question: question_index,
                option: option_index,
            });
        }

        let mut next = self.clone();
        next.selections[question_index] = Some(option_index);
        Ok(next)
    }

    /// Score the attempt and freeze it for review.
    ///
    /// # Errors
    ///
    /// `EmptyQuestionSet` for an empty session, `AlreadyRevealed` when already
    /// submitted, `IncompleteAnswers` while any question is unanswered.
    pub fn submit(&self) -> Result<Self, QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }
        if self.is_revealed() {
            return Err(QuizError::AlreadyRevealed);
        }
        let unanswered = self.len() - self.answered_count();
        if unanswered > 0 {
            return Err(QuizError::IncompleteAnswers { unanswered });
        }

        let score = self
            .questions
            .iter()
            .zip(&self.selections)
            .filter(|(q, sel)| **sel == Some(q.correct_option_index))
            .count();

        let mut next = self.clone();
        next.score = Some(score);
        Ok(next)
    }

    /// Discard everything and return to the empty state.
    pub fn reset(&self) -> Self {
        Self::empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn selections(&self) -> &[Option<usize>] {
        &self.selections
    }

    pub fn selection(&self, question_index: usize) -> Option<usize> {
        self.selections.get(question_index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_revealed(&self) -> bool {
        self.score.is_some()
    }

    pub fn score(&self) -> Option<usize> {
        self.score
    }

    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    /// True when submission would be accepted.
    pub fn is_complete(&self) -> bool {
        !self.is_empty() && self.answered_count() == self.len()
    }

    pub fn is_perfect(&self) -> bool {
        self.score == Some(self.len()) && !self.is_empty()
    }

    pub fn feedback(&self, question_index: usize, option_index: usize) -> OptionFeedback {
        let selected = self.selection(question_index) == Some(option_index);
        if !self.is_revealed() {
            return if selected {
                OptionFeedback::Selected
            } else {
                OptionFeedback::Unselected
            };
        }

        let correct = self
            .questions
            .get(question_index)
            .is_some_and(|q| q.correct_option_index == option_index);
        match (correct, selected) {
            (true, _) => OptionFeedback::Correct,
            (false, true) => OptionFeedback::Incorrect,
            (false, false) => OptionFeedback::Dimmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_questions() -> Vec<Question> {
        vec![
            Question::new("q1", vec!["A".into(), "B".into()], 0),
            Question::new("q2", vec!["C".into(), "D".into()], 1),
        ]
    }

    #[test]
    fn generate_rejects_malformed_question() {
        let mut questions = two_questions();
        questions[1].correct_option_index = 5;
        assert_eq!(
            QuizSession::generate(questions),
            Err(QuizError::InvalidQuestion { index: 1 })
        );
    }

    #[test]
    fn submit_reports_unanswered_count() {
        let session = QuizSession::generate(two_questions()).unwrap();
        let err = session.submit().unwrap_err();
        assert_eq!(err, QuizError::IncompleteAnswers { unanswered: 2 });
    }

    #[test]
    fn submit_on_empty_session_is_rejected() {
        assert_eq!(
            QuizSession::empty().submit(),
            Err(QuizError::EmptyQuestionSet)
        );
    }

    #[test]
    fn feedback_before_and_after_reveal() {
        let session = QuizSession::generate(two_questions())
            .unwrap()
            .select_answer(0, 1)
            .unwrap()
            .select_answer(1, 1)
            .unwrap();
        assert_eq!(session.feedback(0, 1), OptionFeedback::Selected);
        assert_eq!(session.feedback(0, 0), OptionFeedback::Unselected);

        let revealed = session.submit().unwrap();
        assert_eq!(revealed.feedback(0, 0), OptionFeedback::Correct);
        assert_eq!(revealed.feedback(0, 1), OptionFeedback::Incorrect);
        assert_eq!(revealed.feedback(1, 0), OptionFeedback::Dimmed);
        assert_eq!(revealed.feedback(1, 1), OptionFeedback::Correct);
        assert!(!revealed.is_perfect());
    }

    #[test]
    fn second_submit_is_rejected() {
        let revealed = QuizSession::generate(two_questions())
            .unwrap()
            .select_answer(0, 0)
            .unwrap()
            .select_answer(1, 1)
            .unwrap()
            .submit()
            .unwrap();
        assert!(revealed.is_perfect());
        assert_eq!(revealed.submit(), Err(QuizError::AlreadyRevealed));
    }
}
