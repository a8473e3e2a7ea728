//! Capability traits that content supplied to the generator must implement.
//!
//! A quiz run needs questions implementing [`QuizQuestion`]; a puzzle run needs
//! [`PuzzleQuestion`]. Both share the base [`Question`] capabilities and an
//! associated [`Answer`] type.

use std::cmp::Ordering;
use std::fmt;

/// Caller-defined equality used for duplicate detection.
pub trait Identity {
    fn is_same_as(&self, other: &Self) -> bool;
}

pub trait Answer: Identity + fmt::Display {
    /// Symmetric similarity to another answer. Two answers whose similarity
    /// exceeds a question's `max_similarity` are never picked together.
    fn similarity(&self, other: &Self) -> f64;

    /// Natural ordering, used only to make the output order deterministic.
    fn sort_order(&self, other: &Self) -> Ordering;
}

pub trait Question: Identity + fmt::Display {
    type Answer: Answer;

    /// Partition key. Must not change for the lifetime of the question.
    fn group(&self) -> &str;

    /// Lower difficulty sorts first in the assembled output.
    fn difficulty(&self) -> f64;

    /// Answers this question contributes to its group's pool.
    fn make_answers(&self) -> Vec<Self::Answer>;

    fn num_answers(&self) -> usize;

    /// Number of answers that will actually be attached to the question.
    fn num_answers_normalized(&self) -> usize {
        self.num_answers()
    }

    fn max_similarity(&self) -> f64;

    /// Ranks answers among themselves; higher is more favorable.
    fn proximate(&self, _answer: &Self::Answer) -> f64 {
        0.0
    }

    fn sort_answers_randomly(&self) -> bool {
        false
    }
}

pub trait QuizQuestion: Question {
    fn is_correct_answer(&self, answer: &Self::Answer) -> bool;

    /// Minimum number of correct answers the picked set must contain.
    /// Zero means "whatever the selection achieved".
    fn required_correct_answers(&self) -> usize;

    /// Cap on correct answers picked, so the question does not get too easy.
    fn maximum_correct_answers(&self) -> usize {
        self.num_answers_normalized()
    }

    /// Ranks correct answers among themselves; higher is more favorable.
    fn correct_answer_proximate(&self, _answer: &Self::Answer) -> f64 {
        0.0
    }
}

/// A sub-region of a puzzle that must be matched by at least one picked answer.
pub trait Tile<A>: fmt::Display {
    fn is_correct_answer(&self, answer: &A) -> bool;

    fn center_x(&self) -> f64;
    fn center_y(&self) -> f64;
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn scaling(&self) -> f64 {
        1.0
    }
}

pub trait PuzzleQuestion: Question {
    type Tile: Tile<Self::Answer>;

    fn tiles(&self) -> Vec<Self::Tile>;
}
