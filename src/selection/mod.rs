pub mod puzzle;
pub mod quiz;

use std::cmp::Ordering;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::content::{Answer, Question};
use crate::error::ValidationError;
use crate::pool::Shared;

pub use puzzle::PuzzleSelector;
pub use quiz::QuizSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SelectorKind {
    Quiz,
    Puzzle,
}

/// Answers picked for one question, in natural answer order.
#[derive(Debug)]
pub struct Pick<A> {
    pub answers: Vec<Shared<A>>,
    /// Correct answers among `answers`, as counted during selection.
    pub num_correct: usize,
}

/// Where a tile sits on the puzzle and which picked answer covers it.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub label: String,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub scaling: f64,
    /// Filename of the first picked answer matching the tile.
    pub answer: Option<String>,
}

/// Strategy for attaching answers to questions of one content variant.
pub trait AnswerSelector {
    type Question: Question;

    fn kind(&self) -> SelectorKind;

    /// Greedy pick of up to `num_answers_normalized()` answers from `candidates`.
    /// Returns fewer when the pool cannot supply enough; the caller decides
    /// whether that is fatal.
    fn pick_answers(
        &self,
        question: &Self::Question,
        candidates: &[Shared<<Self::Question as Question>::Answer>],
        rng: &mut dyn RngCore,
    ) -> Pick<<Self::Question as Question>::Answer>;

    fn validate(
        &self,
        question: &Self::Question,
        picked: &[Shared<<Self::Question as Question>::Answer>],
    ) -> Result<(), ValidationError>;

    fn is_correct_answer(
        &self,
        question: &Self::Question,
        answer: &<Self::Question as Question>::Answer,
    ) -> bool;

    /// Count written to the report: the advertised requirement, or what the
    /// selection achieved when the question advertises none.
    fn reported_correct_answers(
        &self,
        question: &Self::Question,
        pick: &Pick<<Self::Question as Question>::Answer>,
    ) -> Option<usize>;

    fn tile_placements(
        &self,
        _question: &Self::Question,
        _picked: &[Shared<<Self::Question as Question>::Answer>],
    ) -> Vec<TilePlacement> {
        Vec::new()
    }
}

/// How strongly a question wants an answer. Correct answers always outrank
/// incorrect ones; within each class a higher proximity wins.
#[derive(Debug, Clone, Copy)]
pub struct Favorability {
    pub correct: bool,
    pub proximity: f64,
}

impl Favorability {
    pub fn new(correct: bool, proximity: f64) -> Self {
        Self { correct, proximity }
    }
}

impl PartialEq for Favorability {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Favorability {}

impl PartialOrd for Favorability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Favorability {
    fn cmp(&self, other: &Self) -> Ordering {
        self.correct
            .cmp(&other.correct)
            .then_with(|| self.proximity.total_cmp(&other.proximity))
    }
}

/// Orders candidates from most to least favorable.
///
/// Every candidate draws a random tie-break key from `rng` up front, so equal
/// favorability is resolved uniformly at random while the ordering stays a
/// consistent total order. A seeded `rng` makes the ranking reproducible.
pub fn rank_by_favorability<A, F>(
    candidates: &[Shared<A>],
    rng: &mut dyn RngCore,
    favorability: F,
) -> Vec<Shared<A>>
where
    F: Fn(&A) -> Favorability,
{
    let mut keyed: Vec<(Favorability, u64, &Shared<A>)> = candidates
        .iter()
        .map(|answer| (favorability(answer.item()), rng.gen::<u64>(), answer))
        .collect();

    keyed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    keyed.into_iter().map(|(_, _, answer)| answer.clone()).collect()
}

pub(crate) fn too_similar<A: Answer>(picked: &[Shared<A>], candidate: &A, max_similarity: f64) -> bool {
    picked
        .iter()
        .any(|answer| answer.similarity(candidate) > max_similarity)
}

pub(crate) fn sort_naturally<A: Answer>(answers: &mut [Shared<A>]) {
    answers.sort_by(|a, b| a.sort_order(b));
}
