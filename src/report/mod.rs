//! In-memory report handed to the report writer.

pub mod writer;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::assembler::Assembly;
use crate::content::Question;
use crate::pool::Shared;
use crate::selection::{AnswerSelector, SelectorKind, TilePlacement};

pub use writer::{write_combinations, write_preview, COMBINATIONS_FILE, PREVIEW_FILE};

pub struct ReportAnswer<A> {
    pub answer: Shared<A>,
    /// Position of the answer in the canonical (natural) order.
    pub sort: usize,
    pub is_correct: bool,
}

pub struct ReportEntry<Q: Question> {
    pub question: Shared<Q>,
    pub answers: Vec<ReportAnswer<Q::Answer>>,
    /// Quiz only: required correct answers, or the achieved count when the
    /// question requires none.
    pub required_correct_answers: Option<usize>,
    pub sort_answers_randomly: bool,
    pub tiles: Vec<TilePlacement>,
}

/// Ordered question/answer combinations of one run.
pub struct ReportModel<Q: Question> {
    pub kind: SelectorKind,
    pub sort_questions_randomly: bool,
    pub entries: Vec<ReportEntry<Q>>,
}

impl<Q: Question> ReportModel<Q> {
    pub fn build<S>(selector: &S, assembly: &Assembly<Q>, sort_questions_randomly: bool) -> Self
    where
        S: AnswerSelector<Question = Q>,
    {
        let entries = assembly
            .assignments
            .iter()
            .map(|assignment| {
                let question = &assignment.question;
                let answers = assignment
                    .pick
                    .answers
                    .iter()
                    .enumerate()
                    .map(|(sort, answer)| ReportAnswer {
                        answer: answer.clone(),
                        sort,
                        is_correct: selector.is_correct_answer(question, answer),
                    })
                    .collect();

                ReportEntry {
                    question: question.clone(),
                    answers,
                    required_correct_answers: selector.reported_correct_answers(question, &assignment.pick),
                    sort_answers_randomly: question.sort_answers_randomly(),
                    tiles: selector.tile_placements(question, &assignment.pick.answers),
                }
            })
            .collect();

        Self {
            kind: selector.kind(),
            sort_questions_randomly,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializable form of the report, referring to content by filename.
    pub fn document(&self) -> CombinationsDocument {
        let questions = self
            .entries
            .iter()
            .map(|entry| QuestionNode {
                filename: entry.question.filename().to_string(),
                required_correct_answers: entry.required_correct_answers,
                sort_answers_randomly: entry.sort_answers_randomly,
                answers: entry
                    .answers
                    .iter()
                    .map(|a| AnswerNode {
                        filename: a.answer.filename().to_string(),
                        sort: a.sort,
                        is_correct: match self.kind {
                            SelectorKind::Quiz => Some(a.is_correct),
                            SelectorKind::Puzzle => None,
                        },
                    })
                    .collect(),
                tiles: entry.tiles.iter().map(TileNode::from).collect(),
            })
            .collect();

        CombinationsDocument {
            kind: self.kind,
            sort_questions_randomly: self.sort_questions_randomly,
            questions,
        }
    }

    /// A copy for human preview. Answers of questions that allow random answer
    /// order are shuffled here; the model itself is never reordered.
    pub fn preview(&self, rng: &mut dyn RngCore) -> Vec<PreviewEntry> {
        self.entries
            .iter()
            .map(|entry| {
                let mut answers: Vec<PreviewAnswer> = entry
                    .answers
                    .iter()
                    .map(|a| PreviewAnswer {
                        filename: a.answer.filename().to_string(),
                        is_correct: a.is_correct,
                    })
                    .collect();
                if entry.sort_answers_randomly {
                    answers.shuffle(&mut *rng);
                }
                PreviewEntry {
                    question: entry.question.filename().to_string(),
                    answers,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationsDocument {
    #[serde(rename = "type")]
    pub kind: SelectorKind,
    pub sort_questions_randomly: bool,
    pub questions: Vec<QuestionNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionNode {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_correct_answers: Option<usize>,
    pub sort_answers_randomly: bool,
    pub answers: Vec<AnswerNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<TileNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerNode {
    pub filename: String,
    pub sort: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileNode {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub scaling: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl From<&TilePlacement> for TileNode {
    fn from(tile: &TilePlacement) -> Self {
        Self {
            center_x: tile.center_x,
            center_y: tile.center_y,
            width: tile.width,
            height: tile.height,
            scaling: tile.scaling,
            answer: tile.answer.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewAnswer {
    pub filename: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewEntry {
    pub question: String,
    pub answers: Vec<PreviewAnswer>,
}
