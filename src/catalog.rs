//! JSON content provider used by the command line.
//!
//! A catalog declares its kind (`quiz` or `puzzle`), the questions with their
//! answers, and optional extra answers per group.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assembler::ExtraAnswers;
use crate::content::{Answer, Identity, PuzzleQuestion, Question, QuizQuestion, Tile};
use crate::error::{GeneratorError, Result};
use crate::selection::SelectorKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogAnswer {
    pub label: String,
    /// Position in feature space; similarity falls off with distance.
    #[serde(default)]
    pub features: Vec<f64>,
}

impl CatalogAnswer {
    pub fn new(label: impl Into<String>, features: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            features,
        }
    }

    fn distance(&self, other: &Self) -> f64 {
        self.features
            .iter()
            .zip_longest(other.features.iter())
            .map(|pair| match pair {
                EitherOrBoth::Both(a, b) => (a - b).powi(2),
                EitherOrBoth::Left(v) | EitherOrBoth::Right(v) => v.powi(2),
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl Identity for CatalogAnswer {
    fn is_same_as(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl fmt::Display for CatalogAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Answer for CatalogAnswer {
    fn similarity(&self, other: &Self) -> f64 {
        1.0 / (1.0 + self.distance(other))
    }

    fn sort_order(&self, other: &Self) -> Ordering {
        self.label.cmp(&other.label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTile {
    pub label: String,
    /// Labels of the answers that fit this tile.
    pub accepts: Vec<String>,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "unit_scaling")]
    pub scaling: f64,
}

fn unit_scaling() -> f64 {
    1.0
}

impl fmt::Display for CatalogTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Tile<CatalogAnswer> for CatalogTile {
    fn is_correct_answer(&self, answer: &CatalogAnswer) -> bool {
        self.accepts.iter().any(|label| *label == answer.label)
    }

    fn center_x(&self) -> f64 {
        self.center_x
    }

    fn center_y(&self) -> f64 {
        self.center_y
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn scaling(&self) -> f64 {
        self.scaling
    }
}

fn full_similarity() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuestion {
    #[serde(default)]
    pub id: String,
    pub text: String,
    pub group: String,
    #[serde(default)]
    pub difficulty: f64,
    pub num_answers: usize,
    #[serde(default = "full_similarity")]
    pub max_similarity: f64,
    #[serde(default)]
    pub required_correct_answers: usize,
    #[serde(default)]
    pub maximum_correct_answers: Option<usize>,
    #[serde(default)]
    pub sort_answers_randomly: bool,
    #[serde(default)]
    pub answers: Vec<CatalogAnswer>,
    /// Labels of the correct answers (quiz).
    #[serde(default)]
    pub correct: Vec<String>,
    /// Per-label ranking score; unlisted answers score 0.
    #[serde(default)]
    pub proximity: BTreeMap<String, f64>,
    #[serde(default)]
    pub tiles: Vec<CatalogTile>,
}

impl CatalogQuestion {
    fn score(&self, answer: &CatalogAnswer) -> f64 {
        self.proximity.get(&answer.label).copied().unwrap_or(0.0)
    }
}

impl Identity for CatalogQuestion {
    fn is_same_as(&self, other: &Self) -> bool {
        self.group == other.group && self.text == other.text
    }
}

impl fmt::Display for CatalogQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            f.write_str(&self.text)
        } else {
            f.write_str(&self.id)
        }
    }
}

impl Question for CatalogQuestion {
    type Answer = CatalogAnswer;

    fn group(&self) -> &str {
        &self.group
    }

    fn difficulty(&self) -> f64 {
        self.difficulty
    }

    fn make_answers(&self) -> Vec<CatalogAnswer> {
        self.answers.clone()
    }

    fn num_answers(&self) -> usize {
        self.num_answers
    }

    // A puzzle needs room for one answer per tile.
    fn num_answers_normalized(&self) -> usize {
        self.num_answers.max(self.tiles.len())
    }

    fn max_similarity(&self) -> f64 {
        self.max_similarity
    }

    fn proximate(&self, answer: &CatalogAnswer) -> f64 {
        self.score(answer)
    }

    fn sort_answers_randomly(&self) -> bool {
        self.sort_answers_randomly
    }
}

impl QuizQuestion for CatalogQuestion {
    fn is_correct_answer(&self, answer: &CatalogAnswer) -> bool {
        self.correct.iter().any(|label| *label == answer.label)
    }

    fn required_correct_answers(&self) -> usize {
        self.required_correct_answers
    }

    fn maximum_correct_answers(&self) -> usize {
        self.maximum_correct_answers
            .unwrap_or_else(|| self.num_answers_normalized())
    }

    fn correct_answer_proximate(&self, answer: &CatalogAnswer) -> f64 {
        self.score(answer)
    }
}

impl PuzzleQuestion for CatalogQuestion {
    type Tile = CatalogTile;

    fn tiles(&self) -> Vec<CatalogTile> {
        self.tiles.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub kind: SelectorKind,
    pub questions: Vec<CatalogQuestion>,
    #[serde(default)]
    pub extra_answers: BTreeMap<String, Vec<CatalogAnswer>>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading catalog: {}", path.display());
        let bytes = fs::read(path)?;
        let catalog: Catalog = serde_json::from_slice(&bytes)?;
        catalog.check()?;
        Ok(catalog)
    }

    pub fn parse(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.check()?;
        Ok(catalog)
    }

    pub fn into_parts(self) -> (Vec<CatalogQuestion>, ExtraAnswers<CatalogAnswer>) {
        (self.questions, self.extra_answers)
    }

    /// Rejects entries that cannot serve as content of the declared kind.
    fn check(&self) -> Result<()> {
        for question in &self.questions {
            let what = format!("question \"{question}\"");
            match self.kind {
                SelectorKind::Quiz if !question.tiles.is_empty() => {
                    return Err(GeneratorError::type_constraint(what, "quiz questions cannot declare tiles"));
                }
                SelectorKind::Puzzle if question.tiles.is_empty() => {
                    return Err(GeneratorError::type_constraint(what, "puzzle questions need at least one tile"));
                }
                _ => {}
            }
            if question.num_answers == 0 {
                return Err(GeneratorError::type_constraint(what, "num_answers must be positive"));
            }
            if !question.difficulty.is_finite() || !question.max_similarity.is_finite() {
                return Err(GeneratorError::type_constraint(
                    what,
                    "difficulty and max_similarity must be finite",
                ));
            }
            if question.proximity.values().any(|v| !v.is_finite()) {
                return Err(GeneratorError::type_constraint(what, "proximity scores must be finite"));
            }
            check_answers(&what, &question.answers)?;

            let mut seen = HashSet::new();
            if let Some(tile) = question.tiles.iter().find(|tile| !seen.insert(tile.label.as_str())) {
                return Err(GeneratorError::type_constraint(
                    what,
                    format!("tile \"{}\" is declared twice", tile.label),
                ));
            }
        }

        for (group, answers) in &self.extra_answers {
            check_answers(&format!("extra answers of group \"{group}\""), answers)?;
        }
        Ok(())
    }
}

fn check_answers(what: &str, answers: &[CatalogAnswer]) -> Result<()> {
    if let Some(answer) = answers.iter().find(|a| a.label.trim().is_empty()) {
        return Err(GeneratorError::type_constraint(
            what,
            format!("answer with features {:?} has a blank label", answer.features),
        ));
    }
    if let Some(answer) = answers.iter().find(|a| a.features.iter().any(|v| !v.is_finite())) {
        return Err(GeneratorError::type_constraint(
            what,
            format!("answer \"{}\" has non-finite features", answer.label),
        ));
    }
    Ok(())
}
