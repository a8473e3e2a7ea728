use std::path::PathBuf;

use thiserror::Error;

use crate::pool::ContentKind;

/// A picked answer set that breaks the question's correctness contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("question does not have enough correct answers: {question} ({found} found, {required} required)")]
    TooFewCorrect {
        question: String,
        found: usize,
        required: usize,
    },
    #[error("tile does not have a correct answer: {tile} (question: {question})")]
    UncoveredTile { question: String, tile: String },
}

/// Every failure of a generation run. None of these are recovered from inside
/// the engine; the run either completes or stops at the first error.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("type constraint violated for {what}: {reason}")]
    TypeConstraint { what: String, reason: String },

    #[error("duplicate {kind} in group \"{group}\": {item}")]
    Duplicate {
        kind: ContentKind,
        group: String,
        item: String,
    },

    #[error("wrong number of answers picked for question: {question} (got {actual}, expected {expected})")]
    AnswerCount {
        question: String,
        expected: usize,
        actual: usize,
    },

    #[error("question ({question}) picked unknown answer: {answer}")]
    UnknownAnswer { question: String, answer: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no artifact was drawn: {}", path.display())]
    MissingArtifact { path: PathBuf },

    #[error("rendering {} failed: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    pub fn type_constraint(what: impl Into<String>, reason: impl Into<String>) -> Self {
        GeneratorError::TypeConstraint {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = GeneratorError> = std::result::Result<T, E>;
