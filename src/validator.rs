use crate::content::{PuzzleQuestion, QuizQuestion, Tile};
use crate::error::ValidationError;
use crate::pool::Shared;

/// Fails unless at least `required_correct_answers()` of the picked answers
/// are correct.
pub fn validate_quiz<Q: QuizQuestion>(question: &Q, picked: &[Shared<Q::Answer>]) -> Result<(), ValidationError> {
    let required = question.required_correct_answers();
    let found = picked
        .iter()
        .filter(|answer| question.is_correct_answer(answer))
        .count();

    if found < required {
        return Err(ValidationError::TooFewCorrect {
            question: question.to_string(),
            found,
            required,
        });
    }
    Ok(())
}

/// Fails on the first tile that none of the picked answers matches.
pub fn validate_puzzle<Q: PuzzleQuestion>(question: &Q, picked: &[Shared<Q::Answer>]) -> Result<(), ValidationError> {
    for tile in question.tiles() {
        if !picked.iter().any(|answer| tile.is_correct_answer(answer)) {
            return Err(ValidationError::UncoveredTile {
                question: question.to_string(),
                tile: tile.to_string(),
            });
        }
    }
    Ok(())
}
