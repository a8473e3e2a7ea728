use std::marker::PhantomData;

use rand::RngCore;
use tracing::trace;

use super::{
    rank_by_favorability, sort_naturally, too_similar, AnswerSelector, Favorability, Pick, SelectorKind,
    TilePlacement,
};
use crate::content::{PuzzleQuestion, Tile};
use crate::error::ValidationError;
use crate::pool::Shared;
use crate::validator;

/// Tile-matching selection: one guaranteed match per tile, then the most
/// proximate remaining answers as distractors.
pub struct PuzzleSelector<Q> {
    _question: PhantomData<fn(&Q)>,
}

impl<Q> PuzzleSelector<Q> {
    pub fn new() -> Self {
        Self {
            _question: PhantomData,
        }
    }
}

impl<Q> Default for PuzzleSelector<Q> {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidates in pick order: for each tile (in tile order) the first
/// candidate matching it, followed by all other candidates ranked by proximity.
fn favorized_answers<Q: PuzzleQuestion>(
    question: &Q,
    candidates: &[Shared<Q::Answer>],
    rng: &mut dyn RngCore,
) -> Vec<Shared<Q::Answer>> {
    let mut available: Vec<Shared<Q::Answer>> = candidates.to_vec();
    let mut guaranteed = Vec::new();

    for tile in question.tiles() {
        if let Some(pos) = available.iter().position(|answer| tile.is_correct_answer(answer)) {
            guaranteed.push(available.remove(pos));
        }
    }

    let ranked = rank_by_favorability(&available, rng, |answer| {
        Favorability::new(false, question.proximate(answer))
    });

    guaranteed.into_iter().chain(ranked).collect()
}

fn matches_any_tile<Q: PuzzleQuestion>(tiles: &[Q::Tile], answer: &Q::Answer) -> bool {
    tiles.iter().any(|tile| tile.is_correct_answer(answer))
}

impl<Q: PuzzleQuestion> AnswerSelector for PuzzleSelector<Q> {
    type Question = Q;

    fn kind(&self) -> SelectorKind {
        SelectorKind::Puzzle
    }

    fn pick_answers(
        &self,
        question: &Q,
        candidates: &[Shared<Q::Answer>],
        rng: &mut dyn RngCore,
    ) -> Pick<Q::Answer> {
        let num_answers = question.num_answers_normalized();
        let max_similarity = question.max_similarity();
        let tiles = question.tiles();

        let mut picked: Vec<Shared<Q::Answer>> = Vec::with_capacity(num_answers);
        for answer in favorized_answers(question, candidates, rng) {
            if picked.len() >= num_answers {
                break;
            }
            if too_similar(&picked, &answer, max_similarity) {
                trace!("Too similar: {}", answer.item());
                continue;
            }
            picked.push(answer);
        }

        sort_naturally(&mut picked);
        let num_correct = picked
            .iter()
            .filter(|answer| matches_any_tile::<Q>(&tiles, answer))
            .count();

        Pick {
            answers: picked,
            num_correct,
        }
    }

    fn validate(&self, question: &Q, picked: &[Shared<Q::Answer>]) -> Result<(), ValidationError> {
        validator::validate_puzzle(question, picked)
    }

    fn is_correct_answer(&self, question: &Q, answer: &Q::Answer) -> bool {
        matches_any_tile::<Q>(&question.tiles(), answer)
    }

    fn reported_correct_answers(&self, _question: &Q, _pick: &Pick<Q::Answer>) -> Option<usize> {
        None
    }

    fn tile_placements(&self, question: &Q, picked: &[Shared<Q::Answer>]) -> Vec<TilePlacement> {
        question
            .tiles()
            .iter()
            .map(|tile| TilePlacement {
                label: tile.to_string(),
                center_x: tile.center_x(),
                center_y: tile.center_y(),
                width: tile.width(),
                height: tile.height(),
                scaling: tile.scaling(),
                answer: picked
                    .iter()
                    .find(|answer| tile.is_correct_answer(answer))
                    .map(|answer| answer.filename().to_string()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(cells: &[f64], num_answers: usize, max_similarity: f64) -> Grid {
        Grid {
            cells: cells.to_vec(),
            num_answers,
            max_similarity,
        }
    }

    #[test]
    fn tile_matches_come_first_even_when_least_proximate() {
        let pool = pool(&[1.0, 2.0, 10.0, 20.0, 30.0]);
        let question = grid(&[1.0, 2.0], 3, 0.5);
        let pick = PuzzleSelector::<Grid>::new().pick_answers(&question, pool.items(), &mut StdRng::seed_from_u64(2));

        // Both tile matches are guaranteed; 30 is the most proximate distractor.
        assert_eq!(values(&pick.answers), vec![1.0, 2.0, 30.0]);
        assert_eq!(pick.num_correct, 2);
    }

    #[test]
    fn each_tile_contributes_at_most_one_guaranteed_answer() {
        let question = grid(&[5.0], 2, 1.0);
        let pool = pool(&[5.0, 1.0, 2.0]);
        let mut rng = StdRng::seed_from_u64(4);

        let order = favorized_answers(&question, pool.items(), &mut rng);
        assert_eq!(values(&order), vec![5.0, 2.0, 1.0]);
    }

    #[test]
    fn guaranteed_answers_are_still_similarity_gated() {
        let pool = pool(&[1.0, 1.1, 8.0, 9.0]);
        let question = grid(&[1.0, 1.1], 3, 0.5);
        let pick = PuzzleSelector::<Grid>::new().pick_answers(&question, pool.items(), &mut StdRng::seed_from_u64(2));

        // 1.1 is too similar to 1.0 and is dropped; validation will catch it.
        assert_eq!(values(&pick.answers), vec![1.0, 8.0, 9.0]);
        assert_eq!(pick.num_correct, 1);
    }

    #[test]
    fn placements_point_at_matching_answer_filename() {
        let pool = pool(&[1.0, 2.0, 7.0]);
        let question = grid(&[2.0, 4.0], 2, 0.5);
        let selector = PuzzleSelector::<Grid>::new();
        let pick = selector.pick_answers(&question, pool.items(), &mut StdRng::seed_from_u64(2));

        let placements = selector.tile_placements(&question, &pick.answers);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].answer.as_deref(), Some(pool.items()[1].filename()));
        assert_eq!(placements[0].center_x, 2.0);
        assert_eq!(placements[0].scaling, 1.0);
        assert_eq!(placements[1].answer, None);
    }

    #[test]
    fn no_reported_correct_count_for_puzzles() {
        let pool = pool(&[1.0]);
        let question = grid(&[1.0], 1, 0.5);
        let selector = PuzzleSelector::<Grid>::new();
        let pick = selector.pick_answers(&question, pool.items(), &mut StdRng::seed_from_u64(2));
        assert_eq!(selector.reported_correct_answers(&question, &pick), None);
        assert!(selector.is_correct_answer(&question, &Num(1.0)));
        assert!(!selector.is_correct_answer(&question, &Num(2.0)));
    }
}
