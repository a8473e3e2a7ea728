use std::marker::PhantomData;

use rand::RngCore;
use tracing::trace;

use super::{rank_by_favorability, sort_naturally, too_similar, AnswerSelector, Favorability, Pick, SelectorKind};
use crate::content::QuizQuestion;
use crate::error::ValidationError;
use crate::pool::Shared;
use crate::validator;

/// Multiple-choice selection: a bounded number of correct answers mixed with
/// the most plausible incorrect ones.
pub struct QuizSelector<Q> {
    _question: PhantomData<fn(&Q)>,
}

impl<Q> QuizSelector<Q> {
    pub fn new() -> Self {
        Self {
            _question: PhantomData,
        }
    }
}

impl<Q> Default for QuizSelector<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: QuizQuestion> AnswerSelector for QuizSelector<Q> {
    type Question = Q;

    fn kind(&self) -> SelectorKind {
        SelectorKind::Quiz
    }

    fn pick_answers(
        &self,
        question: &Q,
        candidates: &[Shared<Q::Answer>],
        rng: &mut dyn RngCore,
    ) -> Pick<Q::Answer> {
        let num_answers = question.num_answers_normalized();
        let max_similarity = question.max_similarity();
        let max_correct = question.maximum_correct_answers();

        let ranked = rank_by_favorability(candidates, rng, |answer| {
            if question.is_correct_answer(answer) {
                Favorability::new(true, question.correct_answer_proximate(answer))
            } else {
                Favorability::new(false, question.proximate(answer))
            }
        });

        let mut picked: Vec<Shared<Q::Answer>> = Vec::with_capacity(num_answers);
        let mut num_correct = 0;

        for answer in ranked {
            if picked.len() >= num_answers {
                break;
            }
            if too_similar(&picked, &answer, max_similarity) {
                trace!("Too similar: {}", answer.item());
                continue;
            }
            let correct = question.is_correct_answer(&answer);
            if correct && num_correct >= max_correct {
                trace!("Too many correct answers, skipping: {}", answer.item());
                continue;
            }
            if correct {
                num_correct += 1;
            }
            picked.push(answer);
        }

        sort_naturally(&mut picked);
        Pick {
            answers: picked,
            num_correct,
        }
    }

    fn validate(&self, question: &Q, picked: &[Shared<Q::Answer>]) -> Result<(), ValidationError> {
        validator::validate_quiz(question, picked)
    }

    fn is_correct_answer(&self, question: &Q, answer: &Q::Answer) -> bool {
        question.is_correct_answer(answer)
    }

    fn reported_correct_answers(&self, question: &Q, pick: &Pick<Q::Answer>) -> Option<usize> {
        match question.required_correct_answers() {
            0 => Some(pick.num_correct),
            required => Some(required),
        }
    }
}
