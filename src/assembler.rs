use std::collections::BTreeMap;

use rand::RngCore;
use tracing::{debug, info};

use crate::content::Question;
use crate::error::{GeneratorError, Result};
use crate::filename::FilenameAllocator;
use crate::grouper;
use crate::pool::{ContentPool, DuplicatePolicy, Shared};
use crate::selection::{AnswerSelector, Pick};

type AnswerOf<S> = <<S as AnswerSelector>::Question as Question>::Answer;

/// Answers injected into a group's pool independently of any question.
pub type ExtraAnswers<A> = BTreeMap<String, Vec<A>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameScheme {
    /// `q0000`, `a0001`, ... Handy when debugging content.
    Plain,
    Hashed { salt: String },
}

#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    pub duplicate_questions: DuplicatePolicy,
    pub duplicate_answers: DuplicatePolicy,
    pub filenames: FilenameScheme,
    /// Extension appended to every allocated filename.
    pub extension: String,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            duplicate_questions: DuplicatePolicy::Reject,
            duplicate_answers: DuplicatePolicy::Reject,
            filenames: FilenameScheme::Plain,
            extension: "svg".to_string(),
        }
    }
}

impl AssemblyOptions {
    fn allocator(&self) -> FilenameAllocator {
        match &self.filenames {
            FilenameScheme::Plain => FilenameAllocator::plain(self.extension.clone()),
            FilenameScheme::Hashed { salt } => FilenameAllocator::hashed(self.extension.clone(), salt.clone()),
        }
    }
}

/// Duplicate counters of a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateStats {
    pub questions_ignored: usize,
    pub questions_included: usize,
    pub answers_ignored: usize,
}

/// A question together with the answers picked for it.
pub struct Assignment<Q: Question> {
    pub group: String,
    pub question: Shared<Q>,
    pub pick: Pick<Q::Answer>,
}

/// Result of one run: every assignment sorted by difficulty, plus every
/// accepted question and answer in acceptance order.
pub struct Assembly<Q: Question> {
    pub assignments: Vec<Assignment<Q>>,
    pub questions: Vec<Shared<Q>>,
    pub answers: Vec<Shared<Q::Answer>>,
    pub stats: DuplicateStats,
}

pub struct Assembler<S: AnswerSelector> {
    selector: S,
    options: AssemblyOptions,
}

impl<S: AnswerSelector> Assembler<S> {
    pub fn new(selector: S, options: AssemblyOptions) -> Self {
        Self { selector, options }
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Groups, deduplicates, selects and validates in one pass.
    ///
    /// All state (pools, counters, filename sequence) lives for this call only,
    /// so consecutive runs are independent. Any violation aborts the whole run.
    pub fn assemble(
        &self,
        questions: Vec<S::Question>,
        mut extra_answers: ExtraAnswers<AnswerOf<S>>,
        rng: &mut dyn RngCore,
    ) -> Result<Assembly<S::Question>> {
        let grouping = grouper::group_by(questions)?;
        info!("Mapped questions into {} groups", grouping.len());

        if let Some(unknown) = extra_answers.keys().find(|group| !grouping.contains(group)) {
            return Err(GeneratorError::Configuration(format!(
                "extra answer group \"{unknown}\" is not a valid question group"
            )));
        }

        let mut filenames = self.options.allocator();
        let mut stats = DuplicateStats::default();
        let mut assignments = Vec::new();
        let mut all_questions = Vec::new();
        let mut all_answers = Vec::new();

        for (group, raw) in grouping.into_groups() {
            info!("Processing {} questions in group \"{}\"", raw.len(), group);
            let extras = extra_answers.remove(&group).unwrap_or_default();
            let (questions, answers) = self.fetch(&group, raw, extras, &mut filenames)?;
            info!(
                "Group \"{}\" consists of {} questions and {} answers",
                group,
                questions.len(),
                answers.len()
            );

            for (i, question) in questions.items().iter().enumerate() {
                debug!(
                    "Picking answers for question {} of {}: {}",
                    i + 1,
                    questions.len(),
                    question.item()
                );
                let expected = question.num_answers_normalized();
                let pick = self.selector.pick_answers(question, answers.items(), rng);

                if pick.answers.len() != expected {
                    return Err(GeneratorError::AnswerCount {
                        question: question.to_string(),
                        expected,
                        actual: pick.answers.len(),
                    });
                }
                if let Some(stray) = pick.answers.iter().find(|answer| !answers.holds(answer)) {
                    return Err(GeneratorError::UnknownAnswer {
                        question: question.to_string(),
                        answer: stray.to_string(),
                    });
                }

                self.selector.validate(question, &pick.answers)?;
                assignments.push(Assignment {
                    group: group.clone(),
                    question: question.clone(),
                    pick,
                });
            }

            stats.questions_ignored += questions.ignored();
            stats.questions_included += questions.included();
            stats.answers_ignored += answers.ignored();
            all_questions.extend(questions.into_items());
            all_answers.extend(answers.into_items());
        }

        if self.options.duplicate_questions == DuplicatePolicy::Ignore
            || self.options.duplicate_answers == DuplicatePolicy::Ignore
        {
            info!(
                "{} questions and {} answers were ignored because of duplicates",
                stats.questions_ignored, stats.answers_ignored
            );
        }
        if self.options.duplicate_questions == DuplicatePolicy::Include {
            info!("{} duplicate questions were included", stats.questions_included);
        }

        info!("Sorting all {} questions by difficulty", assignments.len());
        assignments.sort_by(|a, b| a.question.difficulty().total_cmp(&b.question.difficulty()));

        Ok(Assembly {
            assignments,
            questions: all_questions,
            answers: all_answers,
            stats,
        })
    }

    /// Builds the deduplicated question and answer pools of one group.
    fn fetch(
        &self,
        group: &str,
        raw: Vec<S::Question>,
        extras: Vec<AnswerOf<S>>,
        filenames: &mut FilenameAllocator,
    ) -> Result<(ContentPool<S::Question>, ContentPool<AnswerOf<S>>)> {
        let mut questions = ContentPool::for_questions(group, self.options.duplicate_questions);
        let mut answers = ContentPool::for_answers(group, self.options.duplicate_answers)?;
        let total = raw.len();

        for (i, question) in raw.into_iter().enumerate() {
            if !questions.accept(question, filenames)? {
                continue;
            }
            let surfaced = questions
                .items()
                .last()
                .map(|accepted| accepted.make_answers())
                .unwrap_or_default();
            for answer in surfaced {
                answers.accept(answer, filenames)?;
            }
            debug!(
                "Processing {}% complete ({} of {})",
                (i + 1) * 100 / total,
                i + 1,
                total
            );
        }

        if !extras.is_empty() {
            info!("Including {} extra answers in group \"{}\"", extras.len(), group);
        }
        for answer in extras {
            debug!("Extra answer: {}", answer);
            answers.accept(answer, filenames)?;
        }

        Ok((questions, answers))
    }
}
