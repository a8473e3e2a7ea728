use std::ops::Deref;
use std::rc::Rc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::Identity;
use crate::error::{GeneratorError, Result};
use crate::filename::FilenameAllocator;

/// What to do when an item equal to an already accepted one shows up.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail the run.
    #[default]
    Reject,
    /// Skip the duplicate and count it.
    Ignore,
    /// Keep the duplicate as well. Only valid for questions.
    Include,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
    Question,
    Answer,
}

impl ContentKind {
    pub fn prefix(&self) -> char {
        match self {
            ContentKind::Question => 'q',
            ContentKind::Answer => 'a',
        }
    }
}

/// An item admitted to a pool, together with the filename it received on
/// admission. The filename cannot change afterwards.
#[derive(Debug)]
pub struct Accepted<T> {
    item: T,
    filename: String,
}

impl<T> Accepted<T> {
    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl<T> Deref for Accepted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Accepted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.item.fmt(f)
    }
}

/// Accepted items are shared between the pool, every selection that picked
/// them and the report.
pub type Shared<T> = Rc<Accepted<T>>;

/// Insertion-ordered, duplicate-aware collection of accepted items for one group.
#[derive(Debug)]
pub struct ContentPool<T> {
    group: String,
    kind: ContentKind,
    policy: DuplicatePolicy,
    items: Vec<Shared<T>>,
    ignored: usize,
    included: usize,
}

impl<T: Identity + std::fmt::Display> ContentPool<T> {
    pub fn for_questions(group: impl Into<String>, policy: DuplicatePolicy) -> Self {
        Self::new(group.into(), ContentKind::Question, policy)
    }

    pub fn for_answers(group: impl Into<String>, policy: DuplicatePolicy) -> Result<Self> {
        if policy == DuplicatePolicy::Include {
            return Err(GeneratorError::Configuration(
                "duplicate answers cannot be included; use reject or ignore".to_string(),
            ));
        }
        Ok(Self::new(group.into(), ContentKind::Answer, policy))
    }

    fn new(group: String, kind: ContentKind, policy: DuplicatePolicy) -> Self {
        Self {
            group,
            kind,
            policy,
            items: Vec::new(),
            ignored: 0,
            included: 0,
        }
    }

    /// Offers an item to the pool. Returns whether it was admitted.
    pub fn accept(&mut self, item: T, filenames: &mut FilenameAllocator) -> Result<bool> {
        if self.contains(&item) {
            match self.policy {
                DuplicatePolicy::Ignore => {
                    debug!("Ignoring duplicate {}: {}", self.kind, item);
                    self.ignored += 1;
                    return Ok(false);
                }
                DuplicatePolicy::Include => {
                    debug!("Including duplicate {}: {}", self.kind, item);
                    self.included += 1;
                }
                DuplicatePolicy::Reject => {
                    return Err(GeneratorError::Duplicate {
                        kind: self.kind,
                        group: self.group.clone(),
                        item: item.to_string(),
                    });
                }
            }
        }

        let filename = filenames.allocate(self.kind);
        self.items.push(Rc::new(Accepted { item, filename }));
        Ok(true)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|accepted| accepted.item.is_same_as(item))
    }
}

impl<T> ContentPool<T> {
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn items(&self) -> &[Shared<T>] {
        &self.items
    }

    /// Whether this exact accepted instance belongs to the pool.
    pub fn holds(&self, item: &Shared<T>) -> bool {
        self.items.iter().any(|own| Rc::ptr_eq(own, item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ignored(&self) -> usize {
        self.ignored
    }

    pub fn included(&self) -> usize {
        self.included
    }

    pub fn into_items(self) -> Vec<Shared<T>> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fmt;

    #[derive(Debug)]
    struct Item(&'static str, u32);

    impl Identity for Item {
        fn is_same_as(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    impl fmt::Display for Item {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[test]
    fn reject_policy_fails_on_equal_item() {
        let mut alloc = FilenameAllocator::plain("svg");
        let mut pool = ContentPool::for_questions("algebra", DuplicatePolicy::Reject);

        assert!(pool.accept(Item("x", 1), &mut alloc).unwrap());
        let err = pool.accept(Item("x", 2), &mut alloc).unwrap_err();

        assert_matches!(
            err,
            GeneratorError::Duplicate { kind: ContentKind::Question, ref group, ref item }
                if group == "algebra" && item == "x"
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn ignore_policy_skips_and_counts() {
        let mut alloc = FilenameAllocator::plain("svg");
        let mut pool = ContentPool::for_answers("g", DuplicatePolicy::Ignore).unwrap();

        assert!(pool.accept(Item("a", 1), &mut alloc).unwrap());
        assert!(!pool.accept(Item("a", 2), &mut alloc).unwrap());
        assert!(pool.accept(Item("b", 3), &mut alloc).unwrap());

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.ignored(), 1);
        // Skipped items consume no filename.
        assert_eq!(alloc.allocated(), 2);
        assert_eq!(pool.items()[1].1, 3);
    }

    #[test]
    fn include_policy_keeps_duplicate_questions() {
        let mut alloc = FilenameAllocator::plain("svg");
        let mut pool = ContentPool::for_questions("g", DuplicatePolicy::Include);

        assert!(pool.accept(Item("q", 1), &mut alloc).unwrap());
        assert!(pool.accept(Item("q", 2), &mut alloc).unwrap());

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.included(), 1);
        assert_ne!(pool.items()[0].filename(), pool.items()[1].filename());
    }

    #[test]
    fn include_policy_is_rejected_for_answers() {
        let result = ContentPool::<Item>::for_answers("g", DuplicatePolicy::Include);
        assert_matches!(result, Err(GeneratorError::Configuration(_)));
    }

    #[test]
    fn acceptance_assigns_filenames_in_order() {
        let mut alloc = FilenameAllocator::plain("png");
        let mut questions = ContentPool::for_questions("g", DuplicatePolicy::Reject);
        let mut answers = ContentPool::for_answers("g", DuplicatePolicy::Reject).unwrap();

        questions.accept(Item("q", 0), &mut alloc).unwrap();
        answers.accept(Item("a", 0), &mut alloc).unwrap();
        answers.accept(Item("b", 0), &mut alloc).unwrap();

        assert_eq!(questions.items()[0].filename(), "q0000.png");
        assert_eq!(answers.items()[0].filename(), "a0001.png");
        assert_eq!(answers.items()[1].filename(), "a0002.png");
    }

    #[test]
    fn holds_compares_instances_not_equality() {
        let mut alloc = FilenameAllocator::plain("svg");
        let mut pool = ContentPool::for_answers("g", DuplicatePolicy::Reject).unwrap();
        pool.accept(Item("a", 0), &mut alloc).unwrap();

        let mut other = ContentPool::for_answers("h", DuplicatePolicy::Reject).unwrap();
        other.accept(Item("a", 0), &mut alloc).unwrap();

        assert!(pool.holds(&pool.items()[0].clone()));
        assert!(!pool.holds(&other.items()[0]));
    }
}
