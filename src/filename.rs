use sha2::{Digest, Sha256};

use crate::pool::ContentKind;

/// Hands out one filename per accepted question or answer.
///
/// A single counter is shared by questions and answers so the numbering
/// follows acceptance order across the whole run. Each run owns its own
/// allocator; nothing carries over between runs.
#[derive(Debug, Clone)]
pub struct FilenameAllocator {
    next: usize,
    extension: String,
    salt: Option<String>,
}

impl FilenameAllocator {
    /// Plain, readable filenames such as `q0000.svg`.
    pub fn plain(extension: impl Into<String>) -> Self {
        Self {
            next: 0,
            extension: extension.into(),
            salt: None,
        }
    }

    /// Filenames hashed with the given salt so they reveal nothing about
    /// drawing order or content type.
    pub fn hashed(extension: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            next: 0,
            extension: extension.into(),
            salt: Some(salt.into()),
        }
    }

    pub fn allocate(&mut self, kind: ContentKind) -> String {
        let base = format!("{}{:04}", kind.prefix(), self.next);
        self.next += 1;

        let stem = match &self.salt {
            Some(salt) => hash_name(&base, salt),
            None => base,
        };

        if self.extension.is_empty() {
            stem
        } else {
            format!("{stem}.{}", self.extension)
        }
    }

    /// Number of filenames handed out so far.
    pub fn allocated(&self) -> usize {
        self.next
    }
}

fn hash_name(base: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(base.as_bytes());
    hasher.update(salt.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn plain_names_follow_acceptance_order() {
        let mut alloc = FilenameAllocator::plain("svg");
        assert_eq!(alloc.allocate(ContentKind::Question), "q0000.svg");
        assert_eq!(alloc.allocate(ContentKind::Answer), "a0001.svg");
        assert_eq!(alloc.allocate(ContentKind::Answer), "a0002.svg");
        assert_eq!(alloc.allocate(ContentKind::Question), "q0003.svg");
        assert_eq!(alloc.allocated(), 4);
    }

    #[test]
    fn hashed_names_are_unique_and_reproducible() {
        let mut first = FilenameAllocator::hashed("png", "42");
        let mut second = FilenameAllocator::hashed("png", "42");

        let names: Vec<String> = (0..50)
            .map(|i| {
                let kind = if i % 3 == 0 {
                    ContentKind::Question
                } else {
                    ContentKind::Answer
                };
                let name = first.allocate(kind);
                assert_eq!(name, second.allocate(kind));
                name
            })
            .collect();

        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(names.iter().all(|n| n.ends_with(".png") && n.len() == 36));
    }

    #[test]
    fn salt_changes_hashed_names() {
        let mut a = FilenameAllocator::hashed("png", "1");
        let mut b = FilenameAllocator::hashed("png", "2");
        assert_ne!(
            a.allocate(ContentKind::Question),
            b.allocate(ContentKind::Question)
        );
    }

    #[test]
    fn empty_extension_leaves_bare_stem() {
        let mut alloc = FilenameAllocator::plain("");
        assert_eq!(alloc.allocate(ContentKind::Question), "q0000");
    }
}
