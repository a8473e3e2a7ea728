use std::collections::{HashMap, HashSet};

use crate::content::Question;
use crate::error::{GeneratorError, Result};

/// Questions partitioned by their group key.
///
/// Groups are kept in order of first appearance and questions keep their
/// input order inside a group.
#[derive(Debug)]
pub struct Grouping<Q> {
    groups: Vec<(String, Vec<Q>)>,
    known: HashSet<String>,
}

impl<Q> Grouping<Q> {
    /// Whether some input question carried this group key.
    pub fn contains(&self, group: &str) -> bool {
        self.known.contains(group)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<(String, Vec<Q>)> {
        self.groups
    }
}

pub fn group_by<Q: Question>(questions: impl IntoIterator<Item = Q>) -> Result<Grouping<Q>> {
    let mut groups: Vec<(String, Vec<Q>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for question in questions {
        let group = question.group();
        if group.trim().is_empty() {
            return Err(GeneratorError::type_constraint(
                format!("question {question}"),
                "group key must be a non-empty string",
            ));
        }

        match index.get(group) {
            Some(&i) => groups[i].1.push(question),
            None => {
                let group = group.to_string();
                index.insert(group.clone(), groups.len());
                groups.push((group, vec![question]));
            }
        }
    }

    let known = index.into_keys().collect();
    Ok(Grouping { groups, known })
}
