//! Referring expressions: the surface form of every entity mention.
//!
//! Forms are decided per paragraph, in reading order, after aggregation so
//! that elided mentions do not count. The first mention of an entity is
//! always a full description. Later mentions use a pronoun unless another
//! entity of the same class has been mentioned in the paragraph, in which
//! case an ordinal keeps them apart ("the second author"). The reader is
//! always named in full.

use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::{DependencyTree, RefForm};
use crate::graph::NodeId;

/// Per-paragraph reference resolution.
#[derive(Debug, Clone, Default)]
pub struct ReferringExpressions {
    user: Option<NodeId>,
}

/// Bookkeeping for one paragraph.
#[derive(Default)]
struct Seen {
    mentioned: BTreeSet<NodeId>,
    ordinals: BTreeMap<NodeId, u32>,
    next_ordinal: BTreeMap<String, u32>,
    per_class: BTreeMap<String, BTreeSet<NodeId>>,
}

impl Seen {
    /// Stable ordinal for `node`: 0 for the topic, otherwise numbered from 1
    /// within its class in order of first mention.
    fn ordinal(&mut self, node: NodeId, class: &str, topic: NodeId) -> u32 {
        if node == topic {
            return 0;
        }
        if let Some(&n) = self.ordinals.get(&node) {
            return n;
        }
        let next = self.next_ordinal.entry(class.to_string()).or_insert(1);
        let n = *next;
        *next += 1;
        self.ordinals.insert(node, n);
        n
    }
}

impl ReferringExpressions {
    pub fn new(user: Option<NodeId>) -> Self {
        Self { user }
    }

    /// Assign a form to every visible, non-relative reference in the
    /// paragraph's sentences.
    pub fn resolve_paragraph(&self, topic: NodeId, trees: &mut [DependencyTree]) {
        let mut seen = Seen::default();
        for tree in trees.iter_mut() {
            for id in tree.references() {
                if tree.is_elided(id) {
                    continue;
                }
                let Some(node) = tree.node(id).sem else {
                    continue;
                };
                let Some(class) = tree.node(id).reference().map(|r| r.class.clone()) else {
                    continue;
                };
                if matches!(
                    tree.node(id).reference().and_then(|r| r.form),
                    Some(RefForm::Relative(_))
                ) {
                    continue;
                }

                let ordinal = seen.ordinal(node, &class, topic);
                let distinct = {
                    let ids = seen.per_class.entry(class).or_default();
                    ids.insert(node);
                    ids.len()
                };
                let first = seen.mentioned.insert(node);
                let form = if Some(node) == self.user || first {
                    RefForm::Full
                } else if node == topic {
                    RefForm::Pronoun
                } else if distinct > 1 {
                    RefForm::Ordinal(ordinal)
                } else {
                    RefForm::Pronoun
                };
                tracing::trace!(%node, ?form, "referring expression");

                if let Some(r) = tree.node_mut(id).reference_mut() {
                    r.form = Some(form);
                    r.ordinal = ordinal;
                    r.topic = node == topic;
                }
            }
        }
    }
}
