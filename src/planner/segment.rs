//! Paragraph segmentation.
//!
//! Every non-leaf node ends up as exactly one of:
//!
//! - a **paragraph** topic, realized with its own sentences;
//! - a **relative-clause** candidate, whose single remaining fact is attached
//!   as a relative clause to a mention of it elsewhere;
//! - **absorbed**, when every one of its facts is realized by a neighbour.
//!
//! The root is always a paragraph, as is any node with at least two
//! realizable leaf facts. The rest is decided by fixed-point iteration over
//! each node's *remaining* edges (realizable edges not yet claimed by a
//! paragraph or relative-clause neighbour).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeId, EdgeView, NodeId, SemanticGraph};

use super::lexicalize::Lexicalizer;

/// Result of segmenting a graph around a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub root: NodeId,
    /// Paragraph topics in reading order.
    pub paragraphs: Vec<NodeId>,
    /// Relative-clause candidates and the edge each one realizes.
    pub relative: Vec<(NodeId, EdgeId)>,
    pub absorbed: Vec<NodeId>,
}

impl Segmentation {
    pub fn is_paragraph(&self, node: NodeId) -> bool {
        self.paragraphs.contains(&node)
    }

    /// The relative-clause candidate that reserved `edge`.
    pub fn reserved_by(&self, edge: EdgeId) -> Option<NodeId> {
        self.relative
            .iter()
            .find(|(_, e)| *e == edge)
            .map(|(n, _)| *n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Undetermined,
    Paragraph,
    Relative(EdgeId),
    Absorbed,
}

/// One realizable edge as seen from a node.
#[derive(Debug, Clone, Copy)]
struct Fact {
    edge: EdgeId,
    other: NodeId,
    leaf: bool,
}

/// Segment the graph reachable from `root`.
pub fn segment(lexicalizer: &mut Lexicalizer<'_>, root: NodeId) -> Segmentation {
    let graph = lexicalizer.graph();
    let candidates: Vec<NodeId> = graph
        .nodes()
        .filter(|n| !n.is_leaf() && (n.id == root || !n.state.is_hidden()))
        .map(|n| n.id)
        .collect();

    let mut facts: BTreeMap<NodeId, Vec<Fact>> = BTreeMap::new();
    for &node in &candidates {
        let edges: Vec<EdgeView<'_>> = lexicalizer.realizable_edges(node);
        let list = edges
            .iter()
            .filter(|e| e.source != e.target)
            .map(|e| {
                let other = e.other(node);
                Fact {
                    edge: e.id,
                    other,
                    leaf: graph.node(other).is_some_and(|n| n.is_leaf()),
                }
            })
            .collect();
        facts.insert(node, list);
    }

    let mut status: BTreeMap<NodeId, Status> = BTreeMap::new();
    for &node in &candidates {
        let leaves = facts[&node].iter().filter(|f| f.leaf).count();
        let initial = if node == root || leaves >= 2 {
            Status::Paragraph
        } else {
            Status::Undetermined
        };
        status.insert(node, initial);
    }

    let mut pass = 0usize;
    loop {
        let pending: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|n| status[n] == Status::Undetermined)
            .collect();
        if pending.is_empty() {
            break;
        }
        pass += 1;
        let mut progress = false;
        let mut most: Option<(usize, NodeId)> = None;
        for node in pending {
            let (remaining, anchored) = remaining(&facts[&node], &status);
            let next = if remaining.is_empty() {
                Status::Absorbed
            } else if remaining.len() >= 2
                || remaining
                    .iter()
                    .any(|f| status.get(&f.other) == Some(&Status::Absorbed))
            {
                Status::Paragraph
            } else if remaining[0].leaf || anchored {
                Status::Relative(remaining[0].edge)
            } else {
                Status::Undetermined
            };
            if next == Status::Undetermined {
                if most.is_none_or(|(count, _)| remaining.len() > count) {
                    most = Some((remaining.len(), node));
                }
                continue;
            }
            tracing::trace!(pass, %node, ?next, "segmented node");
            status.insert(node, next);
            progress = true;
        }
        if !progress {
            if let Some((count, node)) = most {
                tracing::debug!(%node, remaining = count, "breaking segmentation cycle");
                status.insert(node, Status::Paragraph);
            }
        }
    }

    let mut paragraphs = Vec::new();
    let mut relative = Vec::new();
    let mut absorbed = Vec::new();
    for &node in &candidates {
        match status[&node] {
            Status::Paragraph => paragraphs.push(node),
            Status::Relative(edge) => relative.push((node, edge)),
            Status::Absorbed => absorbed.push(node),
            Status::Undetermined => {}
        }
    }

    Segmentation {
        root,
        paragraphs: order_paragraphs(graph, root, paragraphs),
        relative,
        absorbed,
    }
}

/// Unclaimed facts, and whether any claimed fact leads to a paragraph.
fn remaining(facts: &[Fact], status: &BTreeMap<NodeId, Status>) -> (Vec<Fact>, bool) {
    let mut open = Vec::new();
    let mut anchored = false;
    for fact in facts {
        match status.get(&fact.other) {
            Some(Status::Paragraph) => anchored = true,
            Some(Status::Relative(edge)) if *edge == fact.edge => {}
            _ => open.push(*fact),
        }
    }
    (open, anchored)
}

/// Chain paragraphs from the root through direct neighbours, then splice
/// the leftovers next to the first paragraph they touch.
fn order_paragraphs(graph: &SemanticGraph, root: NodeId, paragraphs: Vec<NodeId>) -> Vec<NodeId> {
    let mut rest: Vec<NodeId> = paragraphs.into_iter().filter(|&p| p != root).collect();
    let mut ordered = vec![root];
    while let Some(&last) = ordered.last() {
        match rest.iter().position(|&p| graph.adjacent(last, p)) {
            Some(pos) => ordered.push(rest.remove(pos)),
            None => break,
        }
    }
    for node in rest {
        splice(graph, &mut ordered, node);
    }
    ordered
}

/// Insert `node` after the first entry adjacent to it, else at the end.
pub(crate) fn splice(graph: &SemanticGraph, order: &mut Vec<NodeId>, node: NodeId) -> usize {
    let pos = order
        .iter()
        .position(|&p| graph.adjacent(p, node))
        .map_or(order.len(), |i| i + 1);
    order.insert(pos, node);
    pos
}
