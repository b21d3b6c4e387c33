//! Structural identity between subtrees of different clauses.
//!
//! Two subtrees are identical when they have the same incoming role, the same
//! morphology, and the same content: the same word for leaves, the same bound
//! entity for references, the same slot for open slots, and for phrases the
//! same category with pairwise identical children. The relation is total over
//! every [`NodeKind`] pair.

use crate::grammar::{Cat, DependencyTree, NodeKind, Role, TreeId};

/// Whether subtree `ia` of `a` is identical to subtree `ib` of `b`.
pub fn identical(a: &DependencyTree, ia: TreeId, b: &DependencyTree, ib: TreeId) -> bool {
    let (na, nb) = (a.node(ia), b.node(ib));
    if a.role_of(ia) != b.role_of(ib) || na.morph != nb.morph {
        return false;
    }
    match (&na.kind, &nb.kind) {
        (
            NodeKind::Leaf { cat, word },
            NodeKind::Leaf {
                cat: cat_b,
                word: word_b,
            },
        ) => cat == cat_b && word == word_b,
        (NodeKind::Reference(_), NodeKind::Reference(_)) => na.sem.is_some() && na.sem == nb.sem,
        (NodeKind::Slot { slot }, NodeKind::Slot { slot: slot_b }) => slot == slot_b,
        (NodeKind::Phrase { cat }, NodeKind::Phrase { cat: cat_b }) => {
            let (ca, cb) = (a.ordered_children(ia), b.ordered_children(ib));
            cat == cat_b
                && ca.len() == cb.len()
                && ca
                    .iter()
                    .zip(&cb)
                    .all(|(x, y)| identical(a, x.child, b, y.child))
        }
        _ => false,
    }
}

/// Identity, or an OBJECT against a "by" phrase whose noun phrase is
/// identical to it (in either order).
pub fn equivalent(a: &DependencyTree, ia: TreeId, b: &DependencyTree, ib: TreeId) -> bool {
    identical(a, ia, b, ib) || object_is_agent(a, ia, b, ib) || object_is_agent(b, ib, a, ia)
}

fn object_is_agent(a: &DependencyTree, object: TreeId, b: &DependencyTree, pp: TreeId) -> bool {
    a.role_of(object) == Some(Role::Object)
        && by_agent(b, pp).is_some_and(|np| identical(a, object, b, np))
}

/// The noun phrase of a "by" PP.
fn by_agent(tree: &DependencyTree, pp: TreeId) -> Option<TreeId> {
    if tree.node(pp).cat() != Cat::Pp {
        return None;
    }
    let prep = tree.child(pp, Role::Head)?;
    if tree.node(prep).cat() != Cat::Prep || tree.node(prep).word() != Some("by") {
        return None;
    }
    tree.child(pp, Role::Object)
}

/// Matched clause-level constituents of one role in two clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMatch {
    /// Elidable nodes in the first clause.
    pub left: Vec<TreeId>,
    /// Elidable nodes in the second clause.
    pub right: Vec<TreeId>,
}

impl RoleMatch {
    /// Number of matched constituents.
    pub fn slots(&self) -> usize {
        self.left.len()
    }
}

/// Match the `role` children of two clause roots.
///
/// Every child of the role must pair with an identical child on the other
/// side. SUBJECT and OBJECT are only compared between clauses of the same
/// voice; across voices, an active OBJECT may match the noun phrase of a
/// passive clause's "by" PPMODIFIER, in which case the whole PP is elidable.
pub fn role_match(a: &DependencyTree, b: &DependencyTree, role: Role) -> Option<RoleMatch> {
    let (ra, rb) = (a.root(), b.root());
    if !a.node(ra).cat().is_clause() || !b.node(rb).cat().is_clause() {
        return None;
    }
    let same_voice = a.is_passive(ra) == b.is_passive(rb);
    if matches!(role, Role::Subject | Role::Object) && !same_voice {
        if role != Role::Object {
            return None;
        }
        return cross_voice(a, b)
            .or_else(|| cross_voice(b, a).map(|m| RoleMatch {
                left: m.right,
                right: m.left,
            }));
    }

    let left = a.children_with(ra, role);
    let right = b.children_with(rb, role);
    if left.is_empty() || left.len() != right.len() {
        return None;
    }
    let mut used = vec![false; right.len()];
    let mut paired = Vec::with_capacity(left.len());
    for &l in &left {
        let hit = right
            .iter()
            .enumerate()
            .find(|&(k, &r)| !used[k] && identical(a, l, b, r))
            .map(|(k, _)| k)?;
        used[hit] = true;
        paired.push(right[hit]);
    }
    Some(RoleMatch {
        left,
        right: paired,
    })
}

/// Active OBJECT of `active` against the "by" phrase of passive `passive`.
fn cross_voice(active: &DependencyTree, passive: &DependencyTree) -> Option<RoleMatch> {
    let (ra, rp) = (active.root(), passive.root());
    if active.is_passive(ra) || !passive.is_passive(rp) {
        return None;
    }
    if passive.child(rp, Role::Object).is_some() {
        return None;
    }
    let object = match active.children_with(ra, Role::Object).as_slice() {
        [one] => *one,
        _ => return None,
    };
    passive
        .children_with(rp, Role::PpModifier)
        .into_iter()
        .find(|&pp| object_is_agent(active, object, passive, pp))
        .map(|pp| RoleMatch {
            left: vec![object],
            right: vec![pp],
        })
}
