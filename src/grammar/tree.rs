//! Arena-backed dependency trees.
//!
//! A [`DependencyTree`] owns its nodes in a `Vec`; nodes are addressed by
//! [`TreeId`] (the arena index), so fresh ids can never collide. Parent-child
//! links are `(role, child)` pairs ([`Dep`]) stored on the parent plus a back
//! pointer on the child, which makes insert, replace and graft bounded
//! re-pointing operations.
//!
//! Nodes that become unreachable (detached, replaced) stay in the arena but
//! are never visited by traversals, which always start at the root.

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeId, NodeId};

use super::cat::{Cat, Role, Slot};
use super::error::{GrammarError, GrammarResult};

/// Index of a node inside one [`DependencyTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(u32);

impl TreeId {
    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    #[default]
    Present,
    Past,
}

/// Morphological features handed to the realizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Morph {
    pub tense: Tense,
    pub passive: bool,
    pub plural: bool,
    pub negated: bool,
    pub genitive: bool,
    pub quoted: bool,
    pub rank_ordered: bool,
    pub particle: Option<String>,
}

/// Opaque UI affordance attached to a node, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Anchor {
    /// Navigate to the entity.
    Browse { node: NodeId },
    /// Expand a summarized property ("show all 5 cities").
    Expand {
        node: NodeId,
        property: String,
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativePronoun {
    Who,
    Which,
}

impl RelativePronoun {
    pub fn word(self) -> &'static str {
        match self {
            RelativePronoun::Who => "who",
            RelativePronoun::Which => "which",
        }
    }
}

/// Resolved surface form of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "form", content = "value", rename_all = "snake_case")]
pub enum RefForm {
    /// Full description (name, or "the <noun>").
    Full,
    /// Bare personal pronoun.
    Pronoun,
    /// Ordinal-qualified repeat ("the second author").
    Ordinal(u32),
    /// Relative pronoun heading a relative clause.
    Relative(RelativePronoun),
}

/// An undetermined reference to a semantic entity.
///
/// Its surface form is chosen once per paragraph, after aggregation, by the
/// referring-expression generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Ontology class of the entity.
    pub class: String,
    /// Common noun for the class ("author", "city").
    pub noun: String,
    /// Display name, if the entity has one.
    pub name: Option<String>,
    pub person: bool,
    /// True for the paragraph's own topic.
    pub topic: bool,
    /// Per-class ordinal for same-type disambiguation; 0 for the topic.
    pub ordinal: u32,
    pub form: Option<RefForm>,
}

/// What a tree node is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// A single word.
    Leaf { cat: Cat, word: String },
    /// A phrase or clause whose content is its children.
    Phrase { cat: Cat },
    /// An entity reference resolved per paragraph.
    Reference(Reference),
    /// An unfilled template slot.
    Slot { slot: Slot },
}

/// Edge from a parent to one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dep {
    pub role: Role,
    pub child: TreeId,
}

/// One node of a dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub morph: Morph,
    /// Originating semantic node.
    pub sem: Option<NodeId>,
    /// Which template slot this node filled, if any.
    pub inserted: Option<Slot>,
    pub elided: bool,
    pub anchor: Option<Anchor>,
    /// Position among sibling conjuncts.
    pub order: u32,
    parent: Option<TreeId>,
    children: Vec<Dep>,
}

impl TreeNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            morph: Morph::default(),
            sem: None,
            inserted: None,
            elided: false,
            anchor: None,
            order: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Syntactic category; references and slots count as noun phrases.
    pub fn cat(&self) -> Cat {
        match &self.kind {
            NodeKind::Leaf { cat, .. } | NodeKind::Phrase { cat } => *cat,
            NodeKind::Reference(_) | NodeKind::Slot { .. } => Cat::Np,
        }
    }

    /// The word of a leaf.
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf { word, .. } => Some(word),
            _ => None,
        }
    }

    pub fn reference(&self) -> Option<&Reference> {
        match &self.kind {
            NodeKind::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn reference_mut(&mut self) -> Option<&mut Reference> {
        match &mut self.kind {
            NodeKind::Reference(r) => Some(r),
            _ => None,
        }
    }
}

/// Rooted dependency tree stored as an arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTree {
    nodes: Vec<TreeNode>,
    root: TreeId,
    /// Semantic edges this tree expresses.
    #[serde(default)]
    pub realizes: Vec<EdgeId>,
}

impl DependencyTree {
    /// A tree consisting of a single root node.
    pub fn new(root: NodeKind) -> Self {
        Self {
            nodes: vec![TreeNode::new(root)],
            root: TreeId(0),
            realizes: Vec::new(),
        }
    }

    /// A tree rooted in an empty main clause.
    pub fn clause() -> Self {
        Self::new(NodeKind::Phrase { cat: Cat::Smain })
    }

    pub fn root(&self) -> TreeId {
        self.root
    }

    pub fn node(&self, id: TreeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: TreeId) -> &mut TreeNode {
        &mut self.nodes[id.index()]
    }

    /// Create a detached node.
    pub fn add(&mut self, kind: NodeKind) -> TreeId {
        let id = TreeId(self.nodes.len() as u32);
        self.nodes.push(TreeNode::new(kind));
        id
    }

    /// Create a node and attach it under `parent`.
    pub fn add_child(&mut self, parent: TreeId, role: Role, kind: NodeKind) -> TreeId {
        let id = self.add(kind);
        self.attach(parent, role, id);
        id
    }

    /// Attach `child` as the last child of `parent`, detaching it first.
    pub fn attach(&mut self, parent: TreeId, role: Role, child: TreeId) {
        self.detach(child);
        self.nodes[parent.index()].children.push(Dep { role, child });
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Remove a node (and its subtree) from its parent.
    pub fn detach(&mut self, id: TreeId) {
        if let Some(parent) = self.nodes[id.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|d| d.child != id);
        }
    }

    /// Put `new` where `old` was, keeping the role. `old` ends up detached.
    pub fn replace(&mut self, old: TreeId, new: TreeId) {
        if old == new {
            return;
        }
        self.detach(new);
        match self.nodes[old.index()].parent.take() {
            Some(parent) => {
                for dep in &mut self.nodes[parent.index()].children {
                    if dep.child == old {
                        dep.child = new;
                    }
                }
                self.nodes[new.index()].parent = Some(parent);
            }
            None => {
                if self.root == old {
                    self.root = new;
                }
            }
        }
    }

    pub fn children(&self, id: TreeId) -> &[Dep] {
        &self.nodes[id.index()].children
    }

    pub fn parent(&self, id: TreeId) -> Option<TreeId> {
        self.nodes[id.index()].parent
    }

    /// Role on the incoming edge; `None` for the root and detached nodes.
    pub fn role_of(&self, id: TreeId) -> Option<Role> {
        let parent = self.parent(id)?;
        self.children(parent)
            .iter()
            .find(|d| d.child == id)
            .map(|d| d.role)
    }

    /// Relabel the incoming edge of `id`.
    pub fn set_role(&mut self, id: TreeId, role: Role) {
        if let Some(parent) = self.parent(id) {
            for dep in &mut self.nodes[parent.index()].children {
                if dep.child == id {
                    dep.role = role;
                }
            }
        }
    }

    /// Move `id` to the first position among its siblings.
    pub fn move_to_front(&mut self, id: TreeId) {
        if let Some(parent) = self.parent(id) {
            let children = &mut self.nodes[parent.index()].children;
            if let Some(pos) = children.iter().position(|d| d.child == id) {
                let dep = children.remove(pos);
                children.insert(0, dep);
            }
        }
    }

    /// First child of `parent` with `role`.
    pub fn child(&self, parent: TreeId, role: Role) -> Option<TreeId> {
        self.children(parent)
            .iter()
            .find(|d| d.role == role)
            .map(|d| d.child)
    }

    /// All children of `parent` with `role`, in order.
    pub fn children_with(&self, parent: TreeId, role: Role) -> Vec<TreeId> {
        self.children(parent)
            .iter()
            .filter(|d| d.role == role)
            .map(|d| d.child)
            .collect()
    }

    /// Children in reading order: conjuncts sorted by their explicit order,
    /// the conjunctor last; other phrases keep insertion order.
    pub fn ordered_children(&self, id: TreeId) -> Vec<Dep> {
        let mut deps = self.children(id).to_vec();
        if self.node(id).cat() == Cat::Conjunction {
            deps.sort_by_key(|d| match d.role {
                Role::Conjunct => (0, self.node(d.child).order),
                _ => (1, 0),
            });
        }
        deps
    }

    /// Deep-copy a subtree of `other` into this arena, returning the detached copy.
    pub fn graft(&mut self, other: &DependencyTree, from: TreeId) -> TreeId {
        let src = other.node(from);
        let id = self.add(src.kind.clone());
        {
            let dst = &mut self.nodes[id.index()];
            dst.morph = src.morph.clone();
            dst.sem = src.sem;
            dst.inserted = src.inserted;
            dst.elided = src.elided;
            dst.anchor = src.anchor.clone();
            dst.order = src.order;
        }
        for dep in other.children(from).to_vec() {
            let child = self.graft(other, dep.child);
            self.attach(id, dep.role, child);
        }
        id
    }

    /// Deep-copy a subtree of `other` under `parent`.
    pub fn graft_under(
        &mut self,
        parent: TreeId,
        role: Role,
        other: &DependencyTree,
        from: TreeId,
    ) -> TreeId {
        let id = self.graft(other, from);
        self.attach(parent, role, id);
        id
    }

    /// The open slot node for `slot`.
    pub fn find_slot(&self, slot: Slot) -> Option<TreeId> {
        self.preorder()
            .into_iter()
            .find(|&id| matches!(self.node(id).kind, NodeKind::Slot { slot: s } if s == slot))
    }

    /// Fill an open slot in place: the node keeps its role and position and is
    /// marked as inserted for `slot`.
    pub fn fill_slot(&mut self, slot: Slot, kind: NodeKind, sem: Option<NodeId>) -> Option<TreeId> {
        let id = self.find_slot(slot)?;
        let node = &mut self.nodes[id.index()];
        node.kind = kind;
        node.sem = sem;
        node.inserted = Some(slot);
        Some(id)
    }

    /// The conjunction `target` belongs to, creating one if needed.
    ///
    /// A non-conjunction `target` is wrapped into a fresh CONJUNCTION that takes
    /// over its role and inserted marker, with an "and" conjunctor.
    pub fn ensure_conjunction(&mut self, target: TreeId) -> TreeId {
        if self.is_conjunction(target) {
            return target;
        }
        let conj = self.add(NodeKind::Phrase {
            cat: Cat::Conjunction,
        });
        self.nodes[conj.index()].inserted = self.node(target).inserted;
        self.replace(target, conj);
        self.attach(conj, Role::Conjunct, target);
        if self.node(target).order == 0 {
            self.node_mut(target).order = 1;
        }
        self.add_child(
            conj,
            Role::Conjunctor,
            NodeKind::Leaf {
                cat: Cat::Conjunctor,
                word: "and".into(),
            },
        );
        conj
    }

    /// Add a sibling conjunct next to `target`, with an explicit order.
    pub fn append_conjunct(
        &mut self,
        target: TreeId,
        kind: NodeKind,
        sem: Option<NodeId>,
        order: u32,
    ) -> TreeId {
        let conj = self.ensure_conjunction(target);
        let inserted = self.node(conj).inserted;
        let id = self.add(kind);
        {
            let node = &mut self.nodes[id.index()];
            node.sem = sem;
            node.order = order;
            node.inserted = inserted;
        }
        self.attach(conj, Role::Conjunct, id);
        id
    }

    /// Deep-copy a subtree of `other` as the last conjunct next to `target`.
    pub fn graft_conjunct(&mut self, target: TreeId, other: &DependencyTree, from: TreeId) -> TreeId {
        let conj = self.ensure_conjunction(target);
        let order = self
            .children_with(conj, Role::Conjunct)
            .iter()
            .map(|&c| self.node(c).order)
            .max()
            .unwrap_or(0)
            + 1;
        let id = self.graft(other, from);
        self.node_mut(id).order = order;
        self.attach(conj, Role::Conjunct, id);
        id
    }

    /// All reachable nodes in pre-order, conjuncts in conjunct order.
    pub fn preorder(&self) -> Vec<TreeId> {
        self.preorder_from(self.root)
    }

    pub fn preorder_from(&self, start: TreeId) -> Vec<TreeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            for dep in self.ordered_children(id).into_iter().rev() {
                stack.push(dep.child);
            }
        }
        out
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: TreeId) -> Vec<TreeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Whether the node or any ancestor is elided.
    pub fn is_elided(&self, id: TreeId) -> bool {
        self.node(id).elided || self.ancestors(id).iter().any(|&a| self.node(a).elided)
    }

    /// Reference nodes in pre-order.
    pub fn references(&self) -> Vec<TreeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.node(id).reference().is_some())
            .collect()
    }

    /// First reference bound to `node`.
    pub fn find_reference(&self, node: NodeId) -> Option<TreeId> {
        self.references()
            .into_iter()
            .find(|&id| self.node(id).sem == Some(node))
    }

    /// Whether any reference is bound to `node`.
    pub fn mentions(&self, node: NodeId) -> bool {
        self.find_reference(node).is_some()
    }

    /// The child of the root that contains `id` (or `id` itself).
    pub fn clause_branch(&self, id: TreeId) -> Option<TreeId> {
        if id == self.root {
            return None;
        }
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if parent == self.root {
                return Some(current);
            }
            current = parent;
        }
        None
    }

    /// The verb heading `clause`.
    pub fn verb_of(&self, clause: TreeId) -> Option<TreeId> {
        self.child(clause, Role::Head)
            .filter(|&v| self.node(v).cat() == Cat::Verb)
    }

    /// The verb heading the root clause.
    pub fn main_verb(&self) -> Option<TreeId> {
        self.verb_of(self.root)
    }

    pub fn is_passive(&self, clause: TreeId) -> bool {
        self.verb_of(clause)
            .is_some_and(|v| self.node(v).morph.passive)
    }

    pub fn is_copula(&self, verb: TreeId) -> bool {
        self.node(verb).word() == Some("be")
    }

    pub fn is_conjunction(&self, id: TreeId) -> bool {
        self.node(id).cat() == Cat::Conjunction
    }

    /// Check structural invariants over the reachable tree.
    pub fn validate(&self) -> GrammarResult<()> {
        for id in self.preorder() {
            let children = self.children(id);
            let heads = children.iter().filter(|d| d.role == Role::Head).count();
            if heads > 1 {
                return Err(GrammarError::MalformedTree {
                    message: format!("node {} has {heads} HEAD children", id.index()),
                });
            }
            if self.is_conjunction(id) {
                let conjuncts = children.iter().filter(|d| d.role == Role::Conjunct).count();
                let conjunctors = children
                    .iter()
                    .filter(|d| d.role == Role::Conjunctor)
                    .count();
                if conjuncts < 2 || conjunctors != 1 {
                    return Err(GrammarError::MalformedTree {
                        message: format!(
                            "conjunction {} has {conjuncts} conjuncts and {conjunctors} conjunctors",
                            id.index()
                        ),
                    });
                }
            }
            for dep in children {
                if self.parent(dep.child) != Some(id) {
                    return Err(GrammarError::MalformedTree {
                        message: format!("node {} has a stale parent link", dep.child.index()),
                    });
                }
            }
        }
        Ok(())
    }
}
