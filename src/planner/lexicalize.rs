//! Lexicalization: semantic edges to populated dependency trees.
//!
//! Each edge's property is looked up in the [`Lexicon`]; failing that the
//! inverse property's template is used with the slots swapped, and failing
//! that the nearest super-property's template. Edges of a topic that resolve
//! to the same template in the same direction share one tree, their other
//! endpoints coordinated in the open slot.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::PlanConfig;
use crate::grammar::transform;
use crate::grammar::{
    Anchor, Cat, DependencyTree, Lexicon, NodeKind, Reference, Role, Slot, Template,
};
use crate::graph::{EdgeId, EdgeView, Literal, NodeId, SemanticGraph};
use crate::ontology::Ontology;

/// How a property reached its template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Via {
    Direct,
    /// Through the inverse property's template.
    Inverse { inverse: String },
    /// Through a more general property's template.
    Super { general: String },
}

impl Via {
    fn rank(&self) -> u8 {
        match self {
            Via::Direct => 0,
            Via::Inverse { .. } => 1,
            Via::Super { .. } => 2,
        }
    }
}

/// A template together with the route that found it.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    pub template: &'a Template,
    pub via: Via,
}

/// Request-scoped template lookup with a per-property cache.
///
/// When a super-property's template is found, every sub-property of it that
/// has no closer template is cached as covered by it as well.
pub struct TemplateResolver<'a> {
    lexicon: &'a dyn Lexicon,
    ontology: &'a dyn Ontology,
    cache: BTreeMap<String, Option<Resolved<'a>>>,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(lexicon: &'a dyn Lexicon, ontology: &'a dyn Ontology) -> Self {
        Self {
            lexicon,
            ontology,
            cache: BTreeMap::new(),
        }
    }

    /// Find the template for `property`.
    pub fn resolve(&mut self, property: &str) -> Option<Resolved<'a>> {
        if let Some(hit) = self.cache.get(property) {
            return hit.clone();
        }
        let found = self.lookup(property);
        if found.is_none() {
            tracing::debug!(property, "no template for property, its edges are skipped");
        }
        self.cache.insert(property.to_string(), found.clone());
        found
    }

    fn lookup(&mut self, property: &str) -> Option<Resolved<'a>> {
        let lexicon = self.lexicon;
        if let Some(template) = lexicon.lookup(property) {
            return Some(Resolved {
                template,
                via: Via::Direct,
            });
        }
        if let Some(inverse) = self.ontology.inverse_of(property) {
            if let Some(template) = lexicon.lookup(&inverse) {
                return Some(Resolved {
                    template,
                    via: Via::Inverse { inverse },
                });
            }
        }
        for general in self.ontology.super_properties(property) {
            if let Some(template) = lexicon.lookup(&general) {
                let resolved = Resolved {
                    template,
                    via: Via::Super {
                        general: general.clone(),
                    },
                };
                self.cover_sub_properties(&general, &resolved);
                return Some(resolved);
            }
        }
        None
    }

    fn cover_sub_properties(&mut self, general: &str, resolved: &Resolved<'a>) {
        for sub in self.ontology.sub_properties(general) {
            if self.cache.contains_key(&sub) || self.has_own_template(&sub) {
                continue;
            }
            let closer = self
                .ontology
                .super_properties(&sub)
                .into_iter()
                .take_while(|p| p != general)
                .any(|p| self.lexicon.lookup(&p).is_some());
            if !closer {
                self.cache.insert(sub, Some(resolved.clone()));
            }
        }
    }

    fn has_own_template(&self, property: &str) -> bool {
        self.lexicon.lookup(property).is_some()
            || self
                .ontology
                .inverse_of(property)
                .is_some_and(|inv| self.lexicon.lookup(&inv).is_some())
    }

    /// Number of properties resolved so far, hits and misses.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Turns a topic's edges into dependency trees.
pub struct Lexicalizer<'a> {
    graph: &'a SemanticGraph,
    ontology: &'a dyn Ontology,
    config: &'a PlanConfig,
    resolver: TemplateResolver<'a>,
    mapped: BTreeSet<EdgeId>,
    summarized: Vec<EdgeId>,
}

/// Edges of one topic sharing a template and direction.
struct Group<'a, 'g> {
    resolved: Resolved<'a>,
    topic_is_source: bool,
    submenu: Option<String>,
    edges: Vec<EdgeView<'g>>,
}

impl<'a> Lexicalizer<'a> {
    pub fn new(
        graph: &'a SemanticGraph,
        ontology: &'a dyn Ontology,
        lexicon: &'a dyn Lexicon,
        config: &'a PlanConfig,
    ) -> Self {
        Self {
            graph,
            ontology,
            config,
            resolver: TemplateResolver::new(lexicon, ontology),
            mapped: BTreeSet::new(),
            summarized: Vec::new(),
        }
    }

    pub fn graph(&self) -> &'a SemanticGraph {
        self.graph
    }

    pub fn ontology(&self) -> &'a dyn Ontology {
        self.ontology
    }

    /// Whether an edge can appear in the text when seen from `node`.
    ///
    /// Excludes hidden edges and edges touching hidden nodes, edges shown from
    /// storage when `node` itself is shown and unchanged, display-name edges,
    /// and edges with no template at any level.
    pub fn is_realizable(&mut self, node: NodeId, edge: &EdgeView<'_>) -> bool {
        if edge.data.state.is_hidden() {
            return false;
        }
        let (Some(source), Some(target)) = (self.graph.node(edge.source), self.graph.node(edge.target))
        else {
            return false;
        };
        if source.state.is_hidden() || target.state.is_hidden() {
            return false;
        }
        if edge.data.state == crate::graph::RealizeState::Show {
            let viewer = if node == edge.source { source } else { target };
            if viewer.is_storage_shown() {
                return false;
            }
        }
        if target.is_leaf()
            && self.ontology.name_property(&source.class).as_deref() == Some(edge.data.property.as_str())
        {
            return false;
        }
        self.resolver.resolve(&edge.data.property).is_some()
    }

    /// Realizable edges touching `node`, in insertion order.
    pub fn realizable_edges(&mut self, node: NodeId) -> Vec<EdgeView<'a>> {
        let graph = self.graph;
        graph
            .edges_of(node)
            .into_iter()
            .filter(|e| self.is_realizable(node, e))
            .collect()
    }

    /// The display name of an entity, from its name property.
    pub fn display_name(&self, node: NodeId) -> Option<String> {
        let class = &self.graph.node(node)?.class;
        let property = self.ontology.name_property(class)?;
        self.graph
            .outgoing(node)
            .into_iter()
            .filter(|e| e.data.property == property && !e.data.state.is_hidden())
            .find_map(|e| self.graph.node(e.target)?.value.as_ref().map(Literal::to_string))
    }

    /// Edges collapsed into summaries so far.
    pub fn summarized(&self) -> &[EdgeId] {
        &self.summarized
    }

    /// Whether an edge has already been realized in this request.
    pub fn is_mapped(&self, edge: EdgeId) -> bool {
        self.mapped.contains(&edge)
    }

    /// Trees for every unmapped realizable edge of `topic`.
    ///
    /// Edges in `reserved` belong to relative clauses and are left alone.
    pub fn lexicalize(&mut self, topic: NodeId, reserved: &BTreeSet<EdgeId>) -> Vec<DependencyTree> {
        let graph = self.graph;
        let Some(topic_class) = graph.node(topic).map(|n| n.class.clone()) else {
            return Vec::new();
        };

        let mut groups: Vec<Group<'a, 'a>> = Vec::new();
        for edge in graph.edges_of(topic) {
            if self.mapped.contains(&edge.id) || reserved.contains(&edge.id) {
                continue;
            }
            if !self.is_realizable(topic, &edge) {
                continue;
            }
            let Some(resolved) = self.resolver.resolve(&edge.data.property) else {
                continue;
            };
            let topic_is_source = edge.source == topic;
            let existing = groups.iter_mut().find(|g| {
                g.topic_is_source == topic_is_source
                    && std::ptr::eq(g.resolved.template, resolved.template)
                    && g.resolved.via.rank() == resolved.via.rank()
            });
            match existing {
                Some(group) => group.edges.push(edge),
                None => groups.push(Group {
                    submenu: self.ontology.submenu(&edge.data.property, &topic_class),
                    resolved,
                    topic_is_source,
                    edges: vec![edge],
                }),
            }
        }

        // Cluster by submenu, keeping first-seen order.
        let mut menus: Vec<Option<String>> = Vec::new();
        for g in &groups {
            if !menus.contains(&g.submenu) {
                menus.push(g.submenu.clone());
            }
        }
        groups.sort_by_key(|g| menus.iter().position(|m| *m == g.submenu));

        let trees: Vec<DependencyTree> = groups
            .iter()
            .filter_map(|g| self.build(topic, g))
            .collect();
        tracing::debug!(%topic, trees = trees.len(), "lexicalized topic");
        trees
    }

    /// The tree for a single edge seen from `node`, for relative clauses.
    pub fn lexicalize_edge(&mut self, node: NodeId, edge: EdgeId) -> Option<DependencyTree> {
        let graph = self.graph;
        let view = graph.edge(edge)?;
        if self.mapped.contains(&edge) || !self.is_realizable(node, &view) {
            return None;
        }
        let resolved = self.resolver.resolve(&view.data.property)?;
        let group = Group {
            resolved,
            topic_is_source: view.source == node,
            submenu: None,
            edges: vec![view],
        };
        self.build(node, &group)
    }

    fn build(&mut self, topic: NodeId, group: &Group<'a, '_>) -> Option<DependencyTree> {
        let template = group.resolved.template;
        let inverse = matches!(group.resolved.via, Via::Inverse { .. });
        let mut tree = template.instantiate();

        let source_slot = if inverse ^ template.inverse {
            Slot::Target
        } else {
            Slot::Source
        };
        let (topic_slot, other_slot) = if group.topic_is_source {
            (source_slot, source_slot.opposite())
        } else {
            (source_slot.opposite(), source_slot)
        };

        let topic_kind = self.reference(topic, true)?;
        if let Some(id) = tree.fill_slot(topic_slot, topic_kind, Some(topic)) {
            tree.node_mut(id).anchor = Some(Anchor::Browse { node: topic });
        }

        let mut others = group.edges.clone();
        others.sort_by_key(|e| (e.data.rank.unwrap_or(u32::MAX), e.data.seq));
        let ranked = others.iter().any(|e| e.data.rank.is_some());

        let first_other = others.first()?.other(topic);
        let boolean = self
            .graph
            .node(first_other)
            .and_then(|n| n.value.as_ref())
            .and_then(Literal::as_bool);

        if let Some(value) = boolean {
            if let Some(slot) = tree.find_slot(other_slot) {
                tree.detach(slot);
            }
            if !value {
                transform::to_negated(&mut tree);
            }
        } else if others.len() > self.config.summary_threshold && !self.config.full_disclosure {
            self.summarize(&mut tree, topic, other_slot, &others);
        } else {
            let mut target: Option<crate::grammar::TreeId> = None;
            for (i, edge) in others.iter().enumerate() {
                let other = edge.other(topic);
                let Some((kind, quoted)) = self.filler(other) else {
                    continue;
                };
                let order = i as u32 + 1;
                let id = match target {
                    None => {
                        let Some(id) = tree.fill_slot(other_slot, kind, Some(other)) else {
                            break;
                        };
                        tree.node_mut(id).order = order;
                        id
                    }
                    Some(t) => tree.append_conjunct(t, kind, Some(other), order),
                };
                let node = tree.node_mut(id);
                node.morph.quoted = quoted;
                if !quoted && self.graph.node(other).is_some_and(|n| !n.is_leaf()) {
                    node.anchor = Some(Anchor::Browse { node: other });
                }
                target = Some(tree.parent(id).filter(|&p| tree.is_conjunction(p)).unwrap_or(id));
            }
            if ranked {
                if let Some(t) = target {
                    tree.node_mut(t).morph.rank_ordered = true;
                }
            }
        }

        if inverse {
            transform::to_passive(&mut tree);
        }

        tree.realizes = group.edges.iter().map(|e| e.id).collect();
        tree.realizes.sort();
        self.mapped.extend(tree.realizes.iter().copied());
        tracing::debug!(
            template = %template.property,
            edges = tree.realizes.len(),
            via = ?group.resolved.via,
            "lexicalized edge group"
        );
        Some(tree)
    }

    /// "N things" in place of a long sibling list.
    fn summarize(
        &mut self,
        tree: &mut DependencyTree,
        topic: NodeId,
        slot: Slot,
        others: &[EdgeView<'_>],
    ) {
        let count = others.len();
        let class = others
            .first()
            .and_then(|e| self.graph.node(e.other(topic)))
            .map(|n| n.class.clone())
            .unwrap_or_default();
        let Some(np) = tree.fill_slot(slot, NodeKind::Phrase { cat: Cat::Np }, None) else {
            return;
        };
        {
            let node = tree.node_mut(np);
            node.morph.plural = true;
            node.anchor = Some(Anchor::Expand {
                node: topic,
                property: others[0].data.property.clone(),
                count,
            });
        }
        tree.add_child(
            np,
            Role::Det,
            NodeKind::Leaf {
                cat: Cat::Det,
                word: count.to_string(),
            },
        );
        let head = tree.add_child(
            np,
            Role::Head,
            NodeKind::Leaf {
                cat: Cat::Noun,
                word: self.ontology.class_noun(&class),
            },
        );
        tree.node_mut(head).morph.plural = true;
        self.summarized.extend(others.iter().map(|e| e.id));
        tracing::debug!(%topic, count, "summarized sibling edges");
    }

    /// Tree content for the other endpoint of an edge, and whether it is quoted.
    fn filler(&self, node: NodeId) -> Option<(NodeKind, bool)> {
        let sem = self.graph.node(node)?;
        match &sem.value {
            Some(value) => Some((
                NodeKind::Leaf {
                    cat: Cat::Name,
                    word: value.to_string(),
                },
                matches!(value, Literal::Text(_)),
            )),
            None => Some((self.reference(node, false)?, false)),
        }
    }

    fn reference(&self, node: NodeId, topic: bool) -> Option<NodeKind> {
        let sem = self.graph.node(node)?;
        Some(NodeKind::Reference(Reference {
            class: sem.class.clone(),
            noun: self.ontology.class_noun(&sem.class),
            name: self.display_name(node),
            person: self.ontology.is_person_class(&sem.class),
            topic,
            ordinal: 0,
            form: None,
        }))
    }
}
