//! Content planning: a semantic graph in, paragraphs of dependency trees out.
//!
//! One request runs the stages in order:
//!
//! 1. [`segment`](segment::segment) decides which nodes open paragraphs,
//!    which become relative clauses and which are absorbed;
//! 2. each paragraph topic is [lexicalized](lexicalize::Lexicalizer) into
//!    clause trees, then [aggregated](aggregate::Aggregator) and given number
//!    agreement;
//! 3. relative-clause candidates are attached to a mention of their node, or
//!    fall back to a paragraph of their own;
//! 4. [referring expressions](refer::ReferringExpressions) are resolved per
//!    paragraph.
//!
//! All request state lives in a [`PlanContext`] and the lexicalizer, so a
//! [`ContentPlanner`] can serve any number of requests.

pub mod aggregate;
pub mod lexicalize;
pub mod refer;
pub mod segment;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::PlanConfig;
use crate::error::{PlanError, ProseResult};
use crate::grammar::morpho;
use crate::grammar::preview;
use crate::grammar::transform;
use crate::grammar::{Anchor, Cat, DependencyTree, Lexicon, NodeKind, RefForm, Role};
use crate::graph::{EdgeId, NodeId, SemanticGraph};
use crate::ontology::Ontology;

use aggregate::{number_agreement, Aggregator};
use lexicalize::Lexicalizer;
use refer::ReferringExpressions;
use segment::Segmentation;

/// Counters collected while planning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    pub paragraphs: usize,
    pub sentences: usize,
    pub combinations_considered: usize,
    pub combinations_applied: usize,
    pub relative_clauses: usize,
    pub fallback_paragraphs: usize,
}

/// Request-scoped planning state.
#[derive(Debug, Default)]
pub struct PlanContext {
    next_combination: u32,
    pub stats: PlanStats,
}

impl PlanContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh combination id, unique within the request.
    pub fn next_combination_id(&mut self) -> u32 {
        let id = self.next_combination;
        self.next_combination += 1;
        id
    }
}

/// One paragraph of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub topic: NodeId,
    pub header: String,
    pub anchor: Anchor,
    pub sentences: Vec<DependencyTree>,
}

/// The planner's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPlan {
    pub paragraphs: Vec<Paragraph>,
    /// Nodes whose facts are all told elsewhere.
    pub absorbed: Vec<NodeId>,
    /// Edges folded into "N things" summaries.
    pub summarized: Vec<EdgeId>,
    pub stats: PlanStats,
}

impl ContentPlan {
    /// Every edge some sentence realizes, sorted.
    pub fn realized_edges(&self) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = self
            .paragraphs
            .iter()
            .flat_map(|p| p.sentences.iter())
            .flat_map(|t| t.realizes.iter().copied())
            .collect();
        edges.sort();
        edges.dedup();
        edges
    }

    /// Plain-text reading of the plan: a header line per paragraph, then its
    /// sentences.
    pub fn preview(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| {
                let body: Vec<String> = p.sentences.iter().map(preview::sentence).collect();
                format!("{}\n{}", p.header, body.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Plans text for semantic graphs against a fixed ontology and lexicon.
pub struct ContentPlanner<'a> {
    ontology: &'a dyn Ontology,
    lexicon: &'a dyn Lexicon,
    config: PlanConfig,
}

impl<'a> ContentPlanner<'a> {
    pub fn new(ontology: &'a dyn Ontology, lexicon: &'a dyn Lexicon, config: PlanConfig) -> Self {
        Self {
            ontology,
            lexicon,
            config,
        }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Segment `graph` around `root` without planning.
    pub fn segment(&self, graph: &SemanticGraph, root: NodeId) -> ProseResult<Segmentation> {
        check_topic(graph, root, true)?;
        let mut lexicalizer = Lexicalizer::new(graph, self.ontology, self.lexicon, &self.config);
        Ok(segment::segment(&mut lexicalizer, root))
    }

    /// Segment and plan in one go.
    pub fn plan(&self, graph: &SemanticGraph, root: NodeId) -> ProseResult<ContentPlan> {
        let segmentation = self.segment(graph, root)?;
        self.plan_with_segmentation(graph, &segmentation)
    }

    /// Plan against an existing segmentation.
    pub fn plan_with_segmentation(
        &self,
        graph: &SemanticGraph,
        segmentation: &Segmentation,
    ) -> ProseResult<ContentPlan> {
        check_topic(graph, segmentation.root, true)?;
        for &topic in &segmentation.paragraphs {
            check_topic(graph, topic, false)?;
        }
        for &(node, edge) in &segmentation.relative {
            let touches = graph
                .edge(edge)
                .is_some_and(|e| e.source == node || e.target == node);
            if !touches {
                return Err(PlanError::Unplaceable {
                    node: node.get(),
                    edge: edge.0,
                }
                .into());
            }
        }

        let mut ctx = PlanContext::new();
        let mut lexicalizer = Lexicalizer::new(graph, self.ontology, self.lexicon, &self.config);
        let aggregator = Aggregator::new(&self.config);
        let reserved: BTreeSet<EdgeId> = segmentation.relative.iter().map(|(_, e)| *e).collect();

        let mut topics: Vec<NodeId> = Vec::new();
        let mut paragraphs: Vec<Paragraph> = Vec::new();
        for &topic in &segmentation.paragraphs {
            let trees = lexicalizer.lexicalize(topic, &reserved);
            let sentences = self.finish(&aggregator, trees, &mut ctx);
            topics.push(topic);
            paragraphs.push(self.paragraph(&lexicalizer, topic, sentences));
        }

        for &(node, edge) in &segmentation.relative {
            let Some(clause) = lexicalizer.lexicalize_edge(node, edge) else {
                tracing::debug!(%node, edge = edge.0, "relative clause edge no longer realizable");
                continue;
            };
            if attach_relative(&mut paragraphs, node, clause.clone()) {
                ctx.stats.relative_clauses += 1;
                continue;
            }

            // No visible mention anywhere: the node gets a paragraph of its own.
            tracing::debug!(%node, "no mention for relative clause, opening a paragraph");
            let mut trees = vec![clause];
            trees.extend(lexicalizer.lexicalize(node, &reserved));
            let sentences = self.finish(&aggregator, trees, &mut ctx);
            let pos = segment::splice(graph, &mut topics, node);
            paragraphs.insert(pos, self.paragraph(&lexicalizer, node, sentences));
            ctx.stats.fallback_paragraphs += 1;
        }

        let refer = ReferringExpressions::new(self.config.user);
        for paragraph in &mut paragraphs {
            refer.resolve_paragraph(paragraph.topic, &mut paragraph.sentences);
        }

        ctx.stats.paragraphs = paragraphs.len();
        ctx.stats.sentences = paragraphs.iter().map(|p| p.sentences.len()).sum();
        tracing::info!(
            root = %segmentation.root,
            paragraphs = ctx.stats.paragraphs,
            sentences = ctx.stats.sentences,
            combinations = ctx.stats.combinations_applied,
            relative_clauses = ctx.stats.relative_clauses,
            "content plan ready"
        );

        Ok(ContentPlan {
            paragraphs,
            absorbed: segmentation.absorbed.clone(),
            summarized: lexicalizer.summarized().to_vec(),
            stats: ctx.stats,
        })
    }

    fn finish(
        &self,
        aggregator: &Aggregator<'_>,
        trees: Vec<DependencyTree>,
        ctx: &mut PlanContext,
    ) -> Vec<DependencyTree> {
        let mut sentences = aggregator.aggregate(trees, ctx);
        sentences.iter_mut().for_each(number_agreement);
        sentences
    }

    fn paragraph(
        &self,
        lexicalizer: &Lexicalizer<'_>,
        topic: NodeId,
        sentences: Vec<DependencyTree>,
    ) -> Paragraph {
        let header = lexicalizer.display_name(topic).unwrap_or_else(|| {
            let class = lexicalizer
                .graph()
                .node(topic)
                .map(|n| n.class.clone())
                .unwrap_or_default();
            morpho::capitalize(&self.ontology.class_noun(&class))
        });
        Paragraph {
            topic,
            header,
            anchor: Anchor::Browse { node: topic },
            sentences,
        }
    }
}

/// A topic must be an entity present in the graph.
fn check_topic(graph: &SemanticGraph, node: NodeId, root: bool) -> ProseResult<()> {
    match graph.node(node) {
        None if root => Err(PlanError::UnknownRoot { node: node.get() }.into()),
        Some(n) if !n.is_leaf() => Ok(()),
        _ => Err(PlanError::NotATopic { node: node.get() }.into()),
    }
}

/// Relativize `clause` on `node` and hang it off the first visible mention
/// of `node` in the plan. Returns false when there is no such mention.
fn attach_relative(paragraphs: &mut [Paragraph], node: NodeId, mut clause: DependencyTree) -> bool {
    for paragraph in paragraphs.iter_mut() {
        for host in paragraph.sentences.iter_mut() {
            let mention = host.references().into_iter().find(|&id| {
                host.node(id).sem == Some(node)
                    && !host.is_elided(id)
                    && !matches!(
                        host.node(id).reference().and_then(|r| r.form),
                        Some(RefForm::Relative(_))
                    )
            });
            let Some(mention) = mention else {
                continue;
            };
            if !transform::to_relative_clause(&mut clause, node) {
                return false;
            }
            if host.node(mention).morph.plural {
                transform::to_plural(&mut clause, node);
            }

            let np = host.add(NodeKind::Phrase { cat: Cat::Np });
            let (inserted, order) = {
                let m = host.node(mention);
                (m.inserted, m.order)
            };
            host.replace(mention, np);
            {
                let wrapper = host.node_mut(np);
                wrapper.inserted = inserted;
                wrapper.order = order;
            }
            host.attach(np, Role::Head, mention);
            host.graft_under(np, Role::Modifier, &clause, clause.root());
            host.realizes.extend(clause.realizes.iter().copied());
            host.realizes.sort();
            host.realizes.dedup();
            tracing::debug!(%node, topic = %paragraph.topic, "attached relative clause");
            return true;
        }
    }
    false
}
