// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # akh-prose
//!
//! Graph-to-text content planning: turns a typed semantic graph into
//! paragraph-structured dependency trees ready for an external surface
//! realizer.
//!
//! ## Architecture
//!
//! ```text
//! SemanticGraph ──→ Segmenter ──→ Lexicalizer ──→ Aggregator ──→ Relative clauses ──→ Referring expressions
//!                       │              │               │                                       │
//!                   Ontology        Lexicon      ellipsis search                       per-paragraph state
//!                                                                                              ↓
//!                                                                                        ContentPlan
//! ```
//!
//! - **Semantic graph** (`graph`): petgraph-backed multigraph with stable node ids
//! - **Grammar** (`grammar`): arena dependency trees, templates, clause transformations
//! - **Planner** (`planner`): segmentation, lexicalization, aggregation, referring expressions
//! - **Ontology** (`ontology`): read-only property hierarchy and class metadata
//!
//! ## Library usage
//!
//! ```no_run
//! use akh_prose::config::PlanConfig;
//! use akh_prose::grammar::{Slot, Template, TemplateLexicon, Tense};
//! use akh_prose::graph::{Literal, NodeId, SemNode, SemanticGraph};
//! use akh_prose::ontology::{ClassDecl, OntologyDocument, StaticOntology};
//! use akh_prose::planner::ContentPlanner;
//!
//! let id = |n| NodeId::new(n).unwrap();
//! let mut graph = SemanticGraph::new();
//! graph.add_node(SemNode::entity(id(1), "Paper")).unwrap();
//! graph.add_node(SemNode::entity(id(2), "Person")).unwrap();
//! graph.add_node(SemNode::leaf(id(3), "string", Literal::Text("Ada".into()))).unwrap();
//! graph.add_edge(id(1), "hasAuthor", id(2)).unwrap();
//! graph.add_edge(id(2), "name", id(3)).unwrap();
//!
//! let ontology = StaticOntology::from_document(
//!     OntologyDocument::default().class(ClassDecl::new("Person").person().name_property("name")),
//! );
//! let mut lexicon = TemplateLexicon::new();
//! lexicon
//!     .insert(Template::transitive("hasAuthor", "write", Slot::Target).with_tense(Tense::Past))
//!     .unwrap();
//!
//! let planner = ContentPlanner::new(&ontology, &lexicon, PlanConfig::default());
//! let plan = planner.plan(&graph, id(1)).unwrap();
//! println!("{}", plan.preview());
//! ```

pub mod config;
pub mod error;
pub mod grammar;
pub mod graph;
pub mod ontology;
pub mod planner;
