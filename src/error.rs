//! Rich diagnostic error types for akh-prose.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know exactly what went wrong
//! and how to fix it. Recoverable linguistic situations (missing templates,
//! failed aggregation matches, inapplicable transformations) are never errors.

use miette::Diagnostic;
use thiserror::Error;

pub use crate::grammar::error::GrammarError;

/// Top-level error type for akh-prose.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ProseError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Plan(#[from] PlanError),
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("duplicate node: {node}")]
    #[diagnostic(
        code(akh::prose::graph::duplicate_node),
        help(
            "Semantic node ids must be unique within one graph. \
             Check the graph document for repeated ids."
        )
    )]
    DuplicateNode { node: u64 },

    #[error("unknown node: {node}")]
    #[diagnostic(
        code(akh::prose::graph::unknown_node),
        help(
            "An edge refers to a node that was never added. \
             Add both endpoints before connecting them."
        )
    )]
    UnknownNode { node: u64 },

    #[error("edge {property} leaves a datatype leaf ({node})")]
    #[diagnostic(
        code(akh::prose::graph::leaf_source),
        help(
            "Datatype-valued leaves can only be edge targets. \
             Reverse the edge or model the value as an entity."
        )
    )]
    LeafSource { node: u64, property: String },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    #[diagnostic(
        code(akh::prose::config::read),
        help("Ensure the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    #[diagnostic(
        code(akh::prose::config::parse),
        help(
            "Check the TOML syntax. Expected sections: [planner], [[property]], \
             [[class]] and [[template]]."
        )
    )]
    Parse { path: String, message: String },

    #[error("failed to parse graph document {path}: {message}")]
    #[diagnostic(
        code(akh::prose::config::graph),
        help(
            "A graph document is JSON with `nodes` and `edges` arrays and an optional `root`. \
             Node ids must be non-zero integers."
        )
    )]
    GraphDocument { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Planning errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PlanError {
    #[error("root node {node} is not part of the graph")]
    #[diagnostic(
        code(akh::prose::plan::unknown_root),
        help("Pass the id of an entity node that exists in the semantic graph.")
    )]
    UnknownRoot { node: u64 },

    #[error("node {node} cannot open a paragraph")]
    #[diagnostic(
        code(akh::prose::plan::not_a_topic),
        help(
            "Paragraph topics must be entity nodes present in the graph. \
             Datatype leaves are realized inside their owner's sentences."
        )
    )]
    NotATopic { node: u64 },

    #[error("relative clause for node {node} fits nowhere: edge {edge} is not one of its facts")]
    #[diagnostic(
        code(akh::prose::plan::unplaceable),
        help(
            "The segmentation reserved an edge for a relative clause on a node that does \
             not touch it. This signals an inconsistent segmentation or a graph mutated \
             between segmentation and planning; re-run segmentation on the current graph."
        )
    )]
    Unplaceable { node: u64, edge: u32 },
}

/// Result type for akh-prose operations.
pub type ProseResult<T> = std::result::Result<T, ProseError>;
