//! Rich diagnostic error types for the grammar subsystem.
//!
//! Follows the akh miette pattern: every error variant carries
//! `#[diagnostic(code(...), help(...))]` so the user knows exactly
//! what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced by templates and dependency-tree validation.
#[derive(Debug, Error, Diagnostic)]
pub enum GrammarError {
    #[error("invalid template for property \"{property}\": {message}")]
    #[diagnostic(
        code(akh::prose::grammar::invalid_template),
        help(
            "A template needs at least one open slot, at most one SOURCE and one TARGET \
             slot, and a clause root (smain) whose HEAD is a verb. \
             Check the [[template]] entry in the lexicon."
        )
    )]
    InvalidTemplate { property: String, message: String },

    #[error("malformed dependency tree: {message}")]
    #[diagnostic(
        code(akh::prose::grammar::malformed_tree),
        help(
            "A phrase may have at most one HEAD child, and a conjunction needs at least two \
             conjuncts plus one conjunctor. This indicates a bug in a tree transformation."
        )
    )]
    MalformedTree { message: String },
}

/// Result type for grammar operations.
pub type GrammarResult<T> = std::result::Result<T, GrammarError>;
