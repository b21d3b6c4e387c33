//! Abstract syntax for generated prose.
//!
//! The planner never produces strings. It produces [`DependencyTree`]s:
//! rooted trees of syntactic categories ([`Cat`]) linked by dependency roles
//! ([`Role`]), with morphology flags and unresolved entity references that an
//! external realizer turns into inflected text.
//!
//! ## Pieces
//!
//! ```text
//! Lexicon ──→ Template ──instantiate──→ DependencyTree ──transform──→ DependencyTree
//!                                            │
//!                                        preview (diagnostic English)
//! ```
//!
//! - **Templates** (`template`): elementary trees with SOURCE/TARGET slots per property
//! - **Trees** (`tree`): arena storage, slot filling, coordination, grafting
//! - **Transformations** (`transform`): passive, negation, relative clause, plural
//! - **Preview** (`preview`): a naive reading for tests and the CLI

pub mod cat;
pub mod error;
pub mod morpho;
pub mod preview;
pub mod template;
pub mod transform;
pub mod tree;

pub use cat::{Cat, Role, Slot};
pub use error::{GrammarError, GrammarResult};
pub use template::{Lexicon, Template, TemplateDecl, TemplateLexicon, TemplateNode};
pub use tree::{
    Anchor, Dep, DependencyTree, Morph, NodeKind, RefForm, Reference, RelativePronoun, Tense,
    TreeId, TreeNode,
};
