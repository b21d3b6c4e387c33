//! Semantic graph: the typed facts a content plan is generated from.
//!
//! The graph stores entity and datatype nodes connected by property edges.
//!
//! - **Nodes** ([`SemNode`]) carry a class label, a [`RealizeState`], a
//!   "changed since last render" flag and, for leaves, a [`Literal`] value.
//! - **Edges** ([`SemEdge`]) carry a property label, a realize state, an
//!   insertion sequence number and an optional rank for ordered collections.
//!
//! Storage lives in [`index::SemanticGraph`]; [`GraphDocument`] is the
//! serde form used for JSON input.

pub mod index;

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

pub use index::SemanticGraph;

/// Stable identifier of a semantic node, preserved across regenerations.
///
/// Uses `NonZeroU64` so that `Option<NodeId>` is the same size as `NodeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// Create a `NodeId` from a raw `u64`.
    ///
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(NodeId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// Identifier of an edge inside one [`SemanticGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "edge:{}", self.0)
    }
}

/// How a node or edge should be treated by the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealizeState {
    /// Added in the current session.
    #[default]
    New,
    /// Loaded from storage and shown in a previous render.
    Show,
    /// Suppressed: never realized.
    Hide,
    /// Being edited; still realized.
    Incomplete,
    /// Loaded from storage without further information.
    NoInfo,
}

impl RealizeState {
    /// Whether the item is suppressed from realization.
    pub fn is_hidden(self) -> bool {
        self == RealizeState::Hide
    }
}

/// A datatype value held by a leaf node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Date(String),
}

impl Literal {
    /// The boolean payload, if this is a boolean literal.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Text(s) | Literal::Date(s) => write!(f, "{s}"),
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// A node of the semantic graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemNode {
    /// Stable identity.
    pub id: NodeId,
    /// Ontology class (or datatype name for leaves).
    pub class: String,
    /// Realization state.
    #[serde(default)]
    pub state: RealizeState,
    /// Whether the node changed since the last render.
    #[serde(default)]
    pub changed: bool,
    /// Datatype value; `Some` marks the node as a leaf.
    #[serde(default)]
    pub value: Option<Literal>,
}

impl SemNode {
    /// Create an entity node in state [`RealizeState::New`].
    pub fn entity(id: NodeId, class: impl Into<String>) -> Self {
        Self {
            id,
            class: class.into(),
            state: RealizeState::New,
            changed: false,
            value: None,
        }
    }

    /// Create a datatype leaf.
    pub fn leaf(id: NodeId, datatype: impl Into<String>, value: Literal) -> Self {
        Self {
            id,
            class: datatype.into(),
            state: RealizeState::New,
            changed: false,
            value: Some(value),
        }
    }

    /// Set the realize state.
    pub fn with_state(mut self, state: RealizeState) -> Self {
        self.state = state;
        self
    }

    /// Mark the node as changed since the last render.
    pub fn changed(mut self) -> Self {
        self.changed = true;
        self
    }

    /// Whether this node is a datatype-valued leaf.
    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }

    /// Shown from storage and untouched since.
    pub fn is_storage_shown(&self) -> bool {
        self.state == RealizeState::Show && !self.changed
    }
}

/// Edge data: one property assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemEdge {
    /// Property label.
    pub property: String,
    /// Realization state.
    #[serde(default)]
    pub state: RealizeState,
    /// Insertion sequence number.
    #[serde(default)]
    pub seq: u32,
    /// Position within an ordered collection ("second author").
    #[serde(default)]
    pub rank: Option<u32>,
}

impl SemEdge {
    /// Create edge data for a property; the sequence number is assigned on insertion.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            state: RealizeState::New,
            seq: 0,
            rank: None,
        }
    }

    /// Set the rank within an ordered collection.
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Set the realize state.
    pub fn with_state(mut self, state: RealizeState) -> Self {
        self.state = state;
        self
    }
}

/// An edge as seen from the graph: endpoints plus data.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'g> {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub data: &'g SemEdge,
}

impl EdgeView<'_> {
    /// The endpoint opposite to `node`.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }

    /// Whether `node` is the source of this edge.
    pub fn is_outgoing_from(&self, node: NodeId) -> bool {
        self.source == node
    }
}

/// One edge in a [`GraphDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(flatten)]
    pub edge: SemEdge,
}

/// Serializable form of a semantic graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Optional default root for planning.
    #[serde(default)]
    pub root: Option<NodeId>,
    #[serde(default)]
    pub nodes: Vec<SemNode>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}
