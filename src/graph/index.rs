//! In-memory semantic graph.
//!
//! Uses `petgraph`'s `StableDiGraph` for the structure and a `BTreeMap` for
//! node lookups by [`NodeId`]. Iteration order is insertion order, which keeps
//! planning deterministic.

use std::collections::BTreeMap;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use crate::error::GraphError;

use super::{EdgeDocument, EdgeId, EdgeView, GraphDocument, NodeId, SemEdge, SemNode};

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Directed multigraph of semantic nodes and property edges.
#[derive(Debug, Clone, Default)]
pub struct SemanticGraph {
    graph: StableDiGraph<SemNode, SemEdge>,
    /// NodeId → NodeIndex mapping for O(log n) node lookups.
    node_index: BTreeMap<NodeId, NodeIndex>,
    /// Next insertion sequence number handed to edges without one.
    next_seq: u32,
}

impl SemanticGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Ids must be unique.
    pub fn add_node(&mut self, node: SemNode) -> GraphResult<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode {
                node: node.id.get(),
            });
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        Ok(())
    }

    /// Connect two existing nodes, assigning the next sequence number.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        property: impl Into<String>,
        target: NodeId,
    ) -> GraphResult<EdgeId> {
        let mut edge = SemEdge::new(property);
        edge.seq = self.next_seq;
        self.insert_edge(source, target, edge)
    }

    /// Connect two existing nodes with fully specified edge data.
    ///
    /// A zero `seq` is replaced by the next free sequence number.
    pub fn add_edge_data(
        &mut self,
        source: NodeId,
        target: NodeId,
        mut edge: SemEdge,
    ) -> GraphResult<EdgeId> {
        if edge.seq == 0 {
            edge.seq = self.next_seq;
        }
        self.insert_edge(source, target, edge)
    }

    fn insert_edge(&mut self, source: NodeId, target: NodeId, edge: SemEdge) -> GraphResult<EdgeId> {
        let src = self.index_of(source)?;
        let dst = self.index_of(target)?;
        if self.graph[src].is_leaf() {
            return Err(GraphError::LeafSource {
                node: source.get(),
                property: edge.property,
            });
        }
        self.next_seq = self.next_seq.max(edge.seq) + 1;
        let idx = self.graph.add_edge(src, dst, edge);
        Ok(EdgeId(idx.index() as u32))
    }

    fn index_of(&self, node: NodeId) -> GraphResult<NodeIndex> {
        self.node_index
            .get(&node)
            .copied()
            .ok_or(GraphError::UnknownNode { node: node.get() })
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&SemNode> {
        self.node_index.get(&id).map(|&idx| &self.graph[idx])
    }

    /// Mutable access to a node, e.g. to flip its realize state between renders.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SemNode> {
        let idx = *self.node_index.get(&id)?;
        self.graph.node_weight_mut(idx)
    }

    /// Check if a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &SemNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Look up an edge.
    pub fn edge(&self, id: EdgeId) -> Option<EdgeView<'_>> {
        let idx = EdgeIndex::new(id.0 as usize);
        let (src, dst) = self.graph.edge_endpoints(idx)?;
        Some(EdgeView {
            id,
            source: self.graph[src].id,
            target: self.graph[dst].id,
            data: &self.graph[idx],
        })
    }

    /// Outgoing edges of a node, ordered by sequence number.
    pub fn outgoing(&self, node: NodeId) -> Vec<EdgeView<'_>> {
        self.directed(node, Direction::Outgoing)
    }

    /// Incoming edges of a node, ordered by sequence number.
    pub fn incoming(&self, node: NodeId) -> Vec<EdgeView<'_>> {
        self.directed(node, Direction::Incoming)
    }

    /// All edges touching a node, ordered by sequence number.
    pub fn edges_of(&self, node: NodeId) -> Vec<EdgeView<'_>> {
        let mut edges = self.outgoing(node);
        edges.extend(self.incoming(node));
        edges.sort_by_key(|e| (e.data.seq, e.id));
        edges
    }

    fn directed(&self, node: NodeId, dir: Direction) -> Vec<EdgeView<'_>> {
        let Some(&idx) = self.node_index.get(&node) else {
            return vec![];
        };
        let mut edges: Vec<EdgeView<'_>> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| EdgeView {
                id: EdgeId(e.id().index() as u32),
                source: self.graph[e.source()].id,
                target: self.graph[e.target()].id,
                data: e.weight(),
            })
            .collect();
        edges.sort_by_key(|e| (e.data.seq, e.id));
        edges
    }

    /// Whether two nodes share a direct, non-hidden edge in either direction.
    pub fn adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.edges_of(a)
            .iter()
            .any(|e| e.other(a) == b && !e.data.state.is_hidden())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Build a graph from its serialized form.
    pub fn from_document(doc: GraphDocument) -> GraphResult<Self> {
        let mut graph = Self::new();
        for node in doc.nodes {
            graph.add_node(node)?;
        }
        for EdgeDocument {
            source,
            target,
            edge,
        } in doc.edges
        {
            graph.add_edge_data(source, target, edge)?;
        }
        Ok(graph)
    }

    /// Serialize the graph.
    pub fn to_document(&self) -> GraphDocument {
        let nodes = self.nodes().cloned().collect();
        let mut edges: Vec<EdgeDocument> = self
            .graph
            .edge_indices()
            .filter_map(|idx| {
                let (src, dst) = self.graph.edge_endpoints(idx)?;
                Some(EdgeDocument {
                    source: self.graph[src].id,
                    target: self.graph[dst].id,
                    edge: self.graph[idx].clone(),
                })
            })
            .collect();
        edges.sort_by_key(|e| e.edge.seq);
        GraphDocument {
            root: None,
            nodes,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Literal;

    fn id(n: u64) -> NodeId {
        NodeId::new(n).unwrap()
    }

    fn small_graph() -> SemanticGraph {
        let mut g = SemanticGraph::new();
        g.add_node(SemNode::entity(id(1), "Paper")).unwrap();
        g.add_node(SemNode::entity(id(2), "Person")).unwrap();
        g.add_node(SemNode::leaf(id(3), "string", Literal::Text("On Graphs".into())))
            .unwrap();
        g.add_edge(id(1), "hasAuthor", id(2)).unwrap();
        g.add_edge(id(1), "title", id(3)).unwrap();
        g
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut g = small_graph();
        let err = g.add_node(SemNode::entity(id(1), "Paper")).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode { node: 1 }));
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let mut g = small_graph();
        assert!(matches!(
            g.add_edge(id(1), "cites", id(99)),
            Err(GraphError::UnknownNode { node: 99 })
        ));
    }

    #[test]
    fn leaf_cannot_be_source() {
        let mut g = small_graph();
        assert!(matches!(
            g.add_edge(id(3), "about", id(1)),
            Err(GraphError::LeafSource { .. })
        ));
    }

    #[test]
    fn edges_are_sequence_ordered() {
        let g = small_graph();
        let edges = g.edges_of(id(1));
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].data.property, "hasAuthor");
        assert_eq!(edges[1].data.property, "title");
        assert!(edges[0].data.seq < edges[1].data.seq);
        assert_eq!(g.incoming(id(2)).len(), 1);
        assert!(g.adjacent(id(2), id(1)));
        assert!(!g.adjacent(id(2), id(3)));
    }

    #[test]
    fn document_round_trip_keeps_structure() {
        let g = small_graph();
        let json = serde_json::to_string(&g.to_document()).unwrap();
        let doc: GraphDocument = serde_json::from_str(&json).unwrap();
        let back = SemanticGraph::from_document(doc).unwrap();
        assert_eq!(back.node_count(), 3);
        assert_eq!(back.edge_count(), 2);
        assert_eq!(back.outgoing(id(1))[1].data.property, "title");
    }
}
