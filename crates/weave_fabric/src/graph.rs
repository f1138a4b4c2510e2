//! The logical connectivity graph of a tile or module.

use crate::label::Label;
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use weave_common::{ComponentId, WeaveError, WeaveResult};

/// Directed graph of routers, endpoints, ports, and PHYs with edge delays in
/// clock cycles.
#[derive(Clone, Debug, Default)]
pub struct LogicalGraph {
    graph: DiGraph<Label, f64>,
    nodes: HashMap<Label, NodeIndex>,
}

/// A serializable snapshot of a [`LogicalGraph`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    /// Vertex labels in insertion order.
    pub vertices: Vec<Label>,
    /// Edges in insertion order.
    pub edges: Vec<EdgeExport>,
}

/// One exported edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeExport {
    /// Driving vertex.
    pub from: Label,
    /// Receiving vertex.
    pub to: Label,
    /// Delay in clock cycles.
    pub delay: f64,
}

impl LogicalGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex unless it already exists and returns its index.
    pub fn add_vertex(&mut self, label: Label) -> NodeIndex {
        if let Some(&index) = self.nodes.get(&label) {
            return index;
        }
        let index = self.graph.add_node(label.clone());
        self.nodes.insert(label, index);
        index
    }

    /// Adds an edge between two existing vertices.
    pub fn add_edge(&mut self, from: &Label, to: &Label, delay: f64) -> WeaveResult<()> {
        let a = self.node(from)?;
        let b = self.node(to)?;
        self.graph.add_edge(a, b, delay);
        Ok(())
    }

    fn node(&self, label: &Label) -> WeaveResult<NodeIndex> {
        self.nodes
            .get(label)
            .copied()
            .ok_or_else(|| WeaveError::internal(format!("vertex {label} is not in the graph")))
    }

    /// Returns `true` if `label` is a vertex.
    pub fn contains(&self, label: &Label) -> bool {
        self.nodes.contains_key(label)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Vertex labels in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Label> {
        self.graph.node_weights()
    }

    /// Edges as `(from, to, delay)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&Label, &Label, f64)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()], *e.weight()))
    }

    /// Copies every vertex and edge of `child`, prefixing labels with `component`.
    pub fn absorb(&mut self, child: &LogicalGraph, component: ComponentId) {
        let mapped: Vec<NodeIndex> = child
            .graph
            .node_weights()
            .map(|label| self.add_vertex(label.prefixed(component)))
            .collect();
        for edge in child.graph.edge_references() {
            self.graph.add_edge(
                mapped[edge.source().index()],
                mapped[edge.target().index()],
                *edge.weight(),
            );
        }
    }

    /// Smallest total delay of any path from `from` to `to`.
    pub fn shortest_delay(&self, from: &Label, to: &Label) -> Option<f64> {
        let (a, b) = (self.nodes.get(from)?, self.nodes.get(to)?);
        dijkstra(&self.graph, *a, Some(*b), |e| *e.weight())
            .get(b)
            .copied()
    }

    /// Serializable snapshot.
    pub fn export(&self) -> GraphExport {
        GraphExport {
            vertices: self.vertices().cloned().collect(),
            edges: self
                .edges()
                .map(|(from, to, delay)| EdgeExport {
                    from: from.clone(),
                    to: to.clone(),
                    delay,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l(text: &str) -> Label {
        text.parse().unwrap()
    }

    fn tile_graph() -> LogicalGraph {
        let mut g = LogicalGraph::new();
        for v in ["r", "ep0", "mp0", "sp0"] {
            g.add_vertex(l(v));
        }
        g.add_edge(&l("ep0"), &l("r"), 0.5).unwrap();
        g.add_edge(&l("r"), &l("ep0"), 0.5).unwrap();
        g.add_edge(&l("r"), &l("mp0"), 0.5).unwrap();
        g.add_edge(&l("sp0"), &l("r"), 0.5).unwrap();
        g
    }

    #[test]
    fn vertices_are_unique() {
        let mut g = tile_graph();
        let before = g.vertex_count();
        g.add_vertex(l("r"));
        assert_eq!(g.vertex_count(), before);
        assert!(g.add_edge(&l("r"), &l("ep7"), 1.0).is_err());
    }

    #[test]
    fn absorb_and_route_across_components() {
        let tile = tile_graph();
        let mut top = LogicalGraph::new();
        top.absorb(&tile, ComponentId::from_raw(0));
        top.absorb(&tile, ComponentId::from_raw(1));
        assert_eq!(top.vertex_count(), 8);
        assert_eq!(top.edge_count(), 8);
        top.add_edge(&l("0/mp0"), &l("1/sp0"), 2.0).unwrap();

        let d = top.shortest_delay(&l("0/ep0"), &l("1/ep0")).unwrap();
        assert!((d - (0.5 + 0.5 + 2.0 + 0.5 + 0.5)).abs() < 1e-12);
        assert_eq!(top.shortest_delay(&l("1/ep0"), &l("0/ep0")), None);
    }

    #[test]
    fn export_preserves_order() {
        let e = tile_graph().export();
        assert_eq!(e.vertices[0], l("r"));
        assert_eq!(e.edges.len(), 4);
        assert_eq!(e.edges[2].to, l("mp0"));
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"mp0\""));
    }
}
