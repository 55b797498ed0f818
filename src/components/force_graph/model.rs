//! In-memory graph: nodes with mutable simulation state and resolved edges.

use std::collections::HashMap;

use crate::content::{Fragment, Renderer};
use crate::error::{LoadError, Result};

use super::types::{EdgeRecord, NodeRecord};

/// Index handle for a node inside a [`Graph`].
///
/// Edges hold these instead of identifiers so the simulation can read and write
/// endpoint positions without a lookup per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub usize);

impl NodeIdx {
	/// Position in [`Graph::nodes`].
	pub fn index(self) -> usize {
		self.0
	}
}

/// A graph vertex with identity, rendered content and simulation state.
#[derive(Clone, Debug)]
pub struct Node {
	/// Identifier from the data source, unique within the graph.
	pub id: String,
	/// Display title.
	pub title: String,
	/// Rendered short description, always visible.
	pub short: Fragment,
	/// Rendered long description, visible when expanded.
	pub details: Fragment,
	/// Simulated x. Never clamped to the viewport.
	pub x: f64,
	/// Simulated y. Never clamped to the viewport.
	pub y: f64,
	/// Velocity along x.
	pub vx: f64,
	/// Velocity along y.
	pub vy: f64,
	/// Pin override. While set, the simulation holds the node exactly here.
	pub pin: Option<(f64, f64)>,
	/// Whether the long description is shown.
	pub expanded: bool,
}

impl Node {
	fn new(record: &NodeRecord, renderer: &dyn Renderer) -> Self {
		Self {
			id: record.id.clone(),
			title: record.display_title(),
			short: renderer.render(&record.short),
			details: renderer.render(&record.details),
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			pin: None,
			expanded: false,
		}
	}

	/// Simulated `(x, y)`.
	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	/// Whether a drag currently holds this node.
	pub fn is_pinned(&self) -> bool {
		self.pin.is_some()
	}
}

/// An edge with both endpoints resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	/// Node the edge starts at.
	pub source: NodeIdx,
	/// Node the edge ends at.
	pub target: NodeIdx,
}

/// Node set and edge set for one loaded session.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	index: HashMap<String, NodeIdx>,
}

impl Graph {
	/// Build a graph from wire records.
	///
	/// Fails on duplicate node ids or on edges naming an unknown node; no graph
	/// is produced in either case. Each node's short and long descriptions are
	/// rendered exactly once here.
	pub fn load(
		records: &[NodeRecord],
		edges: &[EdgeRecord],
		renderer: &dyn Renderer,
	) -> Result<Self> {
		let mut index = HashMap::with_capacity(records.len());
		for (i, record) in records.iter().enumerate() {
			if index.insert(record.id.clone(), NodeIdx(i)).is_some() {
				return Err(LoadError::DuplicateId {
					id: record.id.clone(),
				});
			}
		}

		let mut graph = Self {
			nodes: Vec::with_capacity(records.len()),
			edges: Vec::with_capacity(edges.len()),
			index,
		};
		let resolve = |graph: &Self, edge: &EdgeRecord, id: &str| {
			graph.index_of(id).ok_or_else(|| LoadError::DanglingEdge {
				source_id: edge.source.clone(),
				target_id: edge.target.clone(),
				missing: id.to_string(),
			})
		};
		for edge in edges {
			let resolved = Edge {
				source: resolve(&graph, edge, &edge.source)?,
				target: resolve(&graph, edge, &edge.target)?,
			};
			graph.edges.push(resolved);
		}

		// Rendering happens last so a rejected payload never reaches the renderer.
		graph.nodes = records
			.iter()
			.map(|record| Node::new(record, renderer))
			.collect();
		Ok(graph)
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Nodes in data-source order; [`NodeIdx`] indexes this slice.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Mutable nodes, for the simulation and interaction layers.
	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// Resolved edges, in data-source order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Edges alongside mutable nodes, for forces that walk one to update the other.
	pub fn split_mut(&mut self) -> (&[Edge], &mut [Node]) {
		(&self.edges, &mut self.nodes)
	}

	/// Node at `idx`, if any.
	pub fn node(&self, idx: NodeIdx) -> Option<&Node> {
		self.nodes.get(idx.0)
	}

	/// Mutable node at `idx`, if any.
	pub fn node_mut(&mut self, idx: NodeIdx) -> Option<&mut Node> {
		self.nodes.get_mut(idx.0)
	}

	/// Constant-time lookup of a node by identifier.
	pub fn index_of(&self, id: &str) -> Option<NodeIdx> {
		self.index.get(id).copied()
	}

	/// Both endpoint nodes of an edge.
	pub fn endpoints(&self, edge: &Edge) -> (&Node, &Node) {
		(&self.nodes[edge.source.0], &self.nodes[edge.target.0])
	}

	/// Number of edges touching each node, self-loops counted twice.
	pub fn degrees(&self) -> Vec<usize> {
		let mut degrees = vec![0; self.nodes.len()];
		for edge in &self.edges {
			degrees[edge.source.0] += 1;
			degrees[edge.target.0] += 1;
		}
		degrees
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use std::cell::Cell;

	use super::*;
	use crate::content::PlainText;

	pub(crate) fn records(ids: &[&str]) -> Vec<NodeRecord> {
		ids.iter()
			.map(|id| {
				NodeRecord::new(*id, id.to_uppercase())
					.with_short(format!("short {id}"))
					.with_details(format!("details {id}"))
			})
			.collect()
	}

	pub(crate) fn graph(ids: &[&str], pairs: &[(&str, &str)]) -> Graph {
		let edges: Vec<_> = pairs.iter().map(|(s, t)| EdgeRecord::new(*s, *t)).collect();
		Graph::load(&records(ids), &edges, &PlainText).unwrap()
	}

	#[test]
	fn load_resolves_edges_to_node_entries() {
		let graph = graph(&["a", "b", "c"], &[("a", "b"), ("c", "a")]);
		assert_eq!(graph.len(), 3);
		assert_eq!(graph.edges().len(), 2);
		for (edge, (s, t)) in graph.edges().iter().zip([("a", "b"), ("c", "a")]) {
			let (source, target) = graph.endpoints(edge);
			assert!(std::ptr::eq(source, &graph.nodes()[edge.source.index()]));
			assert!(std::ptr::eq(target, &graph.nodes()[edge.target.index()]));
			assert_eq!((source.id.as_str(), target.id.as_str()), (s, t));
		}
		assert_eq!(graph.index_of("c"), Some(NodeIdx(2)));
		assert_eq!(graph.index_of("z"), None);
	}

	#[test]
	fn two_node_scenario_loads() {
		let graph = graph(&["a", "b"], &[("a", "b")]);
		assert_eq!(graph.len(), 2);
		assert_eq!(
			graph.edges(),
			&[Edge {
				source: NodeIdx(0),
				target: NodeIdx(1)
			}]
		);
	}

	#[test]
	fn dangling_edge_fails() {
		let err = Graph::load(&records(&["a"]), &[EdgeRecord::new("a", "z")], &PlainText)
			.unwrap_err();
		assert_eq!(
			err,
			LoadError::DanglingEdge {
				source_id: "a".into(),
				target_id: "z".into(),
				missing: "z".into(),
			}
		);
	}

	#[test]
	fn dangling_source_is_reported() {
		let err = Graph::load(&records(&["b"]), &[EdgeRecord::new("q", "b")], &PlainText)
			.unwrap_err();
		assert!(matches!(err, LoadError::DanglingEdge { missing, .. } if missing == "q"));
	}

	#[test]
	fn duplicate_ids_fail() {
		let err = Graph::load(&records(&["a", "b", "a"]), &[], &PlainText).unwrap_err();
		assert_eq!(err, LoadError::DuplicateId { id: "a".into() });
	}

	#[test]
	fn renderer_runs_twice_per_node_and_never_on_failure() {
		let calls = Cell::new(0);
		let counting = |source: &str| {
			calls.set(calls.get() + 1);
			Fragment::Text(source.to_string())
		};

		let graph = Graph::load(&records(&["a", "b", "c"]), &[], &counting).unwrap();
		assert_eq!(calls.get(), 6);
		assert_eq!(graph.nodes()[1].short, Fragment::Text("short b".into()));
		assert_eq!(graph.nodes()[1].details, Fragment::Text("details b".into()));

		calls.set(0);
		let _ = Graph::load(&records(&["a"]), &[EdgeRecord::new("a", "x")], &counting);
		assert_eq!(calls.get(), 0);
	}

	#[test]
	fn nodes_start_collapsed_and_unpinned() {
		let graph = graph(&["a"], &[]);
		let node = &graph.nodes()[0];
		assert!(!node.expanded);
		assert!(!node.is_pinned());
		assert_eq!(node.title, "A");
	}

	#[test]
	fn degrees_count_both_endpoints() {
		let graph = graph(&["a", "b", "c"], &[("a", "b"), ("a", "c"), ("c", "c")]);
		assert_eq!(graph.degrees(), vec![2, 1, 3]);
	}
}
