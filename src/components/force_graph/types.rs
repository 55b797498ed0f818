//! Wire records accepted from the data source.

use convert_case::{Case, Casing};
use serde::Deserialize;

/// A node as served by `GET /api/nodes`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeRecord {
	/// Unique identifier for this node. Used to reference nodes in edges.
	pub id: String,
	/// Display title. Derived from `id` when absent or blank.
	#[serde(default)]
	pub title: String,
	/// Source of the short description, always visible on the panel.
	#[serde(default)]
	pub short: String,
	/// Source of the long description, visible while the panel is expanded.
	#[serde(default, alias = "long")]
	pub details: String,
}

impl NodeRecord {
	/// Record with empty descriptions.
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			short: String::new(),
			details: String::new(),
		}
	}

	/// Set the short description source.
	pub fn with_short(mut self, short: impl Into<String>) -> Self {
		self.short = short.into();
		self
	}

	/// Set the long description source.
	pub fn with_details(mut self, details: impl Into<String>) -> Self {
		self.details = details.into();
		self
	}

	/// Title to display: the explicit title, or the id in Title Case
	/// (`linked_list` becomes `Linked List`).
	pub fn display_title(&self) -> String {
		let title = self.title.trim();
		if title.is_empty() {
			self.id.to_case(Case::Title)
		} else {
			title.to_string()
		}
	}
}

/// An edge as served by `GET /api/edges`: a `[source, target]` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "(String, String)")]
pub struct EdgeRecord {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
}

impl EdgeRecord {
	/// Edge from `source` to `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

impl From<(String, String)> for EdgeRecord {
	fn from((source, target): (String, String)) -> Self {
		Self { source, target }
	}
}

/// Complete graph payload: nodes and edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// List of nodes in the graph.
	pub nodes: Vec<NodeRecord>,
	/// List of edges between nodes.
	pub edges: Vec<EdgeRecord>,
}
