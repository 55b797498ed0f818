//! References between notes, written inline in their descriptions.
//!
//! Two forms are recognised: a bare `[note_id]` and a titled
//! `[Some title](note_id)`.

use std::collections::HashSet;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use super::types::{EdgeRecord, NodeRecord};

static BARE_REF: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\[([\w\s-]*)\]").expect("valid regex"));
static TITLED_REF: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\[[^\]]*\]\(([\w\s-]*)\)").expect("valid regex"));

/// Every referenced id in `source`, trimmed, in order of appearance.
pub fn extract_references(source: &str) -> Vec<String> {
	// A bare `[id]` directly followed by `(` is the title of a titled link.
	let bare = BARE_REF.captures_iter(source).filter(|caps| {
		caps.get(0)
			.is_some_and(|m| source.as_bytes().get(m.end()) != Some(&b'('))
	});
	let mut found: Vec<(usize, String)> = bare
		.chain(TITLED_REF.captures_iter(source))
		.filter_map(|caps| caps.get(1))
		.map(|m| (m.start(), m.as_str().trim().to_string()))
		.filter(|(_, id)| !id.is_empty())
		.collect();
	found.sort_by_key(|(start, _)| *start);
	found.into_iter().map(|(_, id)| id).collect()
}

/// Edges implied by references inside node content.
///
/// References to unknown ids are prose, not data-source edges, so they are
/// dropped with a warning instead of failing the load. Self references and
/// pairs already present in `existing` are skipped.
pub fn derive_edges(nodes: &[NodeRecord], existing: &[EdgeRecord]) -> Vec<EdgeRecord> {
	let known: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
	let mut seen: HashSet<EdgeRecord> = existing.iter().cloned().collect();
	let mut derived = Vec::new();

	for node in nodes {
		let references = extract_references(&node.short)
			.into_iter()
			.chain(extract_references(&node.details));
		for target in references {
			if target == node.id {
				continue;
			}
			if !known.contains(target.as_str()) {
				warn!(
					"note-graph: `{}` references unknown note `{}`, skipping",
					node.id, target
				);
				continue;
			}
			let edge = EdgeRecord::new(node.id.clone(), target);
			if seen.insert(edge.clone()) {
				derived.push(edge);
			}
		}
	}
	derived
}
