//! Load-time failures.
//!
//! Every variant is terminal for the session: the app shell catches it once and
//! replaces the graph view with a single error message.

/// Errors raised while fetching, validating or constructing a graph.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LoadError {
	/// Network failure or a non-2xx response from the data source.
	#[error("failed to fetch {url}: {reason}")]
	Transport {
		/// Requested URL.
		url: String,
		/// What went wrong, as reported by the browser or the server.
		reason: String,
	},
	/// Payload was not a JSON array, or an element had the wrong shape.
	#[error("malformed {what} payload: {reason}")]
	Shape {
		/// Which payload: `nodes` or `edges`.
		what: &'static str,
		/// Decoder message.
		reason: String,
	},
	/// An edge names a node identifier that is not in the node list.
	#[error("edge [{source_id}, {target_id}] references unknown node `{missing}`")]
	DanglingEdge {
		/// Source id as supplied.
		source_id: String,
		/// Target id as supplied.
		target_id: String,
		/// The endpoint that matched no node.
		missing: String,
	},
	/// Two nodes share an identifier.
	#[error("duplicate node id `{id}`")]
	DuplicateId {
		/// The repeated identifier.
		id: String,
	},
	/// The configured content renderer is not registered.
	#[error("no content renderer registered under `{name}`")]
	RendererMissing {
		/// Requested renderer name.
		name: String,
	},
}

/// Result alias for graph loading.
pub type Result<T> = std::result::Result<T, LoadError>;
