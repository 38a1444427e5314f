/// A point in graph space. The origin is the centre of the view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

/// One mutation of the visual graph.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphOp {
	/// A node appeared.
	AddNode {
		/// Node id.
		id: String,
		/// Initial placement.
		position: Position,
	},
	/// A directed edge appeared.
	AddEdge {
		/// Edge id, see [`EdgeKey::id`](super::EdgeKey::id).
		id: String,
		/// Sending node.
		source: String,
		/// Receiving node.
		target: String,
	},
	/// An edge was dropped together with one of its endpoints.
	RemoveEdge {
		/// Edge id.
		id: String,
	},
	/// A node was evicted.
	RemoveNode {
		/// Node id.
		id: String,
	},
}

/// Receiver of graph mutations produced by a [`TrafficSession`](super::TrafficSession).
///
/// The canvas renderer implements this directly; tests collect into a `Vec<GraphOp>`.
pub trait GraphSink {
	/// Add a visual node at `position`.
	fn add_node(&mut self, id: &str, position: Position);
	/// Add a visual edge from `source` to `target`.
	fn add_edge(&mut self, id: &str, source: &str, target: &str);
	/// Remove a visual edge.
	fn remove_edge(&mut self, id: &str);
	/// Remove a visual node.
	fn remove_node(&mut self, id: &str);
}

impl GraphSink for Vec<GraphOp> {
	fn add_node(&mut self, id: &str, position: Position) {
		self.push(GraphOp::AddNode {
			id: id.to_owned(),
			position,
		});
	}

	fn add_edge(&mut self, id: &str, source: &str, target: &str) {
		self.push(GraphOp::AddEdge {
			id: id.to_owned(),
			source: source.to_owned(),
			target: target.to_owned(),
		});
	}

	fn remove_edge(&mut self, id: &str) {
		self.push(GraphOp::RemoveEdge { id: id.to_owned() });
	}

	fn remove_node(&mut self, id: &str) {
		self.push(GraphOp::RemoveNode { id: id.to_owned() });
	}
}
