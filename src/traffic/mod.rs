//! Graph-state engine fed by the router's stats stream.
//!
//! A [`TrafficSession`] owns the node registry and the edge tracker for one client
//! connection. Frames go in through [`TrafficSession::on_message`], decay runs through
//! [`TrafficSession::tick`], and every visible change is pushed to a [`GraphSink`].

mod edges;
mod event;
mod event_log;
mod ops;
mod placement;
mod registry;

use log::debug;

pub use edges::{EdgeKey, EdgeTracker};
pub use event::{DecodeError, MessageKind, TrafficEvent};
pub use event_log::{DEFAULT_LOG_CAPACITY, EventLog};
pub use ops::{GraphOp, GraphSink, Position};
pub use placement::{LOCAL_ROUTER_ID, Placement};
pub use registry::{DEFAULT_IDLE_THRESHOLD, NodeActivity, NodeRegistry};

/// What one decay tick removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
	/// Nodes evicted, sorted.
	pub evicted: Vec<String>,
	/// Edges dropped along with them.
	pub dropped_edges: Vec<EdgeKey>,
}

/// Registry and tracker for one stats connection.
#[derive(Debug)]
pub struct TrafficSession {
	registry: NodeRegistry,
	edges: EdgeTracker,
	placement: Placement,
	cascade_edges: bool,
}

impl Default for TrafficSession {
	fn default() -> Self {
		Self::new(DEFAULT_IDLE_THRESHOLD, Placement::default())
	}
}

impl TrafficSession {
	/// Empty session. Edges are dropped with their endpoints unless disabled with
	/// [`with_cascade`](Self::with_cascade).
	pub fn new(idle_threshold: u32, placement: Placement) -> Self {
		Self {
			registry: NodeRegistry::new(idle_threshold),
			edges: EdgeTracker::new(),
			placement,
			cascade_edges: true,
		}
	}

	/// With `false`, edges outlive evicted endpoints in the tracker. Their visuals still
	/// disappear with the node, and a returning node does not get them redrawn.
	pub fn with_cascade(mut self, cascade: bool) -> Self {
		self.cascade_edges = cascade;
		self
	}

	/// Decode and apply one raw frame. Malformed frames are dropped without touching state.
	pub fn on_message(&mut self, raw: &str, sink: &mut impl GraphSink) -> Option<TrafficEvent> {
		match TrafficEvent::decode(raw) {
			Ok(event) => {
				self.ingest(&event, sink);
				Some(event)
			}
			Err(err) => {
				debug!("dropping stats frame: {err}");
				None
			}
		}
	}

	/// Apply a decoded event: count it on both ends, then record the edge.
	pub fn ingest(&mut self, event: &TrafficEvent, sink: &mut impl GraphSink) {
		if self.registry.record_receive(&event.dest) {
			sink.add_node(&event.dest, self.placement.position_of(&event.dest));
		}
		if self.registry.record_send(&event.source) {
			sink.add_node(&event.source, self.placement.position_of(&event.source));
		}
		if self.edges.observe(&event.source, &event.dest) {
			let key = EdgeKey::new(&event.source, &event.dest);
			sink.add_edge(&key.id(), &key.source, &key.dest);
		}
	}

	/// One decay step. Edges touching an evicted node are removed before the node.
	pub fn tick(&mut self, sink: &mut impl GraphSink) -> TickReport {
		let evicted = self.registry.tick();
		let mut dropped_edges = Vec::new();
		for id in &evicted {
			if self.cascade_edges {
				for key in self.edges.remove_touching(id) {
					sink.remove_edge(&key.id());
					dropped_edges.push(key);
				}
			}
			sink.remove_node(id);
		}
		TickReport {
			evicted,
			dropped_edges,
		}
	}

	/// Node counters.
	pub fn registry(&self) -> &NodeRegistry {
		&self.registry
	}

	/// Observed edges.
	pub fn edges(&self) -> &EdgeTracker {
		&self.edges
	}

	/// Whether `id` is the anchored local router.
	pub fn is_anchor(&self, id: &str) -> bool {
		self.placement.is_anchor(id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pos(placement: &Placement, id: &str) -> Position {
		placement.position_of(id)
	}

	#[test]
	fn new_endpoints_are_added_before_their_edge() {
		let mut session = TrafficSession::default();
		let mut ops: Vec<GraphOp> = Vec::new();
		session.on_message(r#"[11,"A","B",100]"#, &mut ops);

		let placement = Placement::default();
		assert_eq!(
			ops,
			vec![
				GraphOp::AddNode {
					id: "B".into(),
					position: pos(&placement, "B"),
				},
				GraphOp::AddNode {
					id: "A".into(),
					position: pos(&placement, "A"),
				},
				GraphOp::AddEdge {
					id: "A->B".into(),
					source: "A".into(),
					target: "B".into(),
				},
			]
		);
	}

	#[test]
	fn repeated_event_emits_nothing_new() {
		let mut session = TrafficSession::default();
		let mut ops: Vec<GraphOp> = Vec::new();
		session.on_message(r#"[11,"A","B",100]"#, &mut ops);
		ops.clear();
		session.on_message(r#"[11,"A","B",101]"#, &mut ops);
		assert!(ops.is_empty());
		assert_eq!(session.registry().get("A").unwrap().tx, 2);
	}

	#[test]
	fn malformed_frame_leaves_state_alone() {
		let mut session = TrafficSession::default();
		let mut ops: Vec<GraphOp> = Vec::new();
		session.on_message(r#"[0,"A","B",100]"#, &mut ops);
		ops.clear();

		assert!(session.on_message("not json", &mut ops).is_none());
		assert!(session.on_message(r#"[0,"C"]"#, &mut ops).is_none());
		assert!(ops.is_empty());
		assert_eq!(session.registry().len(), 2);
		assert_eq!(session.edges().len(), 1);
		assert_eq!(session.registry().get("A").unwrap().tx, 1);
	}

	#[test]
	fn eviction_cascades_to_edges() {
		let mut session = TrafficSession::new(0, Placement::default());
		let mut ops: Vec<GraphOp> = Vec::new();
		session.on_message(r#"[0,"A","B",1]"#, &mut ops);
		session.on_message(r#"[0,"C","A",2]"#, &mut ops);
		assert!(session.tick(&mut ops).evicted.is_empty());
		ops.clear();

		session.on_message(r#"[0,"B","C",3]"#, &mut ops);
		assert_eq!(ops.len(), 1);
		ops.clear();

		let report = session.tick(&mut ops);
		assert_eq!(report.evicted, vec!["A"]);
		assert_eq!(
			report.dropped_edges,
			vec![EdgeKey::new("A", "B"), EdgeKey::new("C", "A")]
		);
		assert_eq!(
			ops,
			vec![
				GraphOp::RemoveEdge { id: "A->B".into() },
				GraphOp::RemoveEdge { id: "C->A".into() },
				GraphOp::RemoveNode { id: "A".into() },
			]
		);
		assert_eq!(session.edges().len(), 1);
		assert!(session.edges().iter().all(|key| !key.touches("A")));
	}

	#[test]
	fn returning_node_gets_its_edges_back() {
		let mut session = TrafficSession::new(0, Placement::default());
		let mut ops: Vec<GraphOp> = Vec::new();
		session.on_message(r#"[0,"A","B",1]"#, &mut ops);
		session.tick(&mut ops);
		session.tick(&mut ops);
		assert!(session.registry().is_empty());
		ops.clear();

		session.on_message(r#"[0,"A","B",2]"#, &mut ops);
		assert!(ops.contains(&GraphOp::AddEdge {
			id: "A->B".into(),
			source: "A".into(),
			target: "B".into(),
		}));
	}

	#[test]
	fn without_cascade_edges_dangle() {
		let mut session = TrafficSession::new(0, Placement::default()).with_cascade(false);
		let mut ops: Vec<GraphOp> = Vec::new();
		session.on_message(r#"[0,"A","B",1]"#, &mut ops);
		session.tick(&mut ops);
		ops.clear();

		let report = session.tick(&mut ops);
		assert_eq!(report.evicted, vec!["A", "B"]);
		assert!(report.dropped_edges.is_empty());
		assert_eq!(
			ops,
			vec![
				GraphOp::RemoveNode { id: "A".into() },
				GraphOp::RemoveNode { id: "B".into() },
			]
		);
		assert!(session.edges().contains("A", "B"));
	}

	#[test]
	fn anchor_lands_at_origin() {
		let mut session = TrafficSession::default();
		let mut ops: Vec<GraphOp> = Vec::new();
		session.on_message(r#"["3","US","peer",1]"#, &mut ops);
		assert!(session.is_anchor("US"));
		assert!(ops.contains(&GraphOp::AddNode {
			id: "US".into(),
			position: Position::default(),
		}));
	}
}
