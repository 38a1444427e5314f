use std::collections::HashSet;

use force_graph::DefaultNodeIdx;

/// Per-node render data carried inside the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: &'static str,
	pub anchor: bool,
	/// Seconds since the node was added, drives the fade-in.
	pub age: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
}

impl HoverState {
	pub fn forget(&mut self, idx: DefaultNodeIdx) {
		if self.node == Some(idx) || self.prev_node == Some(idx) {
			*self = Self::default();
			return;
		}
		self.neighbors.remove(&idx);
		self.prev_neighbors.remove(&idx);
	}
}
