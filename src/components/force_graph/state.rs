use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::warn;

use super::types::{DragState, HoverState, NodeInfo, PanState, ViewTransform};
use crate::traffic::{GraphSink, Position};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];
const ANCHOR_COLOR: &str = "#F2B1BA";
const LABEL_CHARS: usize = 8;

pub const NODE_RADIUS: f64 = 5.0;
pub const ANCHOR_RADIUS: f64 = 9.0;
pub const HIT_RADIUS: f64 = 12.0;

/// Renderer state shared between the canvas and the stats client.
pub type SharedGraph = Rc<RefCell<ForceGraphState>>;

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	anchor: String,
	nodes: HashMap<String, DefaultNodeIdx>,
	edges: HashMap<String, (DefaultNodeIdx, DefaultNodeIdx)>,
}

fn palette_color(id: &str) -> &'static str {
	let sum = id.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
	COLORS[sum % COLORS.len()]
}

fn short_label(id: &str) -> String {
	match id.char_indices().nth(LABEL_CHARS) {
		Some((cut, _)) => format!("{}…", &id[..cut]),
		None => id.to_owned(),
	}
}

impl ForceGraphState {
	/// Empty graph; `anchor` is pinned where it is first placed.
	pub fn new(anchor: &str) -> Self {
		Self {
			graph: ForceGraph::new(SimulationParameters {
				force_charge: 150.0,
				force_spring: 0.05,
				force_max: 100.0,
				node_speed: 3000.0,
				damping_factor: 0.9,
			}),
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 0.5,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width: 0.0,
			height: 0.0,
			flow_time: 0.0,
			anchor: anchor.to_owned(),
			nodes: HashMap::new(),
			edges: HashMap::new(),
		}
	}

	/// Resize the view, keeping graph space centred.
	pub fn fit_viewport(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// world-space, scales with zoom like the nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f32, f32)> {
		let mut pos = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pos = Some((node.x(), node.y()));
			}
		});
		pos
	}

	/// Move a node and pin it there.
	pub fn pin_node(&mut self, idx: DefaultNodeIdx, x: f32, y: f32) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = true;
			}
		});
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for &(src, tgt) in self.edges.values() {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.is_hovered(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.graph.visit_nodes_mut(|node| node.data.user_data.age += dt as f64);
		self.flow_time += dt as f64;

		let (target, speed) = if self.hover.node.is_some() {
			(1.0, 1.8)
		} else {
			(0.0, 1.26)
		};
		self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
		if self.hover.node.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}
	}
}

impl GraphSink for ForceGraphState {
	fn add_node(&mut self, id: &str, position: Position) {
		if self.nodes.contains_key(id) {
			return;
		}
		let anchor = id == self.anchor;
		let idx = self.graph.add_node(NodeData {
			x: position.x as f32,
			y: position.y as f32,
			mass: if anchor { 30.0 } else { 10.0 },
			is_anchor: anchor,
			user_data: NodeInfo {
				id: id.to_owned(),
				label: short_label(id),
				color: if anchor { ANCHOR_COLOR } else { palette_color(id) },
				anchor,
				age: 0.0,
			},
		});
		self.nodes.insert(id.to_owned(), idx);
	}

	fn add_edge(&mut self, id: &str, source: &str, target: &str) {
		if self.edges.contains_key(id) {
			return;
		}
		let (Some(&src), Some(&tgt)) = (self.nodes.get(source), self.nodes.get(target)) else {
			warn!("edge {id} references a node that is not drawn");
			return;
		};
		// self-traffic stays indexed but never enters the simulation
		if src != tgt {
			self.graph.add_edge(src, tgt, EdgeData::default());
		}
		self.edges.insert(id.to_owned(), (src, tgt));
	}

	// The simulation edge goes away with its endpoint, which is always removed next.
	fn remove_edge(&mut self, id: &str) {
		self.edges.remove(id);
	}

	fn remove_node(&mut self, id: &str) {
		let Some(idx) = self.nodes.remove(id) else {
			return;
		};
		self.graph.remove_node(idx);
		self.edges.retain(|_, &mut (src, tgt)| src != idx && tgt != idx);
		self.hover.forget(idx);
		if self.drag.node_idx == Some(idx) {
			self.drag = DragState::default();
		}
	}
}
