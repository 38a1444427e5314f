use std::collections::HashMap;

use log::debug;

/// Ticks of silence a node survives. It is evicted once its idle count goes past this.
pub const DEFAULT_IDLE_THRESHOLD: u32 = 10;

/// Activity counters for one node since the last decay tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeActivity {
	/// Messages received since the last tick.
	pub rx: u32,
	/// Messages sent since the last tick.
	pub tx: u32,
	/// Consecutive ticks without any traffic.
	pub idle_ticks: u32,
}

impl NodeActivity {
	fn is_quiet(&self) -> bool {
		self.rx == 0 && self.tx == 0
	}

	/// Fold the counters into the idle count and clear them.
	fn decay(&mut self) {
		if self.is_quiet() {
			self.idle_ticks += 1;
		} else {
			self.idle_ticks = 0;
		}
		self.rx = 0;
		self.tx = 0;
	}
}

/// Known nodes keyed by id.
#[derive(Debug)]
pub struct NodeRegistry {
	nodes: HashMap<String, NodeActivity>,
	idle_threshold: u32,
}

impl Default for NodeRegistry {
	fn default() -> Self {
		Self::new(DEFAULT_IDLE_THRESHOLD)
	}
}

impl NodeRegistry {
	/// Empty registry evicting nodes idle for more than `idle_threshold` ticks.
	pub fn new(idle_threshold: u32) -> Self {
		Self {
			nodes: HashMap::new(),
			idle_threshold,
		}
	}

	/// Returns the node for `id`, creating it if unknown. The flag is `true` on creation.
	pub fn get_or_create(&mut self, id: &str) -> (&mut NodeActivity, bool) {
		let created = !self.nodes.contains_key(id);
		if created {
			debug!("node {id} joined");
		}
		let node = self.nodes.entry(id.to_owned()).or_default();
		(node, created)
	}

	/// Count a message received by `id`. Returns `true` if the node was created.
	pub fn record_receive(&mut self, id: &str) -> bool {
		let (node, created) = self.get_or_create(id);
		node.rx += 1;
		created
	}

	/// Count a message sent by `id`. Returns `true` if the node was created.
	pub fn record_send(&mut self, id: &str) -> bool {
		let (node, created) = self.get_or_create(id);
		node.tx += 1;
		created
	}

	/// Age every node by one tick and evict those past the idle threshold.
	///
	/// Evicted ids come back sorted.
	pub fn tick(&mut self) -> Vec<String> {
		let threshold = self.idle_threshold;
		let mut evicted = Vec::new();
		self.nodes.retain(|id, node| {
			node.decay();
			let keep = node.idle_ticks <= threshold;
			if !keep {
				evicted.push(id.clone());
			}
			keep
		});
		evicted.sort_unstable();
		for id in &evicted {
			debug!("node {id} evicted after {} silent ticks", threshold + 1);
		}
		evicted
	}

	/// Counters for `id`, if known.
	pub fn get(&self, id: &str) -> Option<&NodeActivity> {
		self.nodes.get(id)
	}

	/// Whether `id` is known.
	pub fn contains(&self, id: &str) -> bool {
		self.nodes.contains_key(id)
	}

	/// Number of known nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether no node is known.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Known ids, in no particular order.
	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.nodes.keys().map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_id_is_created_with_zero_counters() {
		let mut registry = NodeRegistry::default();
		let (node, created) = registry.get_or_create("A");
		assert!(created);
		assert_eq!(*node, NodeActivity::default());

		let (_, created) = registry.get_or_create("A");
		assert!(!created);
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn receive_and_send_count_separately() {
		let mut registry = NodeRegistry::default();
		assert!(registry.record_receive("A"));
		assert!(!registry.record_send("A"));
		assert!(!registry.record_send("A"));

		let node = registry.get("A").unwrap();
		assert_eq!((node.rx, node.tx), (1, 2));
	}

	#[test]
	fn tick_resets_counters_and_idle_count_on_activity() {
		let mut registry = NodeRegistry::default();
		registry.record_send("A");
		registry.tick();
		registry.tick();
		assert_eq!(registry.get("A").unwrap().idle_ticks, 1);

		registry.record_receive("A");
		assert!(registry.tick().is_empty());
		let node = registry.get("A").unwrap();
		assert_eq!(node.idle_ticks, 0);
		assert_eq!((node.rx, node.tx), (0, 0));
	}

	#[test]
	fn quiet_tick_increments_idle_by_one() {
		let mut registry = NodeRegistry::default();
		registry.get_or_create("A");
		for expected in 1..=5 {
			registry.tick();
			assert_eq!(registry.get("A").unwrap().idle_ticks, expected);
		}
	}

	#[test]
	fn evicted_on_eleventh_silent_tick() {
		let mut registry = NodeRegistry::default();
		registry.record_send("A");
		// absorbs the activity
		assert!(registry.tick().is_empty());

		for _ in 0..10 {
			assert!(registry.tick().is_empty());
		}
		assert!(registry.contains("A"));

		assert_eq!(registry.tick(), vec!["A".to_owned()]);
		assert!(!registry.contains("A"));
		assert!(registry.is_empty());
	}

	#[test]
	fn eviction_respects_custom_threshold_and_sorts_ids() {
		let mut registry = NodeRegistry::new(1);
		registry.get_or_create("c");
		registry.get_or_create("a");
		registry.get_or_create("b");
		assert!(registry.tick().is_empty());
		assert_eq!(registry.tick(), vec!["a", "b", "c"]);
	}
}
