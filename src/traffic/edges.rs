use std::collections::HashSet;
use std::fmt::{self, Write as _};

/// Identity of a directed edge. `(A, B)` and `(B, A)` are different keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
	/// Sending node.
	pub source: String,
	/// Receiving node.
	pub dest: String,
}

impl EdgeKey {
	/// Key for the ordered pair.
	pub fn new(source: &str, dest: &str) -> Self {
		Self {
			source: source.to_owned(),
			dest: dest.to_owned(),
		}
	}

	/// Id handed to the renderer. Backslashes and `>` inside a node id are escaped, so
	/// distinct pairs always get distinct ids.
	pub fn id(&self) -> String {
		self.to_string()
	}

	/// Whether `node` is either endpoint.
	pub fn touches(&self, node: &str) -> bool {
		self.source == node || self.dest == node
	}
}

impl fmt::Display for EdgeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_escaped(f, &self.source)?;
		f.write_str("->")?;
		write_escaped(f, &self.dest)
	}
}

fn write_escaped(f: &mut fmt::Formatter<'_>, part: &str) -> fmt::Result {
	for c in part.chars() {
		if matches!(c, '\\' | '>') {
			f.write_char('\\')?;
		}
		f.write_char(c)?;
	}
	Ok(())
}

/// De-duplicated set of observed directed edges.
#[derive(Debug, Default)]
pub struct EdgeTracker {
	edges: HashSet<EdgeKey>,
}

impl EdgeTracker {
	/// Empty tracker.
	pub fn new() -> Self {
		Self::default()
	}

	/// Record `source -> dest`. Returns `true` only the first time the pair is seen.
	pub fn observe(&mut self, source: &str, dest: &str) -> bool {
		let key = EdgeKey::new(source, dest);
		if self.edges.contains(&key) {
			return false;
		}
		self.edges.insert(key)
	}

	/// Drop every edge with `node` at either end, returning the removed keys sorted.
	pub fn remove_touching(&mut self, node: &str) -> Vec<EdgeKey> {
		let mut removed: Vec<EdgeKey> = self
			.edges
			.iter()
			.filter(|key| key.touches(node))
			.cloned()
			.collect();
		for key in &removed {
			self.edges.remove(key);
		}
		removed.sort_unstable();
		removed
	}

	/// Whether `source -> dest` has been observed.
	pub fn contains(&self, source: &str, dest: &str) -> bool {
		self.edges.contains(&EdgeKey::new(source, dest))
	}

	/// Number of tracked edges.
	pub fn len(&self) -> usize {
		self.edges.len()
	}

	/// Whether no edge is tracked.
	pub fn is_empty(&self) -> bool {
		self.edges.is_empty()
	}

	/// Tracked edges, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = &EdgeKey> {
		self.edges.iter()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;

	#[test]
	fn observe_twice_is_new_then_known() {
		let mut tracker = EdgeTracker::new();
		assert!(tracker.observe("A", "B"));
		assert!(!tracker.observe("A", "B"));
		assert_eq!(tracker.len(), 1);
	}

	#[test]
	fn reversed_pair_is_a_distinct_edge() {
		let mut tracker = EdgeTracker::new();
		assert!(tracker.observe("A", "B"));
		assert!(tracker.observe("B", "A"));
		assert!(tracker.contains("A", "B"));
		assert!(tracker.contains("B", "A"));
		assert_eq!(tracker.len(), 2);
	}

	#[test]
	fn keys_do_not_collide_on_concatenation() {
		let mut tracker = EdgeTracker::new();
		assert!(tracker.observe("AB", "C"));
		assert!(tracker.observe("A", "BC"));
		assert_eq!(EdgeKey::new("AB", "C").id(), "AB->C");
	}

	#[test]
	fn ids_with_arrows_stay_distinct() {
		let left = EdgeKey::new("A->B", "C");
		let right = EdgeKey::new("A", "B->C");
		assert_ne!(left.id(), right.id());
		assert_eq!(left.id(), r"A-\>B->C");
		assert_eq!(right.id(), r"A->B-\>C");
		assert_ne!(EdgeKey::new(r"A\", "B").id(), EdgeKey::new("A", r"\B").id());
	}

	#[test]
	fn created_count_matches_distinct_pairs() {
		let stream = [
			("A", "B"),
			("B", "C"),
			("A", "B"),
			("C", "A"),
			("B", "C"),
			("A", "A"),
			("C", "A"),
			("B", "A"),
		];
		let mut tracker = EdgeTracker::new();
		let created = stream
			.iter()
			.filter(|(s, d)| tracker.observe(s, d))
			.count();
		let distinct: BTreeSet<_> = stream.iter().collect();
		assert_eq!(created, distinct.len());
		assert_eq!(tracker.len(), distinct.len());
	}

	#[test]
	fn remove_touching_takes_both_directions() {
		let mut tracker = EdgeTracker::new();
		tracker.observe("A", "B");
		tracker.observe("C", "A");
		tracker.observe("B", "C");

		let removed = tracker.remove_touching("A");
		assert_eq!(
			removed,
			vec![EdgeKey::new("A", "B"), EdgeKey::new("C", "A")]
		);
		assert_eq!(tracker.len(), 1);
		assert!(tracker.contains("B", "C"));
		assert!(tracker.remove_touching("A").is_empty());
	}
}
