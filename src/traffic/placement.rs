use std::f64::consts::TAU;

use super::ops::Position;

/// Id the router uses for itself in the stats stream.
pub const LOCAL_ROUTER_ID: &str = "US";

/// Initial position heuristic for new nodes.
///
/// The anchor sits at the origin; everyone else lands on a ring at an angle hashed
/// from the id, so a router reappears where it was last time.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
	/// Id pinned at the origin.
	pub anchor: String,
	/// Ring radius in graph units.
	pub radius: f64,
}

impl Default for Placement {
	fn default() -> Self {
		Self {
			anchor: LOCAL_ROUTER_ID.to_owned(),
			radius: 500.0,
		}
	}
}

impl Placement {
	/// Whether `id` is the pinned anchor.
	pub fn is_anchor(&self, id: &str) -> bool {
		self.anchor == id
	}

	/// Position for a newly seen node.
	pub fn position_of(&self, id: &str) -> Position {
		if self.is_anchor(id) {
			return Position::default();
		}
		let angle = angle_of(id);
		Position {
			x: self.radius * angle.cos(),
			y: self.radius * angle.sin(),
		}
	}
}

/// Angle in `[0, 2π)` from the FNV-1a hash of `id`.
fn angle_of(id: &str) -> f64 {
	let hash = id.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
		(h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
	});
	(hash as f64 / u64::MAX as f64) * TAU % TAU
}
