use web_sys::Location;

use crate::error::{ClientError, js_reason};
use crate::traffic::{DEFAULT_IDLE_THRESHOLD, DEFAULT_LOG_CAPACITY, Placement, TrafficSession};

/// Path the router serves its event stream on.
pub const STATS_PATH: &str = "/stats.sock";

/// Settings for one dashboard session.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsConfig {
	pub stream_url: String,
	pub tick_interval_ms: u32,
	pub idle_threshold: u32,
	pub placement: Placement,
	pub log_capacity: usize,
	pub cascade_edges: bool,
}

impl Default for StatsConfig {
	fn default() -> Self {
		Self {
			stream_url: stream_url_for("http:", "127.0.0.1:7070"),
			tick_interval_ms: 1000,
			idle_threshold: DEFAULT_IDLE_THRESHOLD,
			placement: Placement::default(),
			log_capacity: DEFAULT_LOG_CAPACITY,
			cascade_edges: true,
		}
	}
}

impl StatsConfig {
	/// Defaults, with the stream served by the host the page came from.
	pub fn from_location(location: &Location) -> Result<Self, ClientError> {
		let host = location
			.host()
			.map_err(|e| ClientError::Location(js_reason(&e)))?;
		let protocol = location
			.protocol()
			.map_err(|e| ClientError::Location(js_reason(&e)))?;
		Ok(Self {
			stream_url: stream_url_for(&protocol, &host),
			..Self::default()
		})
	}

	/// [`from_location`](Self::from_location) for the current window.
	pub fn from_window() -> Result<Self, ClientError> {
		let window = web_sys::window().ok_or(ClientError::NoWindow)?;
		Self::from_location(&window.location())
	}

	/// Fresh engine state for this configuration.
	pub fn session(&self) -> TrafficSession {
		TrafficSession::new(self.idle_threshold, self.placement.clone())
			.with_cascade(self.cascade_edges)
	}
}

/// WebSocket URL for the stats stream on `host`, secure when the page is.
pub fn stream_url_for(protocol: &str, host: &str) -> String {
	let scheme = if protocol == "https:" { "wss" } else { "ws" };
	format!("{scheme}://{host}{STATS_PATH}")
}
