use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::info;

use crate::components::force_graph::SharedGraph;
use crate::config::StatsConfig;
use crate::error::ClientError;
use crate::scheduler::DecayScheduler;
use crate::traffic::{EventLog, TrafficSession};
use crate::transport::{ConnectionState, StatsSocket};

/// Reactive values the overlay reads.
#[derive(Clone, Copy)]
pub struct DashboardSignals {
	/// Socket status for the subtitle.
	pub connection: RwSignal<ConnectionState>,
	/// Live node count.
	pub nodes: RwSignal<usize>,
	/// Live edge count.
	pub edges: RwSignal<usize>,
	/// Recent events, newest last.
	pub log: RwSignal<EventLog>,
}

impl DashboardSignals {
	/// Fresh signals, connecting, with an empty log of `log_capacity` lines.
	pub fn new(log_capacity: usize) -> Self {
		Self {
			connection: RwSignal::new(ConnectionState::Connecting),
			nodes: RwSignal::new(0),
			edges: RwSignal::new(0),
			log: RwSignal::new(EventLog::new(log_capacity)),
		}
	}

	fn publish_counts(&self, session: &TrafficSession) {
		self.nodes.set(session.registry().len());
		self.edges.set(session.edges().len());
	}
}

/// One live connection: stream in, decay ticking, graph out.
///
/// Dropping it closes the socket and stops the timer.
pub struct StatsClient {
	_socket: StatsSocket,
	_scheduler: DecayScheduler,
}

impl StatsClient {
	/// Open the stream at `config.stream_url` and start the decay timer, drawing into `graph`.
	pub fn start(
		config: &StatsConfig,
		graph: SharedGraph,
		signals: DashboardSignals,
	) -> Result<Self, ClientError> {
		let session = Rc::new(RefCell::new(config.session()));

		let on_frame = {
			let (session, graph) = (session.clone(), graph.clone());
			move |frame: &str| {
				let mut session = session.borrow_mut();
				let Some(event) = session.on_message(frame, &mut *graph.borrow_mut()) else {
					return;
				};
				signals.log.update(|log| log.push(event.to_string()));
				signals.publish_counts(&session);
			}
		};
		let socket = StatsSocket::connect(&config.stream_url, on_frame, move |state| {
			signals.connection.set(state)
		})?;

		let scheduler = DecayScheduler::start(config.tick_interval_ms, move || {
			let mut session = session.borrow_mut();
			let report = session.tick(&mut *graph.borrow_mut());
			if !report.evicted.is_empty() {
				info!(
					"evicted {} idle nodes, {} edges",
					report.evicted.len(),
					report.dropped_edges.len()
				);
				signals.publish_counts(&session);
			}
		})?;

		Ok(Self {
			_socket: socket,
			_scheduler: scheduler,
		})
	}
}
