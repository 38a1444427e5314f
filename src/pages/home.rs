use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;

use crate::client::{DashboardSignals, StatsClient};
use crate::components::event_log::EventLogView;
use crate::components::force_graph::{ForceGraphCanvas, ForceGraphState, SharedGraph};
use crate::config::StatsConfig;
use crate::error::ClientError;

/// Live traffic dashboard for the router serving this page.
#[component]
pub fn Home() -> impl IntoView {
	let (config, config_error) = match StatsConfig::from_window() {
		Ok(config) => (config, None),
		Err(err) => (StatsConfig::default(), Some(err)),
	};
	let graph: SharedGraph = Rc::new(RefCell::new(ForceGraphState::new(&config.placement.anchor)));
	let signals = DashboardSignals::new(config.log_capacity);
	let start_error = RwSignal::new(config_error);

	// lives as long as the page's reactive owner
	let client: Rc<RefCell<Option<StatsClient>>> = Rc::new(RefCell::new(None));
	let graph_client = graph.clone();
	Effect::new(move |_| {
		if client.borrow().is_some() || start_error.get_untracked().is_some() {
			return;
		}
		match StatsClient::start(&config, graph_client.clone(), signals) {
			Ok(started) => *client.borrow_mut() = Some(started),
			Err(err) => {
				error!("stats client did not start: {err}");
				start_error.set(Some(err));
			}
		}
	});

	let status = move || {
		format!(
			"{} · {} nodes · {} edges",
			signals.connection.get(),
			signals.nodes.get(),
			signals.edges.get()
		)
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{move || start_error.get().map_or(Ok::<(), ClientError>(()), Err)}
		</ErrorBoundary>

		<div class="fullscreen-graph">
			<ForceGraphCanvas graph=graph fullscreen=true />
			<div class="graph-overlay">
				<h1>"Relay Traffic"</h1>
				<p class="subtitle">{status}</p>
			</div>
			<EventLogView log=signals.log />
		</div>
	}
}
