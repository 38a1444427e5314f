use leptos::prelude::*;

use crate::traffic::EventLog;

/// Scrolling text view of the most recent events, newest at the bottom.
#[component]
pub fn EventLogView(log: RwSignal<EventLog>) -> impl IntoView {
	view! {
		<div class="event-log">
			{move || {
				log.with(|log| {
					log.lines()
						.map(|line| view! { <div class="event-log-line">{line.to_owned()}</div> })
						.collect_view()
				})
			}}
		</div>
	}
}
