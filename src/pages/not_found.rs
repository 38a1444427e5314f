use leptos::prelude::*;

/// 404 - Not Found
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"Nothing here"</h1>
		<p>
			<a href="/">"Back to the traffic graph"</a>
		</p>
	}
}
