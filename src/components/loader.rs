//! Spinner overlay shown while a graph is being generated.

use leptos::prelude::*;

/// Centered spinner with a status message.
#[component]
pub fn Loader(#[prop(into)] message: String) -> impl IntoView {
	view! {
		<div class="loader-overlay" role="status" aria-live="polite">
			<div class="loader-spinner"></div>
			<p class="loader-message">{message}</p>
		</div>
	}
}
