//! View-mode, link-type and minimum-weight controls.
//!
//! Every control replaces a field of the shared [`ViewState`]; the projection
//! is re-derived from the new value.

use leptos::prelude::*;

use crate::graph::{DisplayMode, ViewState};

/// Largest weight the language model is asked to assign.
const MAX_WEIGHT: f64 = 20.0;

/// Filter panel beside the graph.
#[component]
pub fn FilterControls(
	view_state: RwSignal<ViewState>,
	/// Display names of the two systems, used for their mode buttons.
	#[prop(into)] system_names: Signal<(String, String)>,
	/// Intersection mode needs at least one keyword shared by both lists.
	#[prop(into)] has_common: Signal<bool>,
	#[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
	let mode_label = move |mode: DisplayMode| {
		let (a, b) = system_names.get();
		match mode {
			DisplayMode::SystemA => a,
			DisplayMode::SystemB => b,
			other => other.label().to_string(),
		}
	};

	let mode_buttons = DisplayMode::ALL
		.into_iter()
		.map(|mode| {
			let is_active = move || view_state.with(|v| v.mode == mode);
			let is_disabled = move || {
				disabled.get() || (mode == DisplayMode::Intersection && !has_common.get())
			};
			view! {
				<button
					type="button"
					class="mode-button"
					class:active=is_active
					disabled=is_disabled
					on:click=move |_| view_state.update(|v| v.mode = mode)
				>
					{move || mode_label(mode)}
				</button>
			}
		})
		.collect_view();

	view! {
		<fieldset class="filter-controls" disabled=move || disabled.get()>
			<legend>"View"</legend>

			<div class="mode-buttons">{mode_buttons}</div>

			<div class="link-filters">
				<label>
					<input
						type="checkbox"
						prop:checked=move || view_state.with(|v| v.filters.show_explicit)
						on:change=move |ev| {
							let checked = event_target_checked(&ev);
							view_state.update(|v| v.filters.show_explicit = checked);
						}
					/>
					" Explicit links"
				</label>
				<label>
					<input
						type="checkbox"
						prop:checked=move || view_state.with(|v| v.filters.show_generated)
						on:change=move |ev| {
							let checked = event_target_checked(&ev);
							view_state.update(|v| v.filters.show_generated = checked);
						}
					/>
					" Generated links"
				</label>
			</div>

			<label class="weight-filter">
				{move || format!("Minimum weight: {}", view_state.with(|v| v.weight_threshold))}
				<input
					type="range"
					min="0"
					max=MAX_WEIGHT.to_string()
					step="1"
					prop:value=move || view_state.with(|v| v.weight_threshold.to_string())
					on:input=move |ev| {
						if let Ok(threshold) = event_target_value(&ev).parse::<f64>() {
							view_state.update(|v| v.weight_threshold = threshold.clamp(0.0, MAX_WEIGHT));
						}
					}
				/>
			</label>
		</fieldset>
	}
}
