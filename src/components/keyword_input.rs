//! Input panel: the two systems' keyword lists, document uploads, explicit
//! links and the generate button.

use leptos::prelude::*;
use web_sys::{Event, File, HtmlInputElement};

use crate::session::{BusyFlags, Operation, Side};

/// Uploads accepted by the file picker. Other types are still rejected by MIME.
const ACCEPTED_UPLOADS: &str = ".txt,.md,.pdf,text/plain,text/markdown,application/pdf";

/// Fields edited by the panel, owned by the caller.
#[derive(Clone, Copy)]
pub struct KeywordFields {
	pub name_a: RwSignal<String>,
	pub name_b: RwSignal<String>,
	pub keywords_a: RwSignal<String>,
	pub keywords_b: RwSignal<String>,
	/// Explicit links, `a-b` pairs separated by commas.
	pub links: RwSignal<String>,
}

impl KeywordFields {
	pub fn name(&self, side: Side) -> RwSignal<String> {
		match side {
			Side::A => self.name_a,
			Side::B => self.name_b,
		}
	}

	pub fn keywords(&self, side: Side) -> RwSignal<String> {
		match side {
			Side::A => self.keywords_a,
			Side::B => self.keywords_b,
		}
	}
}

/// First file of a file input, clearing the input so the same file can be picked again.
fn take_file(ev: &Event) -> Option<File> {
	let input = event_target::<HtmlInputElement>(ev);
	let file = input.files().and_then(|files| files.get(0));
	input.set_value("");
	file
}

#[component]
fn SystemPanel(
	side: Side,
	fields: KeywordFields,
	#[prop(into)] busy: Signal<BusyFlags>,
	on_upload: Callback<(Side, File)>,
) -> impl IntoView {
	let name = fields.name(side);
	let keywords = fields.keywords(side);
	let analyzing = move || busy.get().is_busy(Operation::Analyze(side));
	let (name_id, keywords_id, upload_id) = match side {
		Side::A => ("system-a-name", "system-a-keywords", "system-a-upload"),
		Side::B => ("system-b-name", "system-b-keywords", "system-b-upload"),
	};

	view! {
		<div class="system-panel">
			<label for=name_id class="field-label">{side.label()}" name"</label>
			<input
				id=name_id
				type="text"
				prop:value=move || name.get()
				on:input=move |ev| name.set(event_target_value(&ev))
			/>

			<label for=keywords_id class="field-label">
				"Keywords "
				<span class="hint">"(keyword:weight, ...)"</span>
			</label>
			<textarea
				id=keywords_id
				rows="4"
				prop:value=move || keywords.get()
				on:input=move |ev| keywords.set(event_target_value(&ev))
				disabled=analyzing
			/>

			<label for=upload_id class="upload-button" class:disabled=analyzing>
				{move || if analyzing() { "Analyzing..." } else { "Upload Document" }}
			</label>
			<input
				id=upload_id
				type="file"
				class="visually-hidden"
				accept=ACCEPTED_UPLOADS
				disabled=analyzing
				on:change=move |ev| {
					if let Some(file) = take_file(&ev) {
						on_upload.run((side, file));
					}
				}
			/>
		</div>
	}
}

/// Both system panels, the explicit-links field and the generate button.
///
/// Each control is disabled only while its own operation is busy. Submitting
/// the form runs `on_generate`.
#[component]
pub fn KeywordInput(
	fields: KeywordFields,
	#[prop(into)] busy: Signal<BusyFlags>,
	on_generate: Callback<()>,
	on_suggest: Callback<()>,
	on_upload: Callback<(Side, File)>,
) -> impl IntoView {
	let links = fields.links;
	let generating = move || busy.get().is_busy(Operation::Generate);
	let suggesting = move || busy.get().is_busy(Operation::Suggest);

	view! {
		<form
			class="keyword-input"
			on:submit=move |ev| {
				ev.prevent_default();
				on_generate.run(());
			}
		>
			<SystemPanel side=Side::A fields=fields busy=busy on_upload=on_upload />
			<SystemPanel side=Side::B fields=fields busy=busy on_upload=on_upload />

			<div class="links-panel">
				<label for="explicit-links" class="field-label">
					"Explicit links "
					<span class="hint">"(keywordA-keywordB, ...)"</span>
				</label>
				<textarea
					id="explicit-links"
					rows="2"
					prop:value=move || links.get()
					on:input=move |ev| links.set(event_target_value(&ev))
				/>
				<button
					type="button"
					class="secondary-button"
					disabled=suggesting
					on:click=move |_| on_suggest.run(())
				>
					{move || if suggesting() { "Suggesting..." } else { "Suggest Links" }}
				</button>
			</div>

			<button type="submit" class="primary-button" disabled=generating>
				{move || if generating() { "Generating..." } else { "Generate Graph" }}
			</button>
		</form>
	}
}
