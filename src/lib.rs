//! keyword-graph: AI-generated keyword knowledge graphs in the browser.
//!
//! Two weighted keyword lists (optionally extracted from uploaded documents)
//! and a set of explicit links are sent to a hosted language model, which
//! returns a graph of nodes and typed links. The graph is rendered as an
//! interactive force-directed diagram and filtered client-side by display mode,
//! link type and minimum weight.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, error, info};
use web_sys::File;

mod components;
pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod service;
pub mod session;

use components::force_graph::{ForceGraphCanvas, GraphView};
use components::keyword_input::KeywordFields;
use components::{FilterControls, KeywordInput, Loader};
use config::AppConfig;
use document::{DocumentKind, read_document, truncate_chars};
use error::{AppError, AppResult, Failed};
use graph::{CommonNodes, GraphData, ViewState, common_keywords, emphasis, parse_keywords, project};
use service::GeminiClient;
use session::{
	BusyFlags, Operation, Side, apply_analysis, apply_generation, apply_suggestion, begin_analysis,
};

const DEFAULT_KEYWORDS_A: &str =
	"design:10, product:9, user-experience:8, prototype:7, research:6, collaboration:5";
const DEFAULT_KEYWORDS_B: &str =
	"business:8, brand:7, marketing:6, strategy:6, product:5, collaboration:5";
const DEFAULT_LINKS: &str = "product-solution, design-brand, collaboration-team";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("keyword-graph: logging initialized");
}

/// Main application component.
/// Loads configuration from the DOM; a missing API key is fatal.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let body = match AppConfig::load() {
		Ok(config) => view! { <Workspace config=config /> }.into_any(),
		Err(e) => {
			error!("keyword-graph: configuration error: {}", e);
			view! { <ConfigErrorScreen message=e.to_string() /> }.into_any()
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Keyword Knowledge Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		{body}
	}
}

#[component]
fn ConfigErrorScreen(message: String) -> impl IntoView {
	view! {
		<div class="config-error" role="alert">
			<h1>"Configuration error"</h1>
			<p>{message}</p>
			<p class="subtitle">
				"Build with API_KEY set, or add an \"apiKey\" to the #app-config block of index.html."
			</p>
		</div>
	}
}

async fn analyze_document(
	client: &GeminiClient,
	file: &File,
	kind: DocumentKind,
	max_chars: usize,
) -> AppResult<String> {
	let text = read_document(file, kind).await?;
	let text = truncate_chars(&text, max_chars);
	info!(
		"keyword-graph: extracted {} characters from {}",
		text.chars().count(),
		file.name()
	);
	client
		.extract_keywords(text)
		.await
		.map_err(|e| AppError::service(Failed::Analysis, e))
}

/// Input panel, filters and graph for a configured session.
#[component]
fn Workspace(config: AppConfig) -> impl IntoView {
	let client = StoredValue::new_local(GeminiClient::new(&config));
	let max_chars = config.max_document_chars;

	let fields = KeywordFields {
		name_a: RwSignal::new(Side::A.label().to_string()),
		name_b: RwSignal::new(Side::B.label().to_string()),
		keywords_a: RwSignal::new(DEFAULT_KEYWORDS_A.to_string()),
		keywords_b: RwSignal::new(DEFAULT_KEYWORDS_B.to_string()),
		links: RwSignal::new(DEFAULT_LINKS.to_string()),
	};
	let graph = RwSignal::new(GraphData::default());
	let common = RwSignal::new(CommonNodes::new());
	let view_state = RwSignal::new(ViewState::default());
	let busy = RwSignal::new(BusyFlags::default());
	let error_message = RwSignal::new(None::<String>);

	let report = move |err: AppError| {
		error!("keyword-graph: {}", err);
		error_message.set(Some(err.user_message()));
	};

	let projection = Memo::new(move |_| {
		let mode = view_state.with(|v| v.mode);
		graph.with(|g| common.with(|c| project(g, mode, c)))
	});
	let graph_view = Memo::new(move |_| {
		projection.with(|p| {
			let opacity = view_state.with(|v| emphasis(p, v));
			common.with(|c| GraphView::new(p, &opacity, c))
		})
	});

	let generating = Signal::derive(move || busy.with(|b| b.is_busy(Operation::Generate)));
	let no_graph = Signal::derive(move || graph.with(GraphData::is_empty));

	let on_generate = Callback::new(move |()| {
		if !busy.try_update(|b| b.try_begin(Operation::Generate)).unwrap_or(false) {
			return;
		}
		error_message.set(None);
		view_state.update(ViewState::reset_for_generation);

		let a = fields.keywords_a.get_untracked();
		let b = fields.keywords_b.get_untracked();
		let links = fields.links.get_untracked();
		common.set(common_keywords(&parse_keywords(&a), &parse_keywords(&b)));

		let client = client.get_value();
		spawn_local(async move {
			let (data, failure) = apply_generation(client.generate_graph(&a, &b, &links).await);
			graph.set(data);
			if let Some(e) = failure {
				report(e);
			}
			busy.update(|b| b.finish(Operation::Generate));
		});
	});

	let on_suggest = Callback::new(move |()| {
		if !busy.try_update(|b| b.try_begin(Operation::Suggest)).unwrap_or(false) {
			return;
		}
		error_message.set(None);

		let a = fields.keywords_a.get_untracked();
		let b = fields.keywords_b.get_untracked();
		let client = client.get_value();
		spawn_local(async move {
			let result = client.suggest_links(&a, &b).await;
			let (links, failure) = fields.links.with_untracked(|links| apply_suggestion(links, result));
			fields.links.set(links);
			if let Some(e) = failure {
				report(e);
			}
			busy.update(|b| b.finish(Operation::Suggest));
		});
	});

	let on_upload = Callback::new(move |(side, file): (Side, File)| {
		let kind = match busy.try_update(|b| begin_analysis(b, side, &file.type_())) {
			Some(Ok(Some(kind))) => kind,
			Some(Ok(None)) | None => return,
			Some(Err(e)) => {
				report(e);
				return;
			}
		};
		error_message.set(None);

		let client = client.get_value();
		spawn_local(async move {
			let result = analyze_document(&client, &file, kind, max_chars).await;
			let keywords = fields.keywords(side);
			let (text, failure) = keywords.with_untracked(|current| apply_analysis(current, result));
			keywords.set(text);
			if let Some(e) = failure {
				report(e);
			}
			busy.update(|b| b.finish(Operation::Analyze(side)));
		});
	});

	let on_node_click = Callback::new(move |id: String| {
		view_state.update(|v| v.toggle_selection(&id));
	});

	view! {
		<div class="app">
			<header class="app-header">
				<h1>"Keyword Knowledge Graph"</h1>
				<p class="subtitle">
					"Click a node to focus its neighbours. Drag nodes to reposition. Scroll to zoom. Drag background to pan."
				</p>
			</header>

			<main class="app-main">
				<aside class="sidebar">
					<KeywordInput
						fields=fields
						busy=busy
						on_generate=on_generate
						on_suggest=on_suggest
						on_upload=on_upload
					/>
					<FilterControls
						view_state=view_state
						system_names=Signal::derive(move || (fields.name_a.get(), fields.name_b.get()))
						has_common=Signal::derive(move || common.with(|c| !c.is_empty()))
						disabled=Signal::derive(move || no_graph.get() || generating.get())
					/>
				</aside>

				<section class="graph-panel">
					{move || {
						error_message
							.get()
							.map(|message| {
								view! {
									<div class="error-banner" role="alert">
										<span>{message}</span>
										<button
											type="button"
											class="dismiss"
											on:click=move |_| error_message.set(None)
										>
											"×"
										</button>
									</div>
								}
							})
					}}
					<ForceGraphCanvas view=graph_view on_node_click=on_node_click />
					<Show when=move || generating.get()>
						<Loader message="Generating knowledge graph..." />
					</Show>
					<Show when=move || no_graph.get() && !generating.get()>
						<div class="empty-state">
							<p>"Enter keywords for both systems and press Generate Graph."</p>
						</div>
					</Show>
				</section>
			</main>
		</div>
	}
}
