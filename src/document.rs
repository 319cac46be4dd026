//! Client-side text extraction for uploaded documents.
//!
//! Plain text and Markdown are read through `Blob.text()`. PDFs go through the
//! pdf.js global loaded by the host page.

use js_sys::{Array, Function, Object, Promise, Reflect};
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::error::{AppError, AppResult};

const PDFJS_GLOBAL: &str = "pdfjs-dist/build/pdf";

/// Accepted upload formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
	/// `text/plain`.
	PlainText,
	/// `text/markdown`.
	Markdown,
	/// `application/pdf`, read through pdf.js.
	Pdf,
}

impl DocumentKind {
	/// Map a MIME type to a supported kind, rejecting everything else.
	pub fn from_mime(mime: &str) -> AppResult<Self> {
		match mime {
			"text/plain" => Ok(DocumentKind::PlainText),
			"text/markdown" => Ok(DocumentKind::Markdown),
			"application/pdf" => Ok(DocumentKind::Pdf),
			other => Err(AppError::UnsupportedFileType(other.to_string())),
		}
	}
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
	match text.char_indices().nth(max) {
		Some((byte, _)) => &text[..byte],
		None => text,
	}
}

/// Extract the full text of an uploaded file.
pub async fn read_document(file: &File, kind: DocumentKind) -> AppResult<String> {
	match kind {
		DocumentKind::PlainText | DocumentKind::Markdown => {
			let text = JsFuture::from(file.text()).await.map_err(js_error)?;
			text.as_string()
				.ok_or_else(|| AppError::Document("file text is not a string".into()))
		}
		DocumentKind::Pdf => read_pdf(file).await,
	}
}

async fn read_pdf(file: &File) -> AppResult<String> {
	let window = web_sys::window().ok_or_else(|| AppError::Document("no window".into()))?;
	let pdfjs = Reflect::get(&window, &JsValue::from_str(PDFJS_GLOBAL)).map_err(js_error)?;
	if pdfjs.is_undefined() {
		return Err(AppError::Document("pdf.js is not loaded".into()));
	}

	let version = get(&pdfjs, "version")?.as_string().unwrap_or_default();
	let worker_options = get(&pdfjs, "GlobalWorkerOptions")?;
	Reflect::set(
		&worker_options,
		&JsValue::from_str("workerSrc"),
		&JsValue::from_str(&format!(
			"https://cdnjs.cloudflare.com/ajax/libs/pdf.js/{version}/pdf.worker.min.js"
		)),
	)
	.map_err(js_error)?;

	let buffer = JsFuture::from(file.array_buffer()).await.map_err(js_error)?;
	let task = call(&pdfjs, "getDocument", &[buffer])?;
	let doc = await_promise(get(&task, "promise")?).await?;
	let pages = get(&doc, "numPages")?.as_f64().unwrap_or(0.0) as u32;
	debug!("keyword-graph: extracting {pages} pdf pages");

	let mut text = String::new();
	for number in 1..=pages {
		let page = await_promise(call(&doc, "getPage", &[JsValue::from(number)])?).await?;
		let content = await_promise(call(&page, "getTextContent", &[])?).await?;
		let items: Array = get(&content, "items")?.dyn_into().map_err(js_error)?;
		let page_text = items
			.iter()
			.filter_map(|item| Reflect::get(&item, &JsValue::from_str("str")).ok())
			.filter_map(|s| s.as_string())
			.collect::<Vec<_>>()
			.join(" ");
		if !text.is_empty() {
			text.push('\n');
		}
		text.push_str(&page_text);
	}
	Ok(text)
}

fn get(target: &JsValue, key: &str) -> AppResult<JsValue> {
	Reflect::get(target, &JsValue::from_str(key)).map_err(js_error)
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> AppResult<JsValue> {
	let function: Function = get(target, method)?
		.dyn_into()
		.map_err(|_| AppError::Document(format!("pdf.js has no `{method}`")))?;
	let args: Array = args.iter().collect();
	function.apply(target, &args).map_err(js_error)
}

async fn await_promise(value: JsValue) -> AppResult<JsValue> {
	let promise: Promise = value.dyn_into().map_err(js_error)?;
	JsFuture::from(promise).await.map_err(js_error)
}

fn js_error(value: impl Into<JsValue>) -> AppError {
	let value = value.into();
	let message = value
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.or_else(|| value.as_string())
		.unwrap_or_else(|| {
			Object::from(value)
				.to_string()
				.as_string()
				.unwrap_or_default()
		});
	AppError::Document(message)
}
