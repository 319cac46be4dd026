//! Runtime configuration for the completion service.
//!
//! Settings come from an optional `<script id="app-config">` JSON block in the
//! host page, with the API key falling back to the `API_KEY` variable captured
//! at build time.

use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::error::ConfigError;

/// Model used when `#app-config` names none.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Base URL of the Generative Language REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Documents are truncated to this many characters before analysis.
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 15_000;

/// Resolved configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Service credential, never blank.
	pub api_key: String,
	/// Model name, e.g. `gemini-2.5-flash`.
	pub model: String,
	/// API root without a trailing slash.
	pub api_base_url: String,
	/// Upload text is cut to this many characters.
	pub max_document_chars: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
	api_key: Option<String>,
	model: Option<String>,
	api_base_url: Option<String>,
	max_document_chars: Option<usize>,
}

impl AppConfig {
	/// Load from the page's `#app-config` element and the build environment.
	pub fn load() -> Result<Self, ConfigError> {
		let json = read_config_element();
		Self::from_sources(json.as_deref(), option_env!("API_KEY"))
	}

	/// Merge the page JSON (if any) with the build-time key.
	/// Page values win; blank strings count as unset.
	pub fn from_sources(json: Option<&str>, env_key: Option<&str>) -> Result<Self, ConfigError> {
		let raw = match json.map(str::trim).filter(|s| !s.is_empty()) {
			Some(text) => serde_json::from_str::<RawConfig>(text)
				.map_err(|e| ConfigError::Parse(e.to_string()))?,
			None => RawConfig::default(),
		};

		let api_key = non_blank(raw.api_key)
			.or_else(|| non_blank(env_key.map(str::to_string)))
			.ok_or(ConfigError::MissingApiKey)?;

		Ok(Self {
			api_key,
			model: non_blank(raw.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
			api_base_url: non_blank(raw.api_base_url)
				.map(|url| url.trim_end_matches('/').to_string())
				.unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
			max_document_chars: raw
				.max_document_chars
				.filter(|&n| n > 0)
				.unwrap_or(DEFAULT_MAX_DOCUMENT_CHARS),
		})
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
}

fn read_config_element() -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id("app-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn env_key_alone_uses_defaults() {
		let config = AppConfig::from_sources(None, Some("k-123")).unwrap();
		assert_eq!(config.api_key, "k-123");
		assert_eq!(config.model, DEFAULT_MODEL);
		assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
		assert_eq!(config.max_document_chars, 15_000);
	}

	#[test]
	fn page_config_overrides_env() {
		let json = r#"{
			"apiKey": "page-key",
			"model": "gemini-2.0-pro",
			"apiBaseUrl": "https://proxy.example/v1/",
			"maxDocumentChars": 500
		}"#;
		let config = AppConfig::from_sources(Some(json), Some("env-key")).unwrap();
		assert_eq!(config.api_key, "page-key");
		assert_eq!(config.model, "gemini-2.0-pro");
		assert_eq!(config.api_base_url, "https://proxy.example/v1");
		assert_eq!(config.max_document_chars, 500);
	}

	#[test]
	fn blank_key_everywhere_is_fatal() {
		assert_eq!(
			AppConfig::from_sources(Some(r#"{"apiKey": "  "}"#), Some("")),
			Err(ConfigError::MissingApiKey)
		);
		assert_eq!(AppConfig::from_sources(None, None), Err(ConfigError::MissingApiKey));
	}

	#[test]
	fn malformed_json_is_reported() {
		let err = AppConfig::from_sources(Some("{apiKey:"), Some("k")).unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn empty_element_falls_back_to_env() {
		let config = AppConfig::from_sources(Some("   "), Some("k")).unwrap();
		assert_eq!(config.api_key, "k");
	}
}
