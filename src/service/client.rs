//! Client for the hosted generative completion service (Gemini REST API).

use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::prompts;
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::graph::{GraphData, clean_listing};

/// Per-call generation settings.
#[derive(Clone, Debug, Default)]
struct GenerationOptions {
	temperature: f32,
	/// When set, the service is asked for JSON conforming to this schema.
	response_schema: Option<Value>,
}

#[derive(Serialize)]
struct Request {
	contents: Vec<Content>,
	#[serde(rename = "generationConfig")]
	generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	role: Option<String>,
	#[serde(default)]
	parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
	#[serde(default)]
	text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
	temperature: f32,
	#[serde(skip_serializing_if = "Option::is_none")]
	response_mime_type: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	response_schema: Option<Value>,
}

#[derive(Deserialize)]
struct Response {
	candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
	content: Option<Content>,
}

/// Thin wrapper issuing one completion per call. Cheap to clone.
#[derive(Clone, Debug)]
pub struct GeminiClient {
	client: Client,
	api_key: String,
	model: String,
	api_base_url: String,
}

impl GeminiClient {
	/// Client for the configured model and endpoint.
	pub fn new(config: &AppConfig) -> Self {
		Self {
			client: Client::new(),
			api_key: config.api_key.clone(),
			model: config.model.clone(),
			api_base_url: config.api_base_url.clone(),
		}
	}

	/// Ask for a knowledge graph over both keyword lists and the explicit links.
	pub async fn generate_graph(
		&self,
		keywords_a: &str,
		keywords_b: &str,
		explicit_links: &str,
	) -> Result<GraphData, ServiceError> {
		let prompt = prompts::graph_prompt(keywords_a, keywords_b, explicit_links);
		let reply = self
			.complete(
				&prompt,
				GenerationOptions {
					temperature: 0.5,
					response_schema: Some(prompts::graph_response_schema()),
				},
			)
			.await?;
		let graph = GraphData::from_response(&reply)?;
		info!(
			"keyword-graph: accepted graph with {} nodes, {} links",
			graph.nodes.len(),
			graph.links.len()
		);
		Ok(graph)
	}

	/// Ask for 3-5 `keywordA-keywordB` pairs worth linking explicitly.
	pub async fn suggest_links(
		&self,
		keywords_a: &str,
		keywords_b: &str,
	) -> Result<String, ServiceError> {
		let prompt = prompts::link_suggestion_prompt(keywords_a, keywords_b);
		let reply = self
			.complete(
				&prompt,
				GenerationOptions {
					temperature: 0.7,
					..Default::default()
				},
			)
			.await?;
		Ok(clean_listing(&reply))
	}

	/// Extract a `keyword:weight` list from document text.
	pub async fn extract_keywords(&self, document_text: &str) -> Result<String, ServiceError> {
		let prompt = prompts::document_prompt(document_text);
		let reply = self
			.complete(
				&prompt,
				GenerationOptions {
					temperature: 0.3,
					..Default::default()
				},
			)
			.await?;
		let keywords = clean_listing(&reply);
		if keywords.is_empty() {
			return Err(ServiceError::EmptyResponse);
		}
		Ok(keywords)
	}

	async fn complete(
		&self,
		prompt: &str,
		options: GenerationOptions,
	) -> Result<String, ServiceError> {
		let url = format!(
			"{}/models/{}:generateContent?key={}",
			self.api_base_url, self.model, self.api_key
		);
		let structured = options.response_schema.is_some();
		let request = Request {
			contents: vec![Content {
				role: Some("user".to_string()),
				parts: vec![Part {
					text: prompt.to_string(),
				}],
			}],
			generation_config: GenerationConfig {
				temperature: options.temperature,
				response_mime_type: structured.then_some("application/json"),
				response_schema: options.response_schema,
			},
		};

		debug!(
			"keyword-graph: calling {} (temperature {}, structured {})",
			self.model, options.temperature, structured
		);
		let resp = self.client.post(&url).json(&request).send().await?;

		let status = resp.status();
		if !status.is_success() {
			let body = resp.text().await.unwrap_or_default();
			return Err(ServiceError::Status {
				status: status.as_u16(),
				body,
			});
		}

		let result: Response = resp.json().await?;
		let text = first_text(result).ok_or(ServiceError::EmptyResponse)?;
		Ok(text)
	}
}

fn first_text(response: Response) -> Option<String> {
	let text: String = response
		.candidates?
		.into_iter()
		.next()?
		.content?
		.parts
		.into_iter()
		.map(|p| p.text)
		.collect();
	let text = text.trim();
	(!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(json: &str) -> Response {
		serde_json::from_str(json).unwrap()
	}

	#[test]
	fn joins_parts_of_first_candidate() {
		let response = parse(
			r#"{"candidates": [
				{"content": {"role": "model", "parts": [{"text": "a-b,"}, {"text": "c-d "}]}},
				{"content": {"parts": [{"text": "ignored"}]}}
			]}"#,
		);
		assert_eq!(first_text(response).as_deref(), Some("a-b,c-d"));
	}

	#[test]
	fn missing_or_blank_text_is_none() {
		assert_eq!(first_text(parse(r#"{}"#)), None);
		assert_eq!(first_text(parse(r#"{"candidates": []}"#)), None);
		assert_eq!(first_text(parse(r#"{"candidates": [{}]}"#)), None);
		assert_eq!(
			first_text(parse(r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#)),
			None
		);
	}

	#[test]
	fn structured_request_shape() {
		let config = GenerationConfig {
			temperature: 0.5,
			response_mime_type: Some("application/json"),
			response_schema: Some(prompts::graph_response_schema()),
		};
		let value = serde_json::to_value(&config).unwrap();
		assert_eq!(value["responseMimeType"], "application/json");
		assert_eq!(value["responseSchema"]["type"], "OBJECT");

		let plain = GenerationConfig {
			temperature: 0.7,
			response_mime_type: None,
			response_schema: None,
		};
		let value = serde_json::to_value(&plain).unwrap();
		assert!(value.get("responseMimeType").is_none());
		assert!(value.get("responseSchema").is_none());
	}
}
