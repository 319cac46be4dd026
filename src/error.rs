//! Error types shared across the app.
//!
//! Every failure ends up as one user-visible message; the variants exist so
//! call sites can log the precise cause before it is flattened.

use thiserror::Error;

/// Startup configuration failures. Always fatal.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
	/// No non-blank API key in either source.
	#[error("API_KEY is not set; provide it at build time or in #app-config")]
	MissingApiKey,
	/// `#app-config` is not valid JSON for the config shape.
	#[error("invalid #app-config JSON: {0}")]
	Parse(String),
}

/// Failures talking to the hosted completion service.
#[derive(Debug, Error)]
pub enum ServiceError {
	/// Transport failure. The URL is stripped, as it carries the API key.
	#[error("network request failed: {0}")]
	Network(reqwest::Error),
	/// Non-success HTTP status.
	#[error("service returned HTTP {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, for the log.
		body: String,
	},
	/// No candidate text, or nothing usable in it.
	#[error("service returned an empty response")]
	EmptyResponse,
	/// Reply body or candidate text is not the expected JSON.
	#[error("malformed JSON in service response: {0}")]
	Json(#[from] serde_json::Error),
	/// JSON parsed but breaks a field constraint.
	#[error("service response violates the graph schema: {0}")]
	Schema(String),
}

/// Which user-facing operation a service failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Failed {
	/// Knowledge graph generation.
	Generation,
	/// Keyword extraction from an uploaded document.
	Analysis,
	/// Explicit-link suggestion.
	Suggestion,
}

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
	/// See [`ConfigError`].
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),
	/// Upload whose MIME type is not text, Markdown or PDF.
	#[error("unsupported file type: {0}")]
	UnsupportedFileType(String),
	/// Reading the upload or extracting PDF text failed.
	#[error("document extraction failed: {0}")]
	Document(String),
	/// A completion call failed.
	#[error("{failed:?} failed: {source}")]
	Service {
		/// Operation the call served.
		failed: Failed,
		/// Underlying cause.
		#[source]
		source: ServiceError,
	},
}

impl From<reqwest::Error> for ServiceError {
	fn from(e: reqwest::Error) -> Self {
		// The request URL carries the API key as a query parameter.
		Self::Network(e.without_url())
	}
}

impl AppError {
	/// Wrap a service failure with the operation it belongs to.
	pub fn service(failed: Failed, source: ServiceError) -> Self {
		Self::Service { failed, source }
	}

	/// The single message shown in the error banner.
	pub fn user_message(&self) -> String {
		match self {
			AppError::Config(e) => e.to_string(),
			AppError::UnsupportedFileType(mime) => {
				let mime = if mime.is_empty() { "unknown" } else { mime };
				format!("Unsupported file type: {mime}. Please upload a .txt, .md, or .pdf file.")
			}
			AppError::Document(_)
			| AppError::Service {
				failed: Failed::Analysis,
				..
			} => "Failed to analyze document and extract keywords.".to_string(),
			AppError::Service {
				failed: Failed::Generation,
				..
			} => "Failed to generate graph data from the language model.".to_string(),
			AppError::Service {
				failed: Failed::Suggestion,
				..
			} => "Failed to generate link suggestions.".to_string(),
		}
	}
}

/// Result alias for fallible app operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unsupported_type_names_the_mime() {
		let err = AppError::UnsupportedFileType("application/json".into());
		assert_eq!(
			err.user_message(),
			"Unsupported file type: application/json. Please upload a .txt, .md, or .pdf file."
		);
	}

	#[test]
	fn service_failures_map_to_their_operation() {
		let generation = AppError::service(Failed::Generation, ServiceError::EmptyResponse);
		assert!(generation.user_message().contains("generate graph"));

		let analysis = AppError::service(Failed::Analysis, ServiceError::Schema("x".into()));
		assert!(analysis.user_message().contains("analyze document"));

		let document = AppError::Document("pdf.js missing".into());
		assert_eq!(document.user_message(), analysis.user_message());
	}

	#[test]
	fn network_errors_drop_the_request_url() {
		let url = reqwest::Url::parse("https://api.example/v1/models/m:generateContent?key=secret-key")
			.unwrap();
		let err = reqwest::Client::new()
			.get("https://api.example/")
			.header("bad header", "x")
			.build()
			.unwrap_err()
			.with_url(url);
		assert!(err.to_string().contains("secret-key"));

		let err = ServiceError::from(err);
		assert!(!err.to_string().contains("secret-key"));
		let app = AppError::service(Failed::Generation, err);
		assert!(!app.to_string().contains("secret-key"));
	}

	#[test]
	fn config_errors_surface_verbatim() {
		let err = AppError::from(ConfigError::MissingApiKey);
		assert!(err.user_message().contains("API_KEY"));
	}
}
