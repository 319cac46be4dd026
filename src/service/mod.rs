//! Generative completion service: prompts and the HTTP client.

mod client;
pub mod prompts;

pub use client::GeminiClient;
