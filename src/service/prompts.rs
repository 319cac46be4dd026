//! Prompt templates and the graph response schema.

use serde_json::{Value, json};

/// Build the knowledge-graph generation prompt.
pub fn graph_prompt(keywords_a: &str, keywords_b: &str, explicit_links: &str) -> String {
	format!(
		r#"You are an AI expert specializing in creating knowledge graphs to analyze shared values, interests, and collaboration potential between two entities.

Your task is to analyze two sets of weighted keywords (System A, System B) and explicit connections. Generate a knowledge graph representing their concepts and relationships.

**Instructions:**

1.  **Incorporate All Inputs:** All keywords from System A, System B, and all explicit links must be in the graph.
2.  **Grouping:**
    *   System A keywords: `group: 1`.
    *   System B keywords: `group: 2`.
    *   "Bridge" keywords connecting A & B: `group: 3`. These show collaboration potential.
    *   Use `group: 4` and `group: 5` for other thematic clusters.
3.  **Expansion:** Generate new, semantically related keywords to enrich the graph.
4.  **Weighting:** Assign a `weight` (integer 1-20) to every node, reflecting its importance. User weights are hints.
5.  **Linking:**
    *   For each link, define its relationship with a `label`. The label must be a single, concise, lowercase verb (e.g., 'influences', 'supports', 'related').
    *   Assign a `strength` to each link (a number from 0.1 for weak to 1.0 for strong).
    *   User-defined "Explicit Links" **MUST** have `type: "explicit"`, `label: "connects"`, and `strength: 1.0`.
    *   All other AI-created links **MUST** have `type: "generated"`.

**Inputs:**

*   **System A Keywords:** "{keywords_a}"
*   **System B Keywords:** "{keywords_b}"
*   **Explicit Links (source-target):** "{explicit_links}"

**Output:**

Your output must be a single, valid JSON object conforming to the provided schema. Do not include any text, code blocks, or explanations."#
	)
}

/// Build the link-suggestion prompt. The reply is a bare `a-b,c-d` list.
pub fn link_suggestion_prompt(keywords_a: &str, keywords_b: &str) -> String {
	format!(
		r#"You are an expert strategic analyst and deal maker. Your task is to identify the most valuable and impactful connections between two sets of keywords representing two different systems or entities (System A and System B).

Analyze the keywords and identify pairs that represent significant opportunities for collaboration, synergy, or strategic partnership. Think about which connections would create the most value if explicitly made.

**Instructions:**
1.  Identify the top 3-5 most potent keyword pairs that link System A and System B.
2.  Format your output as a single, comma-separated string of these pairs.
3.  Each pair should be in the format `keywordA-keywordB`.
4.  Do not include any explanations, introductory text, or any characters other than the comma-separated list.

**Example Output:**
design-startup,product-market-fit,collaboration-business

**Inputs:**

*   **System A Keywords:** "{keywords_a}"
*   **System B Keywords:** "{keywords_b}"

**Output:**"#
	)
}

/// Build the document keyword-extraction prompt. The reply is a bare
/// `keyword:weight` list with weights 1-10.
pub fn document_prompt(document_text: &str) -> String {
	format!(
		r#"You are an AI expert in text analysis and knowledge extraction. Your task is to analyze the following document and extract the top 15-20 most important and relevant keywords and concepts.

**Instructions:**
1.  Read the entire document text carefully.
2.  Identify the key themes, topics, and entities.
3.  Assign a weight to each identified keyword/concept on a scale of 1 to 10, where 10 is the most important or central to the document.
4.  Format your output as a single, comma-separated string.
5.  Each item in the string must be in the format `keyword:weight`.
6.  Ensure the output is clean and contains only the comma-separated list, with no introductory text, explanations, or code block formatting.

**Example Output:**
artificial-intelligence:10, machine-learning:9, data-analysis:8, strategic-planning:7

**Document Text:**
---
{document_text}
---

**Output:**"#
	)
}

/// Structured-output schema for [`graph_prompt`] replies.
pub fn graph_response_schema() -> Value {
	json!({
		"type": "OBJECT",
		"properties": {
			"nodes": {
				"type": "ARRAY",
				"description": "An array of keyword nodes.",
				"items": {
					"type": "OBJECT",
					"properties": {
						"id": { "type": "STRING", "description": "The keyword text." },
						"weight": { "type": "NUMBER", "description": "Importance of the node, from 1 to 20." },
						"group": { "type": "NUMBER", "description": "A numeric identifier for the thematic cluster (1-5)." }
					},
					"required": ["id", "weight", "group"]
				}
			},
			"links": {
				"type": "ARRAY",
				"description": "An array of links connecting the nodes.",
				"items": {
					"type": "OBJECT",
					"properties": {
						"source": { "type": "STRING", "description": "The ID of the source node." },
						"target": { "type": "STRING", "description": "The ID of the target node." },
						"type": {
							"type": "STRING",
							"enum": ["explicit", "generated"],
							"description": "Must be 'explicit' for user-defined links, and 'generated' for AI-created links."
						},
						"label": {
							"type": "STRING",
							"description": "A concise, single-word verb in lowercase for the relationship, e.g., 'influences', 'supports', 'related', 'conflicts'."
						},
						"strength": { "type": "NUMBER", "description": "Confidence score of the link, from 0.1 (weak) to 1.0 (strong)." }
					},
					"required": ["source", "target", "type", "label", "strength"]
				}
			}
		},
		"required": ["nodes", "links"]
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn graph_prompt_embeds_all_inputs() {
		let prompt = graph_prompt("design:10", "business:8", "design-business");
		assert!(prompt.contains(r#"**System A Keywords:** "design:10""#));
		assert!(prompt.contains(r#"**System B Keywords:** "business:8""#));
		assert!(prompt.contains(r#"**Explicit Links (source-target):** "design-business""#));
		assert!(prompt.contains(r#"`label: "connects"`"#));
	}

	#[test]
	fn document_prompt_fences_the_text() {
		let prompt = document_prompt("Quarterly report body");
		assert!(prompt.contains("---\nQuarterly report body\n---"));
	}

	#[test]
	fn schema_closes_the_link_type() {
		let schema = graph_response_schema();
		let kinds = &schema["properties"]["links"]["items"]["properties"]["type"]["enum"];
		assert_eq!(kinds, &json!(["explicit", "generated"]));
		assert_eq!(schema["required"], json!(["nodes", "links"]));
	}
}
