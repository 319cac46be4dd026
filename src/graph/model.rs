//! Graph snapshot types and validation of the service payload.

use std::collections::HashSet;
use std::fmt;

use log::warn;
use serde::Deserialize;

use crate::error::ServiceError;

/// Provenance cluster of a node, as assigned by the language model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
	/// Keyword from System A (group 1).
	SystemA,
	/// Keyword from System B (group 2).
	SystemB,
	/// Concept bridging both systems (group 3).
	Bridge,
	/// First other thematic cluster (group 4).
	Cluster4,
	/// Second other thematic cluster (group 5).
	Cluster5,
}

impl Group {
	/// The group with wire number `n`, if `n` is in 1..=5.
	pub fn from_number(n: u8) -> Option<Self> {
		match n {
			1 => Some(Group::SystemA),
			2 => Some(Group::SystemB),
			3 => Some(Group::Bridge),
			4 => Some(Group::Cluster4),
			5 => Some(Group::Cluster5),
			_ => None,
		}
	}

	/// Wire number, 1..=5.
	pub fn number(self) -> u8 {
		match self {
			Group::SystemA => 1,
			Group::SystemB => 2,
			Group::Bridge => 3,
			Group::Cluster4 => 4,
			Group::Cluster5 => 5,
		}
	}
}

impl fmt::Display for Group {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.number())
	}
}

/// Whether a link was declared by the user or inferred by the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
	/// Declared by the user in the explicit-links field.
	Explicit,
	/// Inferred by the language model.
	Generated,
}

/// A keyword vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Keyword, unique within a snapshot.
	pub id: String,
	/// Importance, used for sizing and the weight threshold.
	pub weight: f64,
	/// Provenance cluster.
	pub group: Group,
}

/// A relationship between two node ids.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
	/// Explicit or generated; the wire field is `type`.
	pub kind: LinkKind,
	/// Short relationship verb, e.g. "supports".
	pub label: String,
	/// 0.1 (weak) to 1.0 (strong) by contract with the service.
	pub strength: f64,
}

impl Link {
	/// Whether `id` is either endpoint.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

/// One generation's worth of nodes and links. Replaced wholesale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Keyword vertices, in response order.
	pub nodes: Vec<Node>,
	/// Links whose endpoints both name a node.
	pub links: Vec<Link>,
}

#[derive(Deserialize)]
struct RawGraph {
	nodes: Vec<RawNode>,
	links: Vec<RawLink>,
}

#[derive(Deserialize)]
struct RawNode {
	id: String,
	weight: f64,
	group: f64,
}

#[derive(Deserialize)]
struct RawLink {
	source: String,
	target: String,
	#[serde(rename = "type")]
	kind: LinkKind,
	label: String,
	strength: f64,
}

impl GraphData {
	/// No nodes, so nothing to lay out.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Parse and validate a graph payload returned by the completion service.
	///
	/// Missing fields, an unknown link `type`, a `group` outside 1..=5 or a
	/// non-positive weight reject the whole payload. Links with an endpoint
	/// that names no node are dropped.
	pub fn from_response(text: &str) -> Result<Self, ServiceError> {
		let body = strip_code_fence(text);
		if body.is_empty() {
			return Err(ServiceError::EmptyResponse);
		}
		let raw: RawGraph = serde_json::from_str(body)?;

		let nodes = raw
			.nodes
			.into_iter()
			.map(validate_node)
			.collect::<Result<Vec<_>, _>>()?;
		if nodes.is_empty() {
			return Err(ServiceError::EmptyResponse);
		}

		let mut ids = HashSet::with_capacity(nodes.len());
		for node in &nodes {
			if !ids.insert(node.id.as_str()) {
				warn!("keyword-graph: duplicate node id {:?} in response", node.id);
			}
		}

		let mut links = Vec::with_capacity(raw.links.len());
		for link in raw.links {
			let link = validate_link(link)?;
			if ids.contains(link.source.as_str()) && ids.contains(link.target.as_str()) {
				links.push(link);
			} else {
				warn!(
					"keyword-graph: dropping link {} -> {} with unknown endpoint",
					link.source, link.target
				);
			}
		}

		Ok(Self { nodes, links })
	}
}

fn validate_node(raw: RawNode) -> Result<Node, ServiceError> {
	let id = raw.id.trim().to_string();
	if id.is_empty() {
		return Err(ServiceError::Schema("node with empty id".into()));
	}
	if !raw.weight.is_finite() || raw.weight <= 0.0 {
		return Err(ServiceError::Schema(format!(
			"node {id:?} has invalid weight {}",
			raw.weight
		)));
	}
	let group = (raw.group.fract() == 0.0 && (1.0..=5.0).contains(&raw.group))
		.then(|| Group::from_number(raw.group as u8))
		.flatten()
		.ok_or_else(|| {
			ServiceError::Schema(format!("node {id:?} has invalid group {}", raw.group))
		})?;
	Ok(Node {
		id,
		weight: raw.weight,
		group,
	})
}

fn validate_link(raw: RawLink) -> Result<Link, ServiceError> {
	if !raw.strength.is_finite() {
		return Err(ServiceError::Schema(format!(
			"link {} -> {} has invalid strength",
			raw.source, raw.target
		)));
	}
	Ok(Link {
		source: raw.source.trim().to_string(),
		target: raw.target.trim().to_string(),
		kind: raw.kind,
		label: raw.label,
		strength: raw.strength,
	})
}

/// Strip a surrounding Markdown code fence (```json ... ```), if any.
///
/// The fence may span lines or sit on a single line (```{...}```).
pub(crate) fn strip_code_fence(text: &str) -> &str {
	let trimmed = text.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let rest = rest.strip_suffix("```").unwrap_or(rest);
	let body = match rest.find('\n') {
		// Skip the language tag line.
		Some(i) => &rest[i + 1..],
		None => skip_language_tag(rest),
	};
	body.trim()
}

/// Drop a leading `json`-style tag from a single-line fence body. A word is
/// only a tag when whitespace or the start of a JSON value follows it, so
/// `ai:10, ml:9` is kept whole.
fn skip_language_tag(body: &str) -> &str {
	let tag_len = body
		.find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
		.unwrap_or(body.len());
	let after = &body[tag_len..];
	if tag_len > 0 && after.starts_with(|c: char| c.is_whitespace() || c == '{' || c == '[') {
		after
	} else {
		body
	}
}
