//! Render-ready input for the force graph component.

use crate::graph::{CommonNodes, Emphasis, Link, Node, Projection};

/// A visible node with its target opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
	pub node: Node,
	/// Target opacity; the canvas eases toward it.
	pub opacity: f64,
	/// Appears in both systems' keyword lists; drawn with a star marker.
	pub common: bool,
}

/// A visible link with its target line and label opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewLink {
	pub link: Link,
	pub opacity: f64,
	pub label_opacity: f64,
}

/// Everything the canvas needs for one frame of the projected graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphView {
	pub nodes: Vec<ViewNode>,
	pub links: Vec<ViewLink>,
	/// Effective selection (ids outside the projection are already dropped).
	pub selected: Option<String>,
}

impl GraphView {
	/// Pair a projection with its emphasis and mark common keywords.
	pub fn new(projection: &Projection, emphasis: &Emphasis, common: &CommonNodes) -> Self {
		let nodes = projection
			.nodes
			.iter()
			.zip(&emphasis.nodes)
			.map(|(node, &opacity)| ViewNode {
				common: common.contains(&node.id),
				node: node.clone(),
				opacity,
			})
			.collect();
		let links = projection
			.links
			.iter()
			.zip(emphasis.links.iter().zip(&emphasis.labels))
			.map(|(link, (&opacity, &label_opacity))| ViewLink {
				link: link.clone(),
				opacity,
				label_opacity,
			})
			.collect();
		Self {
			nodes,
			links,
			selected: emphasis.selected.clone(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
