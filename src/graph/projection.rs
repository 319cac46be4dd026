//! View projection: which nodes and links are shown, and how strongly.
//!
//! Both steps are pure functions of the snapshot and a [`ViewState`] value,
//! recomputed from scratch whenever either changes.

use std::collections::HashSet;

use super::keywords::CommonNodes;
use super::model::{GraphData, Group, Link, LinkKind, Node};

/// Opacity of a node that passes the weight and selection filters.
pub const NODE_OPAQUE: f64 = 1.0;
/// Opacity of a filtered-out node.
pub const NODE_DIMMED: f64 = 0.1;
/// Opacity of a filtered-out link.
pub const LINK_DIMMED: f64 = 0.05;

/// Named projection strategy selected in the filter panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
	/// Every node and link.
	#[default]
	Overlay,
	/// Group 1 nodes and the links among them.
	SystemA,
	/// Group 2 nodes and the links among them.
	SystemB,
	/// Common keywords, plus links between them.
	Intersection,
	/// Every node once per id, links unfiltered.
	Union,
}

impl DisplayMode {
	/// Button order in the filter panel.
	pub const ALL: [DisplayMode; 5] = [
		DisplayMode::Overlay,
		DisplayMode::SystemA,
		DisplayMode::SystemB,
		DisplayMode::Intersection,
		DisplayMode::Union,
	];

	/// Button caption.
	pub fn label(self) -> &'static str {
		match self {
			DisplayMode::Overlay => "Overlay",
			DisplayMode::SystemA => "System A",
			DisplayMode::SystemB => "System B",
			DisplayMode::Intersection => "Intersection",
			DisplayMode::Union => "Union",
		}
	}
}

/// Per-kind link visibility toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkFilters {
	/// Show user-declared links.
	pub show_explicit: bool,
	/// Show model-inferred links.
	pub show_generated: bool,
}

impl Default for LinkFilters {
	fn default() -> Self {
		Self {
			show_explicit: true,
			show_generated: true,
		}
	}
}

impl LinkFilters {
	/// Whether links of `kind` are emphasised.
	pub fn shows(&self, kind: LinkKind) -> bool {
		match kind {
			LinkKind::Explicit => self.show_explicit,
			LinkKind::Generated => self.show_generated,
		}
	}
}

/// Ephemeral view settings. Replaced, never mutated behind the projection's back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
	/// Active projection.
	pub mode: DisplayMode,
	/// Link-kind toggles.
	pub filters: LinkFilters,
	/// Nodes lighter than this are dimmed.
	pub weight_threshold: f64,
	/// Clicked node id, if any.
	pub selected: Option<String>,
}

impl ViewState {
	/// State applied when a new generation starts: overlay mode, no selection.
	/// Link filters and the weight threshold are kept.
	pub fn reset_for_generation(&mut self) {
		self.mode = DisplayMode::Overlay;
		self.selected = None;
	}

	/// Click on a node: select it, or clear the selection if it was selected.
	pub fn toggle_selection(&mut self, id: &str) {
		if self.selected.as_deref() == Some(id) {
			self.selected = None;
		} else {
			self.selected = Some(id.to_string());
		}
	}
}

/// The subset of a snapshot handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Projection {
	/// Included nodes, in snapshot order.
	pub nodes: Vec<Node>,
	/// Included links, in snapshot order.
	pub links: Vec<Link>,
}

/// Hard include/exclude of nodes and links for a display mode.
pub fn project(graph: &GraphData, mode: DisplayMode, common: &CommonNodes) -> Projection {
	let nodes: Vec<Node> = match mode {
		DisplayMode::Overlay => graph.nodes.clone(),
		DisplayMode::SystemA => filter_group(&graph.nodes, Group::SystemA),
		DisplayMode::SystemB => filter_group(&graph.nodes, Group::SystemB),
		DisplayMode::Intersection => graph
			.nodes
			.iter()
			.filter(|n| common.contains(&n.id))
			.cloned()
			.collect(),
		DisplayMode::Union => {
			let mut seen = HashSet::with_capacity(graph.nodes.len());
			graph
				.nodes
				.iter()
				.filter(|n| seen.insert(n.id.as_str()))
				.cloned()
				.collect()
		}
	};

	// Union is the only mode that keeps links regardless of endpoint visibility.
	let links = if mode == DisplayMode::Union {
		graph.links.clone()
	} else {
		let visible: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		graph
			.links
			.iter()
			.filter(|l| visible.contains(l.source.as_str()) && visible.contains(l.target.as_str()))
			.cloned()
			.collect()
	};

	Projection { nodes, links }
}

fn filter_group(nodes: &[Node], group: Group) -> Vec<Node> {
	nodes.iter().filter(|n| n.group == group).cloned().collect()
}

/// Target opacities for a projection, index-aligned with its nodes and links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Emphasis {
	/// Node opacity, aligned with `Projection::nodes`.
	pub nodes: Vec<f64>,
	/// Link opacity, aligned with `Projection::links`.
	pub links: Vec<f64>,
	/// Relationship label opacity: 1 when the link is emphasised, else 0.
	pub labels: Vec<f64>,
	/// The selection after discarding ids that are not in the projection.
	pub selected: Option<String>,
}

/// Compute per-element opacity for the current view state.
pub fn emphasis(projection: &Projection, view: &ViewState) -> Emphasis {
	let selected = view
		.selected
		.as_deref()
		.filter(|id| projection.nodes.iter().any(|n| n.id == *id));

	let neighborhood: Option<HashSet<&str>> = selected.map(|id| {
		let mut set = HashSet::from([id]);
		for link in projection.links.iter().filter(|l| l.touches(id)) {
			set.insert(link.source.as_str());
			set.insert(link.target.as_str());
		}
		set
	});

	let is_opaque = |node: &Node| {
		node.weight >= view.weight_threshold
			&& neighborhood
				.as_ref()
				.is_none_or(|set| set.contains(node.id.as_str()))
	};

	let nodes: Vec<f64> = projection
		.nodes
		.iter()
		.map(|n| if is_opaque(n) { NODE_OPAQUE } else { NODE_DIMMED })
		.collect();

	// First occurrence wins for duplicate ids.
	let mut opaque_ids: HashSet<&str> = HashSet::new();
	let mut seen: HashSet<&str> = HashSet::new();
	for (node, &alpha) in projection.nodes.iter().zip(&nodes) {
		if seen.insert(node.id.as_str()) && alpha == NODE_OPAQUE {
			opaque_ids.insert(node.id.as_str());
		}
	}

	let (links, labels) = projection
		.links
		.iter()
		.map(|l| {
			let shown = view.filters.shows(l.kind)
				&& opaque_ids.contains(l.source.as_str())
				&& opaque_ids.contains(l.target.as_str());
			if shown {
				((l.strength * 0.7 + 0.2).clamp(0.0, 1.0), 1.0)
			} else {
				(LINK_DIMMED, 0.0)
			}
		})
		.unzip();

	Emphasis {
		nodes,
		links,
		labels,
		selected: selected.map(str::to_string),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, weight: f64, group: u8) -> Node {
		Node {
			id: id.into(),
			weight,
			group: Group::from_number(group).unwrap(),
		}
	}

	fn link(source: &str, target: &str, kind: LinkKind, strength: f64) -> Link {
		Link {
			source: source.into(),
			target: target.into(),
			kind,
			label: "supports".into(),
			strength,
		}
	}

	fn design_business() -> GraphData {
		GraphData {
			nodes: vec![node("design", 10.0, 1), node("business", 8.0, 2)],
			links: vec![link("design", "business", LinkKind::Generated, 0.6)],
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![
				node("design", 10.0, 1),
				node("product", 9.0, 1),
				node("business", 8.0, 2),
				node("brand", 7.0, 2),
				node("innovation", 5.0, 3),
				node("growth", 3.0, 4),
			],
			links: vec![
				link("design", "product", LinkKind::Generated, 0.8),
				link("business", "brand", LinkKind::Explicit, 1.0),
				link("design", "brand", LinkKind::Explicit, 1.0),
				link("product", "innovation", LinkKind::Generated, 0.3),
				link("innovation", "growth", LinkKind::Generated, 0.5),
			],
		}
	}

	fn ids(p: &Projection) -> Vec<&str> {
		p.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn overlay_keeps_everything() {
		let graph = sample();
		let p = project(&graph, DisplayMode::Overlay, &CommonNodes::new());
		assert_eq!(p.nodes, graph.nodes);
		assert_eq!(p.links, graph.links);
	}

	#[test]
	fn system_modes_select_exactly_their_group() {
		let graph = sample();
		let a = project(&graph, DisplayMode::SystemA, &CommonNodes::new());
		assert_eq!(ids(&a), ["design", "product"]);
		assert!(a.nodes.iter().all(|n| n.group == Group::SystemA));
		assert_eq!(a.links.len(), 1);
		assert_eq!((a.links[0].source.as_str(), a.links[0].target.as_str()), ("design", "product"));

		let b = project(&graph, DisplayMode::SystemB, &CommonNodes::new());
		assert_eq!(ids(&b), ["business", "brand"]);
		assert_eq!(b.links.len(), 1);
	}

	#[test]
	fn intersection_uses_common_set() {
		let graph = sample();
		let common = CommonNodes::from(["design".to_string(), "brand".to_string()]);
		let p = project(&graph, DisplayMode::Intersection, &common);
		assert_eq!(ids(&p), ["design", "brand"]);
		assert_eq!(p.links.len(), 1);
		assert_eq!(p.links[0].kind, LinkKind::Explicit);
	}

	#[test]
	fn intersection_with_empty_common_set_is_empty() {
		let p = project(&design_business(), DisplayMode::Intersection, &CommonNodes::new());
		assert!(p.nodes.is_empty());
		assert!(p.links.is_empty());
	}

	#[test]
	fn union_never_drops_links_for_endpoints() {
		let mut graph = sample();
		graph.links.push(link("design", "ghost", LinkKind::Generated, 0.2));
		graph.nodes.push(node("design", 2.0, 2));

		let union = project(&graph, DisplayMode::Union, &CommonNodes::new());
		assert_eq!(union.links, graph.links);
		assert_eq!(union.nodes.len(), 6);
		assert_eq!(union.nodes[0].weight, 10.0);

		let overlay = project(&graph, DisplayMode::Overlay, &CommonNodes::new());
		assert_eq!(overlay.links.len(), graph.links.len() - 1);
	}

	#[test]
	fn empty_snapshot_projects_to_empty() {
		for mode in DisplayMode::ALL {
			let p = project(&GraphData::default(), mode, &CommonNodes::new());
			assert_eq!(p, Projection::default());
		}
	}

	#[test]
	fn threshold_dims_light_nodes_and_their_links() {
		let p = project(&design_business(), DisplayMode::Overlay, &CommonNodes::new());
		let view = ViewState {
			weight_threshold: 9.0,
			..ViewState::default()
		};
		let e = emphasis(&p, &view);
		assert_eq!(e.nodes, [NODE_OPAQUE, NODE_DIMMED]);
		assert_eq!(e.links, [LINK_DIMMED]);
		assert_eq!(e.labels, [0.0]);
	}

	#[test]
	fn threshold_dimming_ignores_selection() {
		let graph = sample();
		let p = project(&graph, DisplayMode::Overlay, &CommonNodes::new());
		for selected in [None, Some("design"), Some("growth")] {
			let view = ViewState {
				weight_threshold: 8.0,
				selected: selected.map(str::to_string),
				..ViewState::default()
			};
			let e = emphasis(&p, &view);
			for (n, alpha) in p.nodes.iter().zip(&e.nodes) {
				if n.weight < 8.0 {
					assert_eq!(*alpha, NODE_DIMMED, "{} with {selected:?}", n.id);
				}
			}
		}
	}

	#[test]
	fn unselected_view_only_applies_weight_and_type() {
		let p = project(&sample(), DisplayMode::Overlay, &CommonNodes::new());
		let view = ViewState {
			filters: LinkFilters {
				show_explicit: false,
				show_generated: true,
			},
			..ViewState::default()
		};
		let e = emphasis(&p, &view);
		assert!(e.nodes.iter().all(|&a| a == NODE_OPAQUE));
		for (l, alpha) in p.links.iter().zip(&e.links) {
			match l.kind {
				LinkKind::Explicit => assert_eq!(*alpha, LINK_DIMMED),
				LinkKind::Generated => {
					assert!((alpha - (l.strength * 0.7 + 0.2)).abs() < 1e-9)
				}
			}
		}
	}

	#[test]
	fn selection_keeps_neighbors_opaque() {
		let p = project(&sample(), DisplayMode::Overlay, &CommonNodes::new());
		let view = ViewState {
			selected: Some("design".into()),
			..ViewState::default()
		};
		let e = emphasis(&p, &view);
		let opaque: Vec<&str> = p
			.nodes
			.iter()
			.zip(&e.nodes)
			.filter(|(_, a)| **a == NODE_OPAQUE)
			.map(|(n, _)| n.id.as_str())
			.collect();
		assert_eq!(opaque, ["design", "product", "brand"]);
		// product -> innovation has a dimmed endpoint.
		assert_eq!(e.links[3], LINK_DIMMED);
		assert_eq!(e.selected.as_deref(), Some("design"));
	}

	#[test]
	fn stale_selection_is_ignored() {
		let p = project(&sample(), DisplayMode::SystemB, &CommonNodes::new());
		let view = ViewState {
			selected: Some("design".into()),
			..ViewState::default()
		};
		let e = emphasis(&p, &view);
		assert_eq!(e.selected, None);
		assert!(e.nodes.iter().all(|&a| a == NODE_OPAQUE));
	}

	#[test]
	fn toggling_selection() {
		let mut view = ViewState::default();
		view.toggle_selection("a");
		assert_eq!(view.selected.as_deref(), Some("a"));
		view.toggle_selection("b");
		assert_eq!(view.selected.as_deref(), Some("b"));
		view.toggle_selection("b");
		assert_eq!(view.selected, None);
	}

	#[test]
	fn reset_keeps_filters_and_threshold() {
		let mut view = ViewState {
			mode: DisplayMode::Union,
			filters: LinkFilters {
				show_explicit: false,
				show_generated: true,
			},
			weight_threshold: 4.0,
			selected: Some("x".into()),
		};
		view.reset_for_generation();
		assert_eq!(view.mode, DisplayMode::Overlay);
		assert_eq!(view.selected, None);
		assert!(!view.filters.show_explicit);
		assert_eq!(view.weight_threshold, 4.0);
	}
}
